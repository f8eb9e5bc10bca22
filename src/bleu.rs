//! Sentence-level BLEU
//!
//! Smoothed, effective-order sentence BLEU on a 0-100 scale, computed on
//! mt-eval-style tokens (punctuation split from words). Zero-count n-gram
//! orders fall back to an exponentially shrinking pseudo-count instead of
//! zeroing the whole product; orders longer than the hypothesis are skipped
//! rather than scored.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Highest n-gram order entering the geometric mean
pub const MAX_ORDER: usize = 4;

/// Score plus the pieces it was assembled from
#[derive(Debug, Clone)]
pub struct BleuScore {
    /// 0-100
    pub score: f64,
    /// Modified n-gram precisions (percent), indexed by order - 1; orders
    /// past the hypothesis length stay 0
    pub precisions: [f64; MAX_ORDER],
    pub brevity_penalty: f64,
    pub hyp_len: usize,
    pub ref_len: usize,
}

fn punct_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([^\w\s])").expect("valid literal regex"))
}

/// Split detokenized text the way mt evaluation tokenizers do: every
/// punctuation character becomes its own token
fn tokenize(text: &str) -> Vec<String> {
    let spaced = punct_regex().replace_all(text, " $1 ");
    spaced.split_whitespace().map(|t| t.to_string()).collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts: HashMap<&[String], usize> = HashMap::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
    }
    counts
}

/// Smoothed sentence BLEU of a detokenized hypothesis against one reference
pub fn sentence_bleu(hypothesis: &str, reference: &str) -> BleuScore {
    let hyp = tokenize(hypothesis);
    let reference = tokenize(reference);
    let hyp_len = hyp.len();
    let ref_len = reference.len();

    let mut precisions = [0.0; MAX_ORDER];
    let mut log_sum = 0.0;
    let mut effective_order = 0usize;
    let mut smooth = 1.0f64;

    for n in 1..=MAX_ORDER {
        if hyp_len < n {
            break;
        }
        effective_order += 1;
        let total = hyp_len - n + 1;

        let hyp_counts = ngram_counts(&hyp, n);
        let ref_counts = ngram_counts(&reference, n);
        let mut correct = 0usize;
        for (gram, count) in &hyp_counts {
            correct += (*count).min(ref_counts.get(gram).copied().unwrap_or(0));
        }

        let p = if correct == 0 {
            smooth *= 2.0;
            100.0 / (smooth * total as f64)
        } else {
            100.0 * correct as f64 / total as f64
        };
        precisions[n - 1] = p;
        log_sum += p.ln();
    }

    // Empty hypothesis: nothing to score
    if effective_order == 0 {
        return BleuScore {
            score: 0.0,
            precisions,
            brevity_penalty: 0.0,
            hyp_len,
            ref_len,
        };
    }

    let brevity_penalty = if hyp_len < ref_len {
        (1.0 - ref_len as f64 / hyp_len as f64).exp()
    } else {
        1.0
    };

    let score = brevity_penalty * (log_sum / effective_order as f64).exp();
    BleuScore {
        score,
        precisions,
        brevity_penalty,
        hyp_len,
        ref_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        assert_eq!(tokenize("Hello, world!"), vec!["Hello", ",", "world", "!"]);
        assert_eq!(tokenize("a  b"), vec!["a", "b"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_identical_sentences_score_100() {
        let b = sentence_bleu("the quick brown fox jumps", "the quick brown fox jumps");
        assert!(approx(b.score, 100.0, 1e-9));
        assert_eq!(b.brevity_penalty, 1.0);
        for p in b.precisions {
            assert!(approx(p, 100.0, 1e-9));
        }
    }

    #[test]
    fn test_smoothed_partial_overlap() {
        // hyp "the the the" vs ref "the cat":
        //   p1 = 100/3, p2 = 100/(2*2), p3 = 100/(4*1), order 4 skipped
        //   score = (p1*p2*p3)^(1/3) = 27.516, bp = 1 (hyp longer)
        let b = sentence_bleu("the the the", "the cat");
        assert!(approx(b.precisions[0], 100.0 / 3.0, 1e-9));
        assert!(approx(b.precisions[1], 25.0, 1e-9));
        assert!(approx(b.precisions[2], 25.0, 1e-9));
        assert_eq!(b.precisions[3], 0.0);
        assert_eq!(b.brevity_penalty, 1.0);
        assert!(approx(b.score, 27.516, 0.01));
    }

    #[test]
    fn test_brevity_penalty_for_short_hypothesis() {
        // hyp "the cat" vs ref "the cat sat": perfect 1/2-gram precision,
        // orders 3-4 skipped, bp = exp(1 - 3/2)
        let b = sentence_bleu("the cat", "the cat sat");
        assert!(approx(b.brevity_penalty, (-0.5f64).exp(), 1e-9));
        assert!(approx(b.score, 100.0 * (-0.5f64).exp(), 1e-6));
    }

    #[test]
    fn test_empty_hypothesis_scores_zero() {
        let b = sentence_bleu("", "the cat");
        assert_eq!(b.score, 0.0);
        assert_eq!(b.hyp_len, 0);
        assert_eq!(b.ref_len, 2);
    }

    #[test]
    fn test_disjoint_sentences_score_low_but_positive() {
        // Smoothing keeps the geometric mean defined with zero matches
        let b = sentence_bleu("aa bb cc dd", "ee ff gg hh");
        assert!(b.score > 0.0);
        assert!(b.score < 30.0);
    }
}
