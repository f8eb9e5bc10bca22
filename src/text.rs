//! Subword-tokenization helpers
//!
//! Attribution records store sentences the way the subword tokenizer emitted
//! them: pieces separated by ASCII spaces, word boundaries marked with the
//! `▁` (U+2581) placeholder. Display and scoring want the original surface
//! form back; heatmap axes want the pieces.

/// Reverse the subword marker: drop piece separators, turn `▁` back into
/// spaces, trim the leading boundary
pub fn desentencepiece(sent: &str) -> String {
    sent.replace(' ', "").replace('▁', " ").trim().to_string()
}

/// Subword pieces of a tokenized sentence, in order
pub fn subword_tokens(sent: &str) -> Vec<&str> {
    sent.split_whitespace().collect()
}

/// Heatmap axis labels: the subword pieces plus a trailing EOS sentinel,
/// matching the matrix's extra row/column
pub fn axis_labels(sent: &str, eos: &str) -> Vec<String> {
    let mut labels: Vec<String> = subword_tokens(sent).iter().map(|t| t.to_string()).collect();
    labels.push(eos.to_string());
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desentencepiece_restores_surface_form() {
        assert_eq!(desentencepiece("▁the ▁quick ▁fox"), "the quick fox");
        // pieces inside a word carry no marker
        assert_eq!(desentencepiece("▁un believ able"), "unbelievable");
    }

    #[test]
    fn test_desentencepiece_trims_and_handles_empty() {
        assert_eq!(desentencepiece(""), "");
        assert_eq!(desentencepiece("▁"), "");
        assert_eq!(desentencepiece("  ▁hi  "), "hi");
    }

    #[test]
    fn test_subword_tokens_split() {
        assert_eq!(subword_tokens("▁a b ▁c"), vec!["▁a", "b", "▁c"]);
        assert!(subword_tokens("").is_empty());
    }

    #[test]
    fn test_axis_labels_append_eos() {
        assert_eq!(axis_labels("▁a b", "<EOS>"), vec!["▁a", "b", "<EOS>"]);
        assert_eq!(axis_labels("", "</s>"), vec!["</s>"]);
    }
}
