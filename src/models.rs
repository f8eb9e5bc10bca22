//! Core data models for lrpscope
//!
//! Attribution matrices, per-sentence records, and the loaded comparison
//! set that the UI, exporters, and validators read from.

use serde::Serialize;

use crate::bleu::{self, BleuScore};
use crate::text;

/// Shape violations caught when building a matrix from raw nested lists
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("attribution matrix is empty")]
    Empty,
    #[error("attribution matrix is ragged: row {row} has {got} columns, expected {expected}")]
    Ragged {
        row: usize,
        got: usize,
        expected: usize,
    },
}

/// Dense row-major relevance matrix.
///
/// Row `r` is the output (dst) token at position `r`, column `c` the source
/// token at position `c`. The final row and column belong to the EOS
/// sentinel, so the shape is `(|dst tokens| + 1, |src tokens| + 1)` when the
/// upstream pipeline behaved.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl AttributionMatrix {
    /// Build from nested rows, rejecting empty and ragged input
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let rows = data.len();
        let cols = data.first().map(|r| r.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(ShapeError::Empty);
        }
        let mut values = Vec::with_capacity(rows * cols);
        for (i, row) in data.into_iter().enumerate() {
            if row.len() != cols {
                return Err(ShapeError::Ragged {
                    row: i,
                    got: row.len(),
                    expected: cols,
                });
            }
            values.extend(row);
        }
        Ok(Self { rows, cols, values })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// Min and max over all cells
    pub fn min_max(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.values {
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }
}

/// One sentence's worth of precomputed attribution output
#[derive(Debug, Clone)]
pub struct SentenceRecord {
    /// Subword-tokenized source sentence
    pub src: String,
    /// Subword-tokenized hypothesis
    pub dst: String,
    /// Relevance of each source token to each output token (`inp_lrp`)
    pub attribution: AttributionMatrix,
}

impl SentenceRecord {
    /// Source sentence with subword markers reversed, for display
    pub fn src_display(&self) -> String {
        text::desentencepiece(&self.src)
    }

    /// Hypothesis with subword markers reversed, for display and scoring
    pub fn dst_display(&self) -> String {
        text::desentencepiece(&self.dst)
    }

    /// Column labels: source subword tokens plus the EOS sentinel
    pub fn src_axis_labels(&self, eos: &str) -> Vec<String> {
        text::axis_labels(&self.src, eos)
    }

    /// Row labels: hypothesis subword tokens plus the EOS sentinel
    pub fn dst_axis_labels(&self, eos: &str) -> Vec<String> {
        text::axis_labels(&self.dst, eos)
    }

    /// Whether the matrix shape agrees with the token counts (+1 each way
    /// for the EOS row/column)
    pub fn shape_matches_tokens(&self) -> bool {
        self.attribution.rows() == text::subword_tokens(&self.dst).len() + 1
            && self.attribution.cols() == text::subword_tokens(&self.src).len() + 1
    }
}

/// Everything the UI shows for one selected sentence id
#[derive(Debug)]
pub struct SentencePair<'a> {
    pub id: usize,
    pub reference: &'a str,
    pub baseline: &'a SentenceRecord,
    pub augmented: &'a SentenceRecord,
    pub baseline_bleu: BleuScore,
    pub augmented_bleu: BleuScore,
}

/// Baseline records, augmented records, and references, loaded together.
///
/// All three inputs are indexed by the same sentence id. The usable length
/// is the common prefix of the three; ids past it are not selectable.
#[derive(Debug)]
pub struct ComparisonSet {
    baseline: Vec<SentenceRecord>,
    augmented: Vec<SentenceRecord>,
    references: Vec<String>,
    len: usize,
}

impl ComparisonSet {
    pub fn new(
        baseline: Vec<SentenceRecord>,
        augmented: Vec<SentenceRecord>,
        references: Vec<String>,
    ) -> Self {
        let len = baseline.len().min(augmented.len()).min(references.len());
        Self {
            baseline,
            augmented,
            references,
            len,
        }
    }

    /// Number of selectable sentence ids
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Both records, the reference, and both BLEU scores for one id
    pub fn pair(&self, id: usize) -> Option<SentencePair<'_>> {
        if id >= self.len {
            return None;
        }
        let baseline = &self.baseline[id];
        let augmented = &self.augmented[id];
        let reference = self.references[id].as_str();
        let baseline_bleu = bleu::sentence_bleu(&baseline.dst_display(), reference);
        let augmented_bleu = bleu::sentence_bleu(&augmented.dst_display(), reference);
        Some(SentencePair {
            id,
            reference,
            baseline,
            augmented,
            baseline_bleu,
            augmented_bleu,
        })
    }

    /// Table rows for the sentence picker, normalized for display
    pub fn source_sentences(&self) -> Vec<SentenceSummary> {
        (0..self.len)
            .map(|id| SentenceSummary {
                id,
                src: self.baseline[id].src_display(),
            })
            .collect()
    }
}

/// Table row for the sentence picker
#[derive(Debug, Clone, Serialize)]
pub struct SentenceSummary {
    pub id: usize,
    pub src: String,
}

/// One hypothesis' half of an exported comparison
#[derive(Debug, Serialize)]
pub struct HypothesisReport {
    pub hypothesis: String,
    pub bleu: f64,
    pub matrix_rows: usize,
    pub matrix_cols: usize,
}

/// Machine-readable comparison for one sentence
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub id: usize,
    pub source: String,
    pub reference: String,
    pub baseline: HypothesisReport,
    pub augmented: HypothesisReport,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl ComparisonReport {
    pub fn from_pair(pair: &SentencePair<'_>) -> Self {
        Self {
            id: pair.id,
            source: pair.baseline.src_display(),
            reference: pair.reference.to_string(),
            baseline: HypothesisReport {
                hypothesis: pair.baseline.dst_display(),
                bleu: pair.baseline_bleu.score,
                matrix_rows: pair.baseline.attribution.rows(),
                matrix_cols: pair.baseline.attribution.cols(),
            },
            augmented: HypothesisReport {
                hypothesis: pair.augmented.dst_display(),
                bleu: pair.augmented_bleu.score,
                matrix_rows: pair.augmented.attribution.rows(),
                matrix_cols: pair.augmented.attribution.cols(),
            },
            generated_at: chrono::Utc::now(),
        }
    }
}
