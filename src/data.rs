//! Data loading
//!
//! Attribution records arrive as a pickled list of dictionaries with keys
//! `src`, `dst`, and `inp_lrp` (a 2-D matrix as nested lists of numbers).
//! References arrive as a plain-text file, one subword-tokenized sentence
//! per line. Load failures are fatal; there is nothing to recover to.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_pickle::{DeOptions, HashableValue, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{AttributionMatrix, ComparisonSet, SentenceRecord};
use crate::text;

/// Typed causes for a failed data load
#[derive(Debug, Error)]
pub enum DataError {
    #[error("file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed pickle in {}: {message}", .path.display())]
    Pickle { path: PathBuf, message: String },
    #[error("record {index} in {}: {message}", .path.display())]
    Record {
        path: PathBuf,
        index: usize,
        message: String,
    },
}

/// Load a pickled list of attribution dictionaries
pub fn load_records(path: &Path) -> Result<Vec<SentenceRecord>, DataError> {
    if !path.exists() {
        return Err(DataError::Missing(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_pickle::value_from_reader(BufReader::new(file), DeOptions::new()).map_err(
        |e| DataError::Pickle {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    )?;

    let items = match value {
        Value::List(items) => items,
        other => {
            return Err(DataError::Pickle {
                path: path.to_path_buf(),
                message: format!("expected a list of records, got {}", kind(&other)),
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let record = parse_record(item).map_err(|message| DataError::Record {
            path: path.to_path_buf(),
            index,
            message,
        })?;
        records.push(record);
    }
    debug!(
        path = %path.display(),
        records = records.len(),
        "loaded attribution records"
    );
    Ok(records)
}

/// Load reference translations, one subword-tokenized sentence per line,
/// markers stripped
pub fn load_references(path: &Path) -> Result<Vec<String>, DataError> {
    if !path.exists() {
        return Err(DataError::Missing(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let refs: Vec<String> = content.lines().map(text::desentencepiece).collect();
    debug!(path = %path.display(), references = refs.len(), "loaded references");
    Ok(refs)
}

/// Load the three inputs and clamp to their common prefix
pub fn load_comparison_set(
    baseline: &Path,
    augmented: &Path,
    references: &Path,
) -> Result<ComparisonSet> {
    let base = load_records(baseline).context("loading baseline attribution records")?;
    let aug = load_records(augmented).context("loading augmented attribution records")?;
    let refs = load_references(references).context("loading reference translations")?;

    let len = base.len().min(aug.len()).min(refs.len());
    if base.len() != aug.len() || base.len() != refs.len() {
        warn!(
            baseline = base.len(),
            augmented = aug.len(),
            references = refs.len(),
            usable = len,
            "input lengths differ; clamping to common prefix"
        );
    }

    let set = ComparisonSet::new(base, aug, refs);
    if set.is_empty() {
        anyhow::bail!(
            "no usable sentences: baseline ({}), augmented ({}), and references ({}) share no common prefix",
            baseline.display(),
            augmented.display(),
            references.display()
        );
    }
    Ok(set)
}

fn parse_record(value: Value) -> Result<SentenceRecord, String> {
    let mut dict = match value {
        Value::Dict(d) => d,
        other => return Err(format!("expected a dict, got {}", kind(&other))),
    };
    let src = take_string(&mut dict, "src")?;
    let dst = take_string(&mut dict, "dst")?;
    let matrix = dict
        .remove(&HashableValue::String("inp_lrp".to_string()))
        .ok_or_else(|| "missing key 'inp_lrp'".to_string())?;
    let attribution = AttributionMatrix::from_rows(matrix_rows(matrix)?).map_err(|e| e.to_string())?;
    Ok(SentenceRecord {
        src,
        dst,
        attribution,
    })
}

fn take_string(dict: &mut BTreeMap<HashableValue, Value>, key: &str) -> Result<String, String> {
    match dict.remove(&HashableValue::String(key.to_string())) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(format!(
            "key '{key}' should be a string, got {}",
            kind(&other)
        )),
        None => Err(format!("missing key '{key}'")),
    }
}

fn matrix_rows(value: Value) -> Result<Vec<Vec<f64>>, String> {
    let rows = match value {
        Value::List(rows) => rows,
        other => {
            return Err(format!(
                "key 'inp_lrp' should be a nested list, got {}; \
                 tensors must be converted to plain lists before pickling",
                kind(&other)
            ))
        }
    };
    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let cells = match row {
            Value::List(cells) => cells,
            other => return Err(format!("matrix row {i} should be a list, got {}", kind(&other))),
        };
        let mut parsed = Vec::with_capacity(cells.len());
        for (j, cell) in cells.into_iter().enumerate() {
            let n = number(&cell)
                .ok_or_else(|| format!("matrix cell ({i}, {j}) is {}, not a number", kind(&cell)))?;
            parsed.push(n);
        }
        out.push(parsed);
    }
    Ok(out)
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::F64(f) => Some(*f),
        Value::I64(i) => Some(*i as f64),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::None => "None",
        Value::Bool(_) => "a bool",
        Value::I64(_) | Value::Int(_) => "an int",
        Value::F64(_) => "a float",
        Value::Bytes(_) => "bytes",
        Value::String(_) => "a string",
        Value::List(_) => "a list",
        Value::Tuple(_) => "a tuple",
        Value::Dict(_) => "a dict",
        _ => "an unsupported value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct RawRecord {
        src: String,
        dst: String,
        inp_lrp: Vec<Vec<f64>>,
    }

    fn raw(src: &str, dst: &str, inp_lrp: Vec<Vec<f64>>) -> RawRecord {
        RawRecord {
            src: src.to_string(),
            dst: dst.to_string(),
            inp_lrp,
        }
    }

    fn write_pickle(dir: &tempfile::TempDir, name: &str, records: &[RawRecord]) -> PathBuf {
        let path = dir.path().join(name);
        let bytes =
            serde_pickle::to_vec(&records, serde_pickle::SerOptions::new()).expect("pickle");
        std::fs::write(&path, bytes).expect("write fixture");
        path
    }

    #[test]
    fn test_load_records_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_pickle(
            &dir,
            "baseline",
            &[raw(
                "▁the ▁cat",
                "▁le ▁chat",
                vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6], vec![0.7, 0.8, 0.9]],
            )],
        );
        let records = load_records(&path).expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].src, "▁the ▁cat");
        assert_eq!(records[0].attribution.rows(), 3);
        assert_eq!(records[0].attribution.cols(), 3);
        assert_eq!(records[0].attribution.get(1, 2), 0.6);
        assert!(records[0].shape_matches_tokens());
    }

    #[test]
    fn test_load_records_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_records(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, DataError::Missing(_)));
    }

    #[test]
    fn test_load_records_garbage_is_malformed_pickle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("garbage");
        std::fs::write(&path, b"not a pickle at all").expect("write");
        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, DataError::Pickle { .. }), "got {err:?}");
    }

    #[test]
    fn test_load_records_non_list_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scalar");
        let bytes = serde_pickle::to_vec(&42i64, serde_pickle::SerOptions::new()).expect("pickle");
        std::fs::write(&path, bytes).expect("write");
        let err = load_records(&path).unwrap_err();
        assert!(err.to_string().contains("expected a list"), "got {err}");
    }

    #[test]
    fn test_load_records_reports_ragged_record_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_pickle(
            &dir,
            "ragged",
            &[
                raw("▁a", "▁x", vec![vec![0.1, 0.2], vec![0.3, 0.4]]),
                raw("▁b", "▁y", vec![vec![0.1, 0.2], vec![0.3]]),
            ],
        );
        let err = load_records(&path).unwrap_err();
        match err {
            DataError::Record { index, message, .. } => {
                assert_eq!(index, 1);
                assert!(message.contains("ragged"), "got {message}");
            }
            other => panic!("expected Record error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_references_strips_markers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("refs.txt");
        std::fs::write(&path, "▁the ▁cat\n▁a ▁dog\n").expect("write");
        let refs = load_references(&path).expect("load");
        assert_eq!(refs, vec!["the cat", "a dog"]);
    }

    #[test]
    fn test_load_comparison_set_clamps_and_errors_when_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = write_pickle(
            &dir,
            "base",
            &[
                raw("▁a", "▁x", vec![vec![0.1, 0.2], vec![0.3, 0.4]]),
                raw("▁b", "▁y", vec![vec![0.1, 0.2], vec![0.3, 0.4]]),
            ],
        );
        let aug = write_pickle(
            &dir,
            "aug",
            &[raw("▁a", "▁z", vec![vec![0.5, 0.6], vec![0.7, 0.8]])],
        );
        let refs = dir.path().join("refs.txt");
        std::fs::write(&refs, "▁x\n▁y\n").expect("write");

        let set = load_comparison_set(&base, &aug, &refs).expect("load set");
        assert_eq!(set.len(), 1);

        let empty_refs = dir.path().join("empty.txt");
        std::fs::write(&empty_refs, "").expect("write");
        assert!(load_comparison_set(&base, &aug, &empty_refs).is_err());
    }
}
