use std::path::PathBuf;

use thiserror::Error;

use super::model::{Axis, Quantity};

// ---------------------------------------------------------------------------
// DataError – everything the parsing pipeline can reject
// ---------------------------------------------------------------------------

/// Failures raised while reading simulation output.
///
/// Every variant carries the offending path so the viewer can tell the user
/// which file broke and what shape was expected.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("{}: line {line}: {reason}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{}: no data rows after the header", .path.display())]
    EmptyData { path: PathBuf },

    #[error("directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error(
        "{}: expected {expected} {quantity} files for axis {axis}, found {found}",
        .dir.display()
    )]
    SensorCountMismatch {
        dir: PathBuf,
        quantity: Quantity,
        axis: Axis,
        expected: usize,
        found: usize,
    },

    #[error(
        "{}: axis {axis} files must be numbered 1..=8, found {numbers:?}",
        .dir.display()
    )]
    SensorNumbering {
        dir: PathBuf,
        axis: Axis,
        numbers: Vec<u32>,
    },

    #[error("{}: malformed report ({}): {reason}", .path.display(), block_label(.block))]
    MalformedReport {
        path: PathBuf,
        /// Zero-based block index, `None` for whole-file problems.
        block: Option<usize>,
        reason: String,
    },

    #[error("{}: missing column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn block_label(block: &Option<usize>) -> String {
    match block {
        Some(index) => format!("DIMM{} block", index + 1),
        None => "file layout".to_string(),
    }
}

impl DataError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, block: Option<usize>, reason: impl Into<String>) -> Self {
        DataError::MalformedReport {
            path: path.into(),
            block,
            reason: reason.into(),
        }
    }
}

pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_file() {
        let err = DataError::Format {
            path: PathBuf::from("sim1/data/velocity/DIMM1x.txt"),
            line: 4,
            reason: "expected 3 numeric fields, found 2".into(),
        };
        assert_eq!(
            err.to_string(),
            "sim1/data/velocity/DIMM1x.txt: line 4: expected 3 numeric fields, found 2"
        );
    }

    #[test]
    fn count_mismatch_reports_expected_and_found() {
        let err = DataError::SensorCountMismatch {
            dir: PathBuf::from("sim1/data/acceleration"),
            quantity: Quantity::Acceleration,
            axis: Axis::Z,
            expected: 8,
            found: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 8 acceleration files for axis z, found 7"), "{msg}");
    }

    #[test]
    fn malformed_report_labels_block() {
        let err = DataError::malformed("r.txt", Some(2), "bad header");
        assert_eq!(err.to_string(), "r.txt: malformed report (DIMM3 block): bad header");
        let err = DataError::malformed("r.txt", None, "too short");
        assert_eq!(err.to_string(), "r.txt: malformed report (file layout): too short");
    }
}
