#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loaders for the report's static input files.
//!
//! Three kinds of files are read, each fully into memory:
//!
//! * pipeline geometry tables ([`geometry`]), already converted offline from
//!   shapefile multi-lines into one row per segment,
//! * column lists ([`columns`]) naming the incident columns to keep,
//! * PHMSA incident tables ([`incidents`]), restricted to the listed columns
//!   and to the continental United States.
//!
//! Every failure maps to a distinct [`SourceError`] variant so callers can
//! tell a missing file from a malformed one or from a schema mismatch.

pub mod columns;
pub mod geometry;
pub mod incidents;
pub mod parsing;
pub mod progress;

use std::fs::File;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading input files.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The input file does not exist.
    #[error("File not found: {}", .path.display())]
    NotFound {
        /// Path that was opened.
        path: PathBuf,
    },

    /// Any other I/O failure while reading an input file.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file was readable but its content could not be parsed.
    #[error("Malformed file {}{}: {message}", .path.display(), .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Malformed {
        /// Path of the offending file.
        path: PathBuf,
        /// 1-based line of the offending record, when known.
        line: Option<u64>,
        /// Description of what went wrong.
        message: String,
    },

    /// The column list names a column the incident table does not have.
    #[error("Column '{column}' is not present in {}", .path.display())]
    MissingColumn {
        /// Column named by the column list.
        column: String,
        /// Incident table that lacks it.
        path: PathBuf,
    },

    /// A column the report depends on was left out of the column list.
    #[error("Column '{column}' is required but not selected for {}", .path.display())]
    ColumnNotSelected {
        /// Required source column.
        column: String,
        /// Incident table being loaded.
        path: PathBuf,
    },
}

impl SourceError {
    /// Builds a [`SourceError::Malformed`] from a CSV error, keeping the
    /// record position when the CSV reader reports one.
    pub(crate) fn from_csv(path: &Path, err: &csv::Error) -> Self {
        if let csv::ErrorKind::Io(io) = err.kind() {
            return Self::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(io.kind(), io.to_string()),
            };
        }

        Self::Malformed {
            path: path.to_path_buf(),
            line: err.position().map(csv::Position::line),
            message: err.to_string(),
        }
    }
}

/// Opens an input file, distinguishing a missing file from other failures.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] if the file does not exist and
/// [`SourceError::Io`] for any other open failure.
pub fn open(path: &Path) -> Result<File, SourceError> {
    File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
