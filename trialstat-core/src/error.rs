//! Data-loading error taxonomy
//!
//! Every variant here is fatal to the run: a table that cannot be read or
//! violates its schema aborts the analysis with a clear message. Per-variable
//! data-quality conditions are not errors at this layer; they surface as skip
//! reasons in the analysis stage.

use std::path::PathBuf;

/// Errors raised while loading an observation table
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// File could not be read at all
    #[error("failed to read {}", path.display())]
    Io {
        /// Input file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No candidate encoding (nor detection) produced a clean decode
    #[error("could not decode {} with any candidate encoding", path.display())]
    Decode {
        /// Input file path
        path: PathBuf,
    },

    /// The CSV structure itself is malformed
    #[error("malformed CSV in {}", path.display())]
    Csv {
        /// Input file path
        path: PathBuf,
        /// Underlying CSV parse error
        #[source]
        source: csv::Error,
    },

    /// A required schema column is absent or misplaced
    #[error("{}: expected column '{column}' at position {position}", path.display())]
    MissingColumn {
        /// Input file path
        path: PathBuf,
        /// The required column name
        column: String,
        /// Zero-based position the column must occupy
        position: usize,
    },

    /// The same (patient, round) pair appeared twice
    #[error("{}: duplicate observation for patient '{patient}' at round '{round}'", path.display())]
    DuplicateObservation {
        /// Input file path
        path: PathBuf,
        /// Offending patient id
        patient: String,
        /// Offending evaluation round
        round: String,
    },

    /// The file decoded and parsed but holds no data rows
    #[error("{}: no data rows", path.display())]
    Empty {
        /// Input file path
        path: PathBuf,
    },

    /// A requested column index range does not fit the file
    #[error("column range {start}..={end} out of bounds (file has {columns} columns, variables start at 2)")]
    InvalidColumnRange {
        /// Requested inclusive start index
        start: usize,
        /// Requested inclusive end index
        end: usize,
        /// Number of columns actually present
        columns: usize,
    },

    /// A variable named on the command line does not exist in the table
    #[error("unknown variable '{variable}'")]
    UnknownVariable {
        /// The name that failed to resolve
        variable: String,
    },
}
