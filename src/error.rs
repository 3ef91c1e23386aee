//! Error type shared by every stage of the pipeline.
//!
//! None of the stages recover locally: an error in any
//! file is returned to the batch driver, which aborts the
//! whole run.
use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Calibration source missing or structurally invalid,
    /// or an option value outside its allowed set.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A value that should be numeric is not.
    #[error("{}:{}: cannot parse `{}` in column `{}`", .path.display(), .line, .value, .column)]
    Parse {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },

    /// No calibration row for the measurement date.
    #[error("no calibration row for measurement `{0}`")]
    Lookup(String),

    #[error("file name `{0}` does not match `ir_export_<date>_<folder>_<seq>_<time>.csv`")]
    MalformedFilename(String),

    #[error("{}: row {} has {} cells, expected {}", .path.display(), .row, .found, .expected)]
    RaggedGrid {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("zone `{0}` selects no pixels")]
    EmptyZone(String),

    #[error("zone `{zone}` [{row_end} x {col_end}] exceeds {rows} x {cols} grid")]
    ZoneOutOfBounds {
        zone: String,
        row_end: usize,
        col_end: usize,
        rows: usize,
        cols: usize,
    },

    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {}", .path.display(), .source)]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl Error {
    pub(crate) fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }

    pub(crate) fn csv<P: Into<PathBuf>>(path: P) -> impl FnOnce(csv::Error) -> Self {
        let path = path.into();
        move |source| Error::Csv { path, source }
    }
}
