//! Library to extract per-zone statistics from infrared
//! camera frames exported as delimited text grids.
//!
//! A batch starts from a [calibration
//! table](calibration::CalibrationTable) that defines, for
//! every measurement date, a set of named rectangular
//! zones. Each frame export is then:
//!
//! 1. identified from its file name
//!    (`ir_export_<date>_<folder>_<seq>_<time>.csv`, see
//!    [`FrameIdentity`]);
//! 2. matched to the first calibration row with the same
//!    date;
//! 3. loaded as a [`Frame`], dropping columns that are
//!    empty in every row;
//! 4. summarised per zone as [median, mean and population
//!    standard deviation](stats::ZoneStatistics).
//!
//! The resulting [records](output::AggregateRecord) are
//! collected into a [`ZoneTable`] and written as one
//! `;`-delimited file.
//!
//! # Usage
//!
//! ```rust
//! # fn test_compile() -> irzones::Result<()> {
//! use std::path::PathBuf;
//! use irzones::{aggregate::LogProgress, Aggregator, CalibrationTable, GridFormat};
//!
//! let calibration = CalibrationTable::from_path("positions.csv")?;
//! let paths = irzones::aggregate::enumerate_inputs(
//!     &[PathBuf::from("IRExport")],
//!     "ir_export_*.csv",
//! )?;
//! let aggregator = Aggregator::new(&calibration, GridFormat::default(), "ir_");
//! aggregator
//!     .run(&paths, &LogProgress { every: 100 })?
//!     .write_path("IRExport/IR_zones.csv")?;
//! # Ok(())
//! # }
//! ```
//!
//! Exports taken with an inverted sensor mount can be
//! turned around first with [`rotate::rotate_file_180`].

pub mod error;

pub mod calibration;
pub mod grid;
pub mod identity;
pub mod rotate;
pub mod stats;

pub mod aggregate;
pub mod config;
pub mod output;
pub mod viewer;

pub mod cli;

pub use crate::aggregate::Aggregator;
pub use crate::calibration::CalibrationTable;
pub use crate::error::{Error, Result};
pub use crate::grid::{Frame, GridFormat};
pub use crate::identity::FrameIdentity;
pub use crate::output::ZoneTable;
