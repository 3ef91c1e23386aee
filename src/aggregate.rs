//! Per-file zone records and the batch driver.
//!
//! For every frame export the aggregator decodes the
//! [`FrameIdentity`] from the file name, picks the first
//! calibration row whose measurement equals the frame's
//! date, loads the grid and computes [`ZoneStatistics`] for
//! every calibrated zone. Any error aborts the batch.
use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use glob::glob;
use log::{debug, info};
use rayon::prelude::*;

use crate::{
    calibration::CalibrationTable,
    error::{Error, Result},
    grid::{Frame, GridFormat},
    identity::FrameIdentity,
    output::{AggregateRecord, ZoneTable},
    stats::ZoneStatistics,
};

/// Receives batch progress. Implementations must be
/// shareable across worker threads.
pub trait Progress: Sync {
    fn start(&self, _total: usize) {}
    /// Called after each finished file; `done` counts from 1.
    fn advance(&self, done: usize, total: usize);
    fn finish(&self, _total: usize) {}
}

/// Discards all progress.
pub struct NoProgress;

impl Progress for NoProgress {
    fn advance(&self, _done: usize, _total: usize) {}
}

/// Logs `File i of n analyzed.` every `every` files.
pub struct LogProgress {
    pub every: usize,
}

impl LogProgress {
    /// True for multiples of `every` and for the last file.
    pub fn is_due(&self, done: usize, total: usize) -> bool {
        done % self.every.max(1) == 0 || done == total
    }

    pub fn message(done: usize, total: usize) -> String {
        format!("File {} of {} analyzed.", done, total)
    }
}

impl Progress for LogProgress {
    fn advance(&self, done: usize, total: usize) {
        if self.is_due(done, total) {
            info!("{}", Self::message(done, total));
        }
    }
}

pub struct Aggregator<'a> {
    calibration: &'a CalibrationTable,
    format: GridFormat,
    prefix: String,
}

impl<'a> Aggregator<'a> {
    pub fn new(calibration: &'a CalibrationTable, format: GridFormat, prefix: &str) -> Self {
        Aggregator {
            calibration,
            format,
            prefix: prefix.to_string(),
        }
    }

    pub fn calibration(&self) -> &CalibrationTable {
        self.calibration
    }

    /// An empty table with this aggregator's columns.
    pub fn table(&self) -> ZoneTable {
        ZoneTable::new(self.calibration.zone_names().to_vec(), &self.prefix)
    }

    pub fn record_for_path(&self, index: usize, path: &Path) -> Result<AggregateRecord> {
        let identity = FrameIdentity::from_path(path)?;
        let frame = Frame::from_path(path, &self.format)?;
        debug!("{}: {} x {} frame", path.display(), frame.dim().0, frame.dim().1);
        self.record_for_frame(index, identity, &frame)
    }

    pub fn record_for_frame(
        &self,
        index: usize,
        identity: FrameIdentity,
        frame: &Frame,
    ) -> Result<AggregateRecord> {
        let row = self.calibration.row_index(&identity.date)?;
        let zones = self
            .calibration
            .zone_names()
            .iter()
            .map(|zone| ZoneStatistics::compute(frame.values(), self.calibration, zone, row))
            .collect::<Result<Vec<_>>>()?;
        Ok(AggregateRecord {
            index,
            identity,
            zones,
        })
    }

    /// Process `paths` one after another, in the given order.
    pub fn run<P: Progress>(&self, paths: &[PathBuf], progress: &P) -> Result<ZoneTable> {
        let total = paths.len();
        progress.start(total);

        let mut table = self.table();
        for (idx, path) in paths.iter().enumerate() {
            table.push(self.record_for_path(idx, path)?);
            progress.advance(idx + 1, total);
        }

        progress.finish(total);
        info!("analyzed {} files", total);
        Ok(table)
    }

    /// Process `paths` on `jobs` worker threads. Records
    /// are put back into input order before returning, so
    /// the table equals the one [`run`](Self::run) builds.
    pub fn run_parallel<P: Progress>(
        &self,
        paths: &[PathBuf],
        jobs: usize,
        progress: &P,
    ) -> Result<ZoneTable> {
        if jobs <= 1 {
            return self.run(paths, progress);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| Error::Configuration(format!("cannot start {} workers: {}", jobs, e)))?;

        let total = paths.len();
        let done = AtomicUsize::new(0);
        progress.start(total);

        let records = pool.install(|| {
            paths
                .par_iter()
                .enumerate()
                .map(|(idx, path)| -> Result<AggregateRecord> {
                    let record = self.record_for_path(idx, path)?;
                    progress.advance(done.fetch_add(1, Ordering::Relaxed) + 1, total);
                    Ok(record)
                })
                .try_fold(
                    Vec::new,
                    |mut acc: Vec<AggregateRecord>, record| -> Result<_> {
                        acc.push(record?);
                        Ok(acc)
                    },
                )
                .try_reduce(Vec::new, |mut acc1, acc2| {
                    acc1.extend(acc2);
                    Ok(acc1)
                })
        })?;

        let mut table = self.table();
        table.extend(records);
        table.sort_by_index();

        progress.finish(total);
        info!("analyzed {} files on {} workers", total, jobs);
        Ok(table)
    }
}

/// Expand inputs into the list of frame exports: files are
/// taken as given, directories contribute their entries
/// matching `pattern` in glob order.
pub fn enumerate_inputs(inputs: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = vec![];
    for input in inputs {
        if !input.is_dir() {
            paths.push(input.clone());
            continue;
        }

        let full = input.join(pattern);
        let full = full
            .to_str()
            .ok_or_else(|| Error::Configuration(format!("non-UTF-8 path {}", input.display())))?;
        let matches = glob(full)
            .map_err(|e| Error::Configuration(format!("bad pattern `{}`: {}", pattern, e)))?;
        for entry in matches {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                Error::Io {
                    path,
                    source: e.into(),
                }
            })?;
            paths.push(path);
        }
    }
    Ok(paths)
}
