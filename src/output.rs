//! The aggregate table: one row per frame, written as a
//! `;`-delimited file.
//!
//! Columns, in order: the row index (blank header), the
//! four identity fields, then `<zone>_med`, `<zone>_mean`
//! and `<zone>_std` for every zone in calibration order.
//! All names except the index carry the column prefix.
use std::{fs::File, io::Write, path::Path};

use csv::WriterBuilder;
use log::info;
use serde_derive::*;

use crate::{
    error::{Error, Result},
    identity::FrameIdentity,
    stats::ZoneStatistics,
};

pub const OUTPUT_DELIMITER: u8 = b';';

const IDENTITY_COLUMNS: [&str; 4] = ["date", "time", "folder", "filenumber"];
const STAT_SUFFIXES: [&str; 3] = ["med", "mean", "std"];

/// Statistics of every zone of one frame.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    /// Position of the file in the input enumeration.
    pub index: usize,
    pub identity: FrameIdentity,
    /// One entry per zone, in calibration order.
    pub zones: Vec<ZoneStatistics>,
}

/// Accumulates records and writes them out at the end of a
/// batch.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    zones: Vec<String>,
    prefix: String,
    records: Vec<AggregateRecord>,
}

impl ZoneTable {
    pub fn new(zones: Vec<String>, prefix: &str) -> Self {
        ZoneTable {
            zones,
            prefix: prefix.to_string(),
            records: vec![],
        }
    }

    pub fn push(&mut self, record: AggregateRecord) {
        debug_assert_eq!(record.zones.len(), self.zones.len());
        self.records.push(record);
    }

    pub fn extend<I: IntoIterator<Item = AggregateRecord>>(&mut self, records: I) {
        for record in records {
            self.push(record);
        }
    }

    pub fn records(&self) -> &[AggregateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Restore input order after out-of-order accumulation.
    pub fn sort_by_index(&mut self) {
        self.records.sort_by_key(|r| r.index);
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![String::new()];
        headers.extend(
            IDENTITY_COLUMNS
                .iter()
                .map(|c| format!("{}{}", self.prefix, c)),
        );
        for zone in &self.zones {
            headers.extend(
                STAT_SUFFIXES
                    .iter()
                    .map(|s| format!("{}{}_{}", self.prefix, zone, s)),
            );
        }
        headers
    }

    pub fn write<W: Write>(&self, wtr: W, name: &Path) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(OUTPUT_DELIMITER)
            .from_writer(wtr);
        writer
            .write_record(self.headers())
            .map_err(Error::csv(name))?;

        for (row, record) in self.records.iter().enumerate() {
            let id = &record.identity;
            let mut fields = vec![
                row.to_string(),
                id.date.clone(),
                id.time.clone(),
                id.folder.clone(),
                id.filenumber.clone(),
            ];
            for stats in &record.zones {
                fields.push(stats.median.to_string());
                fields.push(stats.mean.to_string());
                fields.push(stats.std.to_string());
            }
            writer.write_record(&fields).map_err(Error::csv(name))?;
        }
        writer.flush().map_err(Error::io(name))
    }

    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(Error::io(path))?;
        self.write(file, path)?;
        info!("wrote {} records to {}", self.len(), path.display());
        Ok(())
    }
}
