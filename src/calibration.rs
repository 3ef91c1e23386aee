//! Zone definitions per measurement date.
//!
//! The calibration source is a whitespace-delimited table
//! with a header row:
//!
//! ```text
//! measurement zone1_row_start zone1_row_end zone1_col_start zone1_col_end ...
//! 20170815    10              20            30              40            ...
//! ```
//!
//! Every zone contributes four columns, so the number of
//! zones is `(columns - 1) / 4`. Bounds are pixel indices
//! with a top-left origin; the end bounds are exclusive.
use std::{
    collections::{hash_map::Entry, HashMap},
    fs::File,
    io::{BufRead, BufReader},
    ops::Range,
    path::{Path, PathBuf},
};

use log::debug;
use serde_derive::*;

use crate::error::{Error, Result};

pub const MEASUREMENT_COLUMN: &str = "measurement";

const BOUND_SUFFIXES: [&str; 4] = ["_row_start", "_row_end", "_col_start", "_col_end"];

/// Rectangle covered by one zone: `[row_start..row_end,
/// col_start..col_end]`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneBounds {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl ZoneBounds {
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        ZoneBounds {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    pub fn rows(&self) -> Range<usize> {
        self.row_start..self.row_end
    }

    pub fn cols(&self) -> Range<usize> {
        self.col_start..self.col_end
    }

    pub fn is_empty(&self) -> bool {
        self.row_start >= self.row_end || self.col_start >= self.col_end
    }

    pub fn fits(&self, rows: usize, cols: usize) -> bool {
        self.row_end <= rows && self.col_end <= cols
    }

    fn set(&mut self, bound: usize, value: usize) {
        match bound {
            0 => self.row_start = value,
            1 => self.row_end = value,
            2 => self.col_start = value,
            _ => self.col_end = value,
        }
    }
}

/// Immutable lookup from measurement date to the bounds of
/// every zone.
///
/// Dates are stored in file order and may repeat. The
/// index built at load time points at the first row for
/// each date, so a duplicated date always resolves to its
/// first occurrence.
#[derive(Debug, Clone)]
pub struct CalibrationTable {
    zones: Vec<String>,
    measurements: Vec<String>,
    bounds: Vec<Vec<ZoneBounds>>,
    index: HashMap<String, usize>,
}

impl CalibrationTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Configuration(format!(
                "calibration file {} is not available",
                path.display()
            )));
        }
        let file = File::open(path).map_err(Error::io(path))?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Parse a calibration table. `source` only names the
    /// input in error messages.
    pub fn from_reader<R: BufRead, P: Into<PathBuf>>(rdr: R, source: P) -> Result<Self> {
        let source = source.into();
        let mut lines = rdr
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()));

        let header: Vec<String> = match lines.next() {
            Some((_, line)) => line
                .map_err(Error::io(&source))?
                .split_whitespace()
                .map(String::from)
                .collect(),
            None => {
                return Err(Error::Configuration(format!(
                    "calibration file {} is empty",
                    source.display()
                )))
            }
        };
        let layout = HeaderLayout::parse(&header)?;

        let mut table = CalibrationTable {
            zones: layout.zones.clone(),
            measurements: vec![],
            bounds: vec![],
            index: HashMap::new(),
        };

        for (line_no, line) in lines {
            let line = line.map_err(Error::io(&source))?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != header.len() {
                return Err(Error::Configuration(format!(
                    "{}:{}: expected {} fields, found {}",
                    source.display(),
                    line_no,
                    header.len(),
                    fields.len()
                )));
            }

            let mut row = vec![ZoneBounds::default(); layout.zones.len()];
            let mut measurement = String::new();
            for (col, field) in fields.into_iter().enumerate() {
                match layout.columns[col] {
                    Column::Measurement => measurement = field.to_string(),
                    Column::Bound { zone, bound } => {
                        let value = field.parse::<usize>().map_err(|_| Error::Parse {
                            path: source.clone(),
                            line: line_no,
                            column: header[col].clone(),
                            value: field.to_string(),
                        })?;
                        row[zone].set(bound, value);
                    }
                }
            }

            for (zone, bounds) in layout.zones.iter().zip(&row) {
                if bounds.row_start > bounds.row_end || bounds.col_start > bounds.col_end {
                    return Err(Error::Configuration(format!(
                        "{}:{}: zone `{}` has start bounds beyond end bounds",
                        source.display(),
                        line_no,
                        zone
                    )));
                }
            }
            table.push(measurement, row);
        }

        debug!(
            "loaded {} calibration rows with {} zones from {}",
            table.len(),
            table.zone_count(),
            source.display()
        );
        Ok(table)
    }

    fn push(&mut self, measurement: String, row: Vec<ZoneBounds>) {
        let idx = self.measurements.len();
        if let Entry::Vacant(e) = self.index.entry(measurement.clone()) {
            e.insert(idx);
        }
        self.measurements.push(measurement);
        self.bounds.push(row);
    }

    /// Zone names in header order.
    pub fn zone_names(&self) -> &[String] {
        &self.zones
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Measurement keys in file order, duplicates included.
    pub fn measurements(&self) -> &[String] {
        &self.measurements
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Index of the first row whose measurement equals
    /// `measurement`.
    pub fn row_index(&self, measurement: &str) -> Result<usize> {
        self.index
            .get(measurement)
            .copied()
            .ok_or_else(|| Error::Lookup(measurement.to_string()))
    }

    pub fn zone_index(&self, zone: &str) -> Option<usize> {
        self.zones.iter().position(|z| z == zone)
    }

    pub fn bounds(&self, row: usize, zone: &str) -> Option<ZoneBounds> {
        let zone = self.zone_index(zone)?;
        self.bounds.get(row).map(|r| r[zone])
    }

    /// All zone bounds of one row, in [`zone_names`] order.
    ///
    /// [`zone_names`]: Self::zone_names
    pub fn row(&self, row: usize) -> Option<&[ZoneBounds]> {
        self.bounds.get(row).map(|r| r.as_slice())
    }
}

#[derive(Debug, Clone, Copy)]
enum Column {
    Measurement,
    Bound { zone: usize, bound: usize },
}

struct HeaderLayout {
    zones: Vec<String>,
    columns: Vec<Column>,
}

impl HeaderLayout {
    fn parse(header: &[String]) -> Result<Self> {
        let mut zones: Vec<String> = vec![];
        let mut seen: Vec<[bool; 4]> = vec![];
        let mut columns = Vec::with_capacity(header.len());
        let mut has_measurement = false;

        for name in header {
            if name == MEASUREMENT_COLUMN {
                if has_measurement {
                    return Err(Error::Configuration(format!(
                        "duplicate `{}` column",
                        MEASUREMENT_COLUMN
                    )));
                }
                has_measurement = true;
                columns.push(Column::Measurement);
                continue;
            }

            let (zone_name, bound) = BOUND_SUFFIXES
                .iter()
                .enumerate()
                .find_map(|(idx, suffix)| {
                    name.strip_suffix(suffix)
                        .filter(|z| !z.is_empty())
                        .map(|z| (z, idx))
                })
                .ok_or_else(|| {
                    Error::Configuration(format!(
                        "unexpected calibration column `{}`: expected `<zone>_row_start`, \
                         `<zone>_row_end`, `<zone>_col_start` or `<zone>_col_end`",
                        name
                    ))
                })?;

            let zone = match zones.iter().position(|z| z == zone_name) {
                Some(zone) => zone,
                None => {
                    zones.push(zone_name.to_string());
                    seen.push([false; 4]);
                    zones.len() - 1
                }
            };
            if seen[zone][bound] {
                return Err(Error::Configuration(format!(
                    "duplicate calibration column `{}`",
                    name
                )));
            }
            seen[zone][bound] = true;
            columns.push(Column::Bound { zone, bound });
        }

        if !has_measurement {
            return Err(Error::Configuration(format!(
                "calibration header has no `{}` column",
                MEASUREMENT_COLUMN
            )));
        }
        for (zone, seen) in zones.iter().zip(&seen) {
            if let Some(missing) = seen.iter().position(|s| !s) {
                return Err(Error::Configuration(format!(
                    "zone `{}` lacks column `{}{}`",
                    zone, zone, BOUND_SUFFIXES[missing]
                )));
            }
        }
        debug_assert_eq!(zones.len(), (header.len() - 1) / 4);

        Ok(HeaderLayout { zones, columns })
    }
}
