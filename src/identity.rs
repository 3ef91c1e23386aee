//! Identity of a frame export, decoded from its file name.
//!
//! The exporter names files
//! `ir_export_<date>_<folder>_<seq>_<time>.csv`, e.g.
//! `ir_export_20170815_P0000004_005_10-50-08.csv`.
use std::{fmt, path::Path};

use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::*;

use crate::error::{Error, Result};

pub const FILE_NAME_PREFIX: &str = "ir_export_";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIdentity {
    /// Measurement date, `YYYYMMDD`.
    pub date: String,
    /// Capture time, `HH-MM-SS`.
    pub time: String,
    /// Folder the capture was recorded in.
    pub folder: String,
    /// Sequence number within the folder.
    pub filenumber: String,
}

impl FrameIdentity {
    /// Decode a bare file name. Anything not matching the
    /// template exactly is a [`Error::MalformedFilename`].
    pub fn from_file_name(name: &str) -> Result<Self> {
        lazy_static! {
            static ref RE: Regex = Regex::new(
                r"^ir_export_(?P<date>\d{8})_(?P<folder>[[:alnum:]]{8})_(?P<seq>\d{3})_(?P<time>\d{2}-\d{2}-\d{2})\.csv$"
            )
            .unwrap();
        }

        let caps = RE
            .captures(name)
            .ok_or_else(|| Error::MalformedFilename(name.to_string()))?;
        Ok(FrameIdentity {
            date: caps["date"].to_string(),
            time: caps["time"].to_string(),
            folder: caps["folder"].to_string(),
            filenumber: caps["seq"].to_string(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::MalformedFilename(path.display().to_string()))?;
        Self::from_file_name(name)
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}{}_{}_{}_{}.csv",
            FILE_NAME_PREFIX, self.date, self.folder, self.filenumber, self.time
        )
    }
}

impl fmt::Display for FrameIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}/{})",
            self.date, self.time, self.folder, self.filenumber
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_example_name() {
        let id = FrameIdentity::from_file_name("ir_export_20170815_P0000004_005_10-50-08.csv")
            .unwrap();
        assert_eq!(id.date, "20170815");
        assert_eq!(id.folder, "P0000004");
        assert_eq!(id.filenumber, "005");
        assert_eq!(id.time, "10-50-08");
        assert_eq!(id.file_name(), "ir_export_20170815_P0000004_005_10-50-08.csv");
    }

    #[test]
    fn decodes_from_path() {
        let path = Path::new("/data/IRExport/ir_export_20200101_P0000005_017_08-00-00.csv");
        let id = FrameIdentity::from_path(path).unwrap();
        assert_eq!(id.date, "20200101");
        assert_eq!(id.filenumber, "017");
    }

    #[test]
    fn rejects_short_and_misshapen_names() {
        for name in &[
            "ir_export_2017081_P0000004_005_10-50-08.csv",
            "ir_export_20170815_P000004_005_10-50-08.csv",
            "ir_export_20170815_P0000004_05_10-50-08.csv",
            "ir_export_20170815_P0000004_005_10-50-0.csv",
            "ir_export_20170815_P0000004_005_0001.csv",
            "ir_export_20170815_P0000004_005_10-50-08.txt",
            "ir_export_.csv",
            "",
        ] {
            match FrameIdentity::from_file_name(name) {
                Err(Error::MalformedFilename(n)) => assert_eq!(&n, name),
                other => panic!("{}: unexpected {:?}", name, other),
            }
        }
    }
}
