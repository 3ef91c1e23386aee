//! Batch settings, optionally read from a JSON file.
//!
//! Every field has a default, so a config file only needs
//! the values it changes:
//!
//! ```json
//! { "header_lines": 0, "jobs": 4, "delimiter": "," }
//! ```
use std::{fs::File, io::BufReader, path::Path};

use serde_derive::*;

use crate::{
    error::{Error, Result},
    grid::GridFormat,
};

pub const DEFAULT_PATTERN: &str = "ir_export_*.csv";
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "IR_zones.csv";
pub const DEFAULT_COLUMN_PREFIX: &str = "ir_";
pub const DEFAULT_PROGRESS_EVERY: usize = 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// Cell separator of the frame exports.
    #[serde(with = "serde_helpers::delimiter")]
    pub delimiter: u8,
    /// Lines at the top of every export that are not pixels.
    pub header_lines: usize,
    /// Prepended to every output column name.
    pub column_prefix: String,
    /// Report progress after this many files.
    pub progress_every: usize,
    /// Worker threads; `1` processes files sequentially.
    pub jobs: usize,
    /// Glob used inside input directories.
    pub pattern: String,
    /// Output name when no output path is given.
    pub output_file_name: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        let grid = GridFormat::default();
        BatchConfig {
            delimiter: grid.delimiter,
            header_lines: grid.header_lines,
            column_prefix: DEFAULT_COLUMN_PREFIX.into(),
            progress_every: DEFAULT_PROGRESS_EVERY,
            jobs: 1,
            pattern: DEFAULT_PATTERN.into(),
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.into(),
        }
    }
}

impl BatchConfig {
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::io(path))?;
        let config: BatchConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Configuration(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.progress_every == 0 {
            return Err(Error::Configuration("progress_every must be positive".into()));
        }
        if self.jobs == 0 {
            return Err(Error::Configuration("jobs must be positive".into()));
        }
        Ok(())
    }

    pub fn grid_format(&self) -> GridFormat {
        GridFormat {
            delimiter: self.delimiter,
            header_lines: self.header_lines,
        }
    }
}

pub(crate) mod serde_helpers {
    pub mod delimiter {
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &u8, ser: S) -> Result<S::Ok, S::Error> {
            ser.serialize_char(*value as char)
        }

        pub fn deserialize<'de, D>(de: D) -> Result<u8, D::Error>
        where
            D: Deserializer<'de>,
        {
            let str_rep = <String as Deserialize>::deserialize(de)?;
            super::parse_delimiter(&str_rep).map_err(Error::custom)
        }
    }

    /// A delimiter is a single ASCII character; `\t` is
    /// accepted for tabs.
    pub fn parse_delimiter(s: &str) -> Result<u8, String> {
        match s {
            "\\t" => Ok(b'\t'),
            _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
            _ => Err(format!("delimiter must be one ASCII character, got `{}`", s)),
        }
    }
}

pub use serde_helpers::parse_delimiter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: BatchConfig =
            serde_json::from_str(r#"{ "header_lines": 0, "delimiter": "," }"#).unwrap();
        assert_eq!(config.header_lines, 0);
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.progress_every, 100);
        assert_eq!(config.column_prefix, "ir_");
        assert_eq!(config.pattern, "ir_export_*.csv");
    }

    #[test]
    fn exports_carry_one_label_line_by_default() {
        let config: BatchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.header_lines, 1);
        assert_eq!(config.grid_format(), GridFormat::default());
    }

    #[test]
    fn delimiter_round_trips_as_text() {
        let json = serde_json::to_string(&BatchConfig::default()).unwrap();
        assert!(json.contains(r#""delimiter":";""#));
    }

    #[test]
    fn rejects_long_delimiter() {
        assert!(serde_json::from_str::<BatchConfig>(r#"{ "delimiter": ";;" }"#).is_err());
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
    }

    #[test]
    fn zero_jobs_is_invalid() {
        let config = BatchConfig {
            jobs: 0,
            ..BatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }
}
