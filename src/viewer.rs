//! Command-line options of the external exporter that
//! turns camera recordings into the CSV frames this crate
//! reads.
//!
//! Options are validated when parsed, so an
//! [`ExportOptions`] always renders to a complete argument
//! list. Running the exporter is left to the caller.
use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    process::Command,
    str::FromStr,
};

use serde_derive::*;

use crate::{
    error::{Error, Result},
    identity::FILE_NAME_PREFIX,
};

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $what:literal => { $($variant:ident = $text:literal),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),*
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;
            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($text => Ok($name::$variant),)*
                    _ => Err(Error::Configuration(format!(
                        "invalid {} `{}`: expected one of {}",
                        $what,
                        s,
                        [$($text),*].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_enum! {
    /// Export one recording or every recording of a folder.
    Mode: "mode" => { File = "file", Folder = "folder" }
}

option_enum! {
    Rotation: "rotation" => { R0 = "0", R90 = "90", R180 = "180", R270 = "270" }
}

option_enum! {
    ExportFormat: "export format" => {
        Png = "png", Jpg = "jpg", Tif = "tif", Avi = "avi", Csv = "csv", Rjpg = "rjpg",
    }
}

option_enum! {
    Palette: "color palette" => { Gray = "gray", Iron = "iron", Arctic = "arctic", Rainbow = "rainbow" }
}

option_enum! {
    /// Metadata output. `CSVpf` writes one file per frame,
    /// `CSVfa` one for all frames.
    MetaFormat: "metadata format" => { CsvPerFrame = "CSVpf", CsvAllFrames = "CSVfa", Kml = "KML", Raw = "RAW" }
}

/// Parse a metadata option, where `none` disables metadata.
pub fn parse_meta(s: &str) -> Result<Option<MetaFormat>> {
    match s {
        "none" => Ok(None),
        _ => s.parse().map(Some),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub mode: Mode,
    pub input: PathBuf,
    pub export_dir: PathBuf,
    pub rotation: Rotation,
    pub prefix: String,
    pub frame_start: u32,
    pub frame_end: u32,
    pub format: ExportFormat,
    pub palette: Palette,
    pub meta: Option<MetaFormat>,
    /// Quit the exporter once all tasks are done.
    pub close: bool,
}

impl ExportOptions {
    /// Options of the movie-mode export: every recording of
    /// `input` folder, first frame only, as CSV.
    pub fn movie(input: &Path, export_dir: &Path, prefix: String) -> Self {
        ExportOptions {
            mode: Mode::Folder,
            input: input.to_path_buf(),
            export_dir: export_dir.to_path_buf(),
            rotation: Rotation::R0,
            prefix,
            frame_start: 1,
            frame_end: 1,
            format: ExportFormat::Csv,
            palette: Palette::Iron,
            meta: None,
            close: true,
        }
    }

    /// Options of the timelapse export: one recording file,
    /// all frames, as CSV.
    pub fn timelapse(input: &Path, export_dir: &Path, prefix: String) -> Self {
        ExportOptions {
            mode: Mode::File,
            frame_start: 0,
            frame_end: 0,
            ..Self::movie(input, export_dir, prefix)
        }
    }

    /// Exported file name prefix, `ir_export_<date>_<folder>`.
    pub fn export_prefix(date: &str, folder: &str) -> String {
        format!("{}{}_{}", FILE_NAME_PREFIX, date, folder)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_end < self.frame_start {
            return Err(Error::Configuration(format!(
                "frame range {}..{} is inverted",
                self.frame_start, self.frame_end
            )));
        }
        if self.prefix.is_empty() {
            return Err(Error::Configuration("export prefix is empty".into()));
        }
        Ok(())
    }

    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![];
        let mut push = |flag: &str, value: OsString| {
            args.push(flag.into());
            args.push(value);
        };

        push(
            match self.mode {
                Mode::File => "-i",
                Mode::Folder => "-folder",
            },
            self.input.clone().into(),
        );
        push("-r", self.rotation.as_str().into());
        push("-cp", self.palette.as_str().into());
        push("-expa", self.export_dir.clone().into());
        push("-exfn", self.prefix.as_str().into());
        push("-exsf", self.frame_start.to_string().into());
        push("-exef", self.frame_end.to_string().into());
        push("-exfo", self.format.as_str().into());
        if let Some(meta) = self.meta {
            push("-exmeta", meta.as_str().into());
        }
        if self.close {
            args.push("-c".into());
        }
        args
    }

    /// The exporter invocation, not yet spawned.
    pub fn command<P: AsRef<Path>>(&self, app: P) -> Result<Command> {
        self.validate()?;
        let mut cmd = Command::new(app.as_ref());
        cmd.args(self.to_args());
        Ok(cmd)
    }
}
