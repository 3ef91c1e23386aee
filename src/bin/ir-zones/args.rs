use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::value_t_or_exit;
use irzones::{
    arg, args_parser,
    cli::paths_of,
    config::{parse_delimiter, BatchConfig},
    opt,
};

pub struct Args {
    pub calibration: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub log_progress: bool,
    pub config: BatchConfig,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("ir-zones")
            .about("Compute per-zone median, mean and std of IR frame exports.")
            .arg(
                opt!("calibration")
                    .short("c")
                    .required(true)
                    .help("Whitespace-delimited zone positions per measurement date"),
            )
            .arg(
                opt!("output")
                    .short("o")
                    .help("Output table (default: IR_zones.csv next to the first input)"),
            )
            .arg(opt!("config").help("JSON file with batch settings"))
            .arg(
                opt!("pattern")
                    .short("p")
                    .help("Glob for exports inside input directories (default: ir_export_*.csv)"),
            )
            .arg(
                opt!("jobs")
                    .short("j")
                    .help("Number of worker threads.  Default is 1 (sequential)"),
            )
            .arg(
                opt!("every")
                    .help("Print `File i of n analyzed.` every N files.  Default is 100"),
            )
            .arg(opt!("header lines").help("Leading non-pixel lines per export.  Default is 1"))
            .arg(opt!("delimiter").help("Cell separator of the exports.  Default is `;`"))
            .arg(
                opt!("log progress")
                    .takes_value(false)
                    .help("Only log progress lines, without a progress bar"),
            )
            .arg(
                arg!("inputs")
                    .required(true)
                    .multiple(true)
                    .help("Export files or directories"),
            )
            .get_matches();

        let mut config = match matches.value_of_os("config") {
            Some(path) => BatchConfig::from_json_path(path)
                .with_context(|| format!("reading config {:?}", path))?,
            None => BatchConfig::default(),
        };
        if let Some(pattern) = matches.value_of("pattern") {
            config.pattern = pattern.into();
        }
        if matches.is_present("jobs") {
            config.jobs = value_t_or_exit!(matches.value_of("jobs"), usize);
        }
        if matches.is_present("every") {
            config.progress_every = value_t_or_exit!(matches.value_of("every"), usize);
        }
        if matches.is_present("header lines") {
            config.header_lines = value_t_or_exit!(matches.value_of("header lines"), usize);
        }
        if let Some(delimiter) = matches.value_of("delimiter") {
            config.delimiter = parse_delimiter(delimiter).map_err(|e| anyhow!(e))?;
        }
        config.validate()?;

        let calibration = value_t_or_exit!(matches, "calibration", PathBuf);
        let output = matches.value_of_os("output").map(PathBuf::from);
        let inputs = paths_of(&matches, "inputs");
        let log_progress = matches.is_present("log progress");

        Ok(Args {
            calibration,
            inputs,
            output,
            log_progress,
            config,
        })
    }

    /// Explicit output, or the configured file name in the
    /// first input directory.
    pub fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let dir = match self.inputs.first() {
            Some(first) if first.is_dir() => first.clone(),
            Some(first) => first
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default(),
            None => PathBuf::new(),
        };
        dir.join(&self.config.output_file_name)
    }
}
