use std::path::PathBuf;

use anyhow::{anyhow, Result};
use irzones::{arg, args_parser, cli::paths_of, config::parse_delimiter, opt};

pub struct Args {
    pub paths: Vec<PathBuf>,
    pub delimiter: u8,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("ir-rotate")
            .about("Rotate grid exports by 180 degrees, overwriting each file.")
            .after_help(
                "Each run turns the files again: rotating a file twice restores the original.",
            )
            .arg(opt!("delimiter").short("d").help("Cell separator.  Default is `;`"))
            .arg(
                arg!("grids")
                    .required(true)
                    .multiple(true)
                    .help("Grid files to rotate"),
            )
            .get_matches();

        let paths = paths_of(&matches, "grids");
        let delimiter = matches
            .value_of("delimiter")
            .map(|d| parse_delimiter(d).map_err(|e| anyhow!(e)))
            .transpose()?
            .unwrap_or(b';');

        Ok(Args { paths, delimiter })
    }
}
