use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::value_t_or_exit;
use irzones::{
    args_parser, opt,
    viewer::{parse_meta, ExportFormat, ExportOptions, Mode, Palette, Rotation},
};

pub struct Args {
    pub options: ExportOptions,
    pub json: bool,
}

fn parsed<T>(matches: &clap::ArgMatches<'_>, name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr<Err = irzones::Error>,
{
    Ok(match matches.value_of(name) {
        Some(value) => value.parse()?,
        None => default,
    })
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("ir-export-args")
            .about("Validate exporter options and print the resulting command line.")
            .arg(
                opt!("mode")
                    .required(true)
                    .possible_values(&["file", "folder"])
                    .help("Export a single recording or a whole folder"),
            )
            .arg(opt!("input").short("i").required(true).help("Recording file or folder"))
            .arg(opt!("export dir").short("e").required(true).help("Directory for exports"))
            .arg(opt!("prefix").help("File name prefix of the exports"))
            .arg(opt!("date").help("Measurement date, used with --folder-name to build the prefix"))
            .arg(opt!("folder name").help("Recording folder name, used with --date"))
            .arg(opt!("rotation").short("r").help("0, 90, 180 or 270.  Default is 0"))
            .arg(
                opt!("frame start")
                    .help("First exported frame.  Default is 1 (folder) or 0 (file)"),
            )
            .arg(opt!("frame end").help("Last exported frame.  Default is 1 (folder) or 0 (file)"))
            .arg(opt!("format").help("png, jpg, tif, avi, csv or rjpg.  Default is csv"))
            .arg(opt!("palette").help("gray, iron, arctic or rainbow.  Default is iron"))
            .arg(opt!("meta").help("CSVpf, CSVfa, KML, RAW or none.  Default is none"))
            .arg(
                opt!("keep open")
                    .takes_value(false)
                    .help("Do not close the exporter after the export"),
            )
            .arg(
                opt!("json")
                    .short("j")
                    .takes_value(false)
                    .help("Print the validated options as JSON"),
            )
            .get_matches();

        let mode: Mode = parsed(&matches, "mode", Mode::Folder)?;
        let input = value_t_or_exit!(matches, "input", PathBuf);
        let export_dir = value_t_or_exit!(matches, "export dir", PathBuf);
        let prefix = match (
            matches.value_of("prefix"),
            matches.value_of("date"),
            matches.value_of("folder name"),
        ) {
            (Some(prefix), _, _) => prefix.to_string(),
            (None, Some(date), Some(folder)) => ExportOptions::export_prefix(date, folder),
            _ => bail!("either --prefix or both --date and --folder-name are required"),
        };

        let mut options = match mode {
            Mode::Folder => ExportOptions::movie(&input, &export_dir, prefix),
            Mode::File => ExportOptions::timelapse(&input, &export_dir, prefix),
        };
        options.rotation = parsed(&matches, "rotation", Rotation::R0)?;
        options.format = parsed(&matches, "format", ExportFormat::Csv)?;
        options.palette = parsed(&matches, "palette", Palette::Iron)?;
        if let Some(meta) = matches.value_of("meta") {
            options.meta = parse_meta(meta)?;
        }
        if matches.is_present("frame start") {
            options.frame_start = value_t_or_exit!(matches.value_of("frame start"), u32);
        }
        if matches.is_present("frame end") {
            options.frame_end = value_t_or_exit!(matches.value_of("frame end"), u32);
        }
        options.close = !matches.is_present("keep open");

        Ok(Args {
            options,
            json: matches.is_present("json"),
        })
    }
}
