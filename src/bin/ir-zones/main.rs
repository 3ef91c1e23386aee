mod args;

use anyhow::{bail, Context, Result};
use log::info;

use irzones::{
    aggregate::{enumerate_inputs, LogProgress, Progress},
    cli::{init_logging, progress_bar, BarProgress},
    Aggregator, CalibrationTable, ZoneTable,
};

use args::Args;

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;
    let config = &args.config;

    let calibration = CalibrationTable::from_path(&args.calibration)
        .with_context(|| format!("loading calibration {}", args.calibration.display()))?;
    info!(
        "{} calibration rows, zones: {}",
        calibration.len(),
        calibration.zone_names().join(", ")
    );

    let paths = enumerate_inputs(&args.inputs, &config.pattern)?;
    if paths.is_empty() {
        bail!("no frame exports matching `{}` found", config.pattern);
    }

    let aggregator = Aggregator::new(&calibration, config.grid_format(), &config.column_prefix);
    let table = if args.log_progress {
        run(&aggregator, &paths, config.jobs, &LogProgress { every: config.progress_every })
    } else {
        let progress = BarProgress::new(progress_bar(paths.len()), config.progress_every);
        run(&aggregator, &paths, config.jobs, &progress)
    }?;

    let output = args.output_path();
    table
        .write_path(&output)
        .with_context(|| format!("writing {}", output.display()))?;

    eprintln!("Analyzed {} files", table.len());
    eprintln!("Output: {}", output.display());
    Ok(())
}

fn run<P: Progress>(
    aggregator: &Aggregator<'_>,
    paths: &[std::path::PathBuf],
    jobs: usize,
    progress: &P,
) -> Result<ZoneTable> {
    Ok(aggregator.run_parallel(paths, jobs, progress)?)
}
