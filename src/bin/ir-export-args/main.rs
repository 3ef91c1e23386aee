//! Validate exporter options and print the argument list
//! the exporter would be started with, one per line.
mod args;

use std::io::Write;

use anyhow::Result;

use args::Args;

fn main() -> Result<()> {
    irzones::cli::init_logging();
    let args = Args::from_cmd_line()?;
    args.options.validate()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &args.options)?;
        writeln!(out)?;
        return Ok(());
    }

    for arg in args.options.to_args() {
        writeln!(out, "{}", arg.to_string_lossy())?;
    }
    Ok(())
}
