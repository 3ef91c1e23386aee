mod args;

use anyhow::{Context, Result};
use indicatif::ParallelProgressIterator;
use itertools::Itertools;
use log::warn;

use irzones::{
    cli::{init_logging, progress_bar},
    rotate::rotate_file_180,
};

use args::Args;

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;

    // a path given twice would be turned back to its original
    let paths: Vec<_> = args.paths.iter().unique().collect();
    if paths.len() < args.paths.len() {
        warn!(
            "ignoring {} repeated path(s)",
            args.paths.len() - paths.len()
        );
    }

    use rayon::prelude::*;
    let count = paths
        .par_iter()
        .progress_with(progress_bar(paths.len()))
        .map(|p| -> Result<()> {
            rotate_file_180(p, args.delimiter)
                .with_context(|| format!("rotating {}", p.display()))?;
            Ok(())
        })
        .try_fold(
            || 0usize,
            |acc, res| -> Result<_> {
                res?;
                Ok(acc + 1)
            },
        )
        .try_reduce(|| 0, |a, b| Ok(a + b))?;

    eprintln!("Rotated {} files", count);
    Ok(())
}
