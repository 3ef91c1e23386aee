//! Helpers shared by the accompanying binaries.
//!
//! APIs here shouldn't be considered stable / used as a
//! library.
use std::path::PathBuf;

pub use clap::{App, Arg, ArgMatches};
use indicatif::{ProgressBar, ProgressStyle};
pub use inflector::Inflector;

use crate::aggregate::{LogProgress, Progress};

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::App::new($name)
            .version(clap::crate_version!())
            .author(clap::crate_authors!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Install the logger; `RUST_LOG` overrides the `info`
/// default.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

pub fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {wide_bar:cyan/blue} {pos:>7}/{len:7}"),
    );
    bar
}

/// Progress bar that also prints `File i of n analyzed.`
/// above the bar at the interval of [`LogProgress`].
pub struct BarProgress {
    bar: ProgressBar,
    lines: LogProgress,
}

impl BarProgress {
    pub fn new(bar: ProgressBar, every: usize) -> Self {
        BarProgress {
            bar,
            lines: LogProgress { every },
        }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl Progress for BarProgress {
    fn start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn advance(&self, done: usize, total: usize) {
        self.bar.inc(1);
        if self.lines.is_due(done, total) {
            self.bar.println(LogProgress::message(done, total));
        }
    }

    fn finish(&self, _total: usize) {
        self.bar.finish_and_clear();
    }
}

/// All values of a positional argument as paths.
pub fn paths_of(matches: &ArgMatches<'_>, name: &str) -> Vec<PathBuf> {
    matches
        .values_of_os(name)
        .map(|vals| vals.map(PathBuf::from).collect())
        .unwrap_or_default()
}
