//! Logger setup: warnings on the terminal, a fuller record in the log file.

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;

fn levels(verbose: bool) -> (LevelFilter, LevelFilter) {
    if verbose {
        (LevelFilter::Info, LevelFilter::Debug)
    } else {
        (LevelFilter::Warn, LevelFilter::Info)
    }
}

/// Install the global logger. Call once, before any work starts.
///
/// Passing `None` for `log_file` logs to the terminal only.
pub fn init(log_file: Option<&Path>, verbose: bool) -> Result<(), Box<dyn Error>> {
    let (term_level, file_level) = levels(verbose);
    // Dependencies (reqwest, lofty) stay quiet unless something breaks
    let config = ConfigBuilder::new()
        .add_filter_allow_str("tunetag")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        loggers.push(WriteLogger::new(file_level, config, file));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}
