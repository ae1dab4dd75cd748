//! Batch enrichment of an input directory.
//!
//! For every audio file found below the input directory the driver copies
//! the file to the output directory, opens the copy's native tag, asks the
//! configured model for metadata based on the cleaned filename, writes the
//! result and saves. The source files are never modified.
//!
//! Per-file failures are logged and counted; only problems found before the
//! first copy (missing input, bad output location, provider setup) abort the
//! run.

mod filename;
mod stats;

pub use filename::clean_filename;
pub use stats::{AssetOutcome, RunStats};

use crate::config::Config;
use crate::constants::TEMP_FILE_PREFIX;
use crate::llm::{self, LlmProvider};
use crate::metadata::{Degradation, PARSE_FAILURE};
use crate::tags::{self, AudioFormat};
use crate::utils::progress::create_progress_bar;
use crate::utils::scan::collect_audio_files;
use crate::utils::validation::validate_directory;
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Run a whole batch with the provider named in `config`.
pub fn run(config: &Config) -> Result<RunStats, Box<dyn Error>> {
    check_directories(&config.input_path(), &config.output_path())?;
    let provider = llm::build_provider(config)?;
    run_with_provider(config, provider.as_ref())
}

/// Run a whole batch against an already built provider.
pub fn run_with_provider(
    config: &Config,
    provider: &dyn LlmProvider,
) -> Result<RunStats, Box<dyn Error>> {
    let input = config.input_path();
    let output = config.output_path();
    check_directories(&input, &output)?;

    let files = collect_audio_files(&input)?;
    log::info!("Found {} audio files in {}", files.len(), input.display());

    let mut stats = RunStats::new(files.len());
    if files.is_empty() {
        log::warn!("No audio files found to process.");
        return Ok(stats);
    }

    if !output.exists() {
        log::info!("Creating output folder: {}", output.display());
        fs::create_dir_all(&output)?;
    }

    let pipeline = Pipeline {
        config,
        provider,
        input: &input,
        output: &output,
    };
    let total = files.len();
    let batch_size = config.batch_size.max(1);
    let pb = create_progress_bar(total as u64);

    for (i, source) in files.iter().enumerate() {
        let report = pipeline.process_file(source, i + 1, total);
        match &report.outcome {
            AssetOutcome::Failed(reason) => {
                log::error!("Failed to process '{}': {reason}", source.display())
            }
            AssetOutcome::Degraded(reason) => {
                log::error!("Only the title was written for '{}': {reason}", source.display())
            }
            AssetOutcome::ProviderFallback(reason) => {
                log::warn!("Provider failed, title written for '{}': {reason}", source.display())
            }
            AssetOutcome::TagsApplied | AssetOutcome::Skipped => {}
        }
        stats.record(&report.outcome);
        pb.inc(1);

        if (i + 1) % batch_size == 0 || i + 1 == total {
            log::info!("Progress: {}/{total} files processed.", i + 1);
        }

        if report.queried_llm && i + 1 < total && config.rate_limit_delay_ms > 0 {
            thread::sleep(Duration::from_millis(config.rate_limit_delay_ms));
        }
    }

    pb.finish_and_clear();
    Ok(stats)
}

/// What happened to one file.
struct AssetReport {
    outcome: AssetOutcome,
    /// The model was asked, so the rate limit delay applies.
    queried_llm: bool,
}

impl AssetReport {
    fn failed(reason: impl Into<String>, queried_llm: bool) -> Self {
        Self {
            outcome: AssetOutcome::Failed(reason.into()),
            queried_llm,
        }
    }
}

struct Pipeline<'a> {
    config: &'a Config,
    provider: &'a dyn LlmProvider,
    input: &'a Path,
    output: &'a Path,
}

impl Pipeline<'_> {
    fn process_file(&self, source: &Path, index: usize, total: usize) -> AssetReport {
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let song_name = clean_filename(&file_name);

        let Some(format) = AudioFormat::from_path(source) else {
            return AssetReport::failed(format!("unsupported file format: {file_name}"), false);
        };
        log::info!("Processing ({index}/{total}): '{song_name}' [{format}]");

        let destination = match output_location(
            self.input,
            self.output,
            source,
            self.config.mirror_subdirectories,
        ) {
            Ok(path) => path,
            Err(e) => return AssetReport::failed(e.to_string(), false),
        };

        log::info!("Copying file to output folder: {}", destination.display());
        if let Err(e) = copy_atomically(source, &destination) {
            return AssetReport::failed(format!("copy failed: {e}"), false);
        }

        let mut handle = match tags::open(&destination, format) {
            Ok(handle) => handle,
            Err(e) => return AssetReport::failed(format!("could not open tags: {e}"), false),
        };

        if !self.config.overwrite && tags::has_existing_tags(&handle, format) {
            log::info!("Skipping '{file_name}': already tagged and overwrite is disabled");
            return AssetReport {
                outcome: AssetOutcome::Skipped,
                queried_llm: false,
            };
        }

        let metadata = llm::fetch_metadata(self.provider, &song_name);

        if !tags::apply(&mut handle, format, &metadata) {
            return AssetReport::failed(format!("unsupported tag layout for {format}"), true);
        }
        if let Err(e) = tags::save(&destination, format, &handle) {
            return AssetReport::failed(format!("could not save tags: {e}"), true);
        }

        let outcome = match metadata.degradation() {
            Some(Degradation::Unparsable) => AssetOutcome::Degraded(PARSE_FAILURE.to_string()),
            Some(Degradation::Provider(reason)) => AssetOutcome::ProviderFallback(reason),
            None => {
                log::info!(
                    "Successfully updated metadata for '{file_name}' saved to {}",
                    destination.display()
                );
                AssetOutcome::TagsApplied
            }
        };
        AssetReport {
            outcome,
            queried_llm: true,
        }
    }
}

/// Fail before any copy if the directories cannot be used.
fn check_directories(input: &Path, output: &Path) -> Result<(), Box<dyn Error>> {
    validate_directory(input)?;

    let input = resolve_path(input)?;
    let output = resolve_path(output)?;
    if output.starts_with(&input) {
        return Err(format!(
            "Output folder {} must not be inside the input folder {}",
            output.display(),
            input.display()
        )
        .into());
    }
    Ok(())
}

/// Absolute, symlink-free form of `path`, which need not exist yet.
fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_owned());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = existing.canonicalize()?;
    for name in missing.into_iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

/// Where the copy of `source` goes.
///
/// With `mirror` the path relative to `input` is kept, otherwise only the
/// file name.
pub fn output_location(
    input: &Path,
    output: &Path,
    source: &Path,
    mirror: bool,
) -> io::Result<PathBuf> {
    let relative = if mirror {
        source.strip_prefix(input).ok()
    } else {
        None
    };

    match relative {
        Some(relative)
            if relative
                .components()
                .all(|c| matches!(c, Component::Normal(_))) =>
        {
            Ok(output.join(relative))
        }
        _ => source
            .file_name()
            .map(|name| output.join(name))
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("no file name in {}", source.display()),
                )
            }),
    }
}

/// Copy `source` to `destination` through a scratch file in the same
/// directory, so a half-written copy never appears under the final name.
fn copy_atomically(source: &Path, destination: &Path) -> io::Result<()> {
    let parent = destination.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(parent)?;

    let temp_path = parent.join(format!(
        "{TEMP_FILE_PREFIX}{}",
        uuid::Uuid::new_v4().simple()
    ));
    if let Err(e) = fs::copy(source, &temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&temp_path, destination) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}
