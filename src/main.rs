//! tunetag - fill in audio file tags by asking a language model.
//!
//! The song name is taken from each file's name, a model (a local Ollama
//! server, OpenAI or Gemini) is asked for title, artists, album, year,
//! composer, genre and language, and the answer is written into the native
//! tags of a copy of the file: ID3v2 for MP3, Vorbis comments for FLAC, Ogg
//! and Opus, and iTunes atoms for MP4/M4A. Input files are never modified.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use std::error::Error;
use std::io;
use tunetag::config::SETTABLE_KEYS;
use tunetag::llm::ProviderKind;
use tunetag::logging;

mod cli;

#[derive(Parser)]
#[command(name = "tunetag")]
#[command(about = "Tag audio files with metadata inferred by a language model")]
#[command(version)]
struct Cli {
    /// Show progress on the terminal and debug detail in the log file
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag every audio file in the input folder, writing copies to the output folder
    Run {
        /// Input folder (overrides input_dir)
        #[arg(short, long)]
        input: Option<String>,
        /// Output folder (overrides output_dir)
        #[arg(short, long)]
        output: Option<String>,
        /// LLM provider to query
        #[arg(short, long, value_enum)]
        provider: Option<ProviderKind>,
        /// Model name for the selected provider
        #[arg(short, long)]
        model: Option<String>,
        /// Skip files that already have a title or artist
        #[arg(long)]
        no_overwrite: bool,
        /// Delay between model queries in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Log a progress line every N files
        #[arg(long)]
        batch_size: Option<usize>,
        /// Base URL of the Ollama server
        #[arg(long)]
        ollama_url: Option<String>,
    },
    /// Check that the configured provider is ready
    Check {
        /// Provider to check instead of the configured one
        #[arg(short, long, value_enum)]
        provider: Option<ProviderKind>,
    },
    /// Show the tags stored in an audio file
    Inspect {
        /// Audio file to read
        file: String,
    },
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
        /// Accept the defaults without prompting
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new(SETTABLE_KEYS.iter().copied()))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            provider,
            model,
            no_overwrite,
            delay_ms,
            batch_size,
            ollama_url,
        } => {
            let overrides = cli::run::RunOverrides {
                input,
                output,
                provider,
                model,
                no_overwrite,
                delay_ms,
                batch_size,
                ollama_url,
            };
            cli::run::handle_run(overrides, cli.verbose)?;
        }
        Commands::Check { provider } => {
            logging::init(None, cli.verbose)?;
            cli::check::handle_check(provider)?;
        }
        Commands::Inspect { file } => {
            cli::inspect::handle_inspect(&file)?;
        }
        Commands::Init { force, yes } => {
            cli::init::handle_init(force, yes)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
    }

    Ok(())
}
