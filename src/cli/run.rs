use owo_colors::OwoColorize;
use std::error::Error;
use tunetag::config::Config;
use tunetag::enrich::{self, RunStats};
use tunetag::llm::ProviderKind;
use tunetag::logging;

/// `run` flags that override the config file for one invocation.
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub input: Option<String>,
    pub output: Option<String>,
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub no_overwrite: bool,
    pub delay_ms: Option<u64>,
    pub batch_size: Option<usize>,
    pub ollama_url: Option<String>,
}

impl RunOverrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(input) = self.input {
            config.input_dir = input;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        // Provider first, so --model lands on the provider actually used
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(model) = self.model {
            config.set_active_model(&model);
        }
        if self.no_overwrite {
            config.overwrite = false;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.rate_limit_delay_ms = delay_ms;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size.max(1);
        }
        if let Some(url) = self.ollama_url {
            config.ollama.base_url = url;
        }
    }
}

pub fn handle_run(overrides: RunOverrides, verbose: bool) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    overrides.apply(&mut config);

    logging::init(Some(&config.log_path()), verbose)?;

    println!("{}", "Starting tunetag".bold());
    println!("  {} {}", "Input folder:".bright_black(), config.input_dir.cyan());
    println!("  {} {}", "Output folder:".bright_black(), config.output_dir.cyan());
    println!(
        "  {} MP3, FLAC, M4A, MP4, OGG, OPUS",
        "Supported formats:".bright_black()
    );
    println!(
        "  {} {} ({})",
        "LLM provider:".bright_black(),
        config.provider.cyan(),
        config.active_model()
    );

    let stats = enrich::run(&config).inspect_err(|e| log::error!("Fatal error: {e}"))?;

    print_summary(&stats);
    println!(
        "\nProcess completed! Check {} for details.",
        config.log_path().display()
    );
    Ok(())
}

fn print_summary(stats: &RunStats) {
    let rule = "=".repeat(50);
    println!("\n{rule}");
    println!("{}", "PROCESSING SUMMARY".bold());
    println!("{rule}");
    println!("  Total files found:  {}", stats.total_files);
    println!("  Files processed:    {}", stats.processed_files);
    println!("  {} {}", "Successful updates:".green(), stats.success);
    println!("  {} {}", "Skipped files:     ".yellow(), stats.skipped);
    if stats.degraded > 0 {
        println!("  {} {}", "Title only:        ".yellow(), stats.degraded);
    }
    if stats.errors > 0 {
        println!("  {} {}", "Errors:            ".red(), stats.errors);
    } else {
        println!("  Errors:             0");
    }
    println!("{rule}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        RunOverrides {
            input: Some("raw".to_string()),
            provider: Some(ProviderKind::Gemini),
            model: Some("gemini-2.0-flash".to_string()),
            no_overwrite: true,
            delay_ms: Some(0),
            batch_size: Some(0),
            ollama_url: Some("http://box:11434".to_string()),
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.input_dir, "raw");
        assert_eq!(config.output_dir, "output");
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.ollama.model, "llama3");
        assert!(!config.overwrite);
        assert_eq!(config.rate_limit_delay_ms, 0);
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.ollama.base_url, "http://box:11434");
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = Config::default();
        RunOverrides::default().apply(&mut config);
        assert_eq!(config, Config::default());
    }
}
