use owo_colors::OwoColorize;
use std::error::Error;
use tunetag::config::Config;
use tunetag::llm::{self, ProviderKind};
use tunetag::utils::progress::create_progress_spinner;

pub fn handle_check(provider: Option<ProviderKind>) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    if let Some(provider) = provider {
        config.provider = provider;
    }

    let spinner = create_progress_spinner();
    spinner.set_message(format!("Connecting to {} ...", config.provider));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = llm::build_provider(&config);
    spinner.finish_and_clear();

    let provider = result.map_err(|e| format!("{} {e}", "Error:".red().bold()))?;
    println!(
        "{} {} provider ready, model {}",
        "✓".green(),
        provider.name(),
        provider.model().cyan()
    );
    Ok(())
}
