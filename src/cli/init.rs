use dialoguer::{Input, Select, theme::ColorfulTheme};
use owo_colors::OwoColorize;
use std::error::Error;
use std::io::IsTerminal;
use tunetag::config::Config;
use tunetag::llm::ProviderKind;

const PROVIDERS: [ProviderKind; 3] = [
    ProviderKind::Ollama,
    ProviderKind::Openai,
    ProviderKind::Gemini,
];

/// Ask for the provider, its model and the folders.
fn prompt_for_settings(config: &mut Config) -> Result<(), Box<dyn Error>> {
    let theme = ColorfulTheme::default();

    let labels = ["ollama (local server)", "openai", "gemini"];
    let choice = Select::with_theme(&theme)
        .with_prompt("LLM provider")
        .items(&labels)
        .default(0)
        .interact()?;
    config.provider = PROVIDERS[choice];

    let model: String = Input::with_theme(&theme)
        .with_prompt("Model")
        .default(config.active_model().to_string())
        .interact_text()?;
    config.set_active_model(&model);

    config.input_dir = Input::with_theme(&theme)
        .with_prompt("Input folder")
        .default(config.input_dir.clone())
        .interact_text()?;
    config.output_dir = Input::with_theme(&theme)
        .with_prompt("Output folder")
        .default(config.output_dir.clone())
        .interact_text()?;

    Ok(())
}

pub fn handle_init(force: bool, use_defaults: bool) -> Result<(), Box<dyn Error>> {
    if Config::exists()? && !force {
        return Err(
            "tunetag is already initialized. Use 'tunetag config set <key> <value>' to change settings, or 'tunetag init --force' to start over."
                .into(),
        );
    }

    let mut config = Config::new();
    if !use_defaults && std::io::stdin().is_terminal() {
        prompt_for_settings(&mut config)?;
    }
    config.save()?;

    println!("{} tunetag initialized", "✓".green());
    println!(
        "  Configuration saved to: {}",
        Config::config_path()?.display()
    );
    println!("  Provider: {} ({})", config.provider.cyan(), config.active_model());
    match config.provider {
        ProviderKind::Ollama => println!(
            "  Run 'tunetag check' to make sure the Ollama server at {} is reachable.",
            config.ollama.base_url
        ),
        ProviderKind::Openai => println!(
            "  Set 'tunetag config set openai.api_key <key>' or the OPENAI_API_KEY variable."
        ),
        ProviderKind::Gemini => println!(
            "  Set 'tunetag config set gemini.api_key <key>' or the GEMINI_API_KEY variable."
        ),
    }

    Ok(())
}
