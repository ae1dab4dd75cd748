use std::error::Error;
use std::process::Command;
use tunetag::config::Config;

/// Mask an API key for display.
fn mask(key: Option<&str>) -> String {
    match key {
        Some(key) if key.chars().count() > 4 => {
            let tail: String = key.chars().skip(key.chars().count() - 4).collect();
            format!("****{tail}")
        }
        Some(_) => "****".to_string(),
        None => "(from environment)".to_string(),
    }
}

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    println!("Current tunetag configuration:");
    println!("  input_dir: {}", config.input_dir);
    println!("  output_dir: {}", config.output_dir);
    println!("  provider: {}", config.provider);
    println!("  batch_size: {}", config.batch_size);
    println!("  rate_limit_delay_ms: {}", config.rate_limit_delay_ms);
    println!("  overwrite: {}", config.overwrite);
    println!("  mirror_subdirectories: {}", config.mirror_subdirectories);
    println!("  log_file: {}", config.log_file);
    println!("  ollama.base_url: {}", config.ollama.base_url);
    println!("  ollama.model: {}", config.ollama.model);
    println!("  ollama.timeout_secs: {}", config.ollama.timeout_secs);
    println!("  openai.base_url: {}", config.openai.base_url);
    println!("  openai.model: {}", config.openai.model);
    println!("  openai.api_key: {}", mask(config.openai.api_key.as_deref()));
    println!("  gemini.base_url: {}", config.gemini.base_url);
    println!("  gemini.model: {}", config.gemini.model);
    println!("  gemini.api_key: {}", mask(config.gemini.api_key.as_deref()));

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    if key.ends_with("api_key") {
        println!("Configuration updated: {key} = {}", mask(Some(value)));
    } else {
        println!("Configuration updated: {key} = {value}");
    }

    Ok(())
}

pub fn handle_config_edit() -> Result<(), Box<dyn Error>> {
    if !Config::exists()? {
        return Err("tunetag not initialized. Run 'tunetag init' first.".into());
    }

    let config_path = Config::config_path()?;
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    println!("Opening {} in {}", config_path.display(), editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!("Editor '{editor}' not found. Set $EDITOR to a valid editor path.")
            } else {
                format!("Failed to launch editor '{editor}': {e}")
            }
        })?;

    if !status.success() {
        return Err(format!("Editor '{editor}' exited with error").into());
    }

    match Config::load() {
        Ok(_) => println!("Configuration saved successfully"),
        Err(e) => {
            return Err(format!("Configuration validation failed: {e}").into());
        }
    }

    Ok(())
}
