//! Show the canonical fields stored in one audio file.

use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;
use tunetag::enrich::clean_filename;
use tunetag::tags::{self, AudioFormat, Field};
use tunetag::utils::validation::validate_path_exists;

pub fn handle_inspect(file: &str) -> Result<(), Box<dyn Error>> {
    let expanded = shellexpand::tilde(file);
    let path = Path::new(expanded.as_ref());
    validate_path_exists(path)?;

    let format = AudioFormat::from_path(path).ok_or_else(|| {
        format!(
            "{} Unsupported audio format: {}",
            "Error:".red().bold(),
            path.display()
        )
    })?;
    let handle = tags::open(path, format)?;

    println!("{} {}", path.display().cyan(), format!("[{format}]").bright_black());
    if let Some(name) = path.file_name() {
        println!(
            "  {} {}",
            "Song name from filename:".bright_black(),
            clean_filename(&name.to_string_lossy())
        );
    }

    for field in Field::ALL {
        let key = format.native_key(field);
        match tags::read_field(&handle, format, field) {
            Some(value) => println!("  {:<10} {:<6} {}", field.name(), key.bright_black(), value),
            None => println!(
                "  {:<10} {:<6} {}",
                field.name(),
                key.bright_black(),
                "(not set)".bright_black()
            ),
        }
    }
    Ok(())
}
