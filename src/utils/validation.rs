//! Path validation shared by the run driver and the CLI handlers.

use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;

/// Validate that a path exists and return an error if it doesn't.
pub fn validate_path_exists(path: &Path) -> Result<(), Box<dyn Error>> {
    if !path.exists() {
        return Err(format!(
            "{} Path does not exist: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }
    Ok(())
}

/// Validate that a path exists and is a directory.
pub fn validate_directory(path: &Path) -> Result<(), Box<dyn Error>> {
    validate_path_exists(path)?;
    if !path.is_dir() {
        return Err(format!(
            "{} Not a directory: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }
    Ok(())
}
