//! Project-wide constants used across multiple modules.

/// Spinner animation characters for progress indicators
pub const SPINNER_CHARS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Audio file extensions picked up by the scan
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "m4a", "mp4", "ogg", "opus"];

/// Prefix of the scratch file a copy is written to before it is renamed
pub const TEMP_FILE_PREFIX: &str = ".tunetag-tmp-";
