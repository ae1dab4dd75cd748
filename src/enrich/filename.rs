use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[\s_\-.]+").expect("valid regex"));
static LEADING_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[.*?\][\s_\-.]*").expect("valid regex"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\-.]+").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Derive a song name from a file name.
///
/// `"03 - Tum Hi Ho.mp3"` becomes `"Tum Hi Ho"`, `"[HD] the_long-road.flac"`
/// becomes `"the long road"`.
pub fn clean_filename(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let name = LEADING_NUMBER.replace(stem, "");
    let name = LEADING_BRACKET.replace(&name, "");
    let name = SEPARATORS.replace_all(&name, " ");
    let name = WHITESPACE.replace_all(&name, " ");
    name.trim().to_string()
}
