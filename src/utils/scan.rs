//! Directory scanning for audio files.
//!
//! The walk is sequential and its result is sorted, so files are always
//! processed in the same order for the same tree.

use crate::constants::AUDIO_EXTENSIONS;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Check if a file or directory is hidden (starts with '.')
pub fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// True if `path` has one of the supported audio extensions, in any case.
pub fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

/// Collect every supported audio file below `dir`, sorted by path.
///
/// An unreadable `dir` is an error. Unreadable subdirectories are logged and
/// skipped so the rest of the tree is still returned.
pub fn collect_audio_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut files = Vec::new();
    scan_directory(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn Error>> {
    let entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;

    for entry in entries {
        let path = entry.path();

        if is_hidden_file(&path) {
            continue;
        }

        if path.is_dir() {
            if let Err(e) = scan_directory(&path, files) {
                log::warn!("Failed to scan directory '{}': {e}", path.display());
            }
        } else if path.is_file() && has_audio_extension(&path) {
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_hidden_file() {
        assert!(is_hidden_file(Path::new(".hidden")));
        assert!(is_hidden_file(Path::new("/path/.hidden")));
        assert!(!is_hidden_file(Path::new("visible")));
    }

    #[test]
    fn test_has_audio_extension() {
        assert!(has_audio_extension(Path::new("a.mp3")));
        assert!(has_audio_extension(Path::new("a.M4A")));
        assert!(has_audio_extension(Path::new("a.opus")));
        assert!(!has_audio_extension(Path::new("a.wav")));
        assert!(!has_audio_extension(Path::new("mp3")));
    }

    #[test]
    fn test_collect_audio_files_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = collect_audio_files(temp_dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_collect_audio_files_recursive_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("b_album")).unwrap();
        fs::create_dir_all(root.join("a_album/disc1")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::create_dir_all(root.join("temp")).unwrap();

        fs::write(root.join("z.flac"), b"fake").unwrap();
        fs::write(root.join("b_album/01.mp3"), b"fake").unwrap();
        fs::write(root.join("a_album/disc1/02.OGG"), b"fake").unwrap();
        fs::write(root.join("a_album/cover.jpg"), b"fake").unwrap();
        fs::write(root.join(".hidden.mp3"), b"fake").unwrap();
        fs::write(root.join(".cache/x.mp3"), b"fake").unwrap();
        fs::write(root.join("temp/y.mp3"), b"fake").unwrap();

        let files = collect_audio_files(root).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a_album/disc1/02.OGG"),
                PathBuf::from("b_album/01.mp3"),
                PathBuf::from("temp/y.mp3"),
                PathBuf::from("z.flac"),
            ]
        );
    }

    #[test]
    fn test_collect_audio_files_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(collect_audio_files(&temp_dir.path().join("missing")).is_err());
    }
}
