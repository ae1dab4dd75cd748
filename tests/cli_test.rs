mod common;

use common::{MockServer, Route, silent_mp3};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary with a private config dir and `dir` as working directory.
fn tunetag(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tunetag"))
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("OPENAI_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .output()
        .expect("run tunetag")
}

#[test]
fn test_unreachable_ollama_aborts_before_copying() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("input");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("03 - Tum Hi Ho.mp3"), silent_mp3()).unwrap();
    let output = temp.path().join("output");

    let server = MockServer::start(vec![Route::new("GET", "/api/tags", 500, "{}")]);

    let result = tunetag(
        temp.path(),
        &[
            "run",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--provider",
            "ollama",
            "--ollama-url",
            &server.url,
        ],
    );

    assert_eq!(result.status.code(), Some(1));
    assert!(!output.exists());
    assert!(server.requests_to("/api/generate").is_empty());
    let stderr = String::from_utf8_lossy(&result.stderr).to_lowercase();
    assert!(stderr.contains("unreachable"), "stderr: {stderr}");
}

#[test]
fn test_missing_api_key_is_fatal() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("input");
    fs::create_dir(&input).unwrap();
    let output = temp.path().join("output");

    let result = tunetag(
        temp.path(),
        &[
            "run",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-p",
            "openai",
        ],
    );

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("OPENAI_API_KEY"));
    assert!(!output.exists());
}

#[test]
fn test_config_set_then_view() {
    let temp = TempDir::new().unwrap();

    let init = tunetag(temp.path(), &["init", "--yes"]);
    assert!(init.status.success());
    assert!(temp.path().join("config/tunetag/config.toml").exists());

    let set = tunetag(temp.path(), &["config", "set", "provider", "gemini"]);
    assert!(set.status.success());

    let view = tunetag(temp.path(), &["config", "view"]);
    let stdout = String::from_utf8_lossy(&view.stdout);
    assert!(stdout.contains("provider: gemini"), "stdout: {stdout}");

    let bad = tunetag(temp.path(), &["config", "set", "overwrite", "maybe"]);
    assert_eq!(bad.status.code(), Some(1));
}

#[test]
fn test_inspect_untagged_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("03 - Tum Hi Ho.mp3");
    fs::write(&file, silent_mp3()).unwrap();

    let result = tunetag(temp.path(), &["inspect", file.to_str().unwrap()]);

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Tum Hi Ho"));
    assert!(stdout.contains("TIT2"));
    assert!(stdout.contains("(not set)"));
}
