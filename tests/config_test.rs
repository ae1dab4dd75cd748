use tempfile::TempDir;
use tunetag::config::Config;
use tunetag::llm::ProviderKind;

#[test]
fn test_config_lifecycle() {
    let temp_dir = TempDir::new().unwrap();

    // Only test in this binary, so no other test races on the variable
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    assert!(!Config::exists().unwrap());

    // A missing file loads as defaults
    let config = Config::load().unwrap();
    assert_eq!(config, Config::default());
    config.save().unwrap();
    assert!(Config::exists().unwrap());

    let loaded = Config::load().unwrap();
    assert_eq!(loaded.provider, ProviderKind::Ollama);
    assert_eq!(loaded.batch_size, 10);
    assert!(loaded.mirror_subdirectories);

    let mut config = Config::load().unwrap();
    config.set_value("provider", "openai").unwrap();
    config.set_value("openai.model", "gpt-4o").unwrap();
    config.set_value("overwrite", "false").unwrap();
    config.save().unwrap();

    let reloaded = Config::load().unwrap();
    assert_eq!(reloaded.provider, ProviderKind::Openai);
    assert_eq!(reloaded.active_model(), "gpt-4o");
    assert!(!reloaded.overwrite);
    // API keys are not written unless set
    let raw = std::fs::read_to_string(Config::config_path().unwrap()).unwrap();
    assert!(!raw.contains("api_key"));

    let mut config = Config::load().unwrap();
    assert!(config.set_value("invalid_key", "value").is_err());
}
