/*!
 * Tests for configuration loading, validation and tool commands
 */

use anyhow::Result;
use std::path::PathBuf;
use babelfill::app_config::{Config, LogLevel, TranslationProvider};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.app_name, "default_app");
    assert_eq!(config.domain, "messages");
    assert_eq!(config.fallback_languages, vec!["fr", "de"]);
    assert!(config.remove_fuzzy);
    assert_eq!(config.tools.program, "pybabel");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that a partial file is completed with defaults
#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"app_name": "shop", "remove_fuzzy": false, "log_level": "debug"}"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.app_name, "shop");
    assert!(!config.remove_fuzzy);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.template_path, "messages.pot");
    assert_eq!(config.translations_dir(), PathBuf::from("shop").join("translations"));
    assert_eq!(config.language_config_path(), PathBuf::from("shop").join("languages.json"));
    Ok(())
}

/// Test that a saved configuration loads back identically
#[test]
fn test_save_thenLoad_shouldKeepValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("conf.json");

    let mut config = Config::default();
    config.fallback_languages = vec!["es".to_string(), "pt_BR".to_string()];
    config.translation.provider = TranslationProvider::Anthropic;
    config.translation.active_provider_config_mut().api_key = "sk-test".to_string();
    config.save(&path)?;

    let loaded = Config::load(&path)?;
    assert_eq!(loaded.fallback_languages, config.fallback_languages);
    assert_eq!(loaded.translation.provider, TranslationProvider::Anthropic);
    assert_eq!(loaded.translation.get_api_key(), "sk-test");
    Ok(())
}

/// Test loading a malformed file
#[test]
fn test_load_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withInvalidFallbackLanguage_shouldFail() {
    let mut config = Config::default();
    config.fallback_languages = vec!["fr".to_string(), "../etc".to_string()];
    assert!(config.validate().is_err());

    config.fallback_languages.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroToolTimeout_shouldFail() {
    let mut config = Config::default();
    config.tools.timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withAnthropicAndNoKey_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    assert!(config.validate().is_err());

    config.translation.active_provider_config_mut().api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());
}

/// Test provider-specific defaults
#[test]
fn test_translationConfig_withEmptyProviderFields_shouldUseProviderDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();

    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert!(!config.translation.get_model().is_empty());

    config.translation.provider = TranslationProvider::Anthropic;
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
    assert!(config.translation.get_api_key().is_empty());
}

#[test]
fn test_provider_fromStr_shouldAcceptLowercaseNames() {
    assert_eq!("ollama".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert_eq!("Anthropic".parse::<TranslationProvider>().unwrap(), TranslationProvider::Anthropic);
    assert!("openai".parse::<TranslationProvider>().is_err());
}

/// Test the tool invocations built from the configuration
#[test]
fn test_toolCommands_shouldUseConfiguredPaths() {
    let mut config = Config::default();
    config.app_name = "shop".to_string();
    let translations = PathBuf::from("shop").join("translations").to_string_lossy().into_owned();

    let extract = config.extract_command();
    assert_eq!(extract.program, "pybabel");
    assert_eq!(extract.args, vec!["extract", "-F", "babel.cfg", "-o", "messages.pot", "."]);

    let init = config.init_command("fr");
    assert_eq!(
        init.args,
        vec!["init", "-i", "messages.pot", "-d", translations.as_str(), "-D", "messages", "-l", "fr"]
    );

    let compile = config.compile_command();
    assert_eq!(compile.args, vec!["compile", "-d", translations.as_str(), "-D", "messages"]);

    assert_eq!(
        config.catalog_path("fr"),
        PathBuf::from("shop").join("translations").join("fr").join("LC_MESSAGES").join("messages.po")
    );
}
