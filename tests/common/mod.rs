/*!
 * Common test utilities for the babelfill test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use babelfill::app_config::Config;

// Re-export the mock collaborators
pub mod mocks;

/// Catalog as written by the init step for a fresh language
pub const SAMPLE_CATALOG: &str = r#"# French translations for demo.
msgid ""
msgstr ""
"Project-Id-Version: demo 1.0\n"
"Content-Type: text/plain; charset=utf-8\n"

#: app/views.py:12
msgid "Hello world"
msgstr ""

#: app/views.py:20
#, fuzzy
msgid ""
"Welcome to "
"the dashboard"
msgstr ""
"#;

/// Routes library logging to the test output; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Configuration whose application lives inside `root`
pub fn config_in(root: &Path) -> Config {
    let mut config = Config::default();
    config.app_name = "demo".to_string();
    config.translations_dir = Some(root.join("translations").to_string_lossy().into_owned());
    config.language_config_path = Some(root.join("languages.json").to_string_lossy().into_owned());
    config.template_path = root.join("messages.pot").to_string_lossy().into_owned();
    config
}

/// Writes an application language file listing `codes` plus the default `en`
pub fn write_language_config(root: &Path, codes: &[&str]) -> Result<PathBuf> {
    let mut languages = serde_json::Map::new();
    languages.insert("en".to_string(), serde_json::Value::from("English"));
    for code in codes {
        languages.insert(code.to_string(), serde_json::Value::from(code.to_uppercase()));
    }
    let content = serde_json::json!({ "LANGUAGES": languages, "LANGUAGE_DEFAULT": "en" });
    create_test_file(root, "languages.json", &content.to_string())
}
