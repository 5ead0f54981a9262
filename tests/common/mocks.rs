/*!
 * Mock collaborators for testing
 *
 * These stand in for the translation backend and the external catalog tool
 * so that no network request or child process is made in tests. Both record
 * every call they receive.
 */

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use babelfill::app_config::Config;
use babelfill::errors::{ProviderError, TranslationError};
use babelfill::file_utils::FileManager;
use babelfill::tool_runner::{ToolCommand, ToolOutput, ToolRunner};
use babelfill::translation::Translator;

/// Dictionary-backed translator
#[derive(Debug, Default)]
pub struct MockTranslator {
    dictionary: HashMap<(String, String), String>,
    failing_languages: HashSet<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate `source` into `translation` for `language`
    pub fn with_entry(mut self, language: &str, source: &str, translation: &str) -> Self {
        self.dictionary
            .insert((language.to_string(), source.to_string()), translation.to_string());
        self
    }

    /// Make every request for `language` fail like an unreachable backend
    pub fn failing_for(mut self, language: &str) -> Self {
        self.failing_languages.insert(language.to_string());
        self
    }

    /// `(text, language)` pairs received so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts received for non-empty entries
    pub fn translated_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|(text, _)| text)
            .filter(|text| !text.is_empty())
            .collect()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), target_language.to_string()));

        if self.failing_languages.contains(target_language) {
            return Err(ProviderError::ConnectionError("mock backend offline".to_string()).into());
        }
        if text.is_empty() {
            return Ok(String::new());
        }

        let key = (target_language.to_string(), text.to_string());
        Ok(self
            .dictionary
            .get(&key)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target_language, text)))
    }
}

/// Fake catalog tool
///
/// A successful `init` writes `catalog` to the language's catalog path so
/// the rewriter has something to work on.
pub struct MockToolRunner {
    config: Config,
    catalog: String,
    failing: HashSet<String>,
    calls: Mutex<Vec<ToolCommand>>,
}

impl MockToolRunner {
    pub fn new(config: &Config, catalog: &str) -> Self {
        Self {
            config: config.clone(),
            catalog: catalog.to_string(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail a step: `"extract"`, `"compile"` or `"init:<lang>"`
    pub fn failing(mut self, step: &str) -> Self {
        self.failing.insert(step.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Steps run so far, in the `"init:<lang>"` notation
    pub fn steps(&self) -> Vec<String> {
        self.calls().iter().map(step_name).collect()
    }
}

fn step_name(command: &ToolCommand) -> String {
    let subcommand = command.subcommand().unwrap_or_default();
    if subcommand == "init" {
        let language = command
            .args
            .iter()
            .position(|arg| arg == "-l")
            .and_then(|i| command.args.get(i + 1))
            .cloned()
            .unwrap_or_default();
        format!("init:{}", language)
    } else {
        subcommand.to_string()
    }
}

#[async_trait]
impl ToolRunner for MockToolRunner {
    async fn run(&self, command: &ToolCommand) -> ToolOutput {
        self.calls.lock().unwrap().push(command.clone());

        let step = step_name(command);
        if self.failing.contains(&step) {
            return ToolOutput {
                exit_code: Some(1),
                stdout: String::new(),
                stderr: format!("{} failed", step),
            };
        }

        if let Some(language) = step.strip_prefix("init:") {
            let path = self.config.catalog_path(language);
            if let Err(e) = FileManager::write_to_file(&path, &self.catalog) {
                return ToolOutput {
                    exit_code: Some(1),
                    stdout: String::new(),
                    stderr: e.to_string(),
                };
            }
        }

        ToolOutput {
            exit_code: Some(0),
            ..Default::default()
        }
    }
}
