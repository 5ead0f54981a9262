/*!
 * Resolution of the languages to process in a run.
 *
 * The application describes its languages in a JSON file shaped like its
 * own configuration object:
 *
 * ```json
 * { "LANGUAGES": { "en": "English", "fr": "Français" }, "LANGUAGE_DEFAULT": "en" }
 * ```
 *
 * Every configured language except the default one is processed, in file
 * order. Any problem with that file resolves to the configured fallback list
 * instead of failing the run.
 */

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::language_utils;

/// Result of consulting a language source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageLookup {
    /// Languages to translate into, in processing order
    Found(Vec<String>),
    /// The source could not be used; carries the reason
    Unavailable(String),
}

/// A place languages can be looked up from
pub trait LanguageSource: Send + Sync {
    fn lookup(&self) -> LanguageLookup;
}

#[derive(Debug, Deserialize)]
struct AppLanguages {
    #[serde(rename = "LANGUAGES")]
    languages: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "LANGUAGE_DEFAULT")]
    default_language: String,
}

/// Parse an application language file into the codes to process
pub fn parse_language_config(content: &str) -> Result<Vec<String>> {
    let config: AppLanguages = serde_json::from_str(content).context("Malformed language configuration")?;

    let mut codes = Vec::with_capacity(config.languages.len());
    for (code, name) in &config.languages {
        if !name.is_string() {
            return Err(anyhow!("Display name of {} is not a string", code));
        }
        language_utils::validate_locale(code)?;
        if *code != config.default_language {
            codes.push(code.clone());
        }
    }

    Ok(codes)
}

/// Language file of the application being translated
#[derive(Debug, Clone)]
pub struct AppConfigLanguageSource {
    path: PathBuf,
}

impl AppConfigLanguageSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LanguageSource for AppConfigLanguageSource {
    fn lookup(&self) -> LanguageLookup {
        let result = FileManager::read_to_string(&self.path).and_then(|content| parse_language_config(&content));
        match result {
            Ok(codes) => {
                debug!("Loaded {} language(s) from {:?}", codes.len(), self.path);
                LanguageLookup::Found(codes)
            }
            Err(e) => LanguageLookup::Unavailable(format!("{:#}", e)),
        }
    }
}

/// Fixed list of languages, e.g. given on the command line
#[derive(Debug, Clone)]
pub struct StaticLanguageSource(pub Vec<String>);

impl LanguageSource for StaticLanguageSource {
    fn lookup(&self) -> LanguageLookup {
        LanguageLookup::Found(self.0.clone())
    }
}

/// Languages chosen for a run
#[derive(Debug)]
pub struct LanguageResolution {
    pub languages: Vec<String>,
    /// Set when the fallback list had to be used
    pub warning: Option<PipelineError>,
}

/// Resolves the run's languages, never failing
#[derive(Debug, Clone)]
pub struct LanguageResolver {
    fallback: Vec<String>,
}

impl LanguageResolver {
    pub fn new(fallback: Vec<String>) -> Self {
        Self { fallback }
    }

    pub fn resolve(&self, source: &dyn LanguageSource) -> LanguageResolution {
        match source.lookup() {
            LanguageLookup::Found(languages) => LanguageResolution {
                languages: dedup(languages),
                warning: None,
            },
            LanguageLookup::Unavailable(reason) => {
                let languages = dedup(self.fallback.clone());
                warn!(
                    "Suitable config not found ({}), using default languages: {}",
                    reason,
                    languages.join(", ")
                );
                LanguageResolution {
                    languages,
                    warning: Some(PipelineError::ConfigurationUnavailable(reason)),
                }
            }
        }
    }
}

impl Default for LanguageResolver {
    fn default() -> Self {
        Self::new(vec!["fr".to_string(), "de".to_string()])
    }
}

fn dedup(languages: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(languages.len());
    for language in languages {
        if !seen.contains(&language) {
            seen.push(language);
        }
    }
    seen
}
