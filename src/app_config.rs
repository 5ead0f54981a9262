use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;
use crate::language_utils;
use crate::tool_runner::ToolCommand;

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Name of the application package; also the root of its translations
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Gettext domain, i.e. the catalog file stem
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Template written by the extract step and read by the init step
    #[serde(default = "default_template_path")]
    pub template_path: String,

    /// Extractor mapping file passed to the extract step
    #[serde(default = "default_extractor_config")]
    pub extractor_config: String,

    /// Source tree scanned by the extract step
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Catalog directory (defaults to `<app_name>/translations`)
    #[serde(default)]
    pub translations_dir: Option<String>,

    /// Application language configuration (defaults to `<app_name>/languages.json`)
    #[serde(default)]
    pub language_config_path: Option<String>,

    /// Languages processed when the application configuration is unusable
    #[serde(default = "default_fallback_languages")]
    pub fallback_languages: Vec<String>,

    /// Drop `#, fuzzy` markers while rewriting catalogs
    #[serde(default = "default_true")]
    pub remove_fuzzy: bool,

    /// External catalog tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// External catalog tool settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolsConfig {
    /// Executable providing the `extract`, `init` and `compile` subcommands
    #[serde(default = "default_tool_program")]
    pub program: String,

    /// Maximum run time of one tool invocation
    #[serde(default = "default_tool_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            program: default_tool_program(),
            timeout_secs: default_tool_timeout_secs(),
        }
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    #[default]
    Ollama,
    Anthropic,
}

impl TranslationProvider {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
        }
    }

    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    /// Whether the provider needs an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Anthropic)
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(rename = "type")]
    pub provider_type: String,

    #[serde(default = "String::new")]
    pub model: String,

    #[serde(default = "String::new")]
    pub api_key: String,

    #[serde(default = "String::new")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                timeout_secs: default_anthropic_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholders: {target_language}, {target_code}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_app_name() -> String {
    "default_app".to_string()
}

fn default_domain() -> String {
    "messages".to_string()
}

fn default_template_path() -> String {
    "messages.pot".to_string()
}

fn default_extractor_config() -> String {
    "babel.cfg".to_string()
}

fn default_source_dir() -> String {
    ".".to_string()
}

fn default_fallback_languages() -> Vec<String> {
    vec!["fr".to_string(), "de".to_string()]
}

fn default_tool_program() -> String {
    "pybabel".to_string()
}

fn default_tool_timeout_secs() -> u64 {
    300
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_anthropic_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional software localizer. Translate the user's text into {target_language}. \
     Reply with the translation only, on a single line, keeping placeholders such as %(name)s, {0} and HTML tags unchanged."
        .to_string()
}

impl Config {
    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        FileManager::write_to_file(path, &json)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(anyhow!("app_name must not be empty"));
        }

        if self.fallback_languages.is_empty() {
            return Err(anyhow!("fallback_languages must list at least one language"));
        }
        for code in &self.fallback_languages {
            language_utils::validate_locale(code).with_context(|| format!("Invalid fallback language: {}", code))?;
        }

        if self.tools.program.trim().is_empty() {
            return Err(anyhow!("tools.program must not be empty"));
        }
        if self.tools.timeout_secs == 0 {
            return Err(anyhow!("tools.timeout_secs must be greater than zero"));
        }

        if self.translation.provider.requires_api_key() && self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                self.translation.provider.display_name()
            ));
        }

        Ok(())
    }

    /// Directory holding `<lang>/LC_MESSAGES/<domain>.po`
    pub fn translations_dir(&self) -> PathBuf {
        match &self.translations_dir {
            Some(dir) => PathBuf::from(dir),
            None => Path::new(&self.app_name).join("translations"),
        }
    }

    /// Location of the application's language configuration
    pub fn language_config_path(&self) -> PathBuf {
        match &self.language_config_path {
            Some(path) => PathBuf::from(path),
            None => Path::new(&self.app_name).join("languages.json"),
        }
    }

    /// Catalog file of one language
    pub fn catalog_path(&self, language: &str) -> PathBuf {
        FileManager::catalog_path(self.translations_dir(), language, &self.domain)
    }

    /// `<program> extract -F <extractor_config> -o <template_path> <source_dir>`
    pub fn extract_command(&self) -> ToolCommand {
        ToolCommand::new(&self.tools.program)
            .arg("extract")
            .arg("-F")
            .arg(&self.extractor_config)
            .arg("-o")
            .arg(&self.template_path)
            .arg(&self.source_dir)
    }

    /// `<program> init -i <template_path> -d <translations_dir> -D <domain> -l <language>`
    pub fn init_command(&self, language: &str) -> ToolCommand {
        ToolCommand::new(&self.tools.program)
            .arg("init")
            .arg("-i")
            .arg(&self.template_path)
            .arg("-d")
            .arg(self.translations_dir().to_string_lossy())
            .arg("-D")
            .arg(&self.domain)
            .arg("-l")
            .arg(language)
    }

    /// `<program> compile -d <translations_dir> -D <domain>`
    pub fn compile_command(&self) -> ToolCommand {
        ToolCommand::new(&self.tools.program)
            .arg("compile")
            .arg("-d")
            .arg(self.translations_dir().to_string_lossy())
            .arg("-D")
            .arg(&self.domain)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            app_name: default_app_name(),
            domain: default_domain(),
            template_path: default_template_path(),
            extractor_config: default_extractor_config(),
            source_dir: default_source_dir(),
            translations_dir: None,
            language_config_path: None,
            fallback_languages: default_fallback_languages(),
            remove_fuzzy: true,
            tools: ToolsConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, created on demand
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(provider_config) if provider_config.timeout_secs > 0 => provider_config.timeout_secs,
            _ => match self.provider {
                TranslationProvider::Ollama => default_timeout_secs(),
                TranslationProvider::Anthropic => default_anthropic_timeout_secs(),
            },
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Anthropic),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
