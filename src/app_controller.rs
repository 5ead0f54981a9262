use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::catalog::{CatalogRewriter, RewriteOptions, RewriteStats};
use crate::errors::{CatalogError, PipelineError};
use crate::language_resolver::{AppConfigLanguageSource, LanguageResolver, LanguageSource};
use crate::language_utils;
use crate::tool_runner::{ProcessToolRunner, ToolCommand, ToolOutput, ToolRunner};
use crate::translation::{TranslationService, Translator};

// @module: Pipeline driver running extract, per-language translation and compile

/// A catalog that was translated and replaced
#[derive(Debug, Clone)]
pub struct ProcessedCatalog {
    pub language: String,
    pub path: PathBuf,
    pub stats: RewriteStats,
}

/// Outcome of a successful run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Catalogs rewritten, in processing order
    pub processed: Vec<ProcessedCatalog>,
    /// Recoverable failures, in the order they happened
    pub warnings: Vec<PipelineError>,
}

impl RunReport {
    /// Languages that were skipped because init or translation failed
    pub fn skipped_languages(&self) -> Vec<&str> {
        self.warnings.iter().filter_map(PipelineError::language).collect()
    }

    /// Languages whose catalogs were rewritten
    pub fn processed_languages(&self) -> Vec<&str> {
        self.processed.iter().map(|p| p.language.as_str()).collect()
    }
}

/// Main application controller for catalog translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    runner: Arc<dyn ToolRunner>,
    translator: Arc<dyn Translator>,
    languages: Arc<dyn LanguageSource>,
}

impl Controller {
    /// Create a controller from explicit collaborators
    pub fn new(
        config: Config,
        runner: Arc<dyn ToolRunner>,
        translator: Arc<dyn Translator>,
        languages: Arc<dyn LanguageSource>,
    ) -> Self {
        Self {
            config,
            runner,
            translator,
            languages,
        }
    }

    // @method: Create a controller wired to the real tools, provider and language file
    pub fn with_config(config: Config) -> Result<Self> {
        let runner = Arc::new(ProcessToolRunner::new(Duration::from_secs(config.tools.timeout_secs)));
        let translator = Arc::new(TranslationService::new(config.translation.clone())?);
        let languages = Arc::new(AppConfigLanguageSource::new(config.language_config_path()));
        Ok(Self::new(config, runner, translator, languages))
    }

    /// Replace the language source, e.g. with languages given on the command line
    pub fn with_languages(mut self, languages: Arc<dyn LanguageSource>) -> Self {
        self.languages = languages;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole pipeline
    ///
    /// Only extract and compile failures are returned as errors; per-language
    /// failures are logged and collected in the report.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let start_time = Instant::now();
        let mut report = RunReport::default();

        info!("Extracting messages into {}", self.config.template_path);
        let extract = self.run_tool(&self.config.extract_command()).await;
        if !extract.success() {
            return Err(PipelineError::ExtractionFailed(extract.describe_failure()));
        }

        let resolution = LanguageResolver::new(self.config.fallback_languages.clone()).resolve(self.languages.as_ref());
        report.warnings.extend(resolution.warning);
        info!("Languages to translate: {}", resolution.languages.join(", "));

        let progress_bar = ProgressBar::new(resolution.languages.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} languages {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=> "));

        for language in &resolution.languages {
            progress_bar.set_message(language_utils::display_name(language));
            match self.process_language(language).await {
                Ok(processed) => report.processed.push(processed),
                Err(error) => {
                    progress_bar.suspend(|| warn!("{}", error));
                    report.warnings.push(error);
                }
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        info!("Compiling catalogs in {:?}", self.config.translations_dir());
        let compile = self.run_tool(&self.config.compile_command()).await;
        if !compile.success() {
            return Err(PipelineError::CompilationFailed(compile.describe_failure()));
        }

        info!(
            "Translated {} of {} language(s) in {:.1}s",
            report.processed.len(),
            resolution.languages.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(report)
    }

    /// Init one language and translate its catalog
    async fn process_language(&self, language: &str) -> Result<ProcessedCatalog, PipelineError> {
        let init = self.run_tool(&self.config.init_command(language)).await;
        if !init.success() {
            return Err(PipelineError::LanguageInitFailed {
                language: language.to_string(),
                reason: init.describe_failure(),
            });
        }

        let path = self.config.catalog_path(language);
        let stats = self
            .translate_catalog(&path, language)
            .await
            .map_err(|source| PipelineError::TranslationUnavailable {
                language: language.to_string(),
                source,
            })?;

        info!(
            "{}: translated {} entries, removed {} fuzzy markers",
            language, stats.entries_translated, stats.fuzzy_removed
        );
        Ok(ProcessedCatalog {
            language: language.to_string(),
            path,
            stats,
        })
    }

    /// Translate a single catalog in place without running any external tool
    pub async fn translate_catalog(&self, path: &Path, language: &str) -> Result<RewriteStats, CatalogError> {
        let options = RewriteOptions {
            remove_fuzzy: self.config.remove_fuzzy,
        };
        CatalogRewriter::new(self.translator.as_ref(), language, options)
            .rewrite_file(path)
            .await
    }

    async fn run_tool(&self, command: &ToolCommand) -> ToolOutput {
        let output = self.runner.run(command).await;
        if !output.stdout.trim().is_empty() {
            debug!("{} stdout:\n{}", command, output.stdout.trim_end());
        }
        if !output.success() && !output.stderr.trim().is_empty() {
            debug!("{} stderr:\n{}", command, output.stderr.trim_end());
        }
        output
    }
}
