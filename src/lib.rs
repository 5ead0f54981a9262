/*!
 * # babelfill - machine translation for gettext catalogs
 *
 * A Rust library that fills the empty `msgstr` entries of an application's
 * gettext catalogs with machine translations.
 *
 * ## Features
 *
 * - Extract messages into a template and initialise one catalog per language
 *   with an external catalog tool (`pybabel` by default)
 * - Translate every empty entry using an AI provider:
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - Rewrite catalogs line by line, byte-identical outside translated entries,
 *   and replace them atomically
 * - Optionally drop `#, fuzzy` markers
 * - Read the target languages from the application's own configuration, with
 *   a fallback list when it is unavailable
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `catalog`: Line classification, source accumulation and catalog rewriting
 * - `translation`: The `Translator` seam and the provider-backed service
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::anthropic`: Anthropic API client
 * - `language_resolver`: Choice of the languages to process
 * - `tool_runner`: Invocation of the external catalog tool
 * - `app_controller`: Pipeline driver
 * - `language_utils`: Locale validation and language names
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod catalog;
pub mod errors;
pub mod file_utils;
pub mod language_resolver;
pub mod language_utils;
pub mod providers;
pub mod tool_runner;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunReport};
pub use catalog::{CatalogRewriter, RewriteOptions, RewriteStats};
pub use errors::{AppError, CatalogError, PipelineError, ProviderError, TranslationError};
pub use language_resolver::{LanguageResolver, LanguageSource};
pub use tool_runner::{ToolCommand, ToolOutput, ToolRunner};
pub use translation::{TranslationService, Translator};
