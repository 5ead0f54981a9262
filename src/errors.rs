/*!
 * Error types for the babelfill application.
 *
 * Component errors (providers, translation, catalog rewriting) are typed with
 * thiserror and bubble up unchanged. `PipelineError` is the taxonomy the
 * pipeline driver works with: it is the only place where a failure is
 * classified as fatal or recoverable.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Map a non-success HTTP status and body onto the matching variant
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Whether sending the same request again may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::RequestFailed(_) | Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The backend could not produce a translation
    #[error("Translation unavailable: {0}")]
    Unavailable(#[from] ProviderError),
}

/// Errors that can occur while rewriting a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Reading the catalog, writing the temporary file or replacing the original failed
    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Translating the entry closed at `line` failed
    #[error("Translation failed for entry closed at line {line}: {source}")]
    Translation {
        /// 1-based line number of the `msgstr ""` placeholder
        line: usize,
        /// Underlying translation failure
        #[source]
        source: TranslationError,
    },
}

/// Failures the pipeline driver distinguishes
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The extract step did not succeed; the run is aborted
    #[error("Failed to extract messages: {0}")]
    ExtractionFailed(String),

    /// The compile step did not succeed; the run is aborted
    #[error("Failed to compile catalogs: {0}")]
    CompilationFailed(String),

    /// The init step failed for one language, which is skipped
    #[error("Failed to add language {language}: {reason}")]
    LanguageInitFailed {
        /// Language code that was skipped
        language: String,
        /// Tool diagnostics
        reason: String,
    },

    /// A catalog could not be translated, so it was left untouched
    #[error("Translation unavailable for language {language}: {source}")]
    TranslationUnavailable {
        /// Language code that was skipped
        language: String,
        /// Underlying rewrite failure
        #[source]
        source: CatalogError,
    },

    /// The application language configuration could not be read
    #[error("Language configuration unavailable: {0}")]
    ConfigurationUnavailable(String),
}

impl PipelineError {
    /// Whether this failure aborts the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ExtractionFailed(_) | Self::CompilationFailed(_))
    }

    /// Process exit status used when the run ends with this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ExtractionFailed(_) => 2,
            Self::CompilationFailed(_) => 3,
            _ => 1,
        }
    }

    /// Language the error refers to, when it is a per-language failure
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::LanguageInitFailed { language, .. }
            | Self::TranslationUnavailable { language, .. } => Some(language),
            _ => None,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the pipeline
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Error from catalog rewriting
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Pipeline(error) => error.exit_code(),
            _ => 1,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
