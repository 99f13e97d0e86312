/*!
 * Error types for the sql-localizer library.
 *
 * Missing translations are never errors: they are reported through the
 * `resource_not_found` flag of a `LocalizedString`. The types here cover
 * record store failures, configuration problems and operations the
 * database localizer deliberately does not offer.
 */

use thiserror::Error;

/// Localizer operations that are intentionally not implemented
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedOperation {
    /// Enumerating every string of a resource
    #[error("Enumerating all strings is not supported by the database localizer")]
    AllStrings,

    /// Creating a localizer bound to a different culture
    #[error("Overriding the culture of a localizer is not supported; use get_with_culture instead")]
    WithCulture,
}

/// Main error type of the localization layer
#[derive(Error, Debug)]
pub enum LocalizationError {
    /// Failure reported by the record store
    #[error("Record store error: {0}")]
    Store(String),

    /// Invalid or inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed culture name supplied at configuration time
    #[error("Invalid culture: {0}")]
    InvalidCulture(String),

    /// Operation the localizer does not support
    #[error("Unsupported operation: {0}")]
    Unsupported(#[from] UnsupportedOperation),
}

impl LocalizationError {
    /// Whether this error originated in the record store
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

// Store and repository code reports through anyhow; keep the context chain
impl From<anyhow::Error> for LocalizationError {
    fn from(error: anyhow::Error) -> Self {
        Self::Store(format!("{:#}", error))
    }
}
