//! Error taxonomy for the language identification library.
//!
//! Only `Configuration` is fatal, and only during service initialization.
//! Everything else is per-record or per-request and degrades the result
//! rather than failing the caller: invalid or tampered catalogue records are
//! skipped, adapter timeouts become abstentions, and cache faults become
//! misses.

use thiserror::Error;

/// Errors surfaced by the language catalogue and detection service.
#[derive(Debug, Error)]
pub enum LanguageError {
    /// Fatal: the service cannot start (e.g., zero usable languages after
    /// loading and defaults, or a missing integrity key at a strict level).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A catalogue record failed field validation. The record is discarded
    /// and the load continues.
    #[error("invalid language record '{code}': {reason}")]
    Validation { code: String, reason: String },

    /// A catalogue record failed its integrity check. Treated as tampering;
    /// the record is discarded.
    #[error("integrity check failed for language record '{code}'")]
    Integrity { code: String },

    /// The configuration source could not be read or parsed.
    #[error("configuration source error: {0}")]
    Source(String),

    /// A caller asked for a language the catalogue does not contain.
    #[error("unknown language code: '{0}'")]
    UnknownLanguage(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LanguageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = LanguageError::Validation {
            code: "xx".to_string(),
            reason: "missing name".to_string(),
        };
        assert_eq!(err.to_string(), "invalid language record 'xx': missing name");

        let err = LanguageError::Integrity {
            code: "en".to_string(),
        };
        assert!(err.to_string().contains("integrity"));

        let err = LanguageError::UnknownLanguage("zz".to_string());
        assert!(err.to_string().contains("zz"));
    }

    #[test]
    fn test_configuration_error_is_distinct() {
        let err = LanguageError::Configuration("no languages".to_string());
        assert!(matches!(err, LanguageError::Configuration(_)));
    }
}
