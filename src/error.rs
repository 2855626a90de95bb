//! Error types for catalog loading, lookup and editing.

use thiserror::Error;

/// Errors raised by the language catalog and its editor.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed table or project JSON
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// Project descriptor is inconsistent (e.g. main language not listed)
    #[error("invalid project configuration: {0}")]
    Config(String),

    /// Language switch or edit targeting a code outside the project
    #[error("unknown language: '{0}'")]
    UnknownLanguage(String),

    /// Expected language or project file is absent
    #[error("missing file: {0}")]
    MissingFile(String),

    /// Key already present in the main-language table
    #[error("key '{0}' already exists")]
    DuplicateKey(String),

    #[error("language '{0}' already exists in the project")]
    DuplicateLanguage(String),

    #[error("key '{0}' does not exist")]
    UnknownKey(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid language code: '{0}'")]
    InvalidLanguageCode(String),

    /// Main-language text cannot be changed through an edit
    #[error("main language '{0}' cannot be edited; delete and re-add the key instead")]
    MainLanguageImmutable(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub(crate) fn parse(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            what: what.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_language_message() {
        let err = CatalogError::UnknownLanguage("fr".to_string());
        assert_eq!(err.to_string(), "unknown language: 'fr'");
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CatalogError::parse("table 'es'", source);
        assert!(err.to_string().starts_with("failed to parse table 'es'"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_main_language_immutable_message() {
        let err = CatalogError::MainLanguageImmutable("en".to_string());
        assert!(err.to_string().contains("'en'"));
    }
}
