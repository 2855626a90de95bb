//! Language codes: validated identifiers for a project's languages.
//!
//! A `LanguageCode` is any short identifier the project author chooses
//! ("en", "es", "pt-BR", "zh_Hans"). Well-known ISO 639-1 codes also carry
//! display metadata for tooling.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Maximum accepted length of a language code.
const MAX_CODE_LEN: usize = 16;

/// A validated language code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a language code.
    ///
    /// # Errors
    /// Returns `CatalogError::InvalidLanguageCode` if the code is empty, too
    /// long, or contains anything other than ASCII letters, digits, `-` or `_`.
    /// Codes double as file names, so path separators are never allowed.
    pub fn new(code: &str) -> Result<Self, CatalogError> {
        let valid = !code.is_empty()
            && code.len() <= MAX_CODE_LEN
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(code.to_string()))
        } else {
            Err(CatalogError::InvalidLanguageCode(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// English name of the language, if it is a well-known code.
    pub fn name(&self) -> Option<&'static str> {
        known_language(&self.0).map(|info| info.name)
    }

    /// Native name of the language, if it is a well-known code.
    pub fn native_name(&self) -> Option<&'static str> {
        known_language(&self.0).map(|info| info.native_name)
    }

    /// Human-readable label for tooling, e.g. `"es (Español)"`.
    pub fn label(&self) -> String {
        match self.native_name() {
            Some(native) => format!("{} ({})", self.0, native),
            None => self.0.clone(),
        }
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = CatalogError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(&code)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl Hash for LanguageCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_str().hash(state);
    }
}

impl Borrow<str> for LanguageCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Display metadata for a well-known language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    /// ISO 639-1 language code (e.g., "en", "es")
    pub code: &'static str,

    /// English name of the language (e.g., "Spanish")
    pub name: &'static str,

    /// Native name of the language (e.g., "Español")
    pub native_name: &'static str,
}

impl LanguageInfo {
    const fn new(code: &'static str, name: &'static str, native_name: &'static str) -> Self {
        Self {
            code,
            name,
            native_name,
        }
    }
}

const KNOWN_LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo::new("en", "English", "English"),
    LanguageInfo::new("es", "Spanish", "Español"),
    LanguageInfo::new("fr", "French", "Français"),
    LanguageInfo::new("de", "German", "Deutsch"),
    LanguageInfo::new("it", "Italian", "Italiano"),
    LanguageInfo::new("pt", "Portuguese", "Português"),
    LanguageInfo::new("ru", "Russian", "Русский"),
    LanguageInfo::new("ja", "Japanese", "日本語"),
    LanguageInfo::new("ko", "Korean", "한국어"),
    LanguageInfo::new("zh", "Chinese", "中文"),
    LanguageInfo::new("tr", "Turkish", "Türkçe"),
];

/// Look up display metadata for a code. Region suffixes are ignored, so
/// `"pt-BR"` resolves to Portuguese.
pub fn known_language(code: &str) -> Option<&'static LanguageInfo> {
    let primary = code
        .split(['-', '_'])
        .next()
        .unwrap_or(code)
        .to_ascii_lowercase();
    KNOWN_LANGUAGES.iter().find(|info| info.code == primary)
}
