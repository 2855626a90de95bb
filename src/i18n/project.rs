//! Project descriptor: the set of languages a project supports.
//!
//! The descriptor names the project, its main (authoritative) language and
//! the ordered list of language codes shown in tooling.

use crate::error::{CatalogError, Result};
use crate::i18n::LanguageCode;
use serde::{Deserialize, Serialize};

/// Project descriptor as stored in `project.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageProject {
    /// Project identifier
    pub project_name: String,

    /// Language whose key set drives every other language
    pub main_language: LanguageCode,

    /// Supported languages in display order
    pub languages: Vec<LanguageCode>,
}

impl LanguageProject {
    /// Create a project with only its main language.
    pub fn new(project_name: impl Into<String>, main_language: LanguageCode) -> Self {
        Self {
            project_name: project_name.into(),
            languages: vec![main_language.clone()],
            main_language,
        }
    }

    /// Builder-style helper to add a language.
    ///
    /// # Errors
    /// Returns `CatalogError::DuplicateLanguage` if the code is already listed.
    pub fn with_language(mut self, code: LanguageCode) -> Result<Self> {
        self.add_language(code)?;
        Ok(self)
    }

    /// Parse a project descriptor and validate it.
    ///
    /// # Errors
    /// `CatalogError::Parse` for malformed JSON, `CatalogError::Config` if the
    /// descriptor is inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let project: Self =
            serde_json::from_str(json).map_err(|e| CatalogError::parse("project descriptor", e))?;
        project.validate()?;
        Ok(project)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Check the descriptor invariants.
    ///
    /// # Errors
    /// Returns `CatalogError::Config` if the language list is empty, contains
    /// duplicates, or does not include the main language.
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(CatalogError::Config(format!(
                "project '{}' has no languages",
                self.project_name
            )));
        }

        for (i, code) in self.languages.iter().enumerate() {
            if self.languages[..i].contains(code) {
                return Err(CatalogError::Config(format!(
                    "language '{}' is listed more than once",
                    code
                )));
            }
        }

        if !self.is_supported(self.main_language.as_str()) {
            return Err(CatalogError::Config(format!(
                "main language '{}' is not in the language list",
                self.main_language
            )));
        }

        Ok(())
    }

    /// Check whether a code is one of the project's languages.
    pub fn is_supported(&self, code: &str) -> bool {
        self.languages.iter().any(|lang| lang == code)
    }

    /// Look up a project language by code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageCode> {
        self.languages.iter().find(|lang| *lang == code)
    }

    /// Languages other than the main one, in display order.
    pub fn secondary_languages(&self) -> impl Iterator<Item = &LanguageCode> {
        self.languages
            .iter()
            .filter(move |lang| **lang != self.main_language)
    }

    pub(crate) fn add_language(&mut self, code: LanguageCode) -> Result<()> {
        if self.is_supported(code.as_str()) {
            return Err(CatalogError::DuplicateLanguage(code.to_string()));
        }
        self.languages.push(code);
        Ok(())
    }

    pub(crate) fn remove_language(&mut self, code: &str) -> Result<LanguageCode> {
        if self.main_language == code {
            return Err(CatalogError::Config(format!(
                "cannot remove main language '{}'",
                code
            )));
        }
        let index = self
            .languages
            .iter()
            .position(|lang| lang == code)
            .ok_or_else(|| CatalogError::UnknownLanguage(code.to_string()))?;
        Ok(self.languages.remove(index))
    }
}
