//! Translation quality validation.
//!
//! Checks that translations keep the `{placeholder}` tokens of the main
//! language text, flags untranslated values, and audits a whole catalog for
//! keys that drifted out of alignment with the main language.

use crate::i18n::LanguageCatalog;
use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing errors and warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that break lookups (e.g., missing keys)
    pub errors: Vec<String>,

    /// Problems worth fixing that lookups tolerate
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    fn merge_prefixed(&mut self, prefix: &str, other: ValidationReport) {
        self.errors
            .extend(other.errors.into_iter().map(|e| format!("{}: {}", prefix, e)));
        self.warnings
            .extend(other.warnings.into_iter().map(|w| format!("{}: {}", prefix, w)));
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation quality.
pub struct TranslationValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Validate one translation against its main-language text.
    ///
    /// An empty translation and a placeholder set that differs from the
    /// original are both reported as warnings.
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        if translated.is_empty() {
            if !original.is_empty() {
                report.warnings.push("Empty translation".to_string());
            }
            return report;
        }

        let orig_placeholders = Self::extract_placeholders(original);
        let trans_placeholders = Self::extract_placeholders(translated);
        if orig_placeholders != trans_placeholders {
            report.warnings.push(format!(
                "Placeholder mismatch: original has {:?}, translation has {:?}",
                orig_placeholders, trans_placeholders
            ));
        }

        report
    }

    /// Audit every language of a catalog against the main language.
    ///
    /// Keys missing from a language are errors. Duplicate keys, keys that
    /// only exist outside the main language, empty translations and
    /// placeholder mismatches are warnings.
    pub fn validate_catalog(catalog: &LanguageCatalog) -> ValidationReport {
        let mut report = ValidationReport::new();
        let main_table = catalog.main_table();

        for code in catalog.languages() {
            let Some(table) = catalog.table(code.as_str()) else {
                continue;
            };

            for duplicate in table.duplicate_keys() {
                report.warnings.push(format!(
                    "[{}] Key '{}' is defined more than once",
                    code, duplicate
                ));
            }

            if code == catalog.main_language() {
                continue;
            }

            for key in main_table.keys() {
                let original = main_table.lookup(key).unwrap_or_default();
                match table.lookup(key) {
                    Some(translated) => report.merge_prefixed(
                        &format!("[{}] '{}'", code, key),
                        Self::validate(original, translated),
                    ),
                    None => report
                        .errors
                        .push(format!("[{}] Missing key '{}'", code, key)),
                }
            }

            for key in table.keys() {
                if !main_table.contains_key(key) {
                    report.warnings.push(format!(
                        "[{}] Key '{}' does not exist in the main language",
                        code, key
                    ));
                }
            }
        }

        report
    }

    /// Extract `{name}` placeholders, sorted so order changes are allowed.
    fn extract_placeholders(text: &str) -> Vec<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| {
            Regex::new(r"\{[A-Za-z0-9_]*\}").expect("placeholder pattern is valid")
        });

        let mut placeholders: Vec<String> = regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        placeholders.sort();
        placeholders
    }
}
