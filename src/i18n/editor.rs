//! Editing operations over a catalog with every table loaded.
//!
//! The main language's key set is authoritative. Every edit leaves the other
//! languages key-aligned with it, using empty strings for keys nobody has
//! translated yet.

use crate::error::{CatalogError, Result};
use crate::i18n::{LanguageCatalog, LanguageCode, LanguageTable};
use crate::storage::TableStore;
use tracing::{info, warn};

/// Outcome of [`CatalogEditor::persist`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// Languages whose file was written
    pub written: Vec<LanguageCode>,

    /// Languages skipped because their table was empty
    pub skipped: Vec<LanguageCode>,

    /// Languages whose file was deleted after being removed from the project
    pub deleted: Vec<LanguageCode>,
}

/// One key across every language, as shown in an editing grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorRow {
    pub key: String,
    /// Values in project language order; missing values are empty
    pub values: Vec<(LanguageCode, String)>,
}

/// Editor wrapping a catalog.
#[derive(Debug)]
pub struct CatalogEditor {
    catalog: LanguageCatalog,
    removed: Vec<LanguageCode>,
}

impl CatalogEditor {
    pub fn new(catalog: LanguageCatalog) -> Self {
        Self {
            catalog,
            removed: Vec::new(),
        }
    }

    /// Load a project for editing and align every language with the main one.
    ///
    /// # Errors
    /// See [`LanguageCatalog::load`].
    pub fn load(store: &dyn TableStore) -> Result<Self> {
        let mut editor = Self::new(LanguageCatalog::load(store)?);
        let inserted = editor.sync();
        if inserted > 0 {
            info!("Added {} missing keys while loading", inserted);
        }
        Ok(editor)
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut LanguageCatalog {
        &mut self.catalog
    }

    pub fn into_catalog(self) -> LanguageCatalog {
        self.catalog
    }

    // ==================== Key Operations ====================

    /// Add a key with no translations.
    ///
    /// # Errors
    /// See [`add_key_with`](Self::add_key_with).
    pub fn add_key(&mut self, key: &str) -> Result<()> {
        self.add_key_with(key, Vec::<(String, String)>::new())
    }

    /// Add a key, optionally with translations per language code.
    ///
    /// The main language gets the key itself as its value unless a value is
    /// supplied for it. Other languages get the supplied translation or an
    /// empty string.
    ///
    /// # Errors
    /// - `CatalogError::InvalidKey` if the key is blank
    /// - `CatalogError::DuplicateKey` if the main table already has the key
    ///   (case-insensitive)
    /// - `CatalogError::UnknownLanguage` if a translation names a code outside
    ///   the project
    ///
    /// Nothing is modified when an error is returned.
    pub fn add_key_with<I, K, V>(&mut self, key: &str, translations: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        if key.trim().is_empty() {
            return Err(CatalogError::InvalidKey("key must not be blank".to_string()));
        }
        if self.catalog.main_table().contains_key(key) {
            return Err(CatalogError::DuplicateKey(key.to_string()));
        }
        let translations = self.check_translations(translations)?;

        let main = self.catalog.main_language().clone();
        for code in self.catalog.languages().to_vec() {
            let supplied = translations
                .iter()
                .find(|(lang, _)| *lang == code)
                .map(|(_, value)| value.clone());

            let Some(table) = self.catalog.table_mut(code.as_str()) else {
                continue;
            };
            match supplied {
                Some(value) => table.put(key, value),
                None if code == main => table.put(key, key),
                // Keep an orphaned translation if one is already there
                None if table.contains_key(key) => {}
                None => table.put(key, ""),
            }
        }

        info!("Added key '{}'", key);
        Ok(())
    }

    /// Update translations of an existing key.
    ///
    /// The main-language value cannot be changed here; renaming a key means
    /// deleting it and adding it again.
    ///
    /// # Errors
    /// - `CatalogError::UnknownKey` if the main table has no such key
    /// - `CatalogError::MainLanguageImmutable` if a translation targets the
    ///   main language
    /// - `CatalogError::UnknownLanguage` for codes outside the project
    ///
    /// Nothing is modified when an error is returned.
    pub fn edit_key<I, K, V>(&mut self, key: &str, translations: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        if !self.catalog.main_table().contains_key(key) {
            return Err(CatalogError::UnknownKey(key.to_string()));
        }
        let translations = self.check_translations(translations)?;
        let main = self.catalog.main_language();
        if let Some((code, _)) = translations.iter().find(|(code, _)| code == main) {
            return Err(CatalogError::MainLanguageImmutable(code.to_string()));
        }

        for (code, value) in translations {
            if let Some(table) = self.catalog.table_mut(code.as_str()) {
                table.put(key, value);
            }
        }

        info!("Edited key '{}'", key);
        Ok(())
    }

    /// Remove a key from every language.
    ///
    /// # Errors
    /// Returns `CatalogError::UnknownKey` if no language had the key.
    pub fn delete_key(&mut self, key: &str) -> Result<()> {
        let mut removed = false;
        for (_, table) in self.catalog.tables_mut() {
            removed |= table.remove(key);
        }

        if !removed {
            return Err(CatalogError::UnknownKey(key.to_string()));
        }
        info!("Deleted key '{}'", key);
        Ok(())
    }

    /// Insert empty placeholders so every language has every main key.
    ///
    /// Returns the number of placeholders inserted. Running it twice inserts
    /// nothing the second time.
    pub fn sync(&mut self) -> usize {
        let main = self.catalog.main_language().clone();
        let keys: Vec<String> = self
            .catalog
            .main_table()
            .keys()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut inserted = 0;
        for (code, table) in self.catalog.tables_mut() {
            if *code == main {
                continue;
            }
            for key in &keys {
                if !table.contains_key(key) {
                    table.put(key, "");
                    inserted += 1;
                }
            }
        }
        inserted
    }

    /// Every main key with its value in each language.
    pub fn rows(&self) -> Vec<EditorRow> {
        let languages = self.catalog.languages();
        self.catalog
            .main_table()
            .keys()
            .into_iter()
            .map(|key| EditorRow {
                key: key.to_string(),
                values: languages
                    .iter()
                    .map(|code| {
                        let value = self
                            .catalog
                            .table(code.as_str())
                            .and_then(|table| table.lookup(key))
                            .unwrap_or_default();
                        (code.clone(), value.to_string())
                    })
                    .collect(),
            })
            .collect()
    }

    // ==================== Language Operations ====================

    /// Add a language, pre-filled with empty values for every main key.
    ///
    /// # Errors
    /// `CatalogError::InvalidLanguageCode` for a malformed code,
    /// `CatalogError::DuplicateLanguage` if the project already has it.
    pub fn add_language(&mut self, code: &str) -> Result<()> {
        let code = LanguageCode::new(code)?;
        let mut table = LanguageTable::new();
        for key in self.catalog.main_table().keys() {
            table.put(key, "");
        }

        self.catalog.insert_language(code.clone(), table)?;
        self.removed.retain(|removed| *removed != code);
        info!("Added language '{}'", code);
        Ok(())
    }

    /// Remove a language and its table.
    ///
    /// If it was the current language, the catalog switches to the main
    /// language. The file is deleted on the next [`persist`](Self::persist).
    ///
    /// # Errors
    /// `CatalogError::Config` for the main language,
    /// `CatalogError::UnknownLanguage` if the project does not have it.
    pub fn remove_language(&mut self, code: &str) -> Result<()> {
        let (code, _) = self.catalog.remove_language(code)?;
        info!("Removed language '{}'", code);
        self.removed.push(code);
        Ok(())
    }

    // ==================== Persistence ====================

    /// Write the project descriptor and every non-empty table.
    ///
    /// Empty tables are skipped so the last good file on disk survives.
    ///
    /// # Errors
    /// Returns the first storage error; earlier writes are not rolled back.
    pub fn persist(&mut self, store: &dyn TableStore) -> Result<PersistReport> {
        let mut report = PersistReport::default();

        store.write_project(&self.catalog.project().to_json())?;

        for code in self.catalog.languages() {
            let Some(table) = self.catalog.table(code.as_str()) else {
                continue;
            };
            if table.is_empty() {
                warn!("Language '{}' has no entries, not saving it", code);
                report.skipped.push(code.clone());
                continue;
            }
            store.write_table(code.as_str(), &table.to_json())?;
            report.written.push(code.clone());
        }

        // A code stays pending until its delete succeeds, so a retry picks it up
        while let Some(code) = self.removed.first().cloned() {
            store.delete_table(code.as_str())?;
            self.removed.remove(0);
            report.deleted.push(code);
        }

        info!(
            "Saved project '{}': {} written, {} skipped, {} deleted",
            self.catalog.project().project_name,
            report.written.len(),
            report.skipped.len(),
            report.deleted.len()
        );
        Ok(report)
    }

    fn check_translations<I, K, V>(&self, translations: I) -> Result<Vec<(LanguageCode, String)>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        translations
            .into_iter()
            .map(|(code, value)| {
                let code = code.as_ref();
                self.catalog
                    .project()
                    .get_by_code(code)
                    .map(|lang| (lang.clone(), value.into()))
                    .ok_or_else(|| CatalogError::UnknownLanguage(code.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{LanguageEntry, LanguageProject};
    use crate::storage::MemoryStore;
    use std::cell::Cell;

    fn code(c: &str) -> LanguageCode {
        LanguageCode::new(c).unwrap()
    }

    fn editor() -> CatalogEditor {
        let project = LanguageProject::new("Demo", code("en"))
            .with_language(code("es"))
            .unwrap()
            .with_language(code("fr"))
            .unwrap();
        let en = LanguageTable::from_entries(vec![LanguageEntry::new("Confirm", "Confirm")]);
        let catalog = LanguageCatalog::open(project, vec![("en", en)]).unwrap();
        CatalogEditor::new(catalog)
    }

    fn value(editor: &CatalogEditor, lang: &str, key: &str) -> Option<String> {
        editor
            .catalog()
            .table(lang)
            .and_then(|t| t.lookup(key))
            .map(str::to_string)
    }

    // ==================== Sync Tests ====================

    #[test]
    fn test_sync_fills_gaps() {
        let mut editor = editor();
        assert_eq!(editor.sync(), 2);
        assert_eq!(value(&editor, "es", "Confirm"), Some(String::new()));
        assert_eq!(value(&editor, "fr", "confirm"), Some(String::new()));
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut editor = editor();
        editor.sync();
        let snapshot = editor.rows();
        assert_eq!(editor.sync(), 0);
        assert_eq!(editor.rows(), snapshot);
    }

    #[test]
    fn test_sync_keeps_existing_translations() {
        let mut editor = editor();
        editor.sync();
        editor.edit_key("Confirm", [("es", "Confirmar")]).unwrap();
        editor.sync();
        assert_eq!(value(&editor, "es", "Confirm"), Some("Confirmar".to_string()));
    }

    // ==================== Add Tests ====================

    #[test]
    fn test_add_key_defaults() {
        let mut editor = editor();
        editor.add_key("Cancel").unwrap();
        assert_eq!(value(&editor, "en", "Cancel"), Some("Cancel".to_string()));
        assert_eq!(value(&editor, "es", "Cancel"), Some(String::new()));
        assert_eq!(value(&editor, "fr", "Cancel"), Some(String::new()));
    }

    #[test]
    fn test_add_key_with_translations() {
        let mut editor = editor();
        editor
            .add_key_with("Cancel", [("es", "Cancelar"), ("fr", "Annuler")])
            .unwrap();
        assert_eq!(value(&editor, "es", "Cancel"), Some("Cancelar".to_string()));
        assert_eq!(value(&editor, "fr", "Cancel"), Some("Annuler".to_string()));
    }

    #[test]
    fn test_add_key_duplicate_case_insensitive() {
        let mut editor = editor();
        let result = editor.add_key("CONFIRM");
        assert!(matches!(result, Err(CatalogError::DuplicateKey(_))));
        assert_eq!(editor.catalog().main_table().len(), 1);
    }

    #[test]
    fn test_add_key_blank() {
        let mut editor = editor();
        assert!(matches!(editor.add_key("  "), Err(CatalogError::InvalidKey(_))));
    }

    #[test]
    fn test_add_key_unknown_language_changes_nothing() {
        let mut editor = editor();
        let result = editor.add_key_with("Cancel", [("de", "Abbrechen")]);
        assert!(matches!(result, Err(CatalogError::UnknownLanguage(_))));
        assert!(!editor.catalog().has_key_in("en", "Cancel"));
    }

    #[test]
    fn test_add_key_keeps_orphaned_translation() {
        let project = LanguageProject::new("Demo", code("en"))
            .with_language(code("es"))
            .unwrap();
        let es = LanguageTable::from_entries(vec![LanguageEntry::new("Exit", "Salir")]);
        let catalog = LanguageCatalog::open(project, vec![("es", es)]).unwrap();
        let mut editor = CatalogEditor::new(catalog);

        editor.add_key("Exit").unwrap();
        assert_eq!(value(&editor, "es", "Exit"), Some("Salir".to_string()));
    }

    // ==================== Edit Tests ====================

    #[test]
    fn test_edit_key_updates_translation() {
        let mut editor = editor();
        editor.sync();
        editor.edit_key("confirm", [("es", "Confirmar")]).unwrap();
        assert_eq!(value(&editor, "es", "Confirm"), Some("Confirmar".to_string()));
        assert_eq!(value(&editor, "en", "Confirm"), Some("Confirm".to_string()));
    }

    #[test]
    fn test_edit_key_main_language_rejected() {
        let mut editor = editor();
        let result = editor.edit_key("Confirm", [("es", "Confirmar"), ("en", "OK")]);
        assert!(matches!(result, Err(CatalogError::MainLanguageImmutable(_))));
        assert_eq!(value(&editor, "en", "Confirm"), Some("Confirm".to_string()));
        assert_eq!(value(&editor, "es", "Confirm"), None);
    }

    #[test]
    fn test_edit_key_unknown_language_changes_nothing() {
        let mut editor = editor();
        editor.sync();
        let before = editor.rows();

        let result = editor.edit_key("Confirm", [("es", "Confirmar"), ("de", "Bestätigen")]);
        assert!(matches!(result, Err(CatalogError::UnknownLanguage(ref c)) if c == "de"));
        assert_eq!(editor.rows(), before);
        assert!(editor.catalog().table("de").is_none());
    }

    #[test]
    fn test_edit_unknown_key() {
        let mut editor = editor();
        let result = editor.edit_key("Nope", [("es", "x")]);
        assert!(matches!(result, Err(CatalogError::UnknownKey(_))));
    }

    // ==================== Delete Tests ====================

    #[test]
    fn test_delete_key_everywhere() {
        let mut editor = editor();
        editor.sync();
        editor.delete_key("CONFIRM").unwrap();
        for lang in ["en", "es", "fr"] {
            assert!(!editor.catalog().has_key_in(lang, "Confirm"));
        }
    }

    #[test]
    fn test_delete_unknown_key() {
        let mut editor = editor();
        assert!(matches!(
            editor.delete_key("Nope"),
            Err(CatalogError::UnknownKey(_))
        ));
    }

    // ==================== Row Tests ====================

    #[test]
    fn test_rows() {
        let mut editor = editor();
        editor.add_key_with("Cancel", [("es", "Cancelar")]).unwrap();
        let rows = editor.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].key, "Cancel");
        assert_eq!(
            rows[1].values,
            vec![
                (code("en"), "Cancel".to_string()),
                (code("es"), "Cancelar".to_string()),
                (code("fr"), String::new()),
            ]
        );
    }

    // ==================== Language Tests ====================

    #[test]
    fn test_add_language_is_synced() {
        let mut editor = editor();
        editor.add_language("de").unwrap();
        assert!(editor.catalog().has_key_in("de", "Confirm"));
        assert_eq!(editor.catalog().languages().len(), 4);
    }

    #[test]
    fn test_add_language_duplicate() {
        let mut editor = editor();
        assert!(matches!(
            editor.add_language("es"),
            Err(CatalogError::DuplicateLanguage(_))
        ));
    }

    #[test]
    fn test_add_language_invalid_code() {
        let mut editor = editor();
        assert!(matches!(
            editor.add_language("../x"),
            Err(CatalogError::InvalidLanguageCode(_))
        ));
    }

    #[test]
    fn test_remove_current_language_falls_back_to_main() {
        let mut editor = editor();
        editor.catalog_mut().set_language("fr").unwrap();
        editor.remove_language("fr").unwrap();
        assert_eq!(editor.catalog().current_language(), &code("en"));
        assert!(editor.catalog().table("fr").is_none());
    }

    #[test]
    fn test_remove_main_language_rejected() {
        let mut editor = editor();
        assert!(matches!(
            editor.remove_language("en"),
            Err(CatalogError::Config(_))
        ));
    }

    // ==================== Persist Tests ====================

    #[test]
    fn test_persist_skips_empty_tables() {
        let mut editor = editor();
        let store = MemoryStore::new();
        let report = editor.persist(&store).unwrap();

        assert_eq!(report.written, vec![code("en")]);
        assert_eq!(report.skipped, vec![code("es"), code("fr")]);
        assert_eq!(store.list_languages().unwrap(), vec!["en"]);
        assert!(store.read_project().unwrap().contains("\"Demo\""));
    }

    #[test]
    fn test_persist_preserves_last_good_file() {
        let mut editor = editor();
        let store = MemoryStore::new().with_table("es", "previous");
        editor.persist(&store).unwrap();
        assert_eq!(store.read_table("es").unwrap(), "previous");
    }

    #[test]
    fn test_persist_deletes_removed_language() {
        let mut editor = editor();
        editor.sync();
        let store = MemoryStore::new();
        editor.persist(&store).unwrap();
        assert_eq!(store.list_languages().unwrap(), vec!["en", "es", "fr"]);

        editor.remove_language("fr").unwrap();
        let report = editor.persist(&store).unwrap();
        assert_eq!(report.deleted, vec![code("fr")]);
        assert_eq!(store.list_languages().unwrap(), vec!["en", "es"]);
    }

    /// Memory store whose first `delete_table` call fails.
    struct FlakyDeleteStore {
        inner: MemoryStore,
        failed: Cell<bool>,
    }

    impl TableStore for FlakyDeleteStore {
        fn read_project(&self) -> Result<String> {
            self.inner.read_project()
        }

        fn write_project(&self, contents: &str) -> Result<()> {
            self.inner.write_project(contents)
        }

        fn list_languages(&self) -> Result<Vec<String>> {
            self.inner.list_languages()
        }

        fn read_table(&self, code: &str) -> Result<String> {
            self.inner.read_table(code)
        }

        fn write_table(&self, code: &str, contents: &str) -> Result<()> {
            self.inner.write_table(code, contents)
        }

        fn delete_table(&self, code: &str) -> Result<()> {
            if !self.failed.replace(true) {
                return Err(CatalogError::io(
                    code,
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked"),
                ));
            }
            self.inner.delete_table(code)
        }
    }

    #[test]
    fn test_persist_retries_failed_deletes() {
        let mut editor = editor();
        editor.sync();
        let store = FlakyDeleteStore {
            inner: MemoryStore::new(),
            failed: Cell::new(false),
        };
        editor.persist(&store).unwrap();

        editor.remove_language("es").unwrap();
        editor.remove_language("fr").unwrap();
        assert!(editor.persist(&store).is_err());
        assert_eq!(store.list_languages().unwrap(), vec!["en", "es", "fr"]);

        let report = editor.persist(&store).unwrap();
        assert_eq!(report.deleted, vec![code("es"), code("fr")]);
        assert_eq!(store.list_languages().unwrap(), vec!["en"]);
    }

    #[test]
    fn test_load_syncs() {
        let project = r#"{"projectName": "Demo", "mainLanguage": "en", "languages": ["en", "es"]}"#;
        let en = r#"{ "entries": [ { "key": "Confirm", "value": "Confirm" } ] }"#;
        let store = MemoryStore::new().with_project(project).with_table("en", en);
        let editor = CatalogEditor::load(&store).unwrap();
        assert!(editor.catalog().has_key_in("es", "Confirm"));
    }
}
