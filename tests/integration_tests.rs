//! Integration tests for the language catalog
//!
//! These tests exercise loading from disk, editing, persisting and runtime
//! lookups together through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use tempfile::TempDir;

use lang_catalog::i18n::{CatalogEditor, LanguageCatalog, LanguageChanged, TranslationValidator};
use lang_catalog::preferences::{FilePreferences, PreferenceStore, SELECTED_LANGUAGE_KEY};
use lang_catalog::storage::{FsStore, TableStore};
use lang_catalog::CatalogError;

// ==================== Test Helpers ====================

/// Write an en/es project where only English has content
fn create_project(dir: &TempDir) -> FsStore {
    let store = FsStore::new(dir.path());
    store
        .write_project(
            r#"{ "projectName": "Demo", "mainLanguage": "en", "languages": ["en", "es"] }"#,
        )
        .expect("Failed to write project");
    store
        .write_table(
            "en",
            r#"{ "entries": [ { "key": "Confirm", "value": "Confirm" } ] }"#,
        )
        .expect("Failed to write en table");
    store
        .write_table("es", r#"{ "entries": [] }"#)
        .expect("Failed to write es table");
    store
}

// ==================== Scenario Tests ====================

#[test]
fn test_sync_switch_and_unknown_language_scenario() {
    let dir = TempDir::new().unwrap();
    let store = create_project(&dir);

    let mut editor = CatalogEditor::new(LanguageCatalog::load(&store).unwrap());
    assert!(!editor.catalog().has_key_in("es", "Confirm"));

    editor.sync();
    assert_eq!(
        editor.catalog().table("es").unwrap().lookup("Confirm"),
        Some("")
    );

    let mut catalog = editor.into_catalog();
    catalog.set_language("es").unwrap();
    assert_eq!(catalog.lang_string("Confirm"), "");

    let result = catalog.set_language("fr");
    assert!(matches!(result, Err(CatalogError::UnknownLanguage(_))));
    assert_eq!(catalog.current_language().as_str(), "es");
}

#[test]
fn test_edit_persist_reload() {
    let dir = TempDir::new().unwrap();
    let store = create_project(&dir);

    let mut editor = CatalogEditor::load(&store).unwrap();
    editor.edit_key("Confirm", [("es", "Confirmar")]).unwrap();
    editor.add_key_with("Cancel", [("es", "Cancelar")]).unwrap();
    let report = editor.persist(&store).unwrap();
    assert_eq!(report.written.len(), 2);
    assert!(report.skipped.is_empty());

    let mut catalog = LanguageCatalog::load(&store).unwrap();
    catalog.set_language("es").unwrap();
    assert_eq!(catalog.lang_string("confirm"), "Confirmar");
    assert_eq!(catalog.lang_upper("cancel"), "CANCELAR");
    assert_eq!(catalog.lang_upper("Missing"), "[MISSING]");
    assert_eq!(catalog.lang_string(""), "[null]");
}

#[test]
fn test_delete_removes_key_from_every_file() {
    let dir = TempDir::new().unwrap();
    let store = create_project(&dir);

    let mut editor = CatalogEditor::load(&store).unwrap();
    editor.add_key("Cancel").unwrap();
    editor.delete_key("Confirm").unwrap();
    editor.persist(&store).unwrap();

    let es = store.read_table("es").unwrap();
    assert!(!es.contains("Confirm"));
    assert!(es.contains("Cancel"));
}

#[test]
fn test_corrupt_table_loads_empty_and_is_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let store = create_project(&dir);
    store.write_table("es", "{ this is not json").unwrap();

    let catalog = LanguageCatalog::load(&store).unwrap();
    assert!(catalog.table("es").unwrap().is_empty());

    let mut editor = CatalogEditor::new(catalog);
    let report = editor.persist(&store).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(store.read_table("es").unwrap(), "{ this is not json");
}

#[test]
fn test_language_selection_survives_restart() {
    let dir = TempDir::new().unwrap();
    let store = create_project(&dir);
    let prefs_path = dir.path().join("prefs.json");

    {
        let mut catalog = LanguageCatalog::load(&store)
            .unwrap()
            .with_preferences(FilePreferences::open(&prefs_path));
        catalog.set_language("es").unwrap();
    }

    let prefs = FilePreferences::open(&prefs_path);
    assert_eq!(
        prefs.get_string(SELECTED_LANGUAGE_KEY),
        Some("es".to_string())
    );

    let catalog = LanguageCatalog::load(&store)
        .unwrap()
        .with_preferences(prefs);
    assert_eq!(catalog.current_language().as_str(), "es");
}

#[test]
fn test_display_binding_refreshes_on_switch() {
    let dir = TempDir::new().unwrap();
    let store = create_project(&dir);

    let mut editor = CatalogEditor::load(&store).unwrap();
    editor.edit_key("Confirm", [("es", "Confirmar")]).unwrap();
    let mut catalog = editor.into_catalog();

    let seen: Rc<RefCell<Vec<LanguageChanged>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    catalog.subscribe(move |event| {
        sink.borrow_mut().push(event.clone());
        Ok(())
    });

    catalog.set_language("es").unwrap();
    catalog.set_language("es").unwrap();
    catalog.set_language("en").unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].current.as_str(), "es");
    assert_eq!(seen[1].previous.as_str(), "es");
    assert_eq!(catalog.metrics().switches(), 2);
}

#[test]
fn test_validator_flags_untranslated_after_add() {
    let dir = TempDir::new().unwrap();
    let store = create_project(&dir);

    let mut editor = CatalogEditor::load(&store).unwrap();
    editor.add_key("Score: {points}").unwrap();
    editor
        .edit_key("Score: {points}", [("es", "Puntos")])
        .unwrap();

    let report = TranslationValidator::validate_catalog(editor.catalog());
    assert!(!report.has_errors());
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("Placeholder mismatch")));
    assert!(report.warnings.iter().any(|w| w.contains("Empty translation")));
}
