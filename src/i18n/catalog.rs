//! Language catalog: the runtime owner of a project's tables.
//!
//! A catalog is created by opening a project (from tables in hand or from a
//! `TableStore`) and is passed explicitly to whatever needs lookups. It owns
//! one table per project language, tracks the current language, and
//! notifies subscribers when the current language changes.
//!
//! Subscribers are plain closures. They are called synchronously in
//! subscription order and cannot reach back into the catalog while being
//! notified, so a switch can never recurse.

use crate::error::{CatalogError, Result};
use crate::i18n::{LanguageCode, LanguageProject, LanguageTable, LookupMetrics};
use crate::preferences::{PreferenceStore, SELECTED_LANGUAGE_KEY};
use crate::storage::TableStore;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Returned by lookups with an empty key.
pub const NULL_KEY_SENTINEL: &str = "[null]";

/// Notification sent to subscribers after the current language changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChanged {
    pub previous: LanguageCode,
    pub current: LanguageCode,
}

/// Handle returned by [`LanguageCatalog::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&LanguageChanged) -> anyhow::Result<()>>;

/// Runtime catalog for one project.
pub struct LanguageCatalog {
    project: LanguageProject,
    tables: HashMap<LanguageCode, LanguageTable>,
    current: LanguageCode,
    subscribers: Vec<(SubscriptionId, Handler)>,
    next_subscription: u64,
    preferences: Option<Box<dyn PreferenceStore>>,
    metrics: LookupMetrics,
}

fn empty_table() -> &'static LanguageTable {
    static EMPTY: OnceLock<LanguageTable> = OnceLock::new();
    EMPTY.get_or_init(LanguageTable::new)
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let mut result: String = first.to_uppercase().collect();
            result.push_str(&chars.as_str().to_lowercase());
            result
        }
        None => String::new(),
    }
}

impl LanguageCatalog {
    /// Open a catalog from a project descriptor and its tables.
    ///
    /// Languages without a supplied table start empty. Tables for codes the
    /// project does not list are dropped.
    ///
    /// # Errors
    /// Returns `CatalogError::Config` if the project is inconsistent (for
    /// example, its main language is not in its language list).
    pub fn open<I, K>(project: LanguageProject, tables: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, LanguageTable)>,
        K: AsRef<str>,
    {
        project.validate()?;

        let mut supplied: HashMap<String, LanguageTable> = HashMap::new();
        for (code, table) in tables {
            let code = code.as_ref();
            if project.is_supported(code) {
                supplied.insert(code.to_string(), table);
            } else {
                warn!(
                    "Ignoring table for '{}': not a language of project '{}'",
                    code, project.project_name
                );
            }
        }

        let tables = project
            .languages
            .iter()
            .map(|code| {
                let table = supplied.remove(code.as_str()).unwrap_or_default();
                (code.clone(), table)
            })
            .collect();

        info!(
            "Opened project '{}' with {} languages (main: {})",
            project.project_name,
            project.languages.len(),
            project.main_language
        );

        Ok(Self {
            current: project.main_language.clone(),
            project,
            tables,
            subscribers: Vec::new(),
            next_subscription: 0,
            preferences: None,
            metrics: LookupMetrics::new(),
        })
    }

    /// Load a project and every language file from a store.
    ///
    /// A missing or malformed language file is logged and treated as an
    /// empty table so one bad file never keeps the project from opening.
    ///
    /// # Errors
    /// Fails if the project descriptor is missing, malformed or inconsistent,
    /// or if the store reports an I/O error.
    pub fn load(store: &dyn TableStore) -> Result<Self> {
        let project = LanguageProject::from_json(&store.read_project()?)?;

        let stored = store.list_languages()?;
        for code in stored.iter().filter(|code| !project.is_supported(code)) {
            debug!("Language file '{}' is not listed in the project", code);
        }

        let mut tables = Vec::with_capacity(project.languages.len());
        for code in &project.languages {
            let table = match store.read_table(code.as_str()) {
                Ok(json) => match LanguageTable::from_json(&json) {
                    Ok(table) => table,
                    Err(e) => {
                        warn!("Language '{}' could not be loaded: {}", code, e);
                        LanguageTable::new()
                    }
                },
                Err(CatalogError::MissingFile(path)) => {
                    warn!("No file for language '{}' ({}), starting empty", code, path);
                    LanguageTable::new()
                }
                Err(e) => return Err(e),
            };
            tables.push((code.clone(), table));
        }

        Self::open(project, tables)
    }

    /// Attach a preference store and restore the saved language selection.
    ///
    /// A saved code that is not a project language is ignored.
    pub fn with_preferences(mut self, preferences: impl PreferenceStore + 'static) -> Self {
        if let Some(saved) = preferences.get_string(SELECTED_LANGUAGE_KEY) {
            match self.project.get_by_code(&saved) {
                Some(code) => {
                    debug!("Restored language selection '{}'", code);
                    self.current = code.clone();
                }
                None => warn!("Saved language '{}' is not in the project, ignoring", saved),
            }
        }
        self.preferences = Some(Box::new(preferences));
        self
    }

    // ==================== Language Switching ====================

    /// Switch the current language.
    ///
    /// Switching to the current language does nothing. Otherwise the new
    /// selection is saved to the preference store and every subscriber is
    /// notified in subscription order.
    ///
    /// # Errors
    /// Returns `CatalogError::UnknownLanguage` if `code` is not a project
    /// language; the current language is left unchanged.
    pub fn set_language(&mut self, code: &str) -> Result<()> {
        if self.current == code {
            return Ok(());
        }

        let next = self
            .project
            .get_by_code(code)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownLanguage(code.to_string()))?;

        self.switch_to(next);
        Ok(())
    }

    fn switch_to(&mut self, next: LanguageCode) {
        let previous = std::mem::replace(&mut self.current, next);
        self.metrics.record_switch();
        info!("Language changed from '{}' to '{}'", previous, self.current);

        if let Some(preferences) = self.preferences.as_mut() {
            if let Err(e) = preferences.set_string(SELECTED_LANGUAGE_KEY, self.current.as_str()) {
                warn!("Failed to save language selection: {:#}", e);
            }
        }

        let event = LanguageChanged {
            previous,
            current: self.current.clone(),
        };
        self.notify(&event);
    }

    fn notify(&mut self, event: &LanguageChanged) {
        for (id, handler) in self.subscribers.iter_mut() {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Language change subscriber {:?} failed: {:#}", id, e),
                Err(_) => warn!("Language change subscriber {:?} panicked", id),
            }
        }
    }

    /// Register a handler for language changes.
    ///
    /// Handlers only see changes made after they subscribe. A handler that
    /// returns an error or panics is logged and does not stop delivery to
    /// the rest.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&LanguageChanged) -> anyhow::Result<()> + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ==================== Lookup ====================

    /// Resolve a key in the current language.
    ///
    /// Missing keys come back as `"[key]"` and an empty key as `"[null]"`,
    /// so untranslated text is visible on screen.
    pub fn lang_string(&self, key: &str) -> String {
        if key.is_empty() {
            self.metrics.record_fallback();
            return NULL_KEY_SENTINEL.to_string();
        }

        match self.current_table().lookup(key) {
            Some(value) => {
                self.metrics.record_hit();
                value.to_string()
            }
            None => {
                self.metrics.record_fallback();
                format!("[{}]", key)
            }
        }
    }

    /// [`lang_string`](Self::lang_string) in upper case, fallback included.
    pub fn lang_upper(&self, key: &str) -> String {
        self.lang_string(key).to_uppercase()
    }

    /// [`lang_string`](Self::lang_string) in lower case, fallback included.
    pub fn lang_lower(&self, key: &str) -> String {
        self.lang_string(key).to_lowercase()
    }

    /// [`lang_string`](Self::lang_string) with the first character upper-cased
    /// and the rest lower-cased.
    pub fn lang_capitalized(&self, key: &str) -> String {
        capitalize(&self.lang_string(key))
    }

    /// Check whether the current language has a key.
    pub fn has_key(&self, key: &str) -> bool {
        self.current_table().contains_key(key)
    }

    /// Check whether a specific language has a key.
    pub fn has_key_in(&self, code: &str, key: &str) -> bool {
        self.table(code)
            .map(|table| table.contains_key(key))
            .unwrap_or(false)
    }

    // ==================== Accessors ====================

    pub fn current_language(&self) -> &LanguageCode {
        &self.current
    }

    pub fn main_language(&self) -> &LanguageCode {
        &self.project.main_language
    }

    pub fn languages(&self) -> &[LanguageCode] {
        &self.project.languages
    }

    pub fn project(&self) -> &LanguageProject {
        &self.project
    }

    pub fn table(&self, code: &str) -> Option<&LanguageTable> {
        self.tables.get(code)
    }

    pub fn current_table(&self) -> &LanguageTable {
        self.tables
            .get(self.current.as_str())
            .unwrap_or_else(|| empty_table())
    }

    pub fn main_table(&self) -> &LanguageTable {
        self.tables
            .get(self.project.main_language.as_str())
            .unwrap_or_else(|| empty_table())
    }

    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }

    // ==================== Editing Hooks ====================

    pub(crate) fn table_mut(&mut self, code: &str) -> Option<&mut LanguageTable> {
        self.tables.get_mut(code)
    }

    pub(crate) fn tables_mut(
        &mut self,
    ) -> impl Iterator<Item = (&LanguageCode, &mut LanguageTable)> + '_ {
        self.tables.iter_mut()
    }

    pub(crate) fn insert_language(
        &mut self,
        code: LanguageCode,
        table: LanguageTable,
    ) -> Result<()> {
        self.project.add_language(code.clone())?;
        self.tables.insert(code, table);
        Ok(())
    }

    /// Drop a language. If it was current, fall back to the main language.
    pub(crate) fn remove_language(&mut self, code: &str) -> Result<(LanguageCode, LanguageTable)> {
        let removed = self.project.remove_language(code)?;
        let table = self.tables.remove(removed.as_str()).unwrap_or_default();

        if self.current == removed {
            let main = self.project.main_language.clone();
            self.switch_to(main);
        }
        Ok((removed, table))
    }
}

impl fmt::Debug for LanguageCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageCatalog")
            .field("project", &self.project)
            .field("current", &self.current)
            .field("tables", &self.tables.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
