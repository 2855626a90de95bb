//! Internationalization (i18n) core: language tables and the catalog that
//! owns them.
//!
//! # Architecture
//!
//! - `table`: one language's entries with case-insensitive lookup
//! - `language`: validated language codes and display metadata
//! - `project`: project descriptor (name, main language, language list)
//! - `catalog`: runtime lookups, language switching, change notification
//! - `editor`: key/language CRUD that keeps languages aligned
//! - `validator`: translation quality checks
//! - `metrics`: lookup counters
//!
//! # Example
//!
//! ```rust,ignore
//! use lang_catalog::i18n::LanguageCatalog;
//! use lang_catalog::storage::FsStore;
//!
//! let mut catalog = LanguageCatalog::load(&FsStore::new("assets/lang"))?;
//! catalog.subscribe(|event| {
//!     println!("now showing {}", event.current);
//!     Ok(())
//! });
//! catalog.set_language("es")?;
//! let label = catalog.lang_capitalized("confirm");
//! ```

mod catalog;
mod editor;
mod language;
mod metrics;
mod project;
mod table;
mod validator;

pub use catalog::{capitalize, LanguageCatalog, LanguageChanged, SubscriptionId, NULL_KEY_SENTINEL};
pub use editor::{CatalogEditor, EditorRow, PersistReport};
pub use language::{known_language, LanguageCode, LanguageInfo};
pub use metrics::{LookupMetrics, MetricsReport};
pub use project::LanguageProject;
pub use table::{normalize_key, LanguageEntry, LanguageTable};
pub use validator::{TranslationValidator, ValidationReport};
