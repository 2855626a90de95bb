//! Storage for project descriptors and language files.
//!
//! A project lives in one directory:
//!
//! ```text
//! <root>/project.json
//! <root>/languages/<code>.json
//! ```
//!
//! The catalog only needs to list language files, read one by code and write
//! one by code, so that is all `TableStore` asks for.

use crate::error::{CatalogError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the project descriptor file inside a project directory.
pub const PROJECT_FILE: &str = "project.json";

/// Name of the subdirectory holding language files.
pub const LANGUAGES_DIR: &str = "languages";

/// Backend that stores a project's descriptor and language files.
pub trait TableStore {
    /// Read the project descriptor.
    ///
    /// # Errors
    /// `CatalogError::MissingFile` if there is no descriptor.
    fn read_project(&self) -> Result<String>;

    fn write_project(&self, contents: &str) -> Result<()>;

    /// Language codes that have a stored file, sorted.
    fn list_languages(&self) -> Result<Vec<String>>;

    /// Read a language file.
    ///
    /// # Errors
    /// `CatalogError::MissingFile` if no file exists for `code`.
    fn read_table(&self, code: &str) -> Result<String>;

    fn write_table(&self, code: &str, contents: &str) -> Result<()>;

    /// Delete a language file. Deleting a missing file is not an error.
    fn delete_table(&self, code: &str) -> Result<()>;
}

/// Filesystem-backed store rooted at a project directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_path(&self) -> PathBuf {
        self.root.join(PROJECT_FILE)
    }

    fn languages_dir(&self) -> PathBuf {
        self.root.join(LANGUAGES_DIR)
    }

    fn table_path(&self, code: &str) -> PathBuf {
        self.languages_dir().join(format!("{}.json", code))
    }

    fn read(path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CatalogError::MissingFile(path.display().to_string()),
            _ => CatalogError::io(path.display().to_string(), e),
        })
    }

    fn write(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CatalogError::io(parent.display().to_string(), e))?;
        }
        fs::write(path, contents).map_err(|e| CatalogError::io(path.display().to_string(), e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl TableStore for FsStore {
    fn read_project(&self) -> Result<String> {
        Self::read(&self.project_path())
    }

    fn write_project(&self, contents: &str) -> Result<()> {
        Self::write(&self.project_path(), contents)
    }

    fn list_languages(&self) -> Result<Vec<String>> {
        let dir = self.languages_dir();
        let read_dir = match fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CatalogError::io(dir.display().to_string(), e)),
        };

        let mut codes = Vec::new();
        for entry in read_dir {
            let path = entry
                .map_err(|e| CatalogError::io(dir.display().to_string(), e))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                codes.push(stem.to_string());
            }
        }
        codes.sort();
        Ok(codes)
    }

    fn read_table(&self, code: &str) -> Result<String> {
        Self::read(&self.table_path(code))
    }

    fn write_table(&self, code: &str, contents: &str) -> Result<()> {
        Self::write(&self.table_path(code), contents)
    }

    fn delete_table(&self, code: &str) -> Result<()> {
        let path = self.table_path(code);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CatalogError::io(path.display().to_string(), e)),
        }
    }
}

/// In-memory store, used by tests and embedders that bundle their data.
#[derive(Debug, Default)]
pub struct MemoryStore {
    project: RefCell<Option<String>>,
    tables: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper to seed the project descriptor.
    pub fn with_project(self, contents: impl Into<String>) -> Self {
        *self.project.borrow_mut() = Some(contents.into());
        self
    }

    /// Builder-style helper to seed a language file.
    pub fn with_table(self, code: &str, contents: impl Into<String>) -> Self {
        self.tables
            .borrow_mut()
            .insert(code.to_string(), contents.into());
        self
    }
}

impl TableStore for MemoryStore {
    fn read_project(&self) -> Result<String> {
        self.project
            .borrow()
            .clone()
            .ok_or_else(|| CatalogError::MissingFile(PROJECT_FILE.to_string()))
    }

    fn write_project(&self, contents: &str) -> Result<()> {
        *self.project.borrow_mut() = Some(contents.to_string());
        Ok(())
    }

    fn list_languages(&self) -> Result<Vec<String>> {
        Ok(self.tables.borrow().keys().cloned().collect())
    }

    fn read_table(&self, code: &str) -> Result<String> {
        self.tables
            .borrow()
            .get(code)
            .cloned()
            .ok_or_else(|| CatalogError::MissingFile(format!("{}/{}.json", LANGUAGES_DIR, code)))
    }

    fn write_table(&self, code: &str, contents: &str) -> Result<()> {
        self.tables
            .borrow_mut()
            .insert(code.to_string(), contents.to_string());
        Ok(())
    }

    fn delete_table(&self, code: &str) -> Result<()> {
        self.tables.borrow_mut().remove(code);
        Ok(())
    }
}
