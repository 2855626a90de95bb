use anyhow::{Context, Result};
use std::path::PathBuf;

/// Default preference file name, relative to the project directory.
pub const DEFAULT_PREFS_FILE: &str = ".preferences.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `project.json` and `languages/`
    pub project_dir: PathBuf,

    /// File storing the last selected language
    pub prefs_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let project_dir = PathBuf::from(
            std::env::var("LANG_PROJECT_DIR").context("LANG_PROJECT_DIR not set")?,
        );

        let prefs_file = std::env::var("LANG_PREFS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| project_dir.join(DEFAULT_PREFS_FILE));

        Ok(Self {
            project_dir,
            prefs_file,
        })
    }
}
