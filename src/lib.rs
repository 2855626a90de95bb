pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod preferences;
pub mod storage;

pub use error::{CatalogError, Result};
