//! Crate-level error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbConfigError;
use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Database(#[from] DbConfigError),

    #[error("failed to read measurements: {0}")]
    Repository(#[from] RepositoryError),

    #[error("failed to write output to {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("invalid date '{0}': expected RFC 3339, 'YYYY-MM-DD HH:MM[:SS]' or 'YYYY-MM-DD'")]
    InvalidDate(String),
}
