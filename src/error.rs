//! Error type for rendering, configuration and I/O.
//!
//! Extraction itself has no error path; these errors come from the
//! surrounding presenter, server and CLI.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigratorError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MigratorError>;
