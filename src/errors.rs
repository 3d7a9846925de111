//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep error
//! handling consistent across the tool.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    // ---------------------------
    // Reference data
    // ---------------------------
    #[error("Unknown outlet: {0}")]
    UnknownOutlet(String),

    #[error("Unknown flow: {0}")]
    UnknownFlow(String),

    #[error("Unknown step '{step}' in flow '{flow}'")]
    UnknownStep { flow: String, step: String },

    // ---------------------------
    // Guard / collaborator errors
    // ---------------------------
    #[error("Identity provider unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("Shift provider unavailable: {0}")]
    ShiftUnavailable(String),

    #[error("Stale progress record for flow '{0}'")]
    StaleProgress(String),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
