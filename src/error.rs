//! Error types for tasktide
//!
//! Store mutations against unknown ids are deliberately NOT errors: the store
//! treats them as silent no-ops (see `store::TaskStore`). Errors here cover
//! the persistence and migration paths, where something genuinely failed.

use thiserror::Error;

/// Main error type for tasktide operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored schema version {found} is newer than supported version {current}")]
    UnsupportedSchema { found: u32, current: u32 },

    #[error("migration from version {from} failed: {reason}")]
    Migration { from: u32, reason: String },

    #[error("no writable data directory available for the default state file")]
    NoDataDir,
}

/// Result type alias for tasktide operations
pub type Result<T> = std::result::Result<T, Error>;
