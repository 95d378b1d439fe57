//! Crate error type.
//!
//! Only layout problems and I/O failures are fatal. Unresolvable references
//! surface here when a caller asks for an entity directly; inside a run they
//! are downgraded to [`Issue`](crate::models::Issue) entries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Invalid or missing shift boundary configuration.
    #[error("invalid block layout: {0}")]
    Config(String),

    #[error("unknown subject '{0}'")]
    UnknownSubject(String),

    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    #[error("unknown teacher '{0}'")]
    UnknownTeacher(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
