//! Error types for kunai-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown stat: {0}")]
    UnknownStat(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
