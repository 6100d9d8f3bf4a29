//! Error types for kunai-profile
//!
//! Only a missing required entity is an error here. Precondition losses,
//! business-rule refusals, and insufficient resources travel through the
//! ordinary `ActionResponse` return path instead.

use thiserror::Error;

/// Result type for kunai-profile operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in kunai-profile
#[derive(Debug, Error)]
pub enum Error {
    /// The requested user does not exist
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Store error
    #[error(transparent)]
    Db(#[from] kunai_db::Error),
}

// Compile-time check that Error is Send + Sync for thread-safe error propagation.
// This function is never called but will fail to compile if the bound is not satisfied.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
