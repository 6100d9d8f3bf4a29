//! Kunai DB - Database layer using native_db
//!
//! Provides persistent storage for:
//! - User records (players and AI) with their relations
//! - Dependent rows removed together on account deletion
//! - Conditional (compare-and-swap) user updates for race-safe mutations
//!
//! There is no in-process locking around user state. Mutations that depend
//! on a prior read commit through [`Store::update_user_if`], whose
//! precondition is re-checked inside a single read-write transaction;
//! `native_db` serializes those transactions, so a failed precondition means
//! the caller lost a race and should report it, not retry silently.

mod delete;
mod error;
mod models;
mod queries;
mod store;
mod update;

pub use error::{Error, Result};
pub use models::*;
pub use queries::{ListUsersQuery, UserListing, UserOrder, UserPage};
pub use store::{Store, UserWithRelations};
pub use update::UserPrecondition;
