//! Database models for persistent storage.

mod related;
mod user;

pub use related::*;
pub use user::*;
