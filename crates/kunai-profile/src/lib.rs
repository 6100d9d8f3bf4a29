//! Kunai Profile - request/response service layer
//!
//! This crate sits between a transport (HTTP, RPC) and `kunai-db`:
//! - Training start/stop and level-up, committed through conditional updates
//! - The regeneration refresh applied on every authenticated read, with a
//!   fire-and-forget pool write-back on plain reads (mutations settle it
//!   before they commit)
//! - AI (NPC) management for content staff, with audit diffs
//! - Roster listings, lookups, and the account deletion timer
//!
//! Mutations return `ActionResponse { success, message }`; a lost race or a
//! refused business rule is a `success: false` response, not an error. The
//! only hard error a caller must handle is a missing required user.
//!
//! Methods that refresh pools schedule their write-back with
//! [`tokio::task::spawn_blocking`], so they must run inside a Tokio runtime.

mod ai;
mod audit;
mod config;
mod error;
mod notify;
mod regen;
mod service;

pub use ai::AiUpdate;
pub use audit::{diff_names, diff_records};
pub use config::ProfileConfig;
pub use error::{Error, Result};
pub use notify::{AuditSink, ContentUpdate, LogSink, NavLink};
pub use service::{ProfileService, UserProfile};
