//! Best-effort notification channel
//!
//! Content changes are pushed to an [`AuditSink`] after they commit. The
//! sink is a side channel: a publish failure is logged and swallowed, never
//! propagated, and the mutation it describes stays committed.

use serde::{Deserialize, Serialize};

use crate::service::ProfileService;

/// A dropdown notification shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub href: String,
    pub name: String,
    pub color: String,
}

impl NavLink {
    pub fn new(href: &str, name: impl Into<String>, color: &str) -> Self {
        Self {
            href: href.to_string(),
            name: name.into(),
            color: color.to_string(),
        }
    }
}

/// Payload describing a committed content change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpdate {
    /// Username of the staff member who made the change
    pub actor: String,
    /// Username of the record that changed
    pub subject: String,
    /// Avatar of the record that changed
    pub image: String,
    /// Human-readable change descriptions
    pub changes: Vec<String>,
}

/// Receiver for content-change notifications
pub trait AuditSink: Send + Sync {
    /// Deliver one update; the error string is only ever logged
    fn publish(&self, update: &ContentUpdate) -> std::result::Result<(), String>;
}

/// Sink that writes updates to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AuditSink for LogSink {
    fn publish(&self, update: &ContentUpdate) -> std::result::Result<(), String> {
        tracing::info!(
            actor = %update.actor,
            subject = %update.subject,
            changes = update.changes.len(),
            "content updated"
        );
        Ok(())
    }
}

impl ProfileService {
    /// Publish an update, logging (and swallowing) any failure
    pub(crate) fn notify(&self, update: &ContentUpdate) {
        if let Err(err) = self.sink.publish(update) {
            tracing::warn!(
                subject = %update.subject,
                error = %err,
                "content notification failed"
            );
        }
    }
}
