//! Uniform mutation response
//!
//! Every mutation endpoint returns `{success, message}` so callers branch on
//! a flag instead of catching faults. Precondition losses, business-rule
//! refusals, and insufficient resources all travel this channel; only truly
//! exceptional conditions (a missing required entity) surface as errors.

use serde::{Deserialize, Serialize};

/// Result of a mutation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    /// Successful mutation
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Refused mutation (race loss, business rule, insufficient resource)
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
