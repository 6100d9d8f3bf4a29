//! Profile service configuration
//!
//! Runtime knobs for the profile service. The regeneration refresh window
//! and the energy rate are fixed gameplay constants in `kunai-core`; what is
//! configurable here are the operational limits around account deletion and
//! listing pages.

use serde::{Deserialize, Serialize};

/// Configuration for the profile service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Hours between starting the deletion timer and the account becoming
    /// deletable
    deletion_delay_hours: i64,
    /// Upper bound on roster page size
    max_page_limit: usize,
}

impl ProfileConfig {
    /// Create a configuration with the given deletion delay
    ///
    /// The delay is clamped to at least one hour.
    pub fn with_deletion_delay_hours(deletion_delay_hours: i64) -> Self {
        Self {
            deletion_delay_hours: deletion_delay_hours.max(1),
            ..Self::default()
        }
    }

    /// Hours until a started deletion timer expires
    pub fn deletion_delay_hours(&self) -> i64 {
        self.deletion_delay_hours
    }

    /// Upper bound on roster page size
    pub fn max_page_limit(&self) -> usize {
        self.max_page_limit
    }
}

impl Default for ProfileConfig {
    /// Two-day deletion delay, 100-row page cap
    fn default() -> Self {
        Self {
            deletion_delay_hours: 48,
            max_page_limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProfileConfig::default();
        assert_eq!(config.deletion_delay_hours(), 48);
        assert_eq!(config.max_page_limit(), 100);
    }

    #[test]
    fn test_delay_clamped_minimum() {
        let config = ProfileConfig::with_deletion_delay_hours(0);
        assert_eq!(config.deletion_delay_hours(), 1);
    }
}
