//! User records and their related entities
//!
//! `UserRecord` carries the subset of player state the core invariants
//! touch: identity, pools, regeneration timestamps, the active training
//! session, and role/status flags. Two invariants hold at all times:
//!
//! - every `cur_*` pool value is at most its `max_*` capacity
//! - `currently_training` and `training_started_at` are both set or both
//!   null (a session has a start time exactly while a stat is being trained)

use crate::error::Error;
use crate::stat::{Stat, Stats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse user state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Normal state
    #[default]
    Awake,
    /// In an active battle; training cannot be stopped
    Battle,
    /// Recovering in hospital
    Hospitalized,
}

impl UserStatus {
    /// Get the status name
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Awake => "AWAKE",
            UserStatus::Battle => "BATTLE",
            UserStatus::Hospitalized => "HOSPITALIZED",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AWAKE" => Ok(UserStatus::Awake),
            "BATTLE" => Ok(UserStatus::Battle),
            "HOSPITALIZED" => Ok(UserStatus::Hospitalized),
            other => Err(Error::UnknownStatus(other.to_string())),
        }
    }
}

/// User role for permission checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Regular player
    #[default]
    User,
    /// Moderator
    Moderator,
    /// Administrator
    Admin,
}

impl UserRole {
    /// Whether this role may create, edit, or delete AI content
    pub fn can_change_content(&self) -> bool {
        matches!(self, UserRole::Moderator | UserRole::Admin)
    }

    /// Whether this role reviews user reports
    pub fn can_moderate(&self) -> bool {
        matches!(self, UserRole::Moderator | UserRole::Admin)
    }

    /// Get the role name
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Moderator => "MODERATOR",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(UserRole::User),
            "MODERATOR" => Ok(UserRole::Moderator),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

/// A player or AI record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Opaque unique identity
    pub user_id: String,
    pub username: String,
    pub gender: String,
    pub avatar: String,
    pub role: UserRole,
    pub rank: String,
    pub status: UserStatus,
    /// Non-player character controlled by content staff
    pub is_ai: bool,
    pub approved_tos: bool,
    pub is_banned: bool,
    /// Unread inbox message count
    pub inbox_news: u32,
    pub level: u32,
    pub experience: f64,
    pub cur_health: f64,
    pub max_health: f64,
    pub cur_stamina: f64,
    pub max_stamina: f64,
    pub cur_chakra: f64,
    pub max_chakra: f64,
    pub cur_energy: f64,
    pub max_energy: f64,
    /// Per-second recovery rate shared by all pools. A bloodline bonus may
    /// be added in memory after a fetch; the base rate is what persists.
    pub regeneration: f64,
    pub stats: Stats,
    /// Stat currently being trained; paired with `training_started_at`
    pub currently_training: Option<Stat>,
    /// When the active training session began; paired with `currently_training`
    pub training_started_at: Option<DateTime<Utc>>,
    /// When the account will be deleted, if a deletion timer is running
    pub deletion_at: Option<DateTime<Utc>>,
    /// Last time the record was refreshed
    pub updated_at: DateTime<Utc>,
    /// Last time pool regeneration was applied
    pub regen_at: DateTime<Utc>,
    pub bloodline_id: Option<String>,
    pub village_id: Option<String>,
}

impl UserRecord {
    /// Create a fresh level-1 record with full pools
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            gender: "Unknown".to_string(),
            avatar: String::new(),
            role: UserRole::User,
            rank: "STUDENT".to_string(),
            status: UserStatus::Awake,
            is_ai: false,
            approved_tos: false,
            is_banned: false,
            inbox_news: 0,
            level: 1,
            experience: 0.0,
            cur_health: 100.0,
            max_health: 100.0,
            cur_stamina: 100.0,
            max_stamina: 100.0,
            cur_chakra: 100.0,
            max_chakra: 100.0,
            cur_energy: 100.0,
            max_energy: 100.0,
            regeneration: 1.0,
            stats: Stats::default(),
            currently_training: None,
            training_started_at: None,
            deletion_at: None,
            updated_at: now,
            regen_at: now,
            bloodline_id: None,
            village_id: None,
        }
    }

    /// Whether a training session is active
    pub fn is_training(&self) -> bool {
        self.currently_training.is_some()
    }
}

/// Bloodline: a read-only associated entity granting a regeneration bonus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bloodline {
    pub id: String,
    pub name: String,
    /// Additive bonus applied to the user's regeneration rate in memory;
    /// never written back onto the base rate
    pub regen_increase: f64,
}

/// Village: the grouping entity a user belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Village {
    pub id: String,
    pub name: String,
    pub sector: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_new_user_defaults() {
        let user = UserRecord::new("abc", "Kaito", now());
        assert_eq!(user.level, 1);
        assert_eq!(user.cur_health, user.max_health);
        assert!(!user.is_training());
        assert!(user.training_started_at.is_none());
    }

    #[test]
    fn test_role_permissions() {
        assert!(!UserRole::User.can_change_content());
        assert!(UserRole::Moderator.can_change_content());
        assert!(UserRole::Admin.can_moderate());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [UserStatus::Awake, UserStatus::Battle, UserStatus::Hospitalized] {
            assert_eq!(status.as_str().parse::<UserStatus>().unwrap(), status);
        }
        assert!("ASLEEP".parse::<UserStatus>().is_err());
    }

    #[test]
    fn test_role_ordering_puts_staff_last() {
        assert!(UserRole::User < UserRole::Moderator);
        assert!(UserRole::Moderator < UserRole::Admin);
    }
}
