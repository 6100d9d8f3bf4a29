//! User model for database storage.

use chrono::{DateTime, Utc};
use kunai_core::{Stats, UserRecord};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

fn to_millis(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Stored user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredUser {
    /// Primary key - opaque user id.
    #[primary_key]
    pub user_id: String,
    #[secondary_key]
    pub username: String,
    pub gender: String,
    pub avatar: String,
    pub role: String,
    pub rank: String,
    pub status: String,
    pub is_ai: bool,
    pub approved_tos: bool,
    pub is_banned: bool,
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
    pub regeneration: f64,
    /// Serialized stat block.
    pub stats: Vec<u8>,
    /// Stat name while training, paired with `training_started_at`.
    pub currently_training: Option<String>,
    pub training_started_at: Option<i64>,
    pub deletion_at: Option<i64>,
    pub updated_at: i64,
    pub regen_at: i64,
    pub bloodline_id: Option<String>,
    pub village_id: Option<String>,
}

impl StoredUser {
    /// Create from a domain record.
    pub fn from_user(user: &UserRecord) -> Self {
        Self {
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            gender: user.gender.clone(),
            avatar: user.avatar.clone(),
            role: user.role.as_str().to_string(),
            rank: user.rank.clone(),
            status: user.status.as_str().to_string(),
            is_ai: user.is_ai,
            approved_tos: user.approved_tos,
            is_banned: user.is_banned,
            inbox_news: user.inbox_news,
            level: user.level,
            experience: user.experience,
            cur_health: user.cur_health,
            max_health: user.max_health,
            cur_stamina: user.cur_stamina,
            max_stamina: user.max_stamina,
            cur_chakra: user.cur_chakra,
            max_chakra: user.max_chakra,
            cur_energy: user.cur_energy,
            max_energy: user.max_energy,
            regeneration: user.regeneration,
            stats: bincode::serialize(&user.stats).unwrap_or_default(),
            currently_training: user.currently_training.map(|s| s.as_str().to_string()),
            training_started_at: user.training_started_at.map(to_millis),
            deletion_at: user.deletion_at.map(to_millis),
            updated_at: to_millis(user.updated_at),
            regen_at: to_millis(user.regen_at),
            bloodline_id: user.bloodline_id.clone(),
            village_id: user.village_id.clone(),
        }
    }

    /// Convert to a domain record.
    pub fn to_user(&self) -> UserRecord {
        let stats: Stats = bincode::deserialize(&self.stats).unwrap_or_default();
        let currently_training = self
            .currently_training
            .as_deref()
            .and_then(|s| s.parse().ok());
        UserRecord {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            gender: self.gender.clone(),
            avatar: self.avatar.clone(),
            role: self.role.parse().unwrap_or_default(),
            rank: self.rank.clone(),
            status: self.status.parse().unwrap_or_default(),
            is_ai: self.is_ai,
            approved_tos: self.approved_tos,
            is_banned: self.is_banned,
            inbox_news: self.inbox_news,
            level: self.level,
            experience: self.experience,
            cur_health: self.cur_health,
            max_health: self.max_health,
            cur_stamina: self.cur_stamina,
            max_stamina: self.max_stamina,
            cur_chakra: self.cur_chakra,
            max_chakra: self.max_chakra,
            cur_energy: self.cur_energy,
            max_energy: self.max_energy,
            regeneration: self.regeneration,
            stats,
            currently_training,
            training_started_at: self.training_started_at.map(from_millis),
            deletion_at: self.deletion_at.map(from_millis),
            updated_at: from_millis(self.updated_at),
            regen_at: from_millis(self.regen_at),
            bloodline_id: self.bloodline_id.clone(),
            village_id: self.village_id.clone(),
        }
    }
}
