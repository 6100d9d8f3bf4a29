//! Relation and dependent-row models.
//!
//! Bloodlines, villages, and jutsus are referenced by user rows and survive
//! user deletion. Everything keyed by `user_id` below is a dependent row and
//! is removed together with its user in one transaction.

use kunai_core::{Bloodline, Village};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Report statuses that count as pending for moderators.
pub const REPORT_STATUS_UNVIEWED: &str = "UNVIEWED";
pub const REPORT_STATUS_BAN_ESCALATED: &str = "BAN_ESCALATED";
pub const REPORT_STATUS_RESOLVED: &str = "RESOLVED";

/// Stored bloodline: grants an additive regeneration bonus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredBloodline {
    #[primary_key]
    pub id: String,
    pub name: String,
    pub regen_increase: f64,
}

impl StoredBloodline {
    pub fn from_bloodline(b: &Bloodline) -> Self {
        Self {
            id: b.id.clone(),
            name: b.name.clone(),
            regen_increase: b.regen_increase,
        }
    }

    pub fn to_bloodline(&self) -> Bloodline {
        Bloodline {
            id: self.id.clone(),
            name: self.name.clone(),
            regen_increase: self.regen_increase,
        }
    }
}

/// Stored village.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredVillage {
    #[primary_key]
    pub id: String,
    pub name: String,
    pub sector: u32,
}

impl StoredVillage {
    pub fn from_village(v: &Village) -> Self {
        Self {
            id: v.id.clone(),
            name: v.name.clone(),
            sector: v.sector,
        }
    }

    pub fn to_village(&self) -> Village {
        Village {
            id: self.id.clone(),
            name: self.name.clone(),
            sector: self.sector,
        }
    }
}

/// Stored jutsu definition (shared content, not user-dependent).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct StoredJutsu {
    #[primary_key]
    pub id: String,
    pub name: String,
}

/// Jutsu known by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 5, version = 1)]
#[native_db]
pub struct StoredUserJutsu {
    #[primary_key]
    pub id: String,
    #[secondary_key]
    pub user_id: String,
    pub jutsu_id: String,
    pub level: u32,
    pub equipped: bool,
}

/// Free-form attribute attached to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 6, version = 1)]
#[native_db]
pub struct StoredUserAttribute {
    #[primary_key]
    pub id: String,
    #[secondary_key]
    pub user_id: String,
    pub attribute: String,
}

/// Forum post authored by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 7, version = 1)]
#[native_db]
pub struct StoredForumPost {
    #[primary_key]
    pub id: String,
    #[secondary_key]
    pub user_id: String,
    pub content: String,
    pub created_at: i64,
}

/// Report filed against a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 8, version = 1)]
#[native_db]
pub struct StoredReport {
    #[primary_key]
    pub id: String,
    /// The reported user.
    #[secondary_key]
    pub user_id: String,
    pub reporter_user_id: String,
    pub status: String,
    pub created_at: i64,
}

/// Audit log row describing a content change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 9, version = 1)]
#[native_db]
pub struct StoredActionLog {
    #[primary_key]
    pub id: String,
    /// The acting user.
    #[secondary_key]
    pub user_id: String,
    pub table_name: String,
    pub changes: Vec<String>,
    pub related_id: String,
    pub related_msg: String,
    pub related_image: String,
    pub created_at: i64,
}
