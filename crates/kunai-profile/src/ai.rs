//! AI (non-player character) management
//!
//! AI records live in the same user table as players. Creating, editing,
//! and deleting them is restricted to content staff; edits are rescaled
//! from the AI's level, audited as a human-readable diff, and announced
//! through the notification sink on a best-effort basis.

use crate::audit::{diff_names, diff_records};
use crate::error::{Error, Result};
use crate::notify::ContentUpdate;
use crate::service::ProfileService;
use kunai_core::{new_user_id, scale_ai_stats, ActionResponse, UserRecord};
use kunai_db::{StoredActionLog, StoredUserJutsu};

/// Fields content staff may edit on an AI record
#[derive(Debug, Clone)]
pub struct AiUpdate {
    pub username: String,
    pub gender: String,
    pub avatar: String,
    pub level: u32,
    pub regeneration: f64,
    /// Full replacement set of known jutsus
    pub jutsu_ids: Vec<String>,
}

impl ProfileService {
    /// Fetch an AI record and its jutsus
    pub fn get_ai(&self, ai_id: &str) -> Result<(UserRecord, Vec<StoredUserJutsu>)> {
        let user = self
            .store
            .fetch_user(ai_id)?
            .filter(|u| u.is_ai)
            .ok_or_else(|| Error::UserNotFound(ai_id.to_string()))?;
        let jutsus = self.store.user_jutsus(ai_id)?;
        Ok((user, jutsus))
    }

    /// Create a blank AI record; the success message carries its id
    pub fn create_ai(&self, actor_id: &str) -> Result<ActionResponse> {
        let actor = self.require_user(actor_id)?;
        if !actor.role.can_change_content() {
            return Ok(ActionResponse::failed("Not allowed to create AI"));
        }
        let now = self.clock.now();
        let mut ai = UserRecord::new(new_user_id(), "New AI", now);
        ai.is_ai = true;
        ai.approved_tos = true;
        ai.level = 999;
        self.store.save_user(&ai)?;
        Ok(ActionResponse::ok(ai.user_id))
    }

    /// Delete an AI record and all its dependent rows
    pub fn delete_ai(&self, actor_id: &str, ai_id: &str) -> Result<ActionResponse> {
        let actor = self.require_user(actor_id)?;
        let target = self.store.fetch_user(ai_id)?;
        match target {
            Some(ai) if ai.is_ai && actor.role.can_change_content() => {
                self.store.delete_user_cascade(&ai.user_id)?;
                Ok(ActionResponse::ok("AI deleted"))
            }
            _ => Ok(ActionResponse::failed("Not allowed to delete AI")),
        }
    }

    /// Apply an edit to an AI record.
    ///
    /// Pools, experience, and stats are rescaled from the new level. The
    /// jutsu set is replaced only when it actually changed. Every committed
    /// edit leaves an action-log row and a notification; the success message
    /// repeats the diff.
    pub fn update_ai(&self, actor_id: &str, ai_id: &str, data: AiUpdate) -> Result<ActionResponse> {
        let actor = self.require_user(actor_id)?;
        let target = self.store.fetch_user(ai_id)?.filter(|u| u.is_ai);
        let Some(old) = target else {
            return Ok(ActionResponse::failed("Not allowed to edit AI"));
        };
        if !actor.role.can_change_content() {
            return Ok(ActionResponse::failed("Not allowed to edit AI"));
        }

        let old_rows = self.store.user_jutsus(ai_id)?;
        let mut old_ids: Vec<String> = old_rows.into_iter().map(|j| j.jutsu_id).collect();
        let mut new_ids = data.jutsu_ids.clone();
        old_ids.sort();
        new_ids.sort();
        let jutsus_changed = old_ids != new_ids;

        let mut updated = old.clone();
        updated.username = data.username;
        updated.gender = data.gender;
        updated.avatar = data.avatar;
        updated.level = data.level;
        updated.regeneration = data.regeneration;
        scale_ai_stats(&mut updated);

        let mut changes = diff_records(&old, &updated);
        if jutsus_changed {
            // Diff over names, not ids, so the log reads like the change
            let mut all = old_ids.clone();
            all.extend(new_ids.iter().cloned());
            let names = self.store.jutsu_names(&all)?;
            let name_of = |id: &String| {
                names
                    .iter()
                    .find(|(jutsu_id, _)| jutsu_id == id)
                    .map(|(_, name)| name.clone())
                    .unwrap_or_else(|| id.clone())
            };
            let old_names: Vec<String> = old_ids.iter().map(name_of).collect();
            let new_names: Vec<String> = new_ids.iter().map(name_of).collect();
            changes.extend(diff_names("jutsu", &old_names, &new_names));

            let rows = data
                .jutsu_ids
                .iter()
                .map(|jutsu_id| StoredUserJutsu {
                    id: new_user_id(),
                    user_id: ai_id.to_string(),
                    jutsu_id: jutsu_id.clone(),
                    level: updated.level,
                    equipped: true,
                })
                .collect();
            self.store.set_user_jutsus(ai_id, rows)?;
        }

        self.store.save_user(&updated)?;
        self.store.insert_action_log(&StoredActionLog {
            id: new_user_id(),
            user_id: actor_id.to_string(),
            table_name: "ai".to_string(),
            changes: changes.clone(),
            related_id: old.user_id.clone(),
            related_msg: format!("Update: {}", old.username),
            related_image: old.avatar.clone(),
            created_at: self.clock.now().timestamp_millis(),
        })?;
        self.notify(&ContentUpdate {
            actor: actor.username,
            subject: old.username,
            image: old.avatar,
            changes: changes.clone(),
        });

        Ok(ActionResponse::ok(format!(
            "Data updated: {}",
            changes.join(". ")
        )))
    }
}
