//! Regenerated user fetch
//!
//! Every authenticated read goes through [`ProfileService::fetch_regenerated_user`]:
//! the stored record is pulled with its relations, the bloodline bonus is
//! folded into the in-memory regeneration rate, and the refresh policy from
//! `kunai-core` is applied.
//!
//! How a produced write-back is persisted depends on the caller. Plain
//! reads persist it on a detached blocking task; the response never waits
//! on it, and a failed write-back only costs the next reader a
//! recomputation. Mutations (`force = true`) settle the write-back before
//! returning: they commit against the refreshed pools next, and a detached
//! write-back landing after that commit would overwrite it with the
//! pre-commit pool values.

use crate::error::{Error, Result};
use crate::service::ProfileService;
use kunai_core::refresh_pools;
use kunai_db::UserWithRelations;
use std::sync::Arc;

impl ProfileService {
    /// Fetch a user with relations and refreshed pools.
    ///
    /// `force` applies the refresh even when the record is fresh; mutations
    /// that act on pool values pass `true` so they decide on current
    /// numbers. On the forced path the write-back is persisted before this
    /// returns, so the caller's follow-up commit cannot be overwritten by a
    /// late write-back.
    pub fn fetch_regenerated_user(&self, user_id: &str, force: bool) -> Result<UserWithRelations> {
        let mut fetched = self
            .store
            .fetch_user_with_relations(user_id)?
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;

        // The bonus lives only in this in-memory record; the write-back
        // carries pools and timestamps, never the rate.
        if let Some(bloodline) = &fetched.bloodline {
            fetched.user.regeneration += bloodline.regen_increase;
        }

        let now = self.clock.now();
        if let Some(write_back) = refresh_pools(&mut fetched.user, now, force) {
            if force {
                self.store.write_back_pools(&write_back)?;
            } else {
                let store = Arc::clone(&self.store);
                tokio::task::spawn_blocking(move || {
                    if let Err(err) = store.write_back_pools(&write_back) {
                        tracing::warn!(
                            user_id = %write_back.user_id,
                            error = %err,
                            "pool write-back failed"
                        );
                    }
                });
            }
        }

        Ok(fetched)
    }
}
