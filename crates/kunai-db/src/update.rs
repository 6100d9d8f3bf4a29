//! Conditional user updates.
//!
//! Mutations that depend on a prior read commit through
//! [`Store::update_user_if`]: the precondition observed at read time is
//! re-checked against the stored row inside one read-write transaction, and
//! the update applies only if it still holds. `native_db` serializes
//! read-write transactions, which makes the read-check-write sequence an
//! atomic compare-and-swap. A `false` return means the caller lost a race;
//! it is normal flow, not an error.

use crate::error::{Error, Result};
use crate::models::StoredUser;
use crate::store::Store;
use kunai_core::{PoolWriteBack, UserRecord};

/// Precondition a conditional update is gated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserPrecondition {
    /// No training session active.
    Idle,
    /// A training session is active.
    Training,
    /// The stored level still matches the level read.
    LevelIs(u32),
    /// The deletion timer is running (`true`) or stopped (`false`).
    DeletionTimerRunning(bool),
}

impl UserPrecondition {
    /// Check the precondition against a stored record.
    pub fn holds(&self, user: &UserRecord) -> bool {
        match self {
            UserPrecondition::Idle => user.currently_training.is_none(),
            UserPrecondition::Training => user.currently_training.is_some(),
            UserPrecondition::LevelIs(level) => user.level == *level,
            UserPrecondition::DeletionTimerRunning(running) => {
                user.deletion_at.is_some() == *running
            }
        }
    }
}

impl Store {
    /// Update a user if the precondition still holds.
    ///
    /// Returns `Ok(true)` when the update committed, `Ok(false)` when the
    /// precondition failed (the row is left untouched), and an error only
    /// when the user row does not exist at all.
    pub fn update_user_if(
        &self,
        user_id: &str,
        precondition: UserPrecondition,
        apply: impl FnOnce(&mut UserRecord),
    ) -> Result<bool> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredUser> = rw.get().primary(user_id.to_string())?;
        let Some(stored) = stored else {
            return Err(Error::NotFound(format!("user: {user_id}")));
        };
        let mut user = stored.to_user();
        if !precondition.holds(&user) {
            // Transaction dropped without commit; nothing written.
            return Ok(false);
        }
        apply(&mut user);
        rw.upsert(StoredUser::from_user(&user))?;
        rw.commit()?;
        Ok(true)
    }

    /// Persist a regeneration write-back.
    ///
    /// Only the four current pools and the refresh timestamps are written;
    /// every other column keeps whatever the row holds now. A user deleted
    /// since the read is not an error (the write-back is best effort).
    pub fn write_back_pools(&self, wb: &PoolWriteBack) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredUser> = rw.get().primary(wb.user_id.clone())?;
        let Some(mut stored) = stored else {
            return Ok(());
        };
        stored.cur_health = wb.cur_health;
        stored.cur_stamina = wb.cur_stamina;
        stored.cur_chakra = wb.cur_chakra;
        stored.cur_energy = wb.cur_energy;
        stored.updated_at = wb.updated_at.timestamp_millis();
        stored.regen_at = wb.regen_at.timestamp_millis();
        rw.upsert(stored)?;
        rw.commit()?;
        Ok(())
    }
}
