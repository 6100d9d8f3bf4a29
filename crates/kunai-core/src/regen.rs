//! Regeneration refresh policy
//!
//! Every authenticated read passes the stored record through this policy.
//! If enough time has passed since the last refresh (or the caller forces
//! one because it is about to act on the pools), the four pools are
//! recomputed from the regeneration rate and the elapsed time, and a
//! write-back payload is produced for the store. The write-back carries only
//! the pools and the two timestamps; the caller issues it without waiting
//! and keeps the in-memory values either way.
//!
//! Energy does not regenerate while a training session is active (it is
//! being consumed instead). Health, stamina, and chakra regenerate in every
//! status, including hospitalization.

use crate::pool::regenerate;
use crate::time::seconds_passed;
use crate::user::UserRecord;
use chrono::{DateTime, Utc};

/// Pool refresh is persisted when a record is older than this many seconds
pub const REGEN_INTERVAL_SECONDS: f64 = 300.0;

/// The fields a regeneration refresh writes back to the store
#[derive(Debug, Clone, PartialEq)]
pub struct PoolWriteBack {
    pub user_id: String,
    pub cur_health: f64,
    pub cur_stamina: f64,
    pub cur_chakra: f64,
    pub cur_energy: f64,
    pub updated_at: DateTime<Utc>,
    pub regen_at: DateTime<Utc>,
}

/// Apply the refresh policy to a record.
///
/// The record's `regeneration` should already include any bloodline bonus;
/// the bonus lives only in the in-memory record, never in the write-back.
///
/// Returns the write-back payload when the record was stale (older than
/// [`REGEN_INTERVAL_SECONDS`]) or `force` was set, after updating the
/// record's pools and timestamps in place. Returns `None` when nothing
/// needed to change.
pub fn refresh_pools(
    user: &mut UserRecord,
    now: DateTime<Utc>,
    force: bool,
) -> Option<PoolWriteBack> {
    let since_update = seconds_passed(user.updated_at, now);
    if since_update <= REGEN_INTERVAL_SECONDS && !force {
        return None;
    }

    let elapsed = seconds_passed(user.regen_at, now);
    user.cur_health = regenerate(user.cur_health, user.max_health, user.regeneration, elapsed);
    user.cur_stamina = regenerate(user.cur_stamina, user.max_stamina, user.regeneration, elapsed);
    user.cur_chakra = regenerate(user.cur_chakra, user.max_chakra, user.regeneration, elapsed);
    if !user.is_training() {
        user.cur_energy = regenerate(user.cur_energy, user.max_energy, user.regeneration, elapsed);
    }
    user.updated_at = now;
    user.regen_at = now;

    Some(PoolWriteBack {
        user_id: user.user_id.clone(),
        cur_health: user.cur_health,
        cur_stamina: user.cur_stamina,
        cur_chakra: user.cur_chakra,
        cur_energy: user.cur_energy,
        updated_at: user.updated_at,
        regen_at: user.regen_at,
    })
}
