//! Level curves and pool capacity formulas
//!
//! Experience requirements grow quadratically in level. Pool capacities are
//! linear in level and are recomputed whenever a level changes hands, both
//! for player level-ups and for AI records rescaled by content staff.

use crate::stat::{Stat, Stats};
use crate::user::UserRecord;

/// Total experience required to advance past the given level
pub fn calc_level_requirements(level: u32) -> f64 {
    let l = level as f64;
    500.0 * l * l
}

/// Maximum health at a level
pub fn calc_hp(level: u32) -> f64 {
    100.0 + 20.0 * (level.saturating_sub(1)) as f64
}

/// Maximum stamina at a level
pub fn calc_sp(level: u32) -> f64 {
    100.0 + 15.0 * (level.saturating_sub(1)) as f64
}

/// Maximum chakra at a level
pub fn calc_cp(level: u32) -> f64 {
    100.0 + 15.0 * (level.saturating_sub(1)) as f64
}

/// Rescale an AI record's pools, experience, and stats from its level.
///
/// Pools are set to the level's capacities and filled. Experience is set to
/// the requirement of the previous level (the point where this level was
/// reached) and split evenly across the twelve trainable stats.
pub fn scale_ai_stats(user: &mut UserRecord) {
    user.max_health = calc_hp(user.level);
    user.max_stamina = calc_sp(user.level);
    user.max_chakra = calc_cp(user.level);
    user.cur_health = user.max_health;
    user.cur_stamina = user.max_stamina;
    user.cur_chakra = user.max_chakra;
    user.cur_energy = user.max_energy;

    user.experience = calc_level_requirements(user.level.saturating_sub(1));
    let per_stat = (user.experience / Stat::ALL.len() as f64).floor();
    user.stats = Stats::fill(per_stat);
}
