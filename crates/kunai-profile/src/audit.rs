//! Human-readable change descriptions
//!
//! Content edits are audited as a list of strings describing what changed,
//! one per field. The same list goes into the action log and out through the
//! notification sink, so staff can review edits without replaying records.

use kunai_core::{Stat, UserRecord};
use std::fmt::Display;

fn diff_field<T: PartialEq + Display>(out: &mut Vec<String>, field: &str, old: &T, new: &T) {
    if old != new {
        out.push(format!("{field} changed from {old} to {new}"));
    }
}

/// Describe every field that differs between two user snapshots.
pub fn diff_records(old: &UserRecord, new: &UserRecord) -> Vec<String> {
    let mut out = Vec::new();
    diff_field(&mut out, "username", &old.username, &new.username);
    diff_field(&mut out, "gender", &old.gender, &new.gender);
    diff_field(&mut out, "avatar", &old.avatar, &new.avatar);
    diff_field(&mut out, "rank", &old.rank, &new.rank);
    diff_field(&mut out, "level", &old.level, &new.level);
    diff_field(&mut out, "experience", &old.experience, &new.experience);
    diff_field(&mut out, "regeneration", &old.regeneration, &new.regeneration);
    diff_field(&mut out, "maxHealth", &old.max_health, &new.max_health);
    diff_field(&mut out, "maxStamina", &old.max_stamina, &new.max_stamina);
    diff_field(&mut out, "maxChakra", &old.max_chakra, &new.max_chakra);
    diff_field(&mut out, "maxEnergy", &old.max_energy, &new.max_energy);
    for stat in Stat::ALL {
        let (o, n) = (old.stats.get(stat), new.stats.get(stat));
        if o != n {
            out.push(format!("{stat} changed from {o} to {n}"));
        }
    }
    out
}

/// Describe additions and removals between two name lists.
pub fn diff_names(label: &str, old: &[String], new: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for name in old {
        if !new.contains(name) {
            out.push(format!("Removed {label} {name}"));
        }
    }
    for name in new {
        if !old.contains(name) {
            out.push(format!("Added {label} {name}"));
        }
    }
    out
}
