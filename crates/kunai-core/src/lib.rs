//! Kunai Core - Domain model for the kunai game backend
//!
//! This crate provides the pure computation layer shared by the store and
//! the profile service:
//! - Resource pools with capped, time-based regeneration
//! - Trainable stats and the training accrual model
//! - Level curves and pool capacity formulas
//! - The regeneration refresh policy applied on every authenticated read
//!
//! Nothing in this crate performs I/O. All persistence decisions (including
//! the compare-and-swap updates that make the training and level-up
//! transitions race-safe) live in `kunai-db` and `kunai-profile`.

mod error;
mod id;
mod level;
mod pool;
mod regen;
mod response;
mod stat;
mod time;
mod training;
mod user;

pub use error::{Error, Result};
pub use id::new_user_id;
pub use level::{calc_cp, calc_hp, calc_level_requirements, calc_sp, scale_ai_stats};
pub use pool::regenerate;
pub use regen::{refresh_pools, PoolWriteBack, REGEN_INTERVAL_SECONDS};
pub use response::ActionResponse;
pub use stat::{Stat, Stats};
pub use time::{seconds_passed, FixedTimeSource, SystemTimeSource, TimeSource};
pub use training::{training_gain, ENERGY_SPENT_PER_SECOND};
pub use user::{Bloodline, UserRecord, UserRole, UserStatus, Village};
