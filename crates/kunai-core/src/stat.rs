//! Trainable stats
//!
//! A user trains exactly one stat at a time. The `Stat` enum names the
//! trainable columns; `Stats` holds their values and maps a variant to the
//! single field it reads or mutates, so a training commit touches one column
//! and leaves the other eleven untouched.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the twelve trainable stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    Strength,
    Intelligence,
    Willpower,
    Speed,
    NinjutsuOffence,
    NinjutsuDefence,
    GenjutsuOffence,
    GenjutsuDefence,
    TaijutsuOffence,
    TaijutsuDefence,
    BukijutsuOffence,
    BukijutsuDefence,
}

impl Stat {
    /// All trainable stats, in column order
    pub const ALL: [Stat; 12] = [
        Stat::Strength,
        Stat::Intelligence,
        Stat::Willpower,
        Stat::Speed,
        Stat::NinjutsuOffence,
        Stat::NinjutsuDefence,
        Stat::GenjutsuOffence,
        Stat::GenjutsuDefence,
        Stat::TaijutsuOffence,
        Stat::TaijutsuDefence,
        Stat::BukijutsuOffence,
        Stat::BukijutsuDefence,
    ];

    /// Get the column name for this stat
    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Strength => "strength",
            Stat::Intelligence => "intelligence",
            Stat::Willpower => "willpower",
            Stat::Speed => "speed",
            Stat::NinjutsuOffence => "ninjutsuOffence",
            Stat::NinjutsuDefence => "ninjutsuDefence",
            Stat::GenjutsuOffence => "genjutsuOffence",
            Stat::GenjutsuDefence => "genjutsuDefence",
            Stat::TaijutsuOffence => "taijutsuOffence",
            Stat::TaijutsuDefence => "taijutsuDefence",
            Stat::BukijutsuOffence => "bukijutsuOffence",
            Stat::BukijutsuDefence => "bukijutsuDefence",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stat::ALL
            .iter()
            .find(|stat| stat.as_str() == s)
            .copied()
            .ok_or_else(|| Error::UnknownStat(s.to_string()))
    }
}

/// Stat values for a user
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub strength: f64,
    pub intelligence: f64,
    pub willpower: f64,
    pub speed: f64,
    pub ninjutsu_offence: f64,
    pub ninjutsu_defence: f64,
    pub genjutsu_offence: f64,
    pub genjutsu_defence: f64,
    pub taijutsu_offence: f64,
    pub taijutsu_defence: f64,
    pub bukijutsu_offence: f64,
    pub bukijutsu_defence: f64,
}

impl Stats {
    /// Get the value of a single stat
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Intelligence => self.intelligence,
            Stat::Willpower => self.willpower,
            Stat::Speed => self.speed,
            Stat::NinjutsuOffence => self.ninjutsu_offence,
            Stat::NinjutsuDefence => self.ninjutsu_defence,
            Stat::GenjutsuOffence => self.genjutsu_offence,
            Stat::GenjutsuDefence => self.genjutsu_defence,
            Stat::TaijutsuOffence => self.taijutsu_offence,
            Stat::TaijutsuDefence => self.taijutsu_defence,
            Stat::BukijutsuOffence => self.bukijutsu_offence,
            Stat::BukijutsuDefence => self.bukijutsu_defence,
        }
    }

    /// Increment exactly one stat, leaving all others untouched
    pub fn add(&mut self, stat: Stat, amount: f64) {
        let field = match stat {
            Stat::Strength => &mut self.strength,
            Stat::Intelligence => &mut self.intelligence,
            Stat::Willpower => &mut self.willpower,
            Stat::Speed => &mut self.speed,
            Stat::NinjutsuOffence => &mut self.ninjutsu_offence,
            Stat::NinjutsuDefence => &mut self.ninjutsu_defence,
            Stat::GenjutsuOffence => &mut self.genjutsu_offence,
            Stat::GenjutsuDefence => &mut self.genjutsu_defence,
            Stat::TaijutsuOffence => &mut self.taijutsu_offence,
            Stat::TaijutsuDefence => &mut self.taijutsu_defence,
            Stat::BukijutsuOffence => &mut self.bukijutsu_offence,
            Stat::BukijutsuDefence => &mut self.bukijutsu_defence,
        };
        *field += amount;
    }

    /// Set every stat to the same value
    pub fn fill(value: f64) -> Self {
        let mut stats = Stats::default();
        for stat in Stat::ALL {
            stats.add(stat, value);
        }
        stats
    }

    /// Sum of all stat values
    pub fn total(&self) -> f64 {
        Stat::ALL.iter().map(|&s| self.get(s)).sum()
    }
}
