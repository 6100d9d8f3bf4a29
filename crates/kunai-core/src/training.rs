//! Training accrual
//!
//! A training session converts elapsed time into energy expenditure and an
//! equal stat/experience gain. The gain is floored to a whole number and
//! capped at the energy the user actually has, so a session can never drive
//! energy negative and fractional gains are discarded rather than carried
//! over to the next session.

/// Energy consumed (and stat/experience gained) per second of training
pub const ENERGY_SPENT_PER_SECOND: f64 = 0.5;

/// Gain for a training session.
///
/// Returns `min(floor(rate * elapsed_seconds), cur_energy)`, never negative.
pub fn training_gain(rate: f64, elapsed_seconds: f64, cur_energy: f64) -> f64 {
    let earned = (rate * elapsed_seconds.max(0.0)).floor();
    earned.min(cur_energy).max(0.0)
}
