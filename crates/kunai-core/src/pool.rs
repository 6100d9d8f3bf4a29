//! Resource pool regeneration
//!
//! A pool is a capped, regenerating numeric resource (health, stamina,
//! chakra, energy). Recovery is linear in elapsed wall-clock time and is
//! always clamped to the pool's capacity.

/// Regenerate a pool value.
///
/// Returns `min(current + rate_per_second * elapsed_seconds, capacity)`.
///
/// Negative elapsed time (clock skew between reads) is treated as zero so a
/// pool can never regress from regeneration alone. The function is pure and
/// total; when `current <= capacity` the result is always within
/// `[current, capacity]`.
pub fn regenerate(current: f64, capacity: f64, rate_per_second: f64, elapsed_seconds: f64) -> f64 {
    let elapsed = elapsed_seconds.max(0.0);
    (current + rate_per_second * elapsed).min(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regenerate_basic() {
        assert_eq!(regenerate(50.0, 100.0, 2.0, 10.0), 70.0);
    }

    #[test]
    fn test_regenerate_clamps_to_capacity() {
        // 50 + 2 * 300 = 650, clamped to 100
        assert_eq!(regenerate(50.0, 100.0, 2.0, 300.0), 100.0);
    }

    #[test]
    fn test_regenerate_negative_elapsed_is_zero() {
        assert_eq!(regenerate(50.0, 100.0, 2.0, -30.0), 50.0);
    }

    #[test]
    fn test_regenerate_zero_rate() {
        assert_eq!(regenerate(50.0, 100.0, 0.0, 1000.0), 50.0);
    }

    #[test]
    fn test_regenerate_result_bounds() {
        // Result stays within [current, capacity] for current <= capacity
        for &(v, c, r, t) in &[
            (0.0, 100.0, 1.5, 10.0),
            (99.9, 100.0, 5.0, 60.0),
            (25.0, 25.0, 3.0, 1.0),
            (10.0, 200.0, 0.25, 100000.0),
        ] {
            let out = regenerate(v, c, r, t);
            assert!(out >= v, "regressed: {} < {}", out, v);
            assert!(out <= c, "overflowed: {} > {}", out, c);
        }
    }
}
