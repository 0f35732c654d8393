//! Exponential backoff with jitter, scaled by backlog tier.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffConfig {
    pub base_delay_seconds: i64,
    pub multiplier: f64,
    pub max_delay_seconds: i64,
    pub jitter_factor: f64,
}

pub const DEFAULT_BACKOFF: BackoffConfig = BackoffConfig {
    base_delay_seconds: 900,
    multiplier: 2.0,
    max_delay_seconds: 86_400,
    jitter_factor: 0.25,
};

/// Backlog tier delays, in days, used by maintenance's backlog recovery
/// pass rather than the per-attempt exponential curve below: tier 1 waits a
/// week before its next eligible search, tier 2 a month, tier 3 a quarter.
pub const TIER_FLOOR_DAYS: [i64; 3] = [7, 30, 90];

pub fn tier_delay_seconds(tier: u32) -> i64 {
    TIER_FLOOR_DAYS.get(tier.saturating_sub(1) as usize).copied().unwrap_or(0) * 86_400
}

/// `attempt` is 1-based (first failed attempt == 1). Ignores backlog tier;
/// tiered content uses [`tier_delay_seconds`] once it reaches `Exhausted`.
pub fn backoff_delay_seconds(config: &BackoffConfig, attempt: i32, _tier: u32) -> i64 {
    let exponent = (attempt - 1).max(0) as f64;
    let raw = config.base_delay_seconds as f64 * config.multiplier.powf(exponent);
    let capped = raw.min(config.max_delay_seconds as f64);

    let jitter = {
        let mut rng = rand::thread_rng();
        let spread = capped * config.jitter_factor;
        rng.gen_range(-spread..=spread)
    };
    (capped + jitter).clamp(1.0, config.max_delay_seconds as f64) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_exponentially_with_attempt_count() {
        let d1 = backoff_delay_seconds(&DEFAULT_BACKOFF, 1, 0);
        let d2 = backoff_delay_seconds(&DEFAULT_BACKOFF, 2, 0);
        assert!(d2 > d1 / 2, "expected roughly doubling, got {d1} then {d2}");
    }

    #[test]
    fn never_exceeds_the_configured_maximum() {
        for attempt in 1..20 {
            let delay = backoff_delay_seconds(&DEFAULT_BACKOFF, attempt, 0);
            assert!(delay <= DEFAULT_BACKOFF.max_delay_seconds);
        }
    }

    #[test]
    fn tier_delays_match_the_documented_schedule() {
        assert_eq!(tier_delay_seconds(1), 7 * 86_400);
        assert_eq!(tier_delay_seconds(2), 30 * 86_400);
        assert_eq!(tier_delay_seconds(3), 90 * 86_400);
    }
}
