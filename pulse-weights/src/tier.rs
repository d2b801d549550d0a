//! Data-volume tiers controlling how often weights may be recalculated.
//!
//! Fewer outcomes → longer interval (noisy data must accumulate);
//! more outcomes → shorter interval (the signal supports faster learning).

use chrono::Duration;

use pulse_core::config::WeightConfig;

/// One recalculation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub level: u8,
    /// Minimum interval between recalculations at this tier.
    pub min_interval: Duration,
}

/// Map a platform's total outcome count onto a tier via the three
/// ascending thresholds.
pub fn determine(outcome_count: u64, cfg: &WeightConfig) -> Tier {
    if outcome_count >= cfg.tier3_threshold {
        Tier {
            level: 4,
            min_interval: Duration::hours(12),
        }
    } else if outcome_count >= cfg.tier2_threshold {
        Tier {
            level: 3,
            min_interval: Duration::days(1),
        }
    } else if outcome_count >= cfg.tier1_threshold {
        Tier {
            level: 2,
            min_interval: Duration::days(3),
        }
    } else {
        Tier {
            level: 1,
            min_interval: Duration::days(7),
        }
    }
}
