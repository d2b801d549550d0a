//! The smoothing pipeline: normalize → EMA → clip → floor → renormalize.

use std::collections::BTreeMap;

use pulse_core::config::WeightConfig;
use pulse_core::factors::Factor;

/// One factor's transition through the pipeline.
#[derive(Debug, Clone)]
pub struct SmoothedWeight {
    pub factor: Factor,
    pub old: f64,
    pub calculated: f64,
    pub new: f64,
}

/// Normalize raw contributions to sum 1.0, falling back to uniform shares
/// when the total is zero (no usable signal yet).
pub fn normalize_contributions(raw: &BTreeMap<Factor, f64>) -> BTreeMap<Factor, f64> {
    let total: f64 = Factor::ALL.iter().map(|f| raw.get(f).copied().unwrap_or(0.0)).sum();
    let mut normalized = BTreeMap::new();
    for factor in Factor::ALL {
        let value = if total == 0.0 {
            Factor::uniform_weight()
        } else {
            raw.get(&factor).copied().unwrap_or(0.0) / total
        };
        normalized.insert(factor, value);
    }
    normalized
}

/// Blend calculated weights into the old ones and bound the movement:
///
/// 1. EMA: `new = α·calculated + (1−α)·old`
/// 2. clip to within ±max_change_rate of the old weight
/// 3. raise to the floor
/// 4. renormalize so the platform's weights again sum to 1.0
pub fn smooth(
    old: &BTreeMap<Factor, f64>,
    calculated: &BTreeMap<Factor, f64>,
    cfg: &WeightConfig,
) -> Vec<SmoothedWeight> {
    let mut smoothed = Vec::with_capacity(Factor::COUNT);
    for factor in Factor::ALL {
        let old_w = old.get(&factor).copied().unwrap_or_else(Factor::uniform_weight);
        let calc_w = calculated
            .get(&factor)
            .copied()
            .unwrap_or_else(Factor::uniform_weight);

        let ema = cfg.smoothing_alpha * calc_w + (1.0 - cfg.smoothing_alpha) * old_w;
        let lo = old_w * (1.0 - cfg.max_change_rate);
        let hi = old_w * (1.0 + cfg.max_change_rate);
        let clipped = ema.clamp(lo, hi);
        let floored = clipped.max(cfg.floor);

        smoothed.push(SmoothedWeight {
            factor,
            old: old_w,
            calculated: calc_w,
            new: floored,
        });
    }

    let total: f64 = smoothed.iter().map(|w| w.new).sum();
    if total > 0.0 {
        for w in &mut smoothed {
            w.new /= total;
        }
    }
    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform() -> BTreeMap<Factor, f64> {
        Factor::ALL
            .into_iter()
            .map(|f| (f, Factor::uniform_weight()))
            .collect()
    }

    #[test]
    fn ema_blends_exactly() {
        // old=0.15, calculated=0.25, α=0.3 → 0.3·0.25 + 0.7·0.15 = 0.18
        let cfg = WeightConfig {
            smoothing_alpha: 0.3,
            ..Default::default()
        };
        let ema = cfg.smoothing_alpha * 0.25 + (1.0 - cfg.smoothing_alpha) * 0.15;
        assert!((ema - 0.18).abs() < 1e-12);
    }

    #[test]
    fn clip_bounds_movement_to_rate_of_old() {
        // old=0.15, maxRate=0.2 → bounded to [0.12, 0.18] however extreme
        // the calculated value.
        let cfg = WeightConfig {
            smoothing_alpha: 1.0, // EMA = calculated, worst case
            max_change_rate: 0.2,
            floor: 0.0,
            ..Default::default()
        };
        let mut old = uniform();
        old.insert(Factor::HookType, 0.15);

        let mut high = uniform();
        high.insert(Factor::HookType, 0.9);
        let pre_norm_hi = {
            let ema: f64 = 0.9;
            ema.clamp(0.15 * 0.8, 0.15 * 1.2)
        };
        assert!((pre_norm_hi - 0.18).abs() < 1e-12);

        let mut low = uniform();
        low.insert(Factor::HookType, 0.0);
        let pre_norm_lo = {
            let ema: f64 = 0.0;
            ema.clamp(0.15 * 0.8, 0.15 * 1.2)
        };
        assert!((pre_norm_lo - 0.12).abs() < 1e-12);

        // End-to-end: the smoothed outputs stay normalized.
        let result = smooth(&old, &high, &cfg);
        let sum: f64 = result.iter().map(|w| w.new).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn floor_raises_tiny_weights_before_renormalization() {
        let cfg = WeightConfig {
            smoothing_alpha: 1.0,
            max_change_rate: 1.0, // wide clip so the floor is what binds
            floor: 0.02,
            ..Default::default()
        };
        let mut old = uniform();
        old.insert(Factor::SoundBgm, 0.01);
        let mut calc = uniform();
        calc.insert(Factor::SoundBgm, 0.0);

        let result = smooth(&old, &calc, &cfg);
        let bgm = result.iter().find(|w| w.factor == Factor::SoundBgm).unwrap();
        // Floored to 0.02 pre-normalization; renormalization divides by a
        // total slightly above 1, so the final value stays near the floor.
        assert!(bgm.new > 0.0);
        let sum: f64 = result.iter().map(|w| w.new).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_fallback_when_no_contribution_signal() {
        let raw: BTreeMap<Factor, f64> = Factor::ALL.into_iter().map(|f| (f, 0.0)).collect();
        let normalized = normalize_contributions(&raw);
        for value in normalized.values() {
            assert!((value - Factor::uniform_weight()).abs() < 1e-12);
        }
    }

    #[test]
    fn normalized_contributions_sum_to_one() {
        let mut raw = BTreeMap::new();
        raw.insert(Factor::HookType, 0.03);
        raw.insert(Factor::Niche, 0.01);
        let normalized = normalize_contributions(&raw);
        let sum: f64 = normalized.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((normalized[&Factor::HookType] - 0.75).abs() < 1e-9);
    }
}
