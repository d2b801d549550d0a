//! Error-correlation statistics: how much each factor contributed to
//! prediction accuracy over the trailing window.

use std::collections::BTreeMap;

use pulse_core::factors::Factor;

/// One factor's slice of one errored snapshot.
#[derive(Debug, Clone)]
pub struct FactorOutcome {
    /// The clipped adjustment that was applied.
    pub adjustment: f64,
    /// The weight that was applied.
    pub weight: f64,
    /// Observed views at the primary round.
    pub actual: f64,
    /// Baseline used by the snapshot.
    pub baseline: f64,
}

/// Raw contribution per factor: `direction_accuracy × avg_impact`.
///
/// `direction_accuracy` is the fraction of cases where the adjustment
/// pointed the same way the outcome deviated from baseline
/// (`sign(adjustment × (actual − baseline)) > 0`); `avg_impact` is the
/// mean of `|adjustment × weight|`. Factors with no observations get 0.
pub fn raw_contributions(
    outcomes: &BTreeMap<Factor, Vec<FactorOutcome>>,
) -> BTreeMap<Factor, f64> {
    let mut contributions = BTreeMap::new();
    for factor in Factor::ALL {
        let rows = outcomes.get(&factor).map(Vec::as_slice).unwrap_or(&[]);
        if rows.is_empty() {
            contributions.insert(factor, 0.0);
            continue;
        }

        let mut aligned = 0usize;
        let mut impact_sum = 0.0;
        for row in rows {
            if row.adjustment * (row.actual - row.baseline) > 0.0 {
                aligned += 1;
            }
            impact_sum += (row.adjustment * row.weight).abs();
        }
        let direction_accuracy = aligned as f64 / rows.len() as f64;
        let avg_impact = impact_sum / rows.len() as f64;
        contributions.insert(factor, direction_accuracy * avg_impact);
    }
    contributions
}
