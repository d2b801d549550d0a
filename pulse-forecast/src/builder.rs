//! The prediction snapshot builder.
//!
//! baseline × (1 + Σ weight·adjustment), with each adjustment clipped
//! individually, the weighted total clipped, and the final value clipped
//! to a fraction range of baseline. Persisted as one upsertable row keyed
//! by publication.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use pulse_core::config::ForecastConfig;
use pulse_core::errors::{PulseError, PulseResult, StorageError};
use pulse_core::factors::{Factor, FactorInputs};
use pulse_core::models::{
    BaselineSource, FactorAdjustment, MeasurePoint, PredictionSnapshot, Publication,
};
use pulse_storage::queries::{
    account_ops, baseline_ops, cache_ops, content_ops, metric_ops, publication_ops, snapshot_ops,
    weight_ops,
};
use pulse_storage::StorageEngine;

use crate::correlator;

fn not_found(entity: &str, key: String) -> PulseError {
    PulseError::Storage(StorageError::NotFound {
        entity: entity.to_string(),
        key,
    })
}

/// Resolve the baseline for one account: the cached row when the daily
/// job has covered the account (the cached row is by construction the most
/// recent recompute), else a real-time own-history estimate, else the
/// configured default.
fn resolve_baseline(
    storage: &StorageEngine,
    account_id: &str,
    cfg: &ForecastConfig,
    now: DateTime<Utc>,
) -> PulseResult<(f64, BaselineSource)> {
    if let Some(cached) = storage.with_reader(|conn| baseline_ops::get_baseline(conn, account_id))? {
        return Ok((cached.baseline_impressions, cached.source));
    }

    let cutoff = now - Duration::days(cfg.baseline.window_days);
    let own = storage.with_reader(|conn| {
        metric_ops::own_history_stats(conn, account_id, MeasurePoint::Primary, cutoff)
    })?;
    if let Some((mean, count)) = own {
        if count >= cfg.baseline.min_sample {
            return Ok((mean, BaselineSource::OwnHistory));
        }
    }

    Ok((cfg.baseline.default_impressions, BaselineSource::Default))
}

/// Build (or rebuild) the prediction snapshot for a publication about to
/// be posted. Upserts by publication; recorded outcomes are untouched.
pub fn build_snapshot(
    storage: &StorageEngine,
    publication_id: i64,
    cfg: &ForecastConfig,
    now: DateTime<Utc>,
) -> PulseResult<PredictionSnapshot> {
    let publication: Publication = storage
        .with_reader(|conn| publication_ops::get_publication(conn, publication_id))?
        .ok_or_else(|| not_found("publication", publication_id.to_string()))?;
    let account = storage
        .with_reader(|conn| account_ops::get_account(conn, &publication.account_id))?
        .ok_or_else(|| not_found("account", publication.account_id.clone()))?;
    let content =
        storage.with_reader(|conn| content_ops::get_content(conn, &publication.content_id))?;

    let (baseline, baseline_source) =
        resolve_baseline(storage, &publication.account_id, cfg, now)?;

    // Platform weights; factors without a stored weight get the uniform share.
    let mut weights: BTreeMap<Factor, f64> = storage
        .with_reader(|conn| weight_ops::get_weights(conn, publication.platform))?
        .into_iter()
        .map(|w| (w.factor, w.weight))
        .collect();
    for factor in Factor::ALL {
        weights.entry(factor).or_insert_with(Factor::uniform_weight);
    }

    let inputs = FactorInputs {
        hook_type: content.as_ref().and_then(|c| c.hook_type.clone()),
        narrative_structure: content.as_ref().and_then(|c| c.narrative_structure.clone()),
        duration_seconds: content.as_ref().and_then(|c| c.duration_seconds),
        bgm_category: content.as_ref().and_then(|c| c.bgm_category.clone()),
        niche: account.niche.clone(),
        posted_at: publication.posted_at,
        tags: publication.tags.clone(),
    };

    let mut adjustments: BTreeMap<Factor, FactorAdjustment> = BTreeMap::new();
    let mut total_adjustment = 0.0;

    for factor in Factor::ALL {
        let (value, raw) = if factor == Factor::CrossAccountPerformance {
            let effect = correlator::cross_account_effect(
                storage,
                &publication.content_id,
                publication.platform,
                &publication.account_id,
                cfg.cross_account_min_sample,
            )?;
            (Some(effect.adjustment.to_string()), effect.adjustment)
        } else {
            let value = factor.resolve_value(&inputs);
            let raw = match value.as_deref() {
                Some(v) => storage
                    .with_reader(|conn| {
                        cache_ops::get_active_adjustment(conn, publication.platform, factor, v)
                    })?
                    .unwrap_or(0.0),
                None => 0.0,
            };
            (value, raw)
        };

        let clipped = raw.clamp(cfg.individual_min, cfg.individual_max);
        let weight = weights[&factor];
        total_adjustment += weight * clipped;
        adjustments.insert(
            factor,
            FactorAdjustment {
                value,
                adjustment: clipped,
                weight,
            },
        );
    }

    total_adjustment = total_adjustment.clamp(cfg.total_min, cfg.total_max);
    let predicted = (baseline * (1.0 + total_adjustment)).clamp(
        baseline * cfg.value_min_ratio,
        baseline * cfg.value_max_ratio,
    );

    let snapshot = PredictionSnapshot {
        publication_id,
        content_id: publication.content_id.clone(),
        account_id: publication.account_id.clone(),
        baseline_used: baseline,
        baseline_source,
        adjustments,
        total_adjustment,
        predicted_impressions: predicted,
        actual_initial: None,
        actual_primary: None,
        actual_extended: None,
        error_primary: None,
        error_extended: None,
        created_at: now,
        updated_at: now,
    };
    storage.with_writer(|conn| snapshot_ops::upsert_snapshot(conn, &snapshot))?;

    info!(
        publication_id,
        platform = publication.platform.as_str(),
        baseline,
        baseline_source = baseline_source.as_str(),
        total_adjustment,
        predicted,
        "prediction snapshot created"
    );
    Ok(snapshot)
}
