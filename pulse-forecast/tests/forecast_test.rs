use chrono::{Duration, Utc};

use pulse_core::config::ForecastConfig;
use pulse_core::factors::Factor;
use pulse_core::models::*;
use pulse_forecast::{build_snapshot, cross_account_effect, CrossAccountEffect};
use pulse_storage::queries::{
    account_ops, cache_ops, content_ops, metric_ops, publication_ops, snapshot_ops,
};
use pulse_storage::StorageEngine;

fn seed_account(engine: &StorageEngine, account_id: &str) {
    engine
        .with_writer(|conn| {
            account_ops::insert_account(
                conn,
                &Account {
                    account_id: account_id.to_string(),
                    platform: Platform::Tiktok,
                    niche: Some("fitness".to_string()),
                    cluster: None,
                    status: AccountStatus::Active,
                    created_at: Utc::now() - Duration::days(120),
                },
            )
        })
        .unwrap();
}

fn seed_content(engine: &StorageEngine, content_id: &str, hook: Option<&str>) {
    engine
        .with_writer(|conn| {
            content_ops::insert_content(
                conn,
                &ContentMeta {
                    content_id: content_id.to_string(),
                    hook_type: hook.map(str::to_string),
                    narrative_structure: None,
                    duration_seconds: Some(25.0),
                    bgm_category: None,
                },
            )
        })
        .unwrap();
}

fn seed_publication(engine: &StorageEngine, account_id: &str, content_id: &str) -> i64 {
    engine
        .with_writer(|conn| {
            publication_ops::insert_publication(
                conn,
                &Publication {
                    id: 0,
                    content_id: content_id.to_string(),
                    account_id: account_id.to_string(),
                    platform: Platform::Tiktok,
                    posted_at: Some(Utc::now() - Duration::hours(1)),
                    status: PublicationStatus::Posted,
                    tags: vec!["workout".to_string()],
                },
            )
        })
        .unwrap()
}

/// Seed another account's measured publication of the same content,
/// giving the cross-account correlator something to aggregate.
fn seed_peer_outcome(
    engine: &StorageEngine,
    account_id: &str,
    content_id: &str,
    views: u64,
    baseline: f64,
) {
    seed_account(engine, account_id);
    let publication_id = seed_publication(engine, account_id, content_id);
    let now = Utc::now();
    engine
        .with_writer(|conn| {
            snapshot_ops::upsert_snapshot(
                conn,
                &PredictionSnapshot {
                    publication_id,
                    content_id: content_id.to_string(),
                    account_id: account_id.to_string(),
                    baseline_used: baseline,
                    baseline_source: BaselineSource::OwnHistory,
                    adjustments: Default::default(),
                    total_adjustment: 0.0,
                    predicted_impressions: baseline,
                    actual_initial: None,
                    actual_primary: None,
                    actual_extended: None,
                    error_primary: None,
                    error_extended: None,
                    created_at: now,
                    updated_at: now,
                },
            )?;
            metric_ops::upsert_metric(
                conn,
                &OutcomeMetric {
                    publication_id,
                    point: MeasurePoint::Primary,
                    views,
                    likes: None,
                    comments: None,
                    shares: None,
                    engagement_rate: None,
                    measured_at: now,
                },
            )
        })
        .unwrap();
}

// ── End-to-end prediction ────────────────────────────────────────────────

#[test]
fn fresh_account_with_no_signal_predicts_the_default_baseline() {
    let engine = StorageEngine::open_in_memory().unwrap();
    seed_account(&engine, "A1");
    seed_content(&engine, "C1", Some("question"));
    let publication_id = seed_publication(&engine, "A1", "C1");

    let cfg = ForecastConfig::default();
    let snapshot = build_snapshot(&engine, publication_id, &cfg, Utc::now()).unwrap();

    // 0 history, default baseline 500, all nine adjustments 0 → 500.
    assert_eq!(snapshot.baseline_source, BaselineSource::Default);
    assert_eq!(snapshot.baseline_used, 500.0);
    assert_eq!(snapshot.total_adjustment, 0.0);
    assert_eq!(snapshot.predicted_impressions, 500.0);
    assert_eq!(snapshot.adjustments.len(), 9);
    for detail in snapshot.adjustments.values() {
        assert_eq!(detail.adjustment, 0.0);
        assert!((detail.weight - Factor::uniform_weight()).abs() < 1e-9);
    }
}

#[test]
fn cached_baseline_is_authoritative_when_present() {
    let engine = StorageEngine::open_in_memory().unwrap();
    seed_account(&engine, "A1");
    seed_content(&engine, "C1", None);
    let publication_id = seed_publication(&engine, "A1", "C1");

    let now = Utc::now();
    engine
        .with_writer(|conn| {
            pulse_storage::queries::baseline_ops::upsert_baseline(
                conn,
                &AccountBaseline {
                    account_id: "A1".to_string(),
                    baseline_impressions: 1500.0,
                    source: BaselineSource::OwnHistory,
                    sample_count: 8,
                    window_start: now - Duration::days(14),
                    window_end: now,
                    calculated_at: now,
                },
            )
        })
        .unwrap();

    let snapshot = build_snapshot(&engine, publication_id, &ForecastConfig::default(), now).unwrap();
    assert_eq!(snapshot.baseline_used, 1500.0);
    assert_eq!(snapshot.baseline_source, BaselineSource::OwnHistory);
    assert_eq!(snapshot.predicted_impressions, 1500.0);
}

#[test]
fn active_cache_entry_moves_the_prediction_and_is_clipped() {
    let engine = StorageEngine::open_in_memory().unwrap();
    seed_account(&engine, "A1");
    seed_content(&engine, "C1", Some("question"));
    let publication_id = seed_publication(&engine, "A1", "C1");

    // An extreme cached lift for this hook value: must clip to +0.5.
    engine
        .with_writer(|conn| {
            cache_ops::upsert_entry(
                conn,
                &FactorCacheEntry {
                    platform: Platform::Tiktok,
                    factor: Factor::HookType,
                    factor_value: "question".to_string(),
                    adjustment: 3.0,
                    sample_count: 20,
                    is_active: true,
                    calculated_at: Utc::now(),
                },
            )
        })
        .unwrap();

    let cfg = ForecastConfig::default();
    let snapshot = build_snapshot(&engine, publication_id, &cfg, Utc::now()).unwrap();

    let hook = &snapshot.adjustments[&Factor::HookType];
    assert_eq!(hook.adjustment, cfg.individual_max); // clipped from 3.0
    let expected_total = cfg.individual_max * Factor::uniform_weight();
    assert!((snapshot.total_adjustment - expected_total).abs() < 1e-9);
    let expected = 500.0 * (1.0 + expected_total);
    assert!((snapshot.predicted_impressions - expected).abs() < 1e-6);
}

#[test]
fn inactive_cache_entry_contributes_nothing() {
    let engine = StorageEngine::open_in_memory().unwrap();
    seed_account(&engine, "A1");
    seed_content(&engine, "C1", Some("question"));
    let publication_id = seed_publication(&engine, "A1", "C1");

    engine
        .with_writer(|conn| {
            cache_ops::upsert_entry(
                conn,
                &FactorCacheEntry {
                    platform: Platform::Tiktok,
                    factor: Factor::HookType,
                    factor_value: "question".to_string(),
                    adjustment: 0.4,
                    sample_count: 2,
                    is_active: false,
                    calculated_at: Utc::now(),
                },
            )
        })
        .unwrap();

    let snapshot =
        build_snapshot(&engine, publication_id, &ForecastConfig::default(), Utc::now()).unwrap();
    assert_eq!(snapshot.adjustments[&Factor::HookType].adjustment, 0.0);
    assert_eq!(snapshot.predicted_impressions, 500.0);
}

#[test]
fn rebuilding_a_snapshot_upserts_the_same_row() {
    let engine = StorageEngine::open_in_memory().unwrap();
    seed_account(&engine, "A1");
    seed_content(&engine, "C1", None);
    let publication_id = seed_publication(&engine, "A1", "C1");

    let cfg = ForecastConfig::default();
    build_snapshot(&engine, publication_id, &cfg, Utc::now()).unwrap();
    build_snapshot(&engine, publication_id, &cfg, Utc::now()).unwrap();

    let stored = engine
        .with_reader(|conn| snapshot_ops::get_snapshot(conn, publication_id))
        .unwrap()
        .unwrap();
    assert_eq!(stored.publication_id, publication_id);
    assert_eq!(stored.predicted_impressions, 500.0);
}

// ── Cross-account correlation ────────────────────────────────────────────

#[test]
fn below_minimum_sample_is_a_null_effect_not_an_error() {
    let engine = StorageEngine::open_in_memory().unwrap();
    seed_content(&engine, "C1", None);
    seed_peer_outcome(&engine, "P1", "C1", 1200, 1000.0);

    // Only one other-account outcome, minimum is 2.
    let effect = cross_account_effect(&engine, "C1", Platform::Tiktok, "A1", 2).unwrap();
    assert_eq!(effect, CrossAccountEffect::NONE);
}

#[test]
fn cross_account_averages_other_accounts_on_the_same_platform() {
    let engine = StorageEngine::open_in_memory().unwrap();
    seed_content(&engine, "C1", None);
    seed_peer_outcome(&engine, "P1", "C1", 1200, 1000.0); // +0.2
    seed_peer_outcome(&engine, "P2", "C1", 800, 1000.0); // -0.2

    let effect = cross_account_effect(&engine, "C1", Platform::Tiktok, "A1", 2).unwrap();
    assert_eq!(effect.sample_count, 2);
    assert!((effect.adjustment - 0.0).abs() < 1e-9);
}

#[test]
fn own_account_rows_are_excluded_from_the_correlation() {
    let engine = StorageEngine::open_in_memory().unwrap();
    seed_content(&engine, "C1", None);
    seed_peer_outcome(&engine, "P1", "C1", 1500, 1000.0); // +0.5
    seed_peer_outcome(&engine, "P2", "C1", 1500, 1000.0); // +0.5
    // The excluded account's own stellar outcome must not count.
    seed_peer_outcome(&engine, "A1", "C1", 9000, 1000.0);

    let effect = cross_account_effect(&engine, "C1", Platform::Tiktok, "A1", 2).unwrap();
    assert_eq!(effect.sample_count, 2);
    assert!((effect.adjustment - 0.5).abs() < 1e-9);
}
