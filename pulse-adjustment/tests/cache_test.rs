use chrono::{Duration, TimeZone, Utc};

use pulse_adjustment::{build_entries, run_adjustment_cache_job};
use pulse_core::config::CacheConfig;
use pulse_core::factors::Factor;
use pulse_core::models::*;
use pulse_storage::queries::cache_ops::{self, CacheSampleRow};
use pulse_storage::queries::{
    account_ops, content_ops, metric_ops, publication_ops, snapshot_ops,
};
use pulse_storage::StorageEngine;

fn row(hook: &str, actual: f64, baseline: f64) -> CacheSampleRow {
    CacheSampleRow {
        content_id: "C1".to_string(),
        account_id: "A1".to_string(),
        niche: Some("fitness".to_string()),
        posted_at: Some(Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap()),
        tags: vec!["workout".to_string()],
        hook_type: Some(hook.to_string()),
        narrative_structure: None,
        duration_seconds: Some(25.0),
        bgm_category: None,
        actual,
        baseline,
    }
}

// ── Pure grouping ────────────────────────────────────────────────────────

#[test]
fn groups_by_value_and_averages_relative_lift() {
    let cfg = CacheConfig {
        min_sample: 2,
        ..Default::default()
    };
    let rows = vec![
        row("question", 1200.0, 1000.0), // +0.2
        row("question", 800.0, 1000.0),  // -0.2
        row("shock", 1500.0, 1000.0),    // +0.5
        row("shock", 1300.0, 1000.0),    // +0.3
    ];

    let entries = build_entries(Platform::Tiktok, &rows, &cfg, Utc::now());
    let question = entries
        .iter()
        .find(|e| e.factor == Factor::HookType && e.factor_value == "question")
        .unwrap();
    assert!((question.adjustment - 0.0).abs() < 1e-9);
    assert_eq!(question.sample_count, 2);
    assert!(question.is_active);

    let shock = entries
        .iter()
        .find(|e| e.factor == Factor::HookType && e.factor_value == "shock")
        .unwrap();
    assert!((shock.adjustment - 0.4).abs() < 1e-9);
}

#[test]
fn under_sampled_entries_recorded_inactive_with_true_count() {
    let cfg = CacheConfig {
        min_sample: 5,
        ..Default::default()
    };
    let rows = vec![row("question", 1200.0, 1000.0)];

    let entries = build_entries(Platform::Tiktok, &rows, &cfg, Utc::now());
    let question = entries
        .iter()
        .find(|e| e.factor == Factor::HookType)
        .unwrap();
    assert!(!question.is_active);
    assert_eq!(question.sample_count, 1);
    assert!((question.adjustment - 0.2).abs() < 1e-9);
}

#[test]
fn cross_account_is_never_cached() {
    let cfg = CacheConfig::default();
    let rows = vec![row("question", 1200.0, 1000.0)];
    let entries = build_entries(Platform::Tiktok, &rows, &cfg, Utc::now());
    assert!(entries
        .iter()
        .all(|e| e.factor != Factor::CrossAccountPerformance));
}

#[test]
fn zero_baseline_rows_are_skipped() {
    let cfg = CacheConfig {
        min_sample: 1,
        ..Default::default()
    };
    let entries = build_entries(
        Platform::Tiktok,
        &[row("question", 1200.0, 0.0)],
        &cfg,
        Utc::now(),
    );
    assert!(entries.is_empty());
}

#[test]
fn derived_buckets_resolve_from_row_attributes() {
    let cfg = CacheConfig {
        min_sample: 1,
        ..Default::default()
    };
    let entries = build_entries(
        Platform::Tiktok,
        &[row("question", 1100.0, 1000.0)],
        &cfg,
        Utc::now(),
    );

    let length = entries
        .iter()
        .find(|e| e.factor == Factor::ContentLength)
        .unwrap();
    assert_eq!(length.factor_value, "16-30s");

    let hour = entries.iter().find(|e| e.factor == Factor::PostHour).unwrap();
    assert_eq!(hour.factor_value, "09-11");

    let keyword = entries
        .iter()
        .find(|e| e.factor == Factor::HashtagKeyword)
        .unwrap();
    assert_eq!(keyword.factor_value, "workout");
}

// ── Batch job ────────────────────────────────────────────────────────────

fn seed_snapshot_with_outcome(
    engine: &StorageEngine,
    account_id: &str,
    content_id: &str,
    hook: &str,
    views: u64,
    baseline: f64,
) {
    let now = Utc::now();
    engine
        .with_writer(|conn| {
            content_ops::insert_content(
                conn,
                &ContentMeta {
                    content_id: content_id.to_string(),
                    hook_type: Some(hook.to_string()),
                    narrative_structure: None,
                    duration_seconds: Some(40.0),
                    bgm_category: None,
                },
            )?;
            let publication_id = publication_ops::insert_publication(
                conn,
                &Publication {
                    id: 0,
                    content_id: content_id.to_string(),
                    account_id: account_id.to_string(),
                    platform: Platform::Tiktok,
                    posted_at: Some(now - Duration::days(10)),
                    status: PublicationStatus::Posted,
                    tags: vec![],
                },
            )?;
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
                    created_at: now - Duration::days(10),
                    updated_at: now - Duration::days(10),
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
                    measured_at: now - Duration::days(3),
                },
            )
        })
        .unwrap();
}

#[test]
fn job_upserts_entries_and_inactive_ones_stay_invisible() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .with_writer(|conn| {
            account_ops::insert_account(
                conn,
                &Account {
                    account_id: "A1".to_string(),
                    platform: Platform::Tiktok,
                    niche: Some("fitness".to_string()),
                    cluster: None,
                    status: AccountStatus::Active,
                    created_at: Utc::now() - Duration::days(120),
                },
            )
        })
        .unwrap();

    // Two outcomes for one hook value — below the default minimum of 5.
    seed_snapshot_with_outcome(&engine, "A1", "C1", "question", 1200, 1000.0);
    seed_snapshot_with_outcome(&engine, "A1", "C2", "question", 1400, 1000.0);

    let report = run_adjustment_cache_job(&engine, Utc::now()).unwrap();
    assert!(report.entries[&Platform::Tiktok] > 0);

    // Recorded with its true sample count...
    let entries = engine
        .with_reader(|conn| cache_ops::list_entries(conn, Platform::Tiktok, Factor::HookType))
        .unwrap();
    let question = entries.iter().find(|e| e.factor_value == "question").unwrap();
    assert_eq!(question.sample_count, 2);
    assert!(!question.is_active);
    assert!((question.adjustment - 0.3).abs() < 1e-9);

    // ...but invisible to the prediction lookup.
    let active = engine
        .with_reader(|conn| {
            cache_ops::get_active_adjustment(conn, Platform::Tiktok, Factor::HookType, "question")
        })
        .unwrap();
    assert!(active.is_none());

    // Re-running replaces rather than duplicates.
    run_adjustment_cache_job(&engine, Utc::now()).unwrap();
    let entries_again = engine
        .with_reader(|conn| cache_ops::list_entries(conn, Platform::Tiktok, Factor::HookType))
        .unwrap();
    assert_eq!(entries.len(), entries_again.len());
}
