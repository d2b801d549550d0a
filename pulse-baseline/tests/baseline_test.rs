use chrono::{DateTime, Duration, Utc};

use pulse_baseline::{estimate, run_baseline_job};
use pulse_core::config::BaselineConfig;
use pulse_core::models::*;
use pulse_storage::queries::metric_ops::BaselineSample;
use pulse_storage::queries::{account_ops, baseline_ops, content_ops, metric_ops, publication_ops};
use pulse_storage::StorageEngine;

fn account(account_id: &str, platform: Platform, niche: Option<&str>, age_days: i64) -> Account {
    Account {
        account_id: account_id.to_string(),
        platform,
        niche: niche.map(str::to_string),
        cluster: None,
        status: AccountStatus::Active,
        created_at: Utc::now() - Duration::days(age_days),
    }
}

fn sample(
    account: &Account,
    views: f64,
    days_ago: i64,
    now: DateTime<Utc>,
) -> BaselineSample {
    BaselineSample {
        account_id: account.account_id.clone(),
        platform: account.platform,
        niche: account.niche.clone(),
        account_created_at: account.created_at,
        views,
        measured_at: now - Duration::days(days_ago),
    }
}

// ── Fallback chain ───────────────────────────────────────────────────────

#[test]
fn own_history_wins_with_enough_samples() {
    let now = Utc::now();
    let cfg = BaselineConfig::default();
    let acc = account("A1", Platform::Tiktok, Some("fitness"), 100);

    let samples = vec![
        sample(&acc, 900.0, 1, now),
        sample(&acc, 1100.0, 3, now),
        sample(&acc, 1000.0, 5, now),
    ];

    let baseline = estimate(&acc, &samples, &cfg, now);
    assert_eq!(baseline.source, BaselineSource::OwnHistory);
    assert_eq!(baseline.sample_count, 3);
    assert!((baseline.baseline_impressions - 1000.0).abs() < 1e-9);
}

#[test]
fn stale_own_history_outside_window_does_not_count() {
    let now = Utc::now();
    let cfg = BaselineConfig::default(); // 14-day own window
    let acc = account("A1", Platform::Tiktok, Some("fitness"), 100);

    // Three samples, but two predate the own-history window.
    let samples = vec![
        sample(&acc, 900.0, 1, now),
        sample(&acc, 1100.0, 40, now),
        sample(&acc, 1000.0, 50, now),
    ];

    let baseline = estimate(&acc, &samples, &cfg, now);
    assert_ne!(baseline.source, BaselineSource::OwnHistory);
}

#[test]
fn niche_age_cohort_beats_default_for_thin_accounts() {
    let now = Utc::now();
    let cfg = BaselineConfig::default();
    // 100 days old → "established" bucket.
    let acc = account("A1", Platform::Tiktok, Some("fitness"), 100);

    // Only 2 own samples (< min 3), but a qualifying cohort of accounts
    // sharing platform × niche × age bucket.
    let peer1 = account("P1", Platform::Tiktok, Some("fitness"), 95);
    let peer2 = account("P2", Platform::Tiktok, Some("fitness"), 170);
    let samples = vec![
        sample(&acc, 100.0, 1, now),
        sample(&acc, 120.0, 2, now),
        sample(&peer1, 2000.0, 10, now),
        sample(&peer1, 2200.0, 20, now),
        sample(&peer2, 1800.0, 30, now),
    ];

    let baseline = estimate(&acc, &samples, &cfg, now);
    assert_eq!(baseline.source, BaselineSource::Cohort);
    // Cohort includes the account's own rows: (100+120+2000+2200+1800)/5
    assert_eq!(baseline.sample_count, 5);
    assert!((baseline.baseline_impressions - 1244.0).abs() < 1e-9);
}

#[test]
fn falls_through_to_platform_cohort() {
    let now = Utc::now();
    let cfg = BaselineConfig::default();
    let acc = account("A1", Platform::Tiktok, Some("fitness"), 100);

    // Peers on the same platform but a different niche: only step 4 matches.
    let peer = account("P1", Platform::Tiktok, Some("cooking"), 400);
    let samples = vec![
        sample(&peer, 500.0, 10, now),
        sample(&peer, 700.0, 20, now),
        sample(&peer, 600.0, 30, now),
    ];

    let baseline = estimate(&acc, &samples, &cfg, now);
    assert_eq!(baseline.source, BaselineSource::Cohort);
    assert!((baseline.baseline_impressions - 600.0).abs() < 1e-9);
}

#[test]
fn cross_platform_samples_never_qualify() {
    let now = Utc::now();
    let cfg = BaselineConfig::default();
    let acc = account("A1", Platform::Tiktok, Some("fitness"), 100);

    let peer = account("P1", Platform::Youtube, Some("fitness"), 100);
    let samples = vec![
        sample(&peer, 9000.0, 10, now),
        sample(&peer, 9100.0, 20, now),
        sample(&peer, 9200.0, 30, now),
    ];

    let baseline = estimate(&acc, &samples, &cfg, now);
    assert_eq!(baseline.source, BaselineSource::Default);
    assert_eq!(baseline.baseline_impressions, cfg.default_impressions);
    assert_eq!(baseline.sample_count, 0);
}

#[test]
fn default_when_no_data_at_all() {
    let now = Utc::now();
    let cfg = BaselineConfig::default();
    let acc = account("A1", Platform::X, None, 5);

    let baseline = estimate(&acc, &[], &cfg, now);
    assert_eq!(baseline.source, BaselineSource::Default);
    assert_eq!(baseline.baseline_impressions, 500.0);
}

#[test]
fn estimator_is_deterministic() {
    let now = Utc::now();
    let cfg = BaselineConfig::default();
    let acc = account("A1", Platform::Tiktok, Some("fitness"), 100);
    let samples = vec![
        sample(&acc, 900.0, 1, now),
        sample(&acc, 1100.0, 3, now),
        sample(&acc, 1000.0, 5, now),
    ];

    let first = estimate(&acc, &samples, &cfg, now);
    let second = estimate(&acc, &samples, &cfg, now);
    assert_eq!(first.baseline_impressions, second.baseline_impressions);
    assert_eq!(first.source, second.source);
    assert_eq!(first.window_start, second.window_start);
}

// ── Batch job ────────────────────────────────────────────────────────────

fn seed_outcome(
    engine: &StorageEngine,
    account_id: &str,
    content_id: &str,
    views: u64,
    days_ago: i64,
) {
    let now = Utc::now();
    engine
        .with_writer(|conn| {
            content_ops::insert_content(
                conn,
                &ContentMeta {
                    content_id: content_id.to_string(),
                    hook_type: None,
                    narrative_structure: None,
                    duration_seconds: None,
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
                    posted_at: Some(now - Duration::days(days_ago + 7)),
                    status: PublicationStatus::Posted,
                    tags: vec![],
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
                    measured_at: now - Duration::days(days_ago),
                },
            )
        })
        .unwrap();
}

#[test]
fn job_overwrites_every_active_account() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let now = Utc::now();

    engine
        .with_writer(|conn| {
            account_ops::insert_account(conn, &account("A1", Platform::Tiktok, Some("fitness"), 100))?;
            account_ops::insert_account(conn, &account("A2", Platform::Tiktok, Some("fitness"), 100))
        })
        .unwrap();

    for (i, views) in [800u64, 1000, 1200].into_iter().enumerate() {
        seed_outcome(&engine, "A1", &format!("C{i}"), views, (i as i64) + 1);
    }

    let report = run_baseline_job(&engine, now).unwrap();
    assert_eq!(report.accounts, 2);
    assert_eq!(report.own_history, 1);

    let a1 = engine
        .with_reader(|conn| baseline_ops::get_baseline(conn, "A1"))
        .unwrap()
        .unwrap();
    assert_eq!(a1.source, BaselineSource::OwnHistory);
    assert!((a1.baseline_impressions - 1000.0).abs() < 1e-9);

    // A2 has no history of its own; with only 3 platform samples it takes
    // the platform cohort.
    let a2 = engine
        .with_reader(|conn| baseline_ops::get_baseline(conn, "A2"))
        .unwrap()
        .unwrap();
    assert_eq!(a2.source, BaselineSource::Cohort);

    // Re-running fully overwrites rather than duplicating.
    let report2 = run_baseline_job(&engine, now).unwrap();
    assert_eq!(report2.accounts, 2);
}
