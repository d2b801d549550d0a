//! `pulse` — cron-equivalent entry points for the batch jobs.
//!
//! Each subcommand opens the storage engine, loads its job config from
//! the settings store, runs once, and prints the report. Scheduling is
//! left to the operator (cron, systemd timers).

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

use pulse_core::config::{ForecastConfig, MeasurementConfig};
use pulse_measurement::{MeasurementOrchestrator, NullCollector};
use pulse_storage::StorageEngine;

#[derive(Parser)]
#[command(name = "pulse", version, about = "Content-performance prediction loop")]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, default_value = "pulse.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Create or migrate the database and seed default settings
    Migrate,

    /// Recompute baselines for all active accounts
    Baseline,

    /// Rebuild the per-platform adjustment factor cache
    Adjustments,

    /// Recalculate factor weights for all platforms
    Weights,

    /// Build (or rebuild) the prediction snapshot for a publication
    Predict {
        /// Publication row id
        publication_id: i64,
    },

    /// Run the three measurement rounds (dry run without an adapter:
    /// targets are listed and left pending)
    Measure,

    /// Backfill missing prediction errors for already-measured snapshots
    BackfillErrors,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let storage = StorageEngine::open(&cli.db)
        .with_context(|| format!("opening database {}", cli.db.display()))?;
    let now = Utc::now();

    match cli.command {
        CliCommand::Migrate => {
            // Opening the engine runs migrations.
            println!("database ready: {}", cli.db.display());
        }
        CliCommand::Baseline => {
            let report = pulse_baseline::run_baseline_job(&storage, now)?;
            println!(
                "baselines updated: {} accounts ({} own-history, {} cohort, {} default)",
                report.accounts, report.own_history, report.cohort, report.defaulted
            );
        }
        CliCommand::Adjustments => {
            let report = pulse_adjustment::run_adjustment_cache_job(&storage, now)?;
            for (platform, entries) in &report.entries {
                println!("{}: {} cache entries", platform.as_str(), entries);
            }
        }
        CliCommand::Weights => {
            let results = pulse_weights::run_weight_recalc_job(&storage, now)?;
            for (platform, outcome) in &results {
                match outcome {
                    pulse_weights::RecalcOutcome::Performed { tier_level, data_count } => {
                        println!(
                            "{}: recalculated (tier {}, {} data rows)",
                            platform.as_str(),
                            tier_level,
                            data_count
                        );
                    }
                    pulse_weights::RecalcOutcome::Skipped(reason) => {
                        println!("{}: skipped ({:?})", platform.as_str(), reason);
                    }
                }
            }
        }
        CliCommand::Predict { publication_id } => {
            let cfg = ForecastConfig::load(&storage)?;
            let snapshot = pulse_forecast::build_snapshot(&storage, publication_id, &cfg, now)?;
            println!(
                "publication {}: baseline {:.1} ({}), total adjustment {:+.4}, predicted {:.1}",
                publication_id,
                snapshot.baseline_used,
                snapshot.baseline_source.as_str(),
                snapshot.total_adjustment,
                snapshot.predicted_impressions
            );
        }
        CliCommand::Measure => {
            let cfg = MeasurementConfig::load(&storage)?;
            let collector = NullCollector;
            let orchestrator = MeasurementOrchestrator::new(&storage, &collector);
            let report = orchestrator.run(&cfg, now)?;
            for round in &report.rounds {
                println!(
                    "{}: {} due, {} processed, {} pending",
                    round.point.label(),
                    round.targets,
                    round.processed,
                    round.skipped
                );
            }
        }
        CliCommand::BackfillErrors => {
            let report = pulse_forecast::run_error_backfill_job(&storage, now)?;
            println!(
                "errors backfilled: {} primary, {} extended",
                report.updated_primary, report.updated_extended
            );
        }
    }

    Ok(())
}
