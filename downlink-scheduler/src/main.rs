/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use clap::Parser;
use tracing::{error, info, warn};

use downlink_scheduler::config::{ConfigOverrides, SchedulerConfig};
use downlink_scheduler::ingest::load_workload;
use downlink_scheduler::node::{parse_timestamp, Timestamp};
use downlink_scheduler::priority::PriorityScorer;
use downlink_scheduler::report;
use downlink_scheduler::scheduler::{DownlinkScheduler, SchedulerError, Strategy};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Satellite downlink scheduler.
///
/// Example:
///   downlink-scheduler -w demos/workload.yaml -c demos/scheduler.yaml \
///                      -o outputs --reference-time 2025-06-01T10:00:00
#[derive(Debug, Parser)]
#[command(
    name = "downlink-scheduler",
    about = "Satellite downlink scheduler – greedy, bounded search and annealing",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML workload (capture records).
    #[arg(short = 'w', long = "workload")]
    workload: PathBuf,

    /// Path to the YAML scheduler configuration.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Directory the schedules and summary are written to.
    #[arg(short = 'o', long = "output-dir", default_value = "outputs")]
    output_dir: PathBuf,

    /// Evaluation instant (ISO-8601).  Defaults to the local wall clock.
    #[arg(short = 'r', long = "reference-time", value_parser = parse_reference_time)]
    reference_time: Option<Timestamp>,

    /// Strategy to run; repeat for several.  Defaults to all three.
    #[arg(short = 's', long = "strategy", value_parser = parse_strategy)]
    strategies: Vec<Strategy>,

    /// Downlink throughput in MB per minute.
    #[arg(long = "throughput")]
    throughput: Option<f64>,

    /// Minimum priority score to be considered for scheduling.
    #[arg(long = "threshold")]
    threshold: Option<f64>,

    /// Frontier weight on the remaining-score estimate (bounded search).
    #[arg(long = "heuristic-weight")]
    heuristic_weight: Option<f64>,

    /// Maximum states popped by the bounded search.
    #[arg(long = "max-expansions")]
    max_expansions: Option<usize>,

    /// Annealing iteration budget.
    #[arg(long = "iterations")]
    iterations: Option<usize>,

    /// Annealing starting temperature.
    #[arg(long = "temp-start")]
    temp_start: Option<f64>,

    /// Annealing geometric cooling factor.
    #[arg(long = "cooling-rate")]
    cooling_rate: Option<f64>,

    /// Annealing RNG seed for reproducible runs.
    #[arg(long = "seed")]
    seed: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            throughput_mb_per_min: self.throughput,
            score_threshold: self.threshold,
            heuristic_weight: self.heuristic_weight,
            max_expansions: self.max_expansions,
            max_iterations: self.iterations,
            temp_start: self.temp_start,
            cooling_rate: self.cooling_rate,
            seed: self.seed,
        }
    }
}

fn parse_reference_time(raw: &str) -> Result<Timestamp, String> {
    parse_timestamp(raw).ok_or_else(|| format!("'{raw}' is not an ISO-8601 date-time"))
}

fn parse_strategy(raw: &str) -> Result<Strategy, SchedulerError> {
    raw.parse()
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Downlink scheduler starting up...");

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // ── Configuration ─────────────────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => SchedulerConfig::load_from_file(path)?,
        None => {
            warn!("No configuration file provided, using default settings");
            SchedulerConfig::default()
        }
    };
    config.apply(&cli.overrides());
    config.validate().context("Invalid command-line override")?;

    // The only wall-clock read in the pipeline
    let reference_time = match cli.reference_time {
        Some(t) => t,
        None => {
            let now = Local::now().naive_local();
            now.with_nanosecond(0).unwrap_or(now)
        }
    };

    let strategies = if cli.strategies.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        cli.strategies.clone()
    };

    info!(
        workload       = %cli.workload.display(),
        output_dir     = %cli.output_dir.display(),
        reference_time = %reference_time,
        throughput     = config.throughput_mb_per_min,
        threshold      = config.score_threshold,
        strategies     = ?strategies,
        "Configuration"
    );

    // ── Load and score ────────────────────────────────────────────────────────
    let workload = load_workload(&cli.workload, &config.default_window, reference_time)?;
    if !workload.rejected.is_empty() {
        warn!(
            rejected = workload.rejected.len(),
            "some records were rejected and will not be scheduled"
        );
    }

    let filtered = PriorityScorer::new(&config.priority, reference_time)
        .filter(workload.nodes, config.score_threshold);
    info!("Filtered nodes: {} remain after pruning", filtered.survivors.len());

    // ── Run strategies side by side ───────────────────────────────────────────
    let survivors = Arc::new(filtered.survivors);
    let scheduler = Arc::new(DownlinkScheduler::new(Arc::new(config)));

    let handles: Vec<_> = strategies
        .into_iter()
        .map(|strategy| {
            let scheduler = Arc::clone(&scheduler);
            let survivors = Arc::clone(&survivors);
            tokio::task::spawn_blocking(move || {
                scheduler.schedule(&survivors, strategy, reference_time)
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await.context("scheduling task panicked")?);
    }

    // ── Output ────────────────────────────────────────────────────────────────
    let written = report::write_outcomes(&cli.output_dir, &outcomes)?;
    info!("Wrote {} file(s) to {}", written.len(), cli.output_dir.display());
    report::log_comparison(&outcomes);

    Ok(())
}
