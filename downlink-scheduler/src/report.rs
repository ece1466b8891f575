/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Schedule output: one JSON file per strategy plus a comparison summary.
//!
//! ```text
//! <out>/greedy_schedule.json
//! <out>/bounded_search_schedule.json
//! <out>/annealing_schedule.json
//! <out>/summary.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::node::round2;
use crate::scheduler::{RunStats, ScheduleOutcome, Strategy};

/// Per-strategy headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub entries: usize,
    pub scheduled: usize,
    /// Sum of scores over scheduled entries, rounded to two decimals.
    pub total_value: f64,
    pub stats: RunStats,
}

impl StrategySummary {
    pub fn from_outcome(outcome: &ScheduleOutcome) -> Self {
        Self {
            strategy: outcome.strategy,
            entries: outcome.entries.len(),
            scheduled: outcome.scheduled_count(),
            total_value: round2(outcome.total_value()),
            stats: outcome.stats.clone(),
        }
    }
}

pub fn schedule_file_name(strategy: Strategy) -> String {
    format!("{}_schedule.json", strategy.name())
}

/// Write every outcome and the summary into `dir`, creating it if needed.
///
/// Returns the paths written, summary last.
pub fn write_outcomes(dir: &Path, outcomes: &[ScheduleOutcome]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create output directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(outcomes.len() + 1);
    for outcome in outcomes {
        let path = dir.join(schedule_file_name(outcome.strategy));
        write_json(&path, &outcome.entries)?;
        info!(
            strategy = %outcome.strategy,
            path = %path.display(),
            entries = outcome.entries.len(),
            "schedule written"
        );
        written.push(path);
    }

    let summary: Vec<StrategySummary> = outcomes
        .iter()
        .map(StrategySummary::from_outcome)
        .collect();
    let path = dir.join("summary.json");
    write_json(&path, &summary)?;
    written.push(path);

    Ok(written)
}

/// Emit one log line per strategy for side-by-side comparison.
pub fn log_comparison(outcomes: &[ScheduleOutcome]) {
    for summary in outcomes.iter().map(StrategySummary::from_outcome) {
        info!(
            "  [{strategy:<14}]  {scheduled}/{entries} scheduled  total value {value:.1}",
            strategy = summary.strategy.name(),
            scheduled = summary.scheduled,
            entries = summary.entries,
            value = summary.total_value,
        );
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialise {}", path.display()))?;
    fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
