/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Downlink scheduling strategies.
//!
//! [`DownlinkScheduler`] runs one of three strategies over the scored
//! survivors and returns a [`ScheduleOutcome`]:
//!
//! | Strategy | Placement rule | Output |
//! |---|---|---|
//! | `greedy` | all windows, full conflict check | one entry per node, score order |
//! | `bounded_search` | all windows, monotonic clock | best partial schedule, placement order |
//! | `annealing` | first window only, monotonic clock | best schedule seen, may omit nodes |
//!
//! All per-run state lives inside the call, so one `DownlinkScheduler` can
//! be shared across threads and the strategies can run side by side.
//!
//! # Example
//! ```rust,ignore
//! let scheduler = DownlinkScheduler::new(Arc::new(config));
//! let outcome = scheduler.schedule(&survivors, Strategy::Greedy, reference_time);
//! ```

pub mod annealing;
pub mod error;
pub mod feasibility;
pub mod greedy;
pub mod search;

pub use error::SchedulerError;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::SchedulerConfig;
use crate::node::{CaptureNode, ScheduleEntry, Timestamp};

use annealing::AnnealingScheduler;
use greedy::GreedyScheduler;
use search::BoundedSearchScheduler;

/// Sum of (rounded) scores over entries that received a slot.
pub fn total_value(entries: &[ScheduleEntry]) -> f64 {
    entries
        .iter()
        .filter(|e| e.is_scheduled())
        .map(|e| e.score)
        .sum()
}

// ── Strategy ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Greedy,
    BoundedSearch,
    Annealing,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Greedy,
        Strategy::BoundedSearch,
        Strategy::Annealing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::BoundedSearch => "bounded_search",
            Strategy::Annealing => "annealing",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Strategy::Greedy),
            "bounded_search" | "astar" => Ok(Strategy::BoundedSearch),
            "annealing" | "simanneal" => Ok(Strategy::Annealing),
            other => Err(SchedulerError::UnknownStrategy(other.to_string())),
        }
    }
}

// ── ScheduleOutcome ───────────────────────────────────────────────────────────

/// Strategy-specific run statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunStats {
    Greedy,
    BoundedSearch {
        states_popped: usize,
        states_pushed: usize,
        capped: bool,
    },
    Annealing {
        iterations: usize,
        accepted: usize,
        final_temperature: f64,
    },
}

#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub strategy: Strategy,
    pub entries: Vec<ScheduleEntry>,
    pub stats: RunStats,
}

impl ScheduleOutcome {
    pub fn scheduled_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_scheduled()).count()
    }

    pub fn total_value(&self) -> f64 {
        total_value(&self.entries)
    }
}

// ── DownlinkScheduler ─────────────────────────────────────────────────────────

/// Entry point for all three strategies.
///
/// Holds only the shared, immutable configuration.
#[derive(Debug, Clone)]
pub struct DownlinkScheduler {
    config: Arc<SchedulerConfig>,
}

impl DownlinkScheduler {
    pub fn new(config: Arc<SchedulerConfig>) -> Self {
        Self { config }
    }

    /// Run `strategy` over `survivors`.  Never fails; an empty input yields an
    /// empty outcome.
    pub fn schedule(
        &self,
        survivors: &[CaptureNode],
        strategy: Strategy,
        reference_time: Timestamp,
    ) -> ScheduleOutcome {
        info!(
            strategy = %strategy,
            node_count = survivors.len(),
            reference_time = %reference_time,
            "=== DownlinkScheduler::schedule() ==="
        );

        let throughput = self.config.throughput_mb_per_min;
        let (entries, stats) = match strategy {
            Strategy::Greedy => (
                GreedyScheduler::new(throughput).schedule(survivors, reference_time),
                RunStats::Greedy,
            ),
            Strategy::BoundedSearch => {
                let out = BoundedSearchScheduler::new(throughput, self.config.search)
                    .schedule(survivors, reference_time);
                (
                    out.entries,
                    RunStats::BoundedSearch {
                        states_popped: out.states_popped,
                        states_pushed: out.states_pushed,
                        capped: out.capped,
                    },
                )
            }
            Strategy::Annealing => {
                let out = AnnealingScheduler::new(throughput, self.config.annealing)
                    .schedule(survivors, reference_time);
                (
                    out.entries,
                    RunStats::Annealing {
                        iterations: out.iterations,
                        accepted: out.accepted,
                        final_temperature: out.final_temperature,
                    },
                )
            }
        };

        let outcome = ScheduleOutcome {
            strategy,
            entries,
            stats,
        };

        info!(
            strategy = %strategy,
            entries = outcome.entries.len(),
            scheduled = outcome.scheduled_count(),
            total_value = outcome.total_value(),
            "=== Scheduling complete ==="
        );
        outcome
    }

    /// Like [`schedule`](Self::schedule) but selects the strategy by name.
    ///
    /// # Errors
    /// [`SchedulerError::UnknownStrategy`] if `name` is not recognised.
    pub fn schedule_named(
        &self,
        survivors: &[CaptureNode],
        name: &str,
        reference_time: Timestamp,
    ) -> Result<ScheduleOutcome, SchedulerError> {
        let strategy: Strategy = name.parse()?;
        Ok(self.schedule(survivors, strategy, reference_time))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
