/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scheduler configuration loading and validation.
//!
//! Every field is optional; anything absent from the file takes the default
//! listed below.  The expected YAML structure is:
//! ```yaml
//! throughput_mb_per_min: 3.0
//! score_threshold: 10.0
//! default_window:
//!   offset_minutes: 10
//!   length_minutes: 50
//! search:
//!   heuristic_weight: 0.5
//!   max_expansions: 200000
//! annealing:
//!   max_iterations: 2000
//!   temp_start: 100.0
//!   cooling_rate: 0.99
//!   seed: 42
//! priority:
//!   regions: { coastal: 0.9, urban: 0.8 }
//!   events: { flood: 1.0 }
//!   recency_decay_rate: 0.15
//! ```

use std::path::Path;

use anyhow::{ensure, Context, Result};
use chrono::Duration;
use serde::Deserialize;
use tracing::{debug, info};

use crate::priority::{PriorityTable, DEFAULT_SCORE_THRESHOLD};

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Downlink throughput in MB per minute.
pub const DEFAULT_THROUGHPUT_MB_PER_MIN: f64 = 3.0;

pub const DEFAULT_HEURISTIC_WEIGHT: f64 = 0.5;

/// Upper bound on states popped by the bounded search.
pub const DEFAULT_MAX_EXPANSIONS: usize = 200_000;

pub const DEFAULT_MAX_ITERATIONS: usize = 2_000;
pub const DEFAULT_TEMP_START: f64 = 100.0;
pub const DEFAULT_COOLING_RATE: f64 = 0.99;

// ── Sections ──────────────────────────────────────────────────────────────────

/// Window synthesised for records that carry no visibility windows:
/// `[reference + offset, reference + offset + length]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultWindow {
    pub offset_minutes: i64,
    pub length_minutes: i64,
}

impl DefaultWindow {
    /// `None` if the minute count is beyond what a [`Duration`] can hold.
    pub fn offset(&self) -> Option<Duration> {
        Duration::try_minutes(self.offset_minutes)
    }

    pub fn length(&self) -> Option<Duration> {
        Duration::try_minutes(self.length_minutes)
    }
}

impl Default for DefaultWindow {
    fn default() -> Self {
        Self {
            offset_minutes: 10,
            length_minutes: 50,
        }
    }
}

/// Bounded best-first search tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Discount applied to the remaining-score estimate in the frontier key.
    pub heuristic_weight: f64,
    pub max_expansions: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic_weight: DEFAULT_HEURISTIC_WEIGHT,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

/// Simulated annealing tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnealingConfig {
    pub max_iterations: usize,
    pub temp_start: f64,
    /// Geometric decay factor applied once per iteration.
    pub cooling_rate: f64,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            temp_start: DEFAULT_TEMP_START,
            cooling_rate: DEFAULT_COOLING_RATE,
            seed: None,
        }
    }
}

// ── SchedulerConfig ───────────────────────────────────────────────────────────

/// Full configuration surface for scoring and the three strategies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub throughput_mb_per_min: f64,
    pub score_threshold: f64,
    pub default_window: DefaultWindow,
    pub search: SearchConfig,
    pub annealing: AnnealingConfig,
    pub priority: PriorityTable,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            throughput_mb_per_min: DEFAULT_THROUGHPUT_MB_PER_MIN,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            default_window: DefaultWindow::default(),
            search: SearchConfig::default(),
            annealing: AnnealingConfig::default(),
            priority: PriorityTable::reference(),
        }
    }
}

impl SchedulerConfig {
    /// Parse and validate the YAML file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is
    /// structurally invalid, or a value fails [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading scheduler configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config: SchedulerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        debug!(?config, "scheduler configuration loaded");
        Ok(config)
    }

    /// Check every numeric field for a usable range.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.throughput_mb_per_min.is_finite() && self.throughput_mb_per_min > 0.0,
            "throughput_mb_per_min must be positive, got {}",
            self.throughput_mb_per_min
        );
        ensure!(
            self.score_threshold.is_finite(),
            "score_threshold must be finite"
        );
        ensure!(
            self.default_window.offset_minutes >= 0 && self.default_window.offset().is_some(),
            "default_window.offset_minutes out of range, got {}",
            self.default_window.offset_minutes
        );
        ensure!(
            self.default_window.length_minutes > 0 && self.default_window.length().is_some(),
            "default_window.length_minutes must be positive and in range, got {}",
            self.default_window.length_minutes
        );
        ensure!(
            self.search.heuristic_weight.is_finite() && self.search.heuristic_weight >= 0.0,
            "search.heuristic_weight must be non-negative, got {}",
            self.search.heuristic_weight
        );
        ensure!(
            self.search.max_expansions >= 1,
            "search.max_expansions must be at least 1"
        );
        ensure!(
            self.annealing.temp_start.is_finite() && self.annealing.temp_start > 0.0,
            "annealing.temp_start must be positive, got {}",
            self.annealing.temp_start
        );
        ensure!(
            self.annealing.cooling_rate > 0.0 && self.annealing.cooling_rate <= 1.0,
            "annealing.cooling_rate must be in (0, 1], got {}",
            self.annealing.cooling_rate
        );
        self.priority.validate().context("invalid priority table")?;
        Ok(())
    }

    /// Apply command-line overrides on top of the file values.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.throughput_mb_per_min {
            self.throughput_mb_per_min = v;
        }
        if let Some(v) = overrides.score_threshold {
            self.score_threshold = v;
        }
        if let Some(v) = overrides.heuristic_weight {
            self.search.heuristic_weight = v;
        }
        if let Some(v) = overrides.max_expansions {
            self.search.max_expansions = v;
        }
        if let Some(v) = overrides.max_iterations {
            self.annealing.max_iterations = v;
        }
        if let Some(v) = overrides.temp_start {
            self.annealing.temp_start = v;
        }
        if let Some(v) = overrides.cooling_rate {
            self.annealing.cooling_rate = v;
        }
        if overrides.seed.is_some() {
            self.annealing.seed = overrides.seed;
        }
    }
}

/// Individually overridable settings; `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub throughput_mb_per_min: Option<f64>,
    pub score_threshold: Option<f64>,
    pub heuristic_weight: Option<f64>,
    pub max_expansions: Option<usize>,
    pub max_iterations: Option<usize>,
    pub temp_start: Option<f64>,
    pub cooling_rate: Option<f64>,
    pub seed: Option<u64>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
