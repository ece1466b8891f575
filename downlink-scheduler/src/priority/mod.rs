/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Priority scoring and threshold filtering.
//!
//! Every candidate gets a score
//!
//! ```text
//! 100 × (0.5·region_w + 0.4·event_w) × quality × (1 − cloud_cover) × e^(−decay · age_h)
//! ```
//!
//! where `age_h` is the capture age in hours relative to an explicit
//! reference time, floored at zero so captures "from the future" are not
//! boosted.  Nodes scoring below the threshold are marked `filtered` and
//! excluded from scheduling; they keep their score for diagnostics.
//!
//! The reference time is always injected.  Nothing in this module reads the
//! wall clock, so the whole pipeline is a pure function of its inputs.

pub mod table;

use tracing::{debug, info};

use crate::node::{CaptureNode, Timestamp};

pub use table::PriorityTable;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Minimum score a node needs to survive filtering.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 10.0;

const REGION_COEFFICIENT: f64 = 0.5;
const EVENT_COEFFICIENT: f64 = 0.4;
const SCORE_SCALE: f64 = 100.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

// ── FilterOutcome ─────────────────────────────────────────────────────────────

/// Result of [`PriorityScorer::filter`].  Both sides keep input order.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub survivors: Vec<CaptureNode>,
    pub rejected: Vec<CaptureNode>,
}

// ── PriorityScorer ────────────────────────────────────────────────────────────

/// Scores nodes against a [`PriorityTable`] at a fixed evaluation instant.
#[derive(Debug, Clone, Copy)]
pub struct PriorityScorer<'a> {
    table: &'a PriorityTable,
    reference_time: Timestamp,
}

impl<'a> PriorityScorer<'a> {
    pub fn new(table: &'a PriorityTable, reference_time: Timestamp) -> Self {
        Self {
            table,
            reference_time,
        }
    }

    /// Capture age in hours, never negative.
    pub fn age_hours(&self, node: &CaptureNode) -> f64 {
        let elapsed = self.reference_time - node.captured_at;
        (elapsed.num_milliseconds() as f64 / MILLIS_PER_HOUR).max(0.0)
    }

    /// Compute the priority score of `node` without mutating it.
    pub fn score(&self, node: &CaptureNode) -> f64 {
        let region_w = self.table.region_weight(&node.region);
        let event_w = self.table.event_weight(&node.event_type);
        let quality_factor = node.quality * (1.0 - node.cloud_cover);
        let recency_factor = (-self.table.recency_decay_rate * self.age_hours(node)).exp();

        SCORE_SCALE
            * (REGION_COEFFICIENT * region_w + EVENT_COEFFICIENT * event_w)
            * quality_factor
            * recency_factor
    }

    /// Score every node and split them at `threshold`.
    ///
    /// A node survives when `score >= threshold`.  Rejected nodes get
    /// `filtered = true` and a `prune_reason` describing the shortfall.
    pub fn filter(&self, nodes: Vec<CaptureNode>, threshold: f64) -> FilterOutcome {
        let total = nodes.len();
        let mut outcome = FilterOutcome::default();

        for mut node in nodes {
            node.score = self.score(&node);
            if node.score >= threshold {
                debug!(node = %node.id, score = node.score, "kept");
                outcome.survivors.push(node);
            } else {
                node.filtered = true;
                node.prune_reason = Some(format!(
                    "score {:.2} below threshold {:.2}",
                    node.score, threshold
                ));
                debug!(node = %node.id, score = node.score, threshold, "pruned");
                outcome.rejected.push(node);
            }
        }

        info!(
            total,
            survivors = outcome.survivors.len(),
            pruned = outcome.rejected.len(),
            threshold,
            "priority filtering complete"
        );
        outcome
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
