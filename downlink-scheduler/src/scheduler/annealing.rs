/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Simulated annealing baseline.
//!
//! # Phases
//! 1. **Seed schedule**: shuffle the nodes and walk them once, placing each
//!    in its *first* visibility window only ([`leading_window_fit`]) after a
//!    monotonically advancing clock.  Nodes that do not fit are dropped, not
//!    reported unscheduled.
//! 2. **Local search**: for `max_iterations` rounds swap two whole entries
//!    (slot included, no re-validation) and apply the Metropolis rule
//!
//!    ```text
//!    accept  ⇔  Δ > 0  ∨  exp(Δ / max(1, T)) > U(0, 1)
//!    ```
//!
//!    with geometric cooling `T ← T · cooling_rate` after every round.
//!
//! Every entry of the seed schedule is placed, and a swap only reorders
//! entries, so Δ is always zero and the best schedule is the seed itself.
//! The strategy is kept as a weak comparison baseline for the other two.
//!
//! With fewer than two entries no swap is possible and the local search is
//! skipped: the seed schedule is returned and the temperature never moves.

use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use tracing::{debug, info};

use crate::config::AnnealingConfig;
use crate::node::{CaptureNode, ScheduleEntry, Timestamp};

use super::feasibility::leading_window_fit;
use super::total_value;

/// Metropolis acceptance probability for a value change `delta` at
/// `temperature`.  Temperatures below 1 are treated as 1.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    (delta / temperature.max(1.0)).exp()
}

/// Temperature reached after `iterations` geometric cooling steps.
pub fn temperature_after(temp_start: f64, cooling_rate: f64, iterations: usize) -> f64 {
    temp_start * cooling_rate.powf(iterations as f64)
}

/// Build the randomised seed schedule.
pub fn initial_schedule<R: Rng + ?Sized>(
    nodes: &[CaptureNode],
    reference_time: Timestamp,
    throughput_mb_per_min: f64,
    rng: &mut R,
) -> Vec<ScheduleEntry> {
    let mut order: Vec<&CaptureNode> = nodes.iter().collect();
    order.shuffle(rng);

    let mut current_time = reference_time;
    let mut schedule = Vec::with_capacity(order.len());
    for node in order {
        if let Some(slot) = leading_window_fit(node, current_time, throughput_mb_per_min) {
            current_time = slot.end;
            schedule.push(ScheduleEntry::scheduled(node, slot.start, slot.end));
        } else {
            debug!(node = %node.id, "dropped from seed schedule");
        }
    }
    schedule
}

// ── AnnealingOutcome ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AnnealingOutcome {
    /// Best schedule seen across all iterations.
    pub entries: Vec<ScheduleEntry>,
    pub initial_value: f64,
    pub best_value: f64,
    /// Local-search rounds actually run (0 for a degenerate run).
    pub iterations: usize,
    pub accepted: usize,
    pub final_temperature: f64,
}

// ── AnnealingScheduler ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct AnnealingScheduler {
    throughput_mb_per_min: f64,
    config: AnnealingConfig,
}

impl AnnealingScheduler {
    pub fn new(throughput_mb_per_min: f64, config: AnnealingConfig) -> Self {
        Self {
            throughput_mb_per_min,
            config,
        }
    }

    /// Run with the configured seed, or OS entropy when none is set.
    pub fn schedule(&self, nodes: &[CaptureNode], reference_time: Timestamp) -> AnnealingOutcome {
        let mut rng = match self.config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        self.schedule_with_rng(nodes, reference_time, &mut rng)
    }

    pub fn schedule_with_rng<R: Rng + ?Sized>(
        &self,
        nodes: &[CaptureNode],
        reference_time: Timestamp,
        rng: &mut R,
    ) -> AnnealingOutcome {
        info!(
            node_count = nodes.len(),
            max_iterations = self.config.max_iterations,
            temp_start = self.config.temp_start,
            cooling_rate = self.config.cooling_rate,
            seed = ?self.config.seed,
            "Executing annealing strategy"
        );

        let mut current = initial_schedule(nodes, reference_time, self.throughput_mb_per_min, rng);
        let mut current_value = total_value(&current);
        let initial_value = current_value;

        let mut best = current.clone();
        let mut best_value = current_value;
        let mut temperature = self.config.temp_start;
        let mut iterations = 0usize;
        let mut accepted = 0usize;

        if current.len() < 2 {
            debug!(
                entries = current.len(),
                "fewer than two entries, local search skipped"
            );
        } else {
            for _ in 0..self.config.max_iterations {
                let picks = index::sample(rng, current.len(), 2);
                let mut candidate = current.clone();
                candidate.swap(picks.index(0), picks.index(1));

                let candidate_value = total_value(&candidate);
                let delta = candidate_value - current_value;

                if delta > 0.0 || acceptance_probability(delta, temperature) > rng.gen::<f64>() {
                    current = candidate;
                    current_value = candidate_value;
                    accepted += 1;
                    if current_value > best_value {
                        best = current.clone();
                        best_value = current_value;
                    }
                }

                temperature *= self.config.cooling_rate;
                iterations += 1;
            }
        }

        info!(
            scheduled = best.len(),
            total = nodes.len(),
            initial_value,
            best_value,
            iterations,
            accepted,
            final_temperature = temperature,
            "annealing done"
        );

        AnnealingOutcome {
            entries: best,
            initial_value,
            best_value,
            iterations,
            accepted,
            final_temperature: temperature,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
