/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Single-pass greedy allocation in descending score order.

use tracing::{debug, info};

use crate::node::{CaptureNode, ScheduleEntry, Timestamp};

use super::feasibility::{earliest_slot, Slot};

/// Rank `nodes` by descending score.
///
/// The sort is stable: equal scores keep their input order, which makes the
/// output fully determined by the input sequence.
pub fn rank_by_score(nodes: &[CaptureNode]) -> Vec<&CaptureNode> {
    let mut ranked: Vec<&CaptureNode> = nodes.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Deterministic best-first placement.
///
/// Each node, highest score first, takes the [`earliest_slot`] that avoids
/// every slot committed so far.  Exactly one entry is emitted per node, in
/// ranking order; nodes that fit nowhere are emitted unscheduled.
#[derive(Debug, Clone, Copy)]
pub struct GreedyScheduler {
    throughput_mb_per_min: f64,
}

impl GreedyScheduler {
    pub fn new(throughput_mb_per_min: f64) -> Self {
        Self {
            throughput_mb_per_min,
        }
    }

    pub fn schedule(&self, nodes: &[CaptureNode], reference_time: Timestamp) -> Vec<ScheduleEntry> {
        info!(node_count = nodes.len(), "Executing greedy strategy");

        let mut committed: Vec<Slot> = Vec::with_capacity(nodes.len());
        let mut entries = Vec::with_capacity(nodes.len());

        for node in rank_by_score(nodes) {
            match earliest_slot(node, reference_time, self.throughput_mb_per_min, &committed) {
                Some(slot) => {
                    committed.push(slot);
                    debug!(
                        node  = %node.id,
                        score = node.score,
                        start = %slot.start,
                        end   = %slot.end,
                        "✓ scheduled"
                    );
                    entries.push(ScheduleEntry::scheduled(node, slot.start, slot.end));
                }
                None => {
                    debug!(node = %node.id, score = node.score, "✗ no feasible slot");
                    entries.push(ScheduleEntry::unscheduled(node));
                }
            }
        }

        info!(
            scheduled = committed.len(),
            total = entries.len(),
            "greedy done"
        );
        entries
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{parse_timestamp, VisibilityWindow};

    fn ts(hm: &str) -> Timestamp {
        parse_timestamp(&format!("2025-06-01T{hm}:00")).unwrap()
    }

    fn node(id: &str, score: f64, size_mb: f64, windows: &[(&str, &str)]) -> CaptureNode {
        CaptureNode {
            id: id.into(),
            region: "coastal".into(),
            event_type: "flood".into(),
            quality: 1.0,
            cloud_cover: 0.0,
            size_mb,
            captured_at: ts("09:00"),
            visibility_windows: windows
                .iter()
                .map(|(a, b)| VisibilityWindow::new(ts(a), ts(b)))
                .collect(),
            score,
            filtered: false,
            prune_reason: None,
        }
    }

    #[test]
    fn output_is_in_descending_score_order() {
        let nodes = vec![
            node("low", 20.0, 30.0, &[("10:00", "11:00")]),
            node("high", 80.0, 30.0, &[("10:00", "11:00")]),
            node("mid", 50.0, 30.0, &[("10:00", "11:00")]),
        ];
        let out = GreedyScheduler::new(3.0).schedule(&nodes, ts("10:00"));
        let ids: Vec<_> = out.iter().map(|e| e.node_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let nodes = vec![
            node("b", 40.0, 3.0, &[("10:00", "11:00")]),
            node("a", 40.0, 3.0, &[("10:00", "11:00")]),
        ];
        let ranked: Vec<_> = rank_by_score(&nodes).iter().map(|n| n.id.clone()).collect();
        assert_eq!(ranked, vec!["b", "a"]);
    }

    #[test]
    fn higher_score_takes_the_contested_slot() {
        // Both want 10:00–10:10 in a 10-minute window: only one fits
        let nodes = vec![
            node("loser", 30.0, 30.0, &[("10:00", "10:10")]),
            node("winner", 90.0, 30.0, &[("10:00", "10:10")]),
        ];
        let out = GreedyScheduler::new(3.0).schedule(&nodes, ts("10:00"));
        assert_eq!(out[0].node_id, "winner");
        assert_eq!(out[0].interval(), Some((ts("10:00"), ts("10:10"))));
        assert_eq!(out[1].node_id, "loser");
        assert!(!out[1].is_scheduled());
    }

    #[test]
    fn conflicting_node_moves_to_its_second_window() {
        let nodes = vec![
            node("first", 90.0, 30.0, &[("10:00", "10:30")]),
            node("second", 60.0, 30.0, &[("10:00", "10:30"), ("11:00", "11:30")]),
        ];
        let out = GreedyScheduler::new(3.0).schedule(&nodes, ts("10:00"));
        assert_eq!(out[1].interval(), Some((ts("11:00"), ts("11:10"))));
    }

    #[test]
    fn one_entry_per_node_even_when_nothing_fits() {
        let nodes = vec![
            node("a", 50.0, 300.0, &[("10:00", "10:30")]),
            node("b", 40.0, 300.0, &[("10:00", "10:30")]),
        ];
        let out = GreedyScheduler::new(3.0).schedule(&nodes, ts("10:00"));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|e| !e.is_scheduled()));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let out = GreedyScheduler::new(3.0).schedule(&[], ts("10:00"));
        assert!(out.is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let nodes = vec![
            node("a", 50.0, 30.0, &[("10:00", "10:40")]),
            node("b", 50.0, 45.0, &[("10:00", "10:40"), ("10:50", "11:30")]),
            node("c", 70.0, 10.0, &[("10:05", "10:30")]),
        ];
        let first = GreedyScheduler::new(3.0).schedule(&nodes, ts("10:00"));
        for _ in 0..20 {
            assert_eq!(GreedyScheduler::new(3.0).schedule(&nodes, ts("10:00")), first);
        }
    }
}
