/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Bounded best-first search over partial schedules.
//!
//! A state is an ordered partial schedule, the nodes still unplaced, the
//! current downlink clock and the value collected so far.  Expanding a state
//! tries every remaining node once: the node goes into the first of its
//! windows that still fits after the clock ([`first_fitting_window`]), and
//! the clock jumps to the end of that slot.  Because the clock only moves
//! forward no committed-slot conflict check is needed.
//!
//! Frontier states are ranked by
//!
//! ```text
//! value + heuristic_weight × Σ score(remaining)
//! ```
//!
//! which is optimistic but not admissible, so the search is a heuristic, not
//! an exact solver.  Without duplicate detection the state space grows
//! factorially with node count; `max_expansions` caps the number of states
//! popped and the best schedule seen up to that point is returned.
//!
//! The result only lists nodes that appear in the best schedule: nodes the
//! best state never placed are absent rather than reported unscheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::node::{CaptureNode, ScheduleEntry, Timestamp};

use super::feasibility::{first_fitting_window, Slot};

// ── Search state ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Placement {
    node: usize,
    slot: Slot,
}

#[derive(Debug, Clone)]
struct SearchState {
    scheduled: Vec<Placement>,
    /// Indices into the input slice, in input order.
    remaining: Vec<usize>,
    current_time: Timestamp,
    value: f64,
}

/// Frontier entry ordered by `rank`, ties going to the earlier push.
#[derive(Debug)]
struct FrontierEntry {
    rank: f64,
    seq: u64,
    state: SearchState,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .total_cmp(&other.rank)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ── SearchOutcome ─────────────────────────────────────────────────────────────

/// Result of one bounded search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best schedule found, in placement order.
    pub entries: Vec<ScheduleEntry>,
    /// Sum of raw (unrounded) scores in the best schedule.
    pub best_value: f64,
    pub states_popped: usize,
    pub states_pushed: usize,
    /// `true` if the expansion cap stopped the search with work left.
    pub capped: bool,
}

// ── BoundedSearchScheduler ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct BoundedSearchScheduler {
    throughput_mb_per_min: f64,
    config: SearchConfig,
}

impl BoundedSearchScheduler {
    pub fn new(throughput_mb_per_min: f64, config: SearchConfig) -> Self {
        Self {
            throughput_mb_per_min,
            config,
        }
    }

    pub fn schedule(&self, nodes: &[CaptureNode], reference_time: Timestamp) -> SearchOutcome {
        info!(
            node_count = nodes.len(),
            heuristic_weight = self.config.heuristic_weight,
            max_expansions = self.config.max_expansions,
            "Executing bounded_search strategy"
        );

        let initial = SearchState {
            scheduled: Vec::new(),
            remaining: (0..nodes.len()).collect(),
            current_time: reference_time,
            value: 0.0,
        };

        let mut frontier = BinaryHeap::new();
        let mut seq = 0u64;
        frontier.push(FrontierEntry {
            rank: self.rank(nodes, &initial),
            seq,
            state: initial,
        });

        let mut best_value = 0.0;
        let mut best: Vec<Placement> = Vec::new();
        let mut popped = 0usize;
        let mut pushed = 1usize;
        let mut capped = false;

        while let Some(FrontierEntry { state, .. }) = frontier.pop() {
            popped += 1;

            if state.value > best_value {
                best_value = state.value;
                best = state.scheduled.clone();
                debug!(
                    value = best_value,
                    placed = best.len(),
                    popped,
                    "new best partial schedule"
                );
            }

            if popped >= self.config.max_expansions {
                capped = !state.remaining.is_empty() || !frontier.is_empty();
                break;
            }

            if state.remaining.is_empty() {
                continue;
            }

            for child in self.expand(nodes, &state) {
                seq += 1;
                pushed += 1;
                frontier.push(FrontierEntry {
                    rank: self.rank(nodes, &child),
                    seq,
                    state: child,
                });
            }
        }

        if capped {
            warn!(
                max_expansions = self.config.max_expansions,
                frontier = frontier.len(),
                best_value,
                "bounded_search hit its expansion cap, returning best schedule so far"
            );
        }

        let entries: Vec<ScheduleEntry> = best
            .iter()
            .map(|p| ScheduleEntry::scheduled(&nodes[p.node], p.slot.start, p.slot.end))
            .collect();

        info!(
            scheduled = entries.len(),
            total = nodes.len(),
            best_value,
            states_popped = popped,
            states_pushed = pushed,
            "bounded_search done"
        );

        SearchOutcome {
            entries,
            best_value,
            states_popped: popped,
            states_pushed: pushed,
            capped,
        }
    }

    /// Frontier key: collected value plus the discounted remaining scores.
    fn rank(&self, nodes: &[CaptureNode], state: &SearchState) -> f64 {
        let remaining: f64 = state.remaining.iter().map(|&i| nodes[i].score).sum();
        state.value + self.config.heuristic_weight * remaining
    }

    /// One child per remaining node that still fits after the current clock.
    fn expand(&self, nodes: &[CaptureNode], state: &SearchState) -> Vec<SearchState> {
        state
            .remaining
            .iter()
            .filter_map(|&idx| {
                let node = &nodes[idx];
                let slot =
                    first_fitting_window(node, state.current_time, self.throughput_mb_per_min)?;

                let mut scheduled = Vec::with_capacity(state.scheduled.len() + 1);
                scheduled.extend_from_slice(&state.scheduled);
                scheduled.push(Placement { node: idx, slot });

                Some(SearchState {
                    scheduled,
                    remaining: state.remaining.iter().copied().filter(|&i| i != idx).collect(),
                    current_time: slot.end,
                    value: state.value + node.score,
                })
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{parse_timestamp, VisibilityWindow};
    use crate::scheduler::greedy::GreedyScheduler;
    use crate::scheduler::total_value;

    fn ts(hm: &str) -> Timestamp {
        parse_timestamp(&format!("2025-06-01T{hm}:00")).unwrap()
    }

    fn node(id: &str, score: f64, size_mb: f64, windows: &[(&str, &str)]) -> CaptureNode {
        CaptureNode {
            id: id.into(),
            region: "river".into(),
            event_type: "storm".into(),
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

    fn search() -> BoundedSearchScheduler {
        BoundedSearchScheduler::new(3.0, SearchConfig::default())
    }

    #[test]
    fn frontier_pops_highest_rank_then_earliest_push() {
        let state = || SearchState {
            scheduled: vec![],
            remaining: vec![],
            current_time: ts("10:00"),
            value: 0.0,
        };
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry {
            rank: 5.0,
            seq: 2,
            state: state(),
        });
        heap.push(FrontierEntry {
            rank: 9.0,
            seq: 3,
            state: state(),
        });
        heap.push(FrontierEntry {
            rank: 5.0,
            seq: 1,
            state: state(),
        });

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|e| e.seq)).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn schedules_all_nodes_when_they_pack() {
        let nodes = vec![
            node("a", 40.0, 30.0, &[("10:00", "11:00")]),
            node("b", 60.0, 30.0, &[("10:00", "11:00")]),
            node("c", 50.0, 30.0, &[("10:00", "11:00")]),
        ];
        let out = search().schedule(&nodes, ts("10:00"));
        assert_eq!(out.entries.len(), 3);
        assert!((out.best_value - 150.0).abs() < 1e-9);
        assert!(!out.capped);
    }

    #[test]
    fn placements_are_sequential_and_inside_windows() {
        let nodes = vec![
            node("a", 40.0, 30.0, &[("10:00", "10:30"), ("11:00", "11:30")]),
            node("b", 60.0, 45.0, &[("10:05", "11:00")]),
            node("c", 50.0, 12.0, &[("10:00", "12:00")]),
        ];
        let out = search().schedule(&nodes, ts("10:00"));
        for pair in out.entries.windows(2) {
            let (_, prev_end) = pair[0].interval().unwrap();
            let (next_start, _) = pair[1].interval().unwrap();
            assert!(prev_end <= next_start);
        }
        for e in &out.entries {
            let n = nodes.iter().find(|n| n.id == e.node_id).unwrap();
            let (s, end) = e.interval().unwrap();
            assert!(n.window_contains(s, end));
        }
    }

    #[test]
    fn beats_greedy_when_greedy_blocks_two_smaller_nodes() {
        // Greedy puts "big" at 10:00–10:20 and then neither "x" nor "y" fits
        // in its 10:00–10:10 window.  Search sends x first and big after it.
        let nodes = vec![
            node("big", 50.0, 60.0, &[("10:00", "10:30")]),
            node("x", 30.0, 30.0, &[("10:00", "10:10")]),
            node("y", 29.0, 30.0, &[("10:00", "10:10")]),
        ];
        let greedy = GreedyScheduler::new(3.0).schedule(&nodes, ts("10:00"));
        let out = search().schedule(&nodes, ts("10:00"));

        assert!((total_value(&greedy) - 50.0).abs() < 1e-9);
        assert!((out.best_value - 80.0).abs() < 1e-9);
        let ids: Vec<_> = out.entries.iter().map(|e| e.node_id.as_str()).collect();
        assert_eq!(ids, vec!["x", "big"]);
    }

    #[test]
    fn unreachable_nodes_are_absent_from_output() {
        let nodes = vec![
            node("fits", 40.0, 30.0, &[("10:00", "11:00")]),
            node("never", 90.0, 300.0, &[("10:00", "10:30")]),
        ];
        let out = search().schedule(&nodes, ts("10:00"));
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].node_id, "fits");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let out = search().schedule(&[], ts("10:00"));
        assert!(out.entries.is_empty());
        assert_eq!(out.best_value, 0.0);
        assert_eq!(out.states_popped, 1);
        assert!(!out.capped);
    }

    #[test]
    fn expansion_cap_returns_best_so_far() {
        let nodes: Vec<_> = (0..7)
            .map(|i| node(&format!("n{i}"), 10.0 + i as f64, 3.0, &[("10:00", "12:00")]))
            .collect();
        let capped = BoundedSearchScheduler::new(
            3.0,
            SearchConfig {
                max_expansions: 3,
                ..SearchConfig::default()
            },
        )
        .schedule(&nodes, ts("10:00"));

        assert!(capped.capped);
        assert_eq!(capped.states_popped, 3);
        // Popped: root, best single child, its best child → two placements
        assert_eq!(capped.entries.len(), 2);
        assert!(capped.best_value > 0.0);
    }

    #[test]
    fn zero_heuristic_weight_still_finds_a_schedule() {
        let nodes = vec![
            node("a", 40.0, 30.0, &[("10:00", "11:00")]),
            node("b", 60.0, 30.0, &[("10:00", "11:00")]),
        ];
        let out = BoundedSearchScheduler::new(
            3.0,
            SearchConfig {
                heuristic_weight: 0.0,
                ..SearchConfig::default()
            },
        )
        .schedule(&nodes, ts("10:00"));
        assert!((out.best_value - 100.0).abs() < 1e-9);
    }
}
