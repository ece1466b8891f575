/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Interval placement on the single downlink timeline.
//!
//! Three placement rules exist, one per strategy family:
//!
//! | Function | Windows scanned | Conflict check | Used by |
//! |---|---|---|---|
//! | [`earliest_slot`] | all, in order | every committed slot | greedy |
//! | [`first_fitting_window`] | all, in order | none (monotonic clock) | bounded search |
//! | [`leading_window_fit`] | first only | none (monotonic clock) | annealing seed |
//!
//! The two restricted rules stay sound only because their callers advance
//! the reference time to the end of every placement, so later slots can
//! never overlap earlier ones.
//!
//! A transmission takes `ceil(size / throughput)` whole minutes.  A duration
//! or slot end outside the representable time range never fits anywhere.

use chrono::Duration;

use crate::node::{CaptureNode, Timestamp, VisibilityWindow};

/// A committed `[start, end)` allocation on the downlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Slot {
    /// Two slots overlap unless one ends at or before the other starts.
    pub fn overlaps(&self, other: &Slot) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }
}

/// Transmission time for `size_mb` at `throughput_mb_per_min`, rounded up
/// to whole minutes.
///
/// Returns `None` when the minute count is not finite or exceeds what a
/// [`Duration`] can hold.
pub fn transmission_duration(size_mb: f64, throughput_mb_per_min: f64) -> Option<Duration> {
    let minutes = (size_mb / throughput_mb_per_min).ceil();
    if !minutes.is_finite() || minutes >= i64::MAX as f64 {
        return None;
    }
    Duration::try_minutes(minutes as i64)
}

/// Candidate slot in `window` starting no earlier than `not_before`, or
/// `None` if it would run past the window end.
fn fit_in_window(
    window: &VisibilityWindow,
    not_before: Timestamp,
    duration: Duration,
) -> Option<Slot> {
    let start = window.start.max(not_before);
    let end = start.checked_add_signed(duration)?;
    (end <= window.end).then_some(Slot { start, end })
}

/// Earliest slot for `node` at or after `reference_time` that fits inside one
/// of its windows and overlaps none of `committed`.
///
/// Windows are tried in order and only the earliest start inside each is
/// considered; the first window whose candidate is feasible wins.
pub fn earliest_slot(
    node: &CaptureNode,
    reference_time: Timestamp,
    throughput_mb_per_min: f64,
    committed: &[Slot],
) -> Option<Slot> {
    let duration = transmission_duration(node.size_mb, throughput_mb_per_min)?;
    node.visibility_windows.iter().find_map(|window| {
        fit_in_window(window, reference_time, duration)
            .filter(|slot| !committed.iter().any(|c| slot.overlaps(c)))
    })
}

/// First window in which `node` fits at or after `current_time`, ignoring any
/// other allocation.
pub fn first_fitting_window(
    node: &CaptureNode,
    current_time: Timestamp,
    throughput_mb_per_min: f64,
) -> Option<Slot> {
    let duration = transmission_duration(node.size_mb, throughput_mb_per_min)?;
    node.visibility_windows
        .iter()
        .find_map(|window| fit_in_window(window, current_time, duration))
}

/// Fit `node` into its first window only, at or after `current_time`.
pub fn leading_window_fit(
    node: &CaptureNode,
    current_time: Timestamp,
    throughput_mb_per_min: f64,
) -> Option<Slot> {
    let duration = transmission_duration(node.size_mb, throughput_mb_per_min)?;
    node.visibility_windows
        .first()
        .and_then(|window| fit_in_window(window, current_time, duration))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
