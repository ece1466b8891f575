/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core data structures for the downlink scheduler.
//!
//! Two distinct types model the two sides of the scheduling pipeline:
//!
//! ```text
//! workload ──(CaptureRecord)──►  CaptureNode  ──(scheduler)──►  ScheduleEntry  ──►  sink
//!                                  ↑ input                         ↑ output
//!                                  score / filtered set once       immutable, one per placement
//! ```
//!
//! # Lifecycle
//! A `CaptureNode` is built once per input record and validated before it
//! can reach scoring.  The [`PriorityScorer`](crate::priority::PriorityScorer)
//! writes `score`, `filtered` and `prune_reason`; after that the node is
//! shared read-only between the strategies.  Each strategy produces fresh
//! `ScheduleEntry` values that are never mutated again.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

/// Wall-clock instant used throughout the pipeline (naive, second resolution).
pub type Timestamp = NaiveDateTime;

/// Accepted textual date-time layouts, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 style date-time with minute-or-finer resolution.
///
/// Both `T` and a single space are accepted as the date/time separator.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

// ── Input validation errors ───────────────────────────────────────────────────

/// Reasons a raw record is rejected before it ever reaches scoring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("node '{node}' has non-positive size {size_mb} MB")]
    NonPositiveSize { node: String, size_mb: f64 },

    #[error("node '{node}' has {field} = {value}, expected a value in [0, 1]")]
    OutOfRange {
        node: String,
        field: &'static str,
        value: f64,
    },

    #[error("node '{node}' has an unparseable {field} '{value}'")]
    InvalidTimestamp {
        node: String,
        field: &'static str,
        value: String,
    },

    #[error("node '{node}' has an empty visibility-window list")]
    NoVisibilityWindows { node: String },

    #[error("node '{node}' window #{index} ends at {end} which is not after its start {start}")]
    EmptyWindow {
        node: String,
        index: usize,
        start: Timestamp,
        end: Timestamp,
    },

    /// Window `index` starts before window `index - 1` ends.
    #[error("node '{node}' window #{index} is unsorted or overlaps the previous window")]
    OverlappingWindows { node: String, index: usize },

    #[error("node identifier '{node}' appears more than once in the workload")]
    DuplicateId { node: String },

    #[error("node '{node}' default visibility window is out of range")]
    DefaultWindowOutOfRange { node: String },
}

// ── VisibilityWindow ──────────────────────────────────────────────────────────

/// A half-open interval `[start, end)` during which the node's data can be
/// transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl VisibilityWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Window starting `offset` after `origin` and lasting `length`, or
    /// `None` if either bound falls outside the representable time range.
    pub fn after(origin: Timestamp, offset: Duration, length: Duration) -> Option<Self> {
        let start = origin.checked_add_signed(offset)?;
        let end = start.checked_add_signed(length)?;
        Some(Self { start, end })
    }

    /// Returns `true` if `[start, end]` lies entirely inside this window.
    pub fn contains(&self, start: Timestamp, end: Timestamp) -> bool {
        start >= self.start && end <= self.end
    }
}

// ── CaptureNode (input / scored working copy) ────────────────────────────────

/// A candidate capture competing for downlink time.
#[derive(Debug, Clone)]
pub struct CaptureNode {
    // ── Identity ──────────────────────────────────────────────────────────────
    /// Unique identifier within a workload.
    pub id: String,
    pub region: String,
    pub event_type: String,

    // ── Capture properties ────────────────────────────────────────────────────
    /// Image quality in `[0, 1]`.
    pub quality: f64,
    /// Cloud cover fraction in `[0, 1]`.
    pub cloud_cover: f64,
    /// Data volume in MB.
    pub size_mb: f64,
    pub captured_at: Timestamp,

    /// Sorted, non-overlapping transmission windows.
    pub visibility_windows: Vec<VisibilityWindow>,

    // ── Set by the PriorityScorer ─────────────────────────────────────────────
    pub score: f64,
    /// `true` once the node has been dropped below the score threshold.
    pub filtered: bool,
    /// Human-readable shortfall detail for filtered nodes.
    pub prune_reason: Option<String>,
}

impl CaptureNode {
    /// Check every structural invariant a node must hold before scoring.
    ///
    /// # Errors
    /// Returns the first violated invariant as an [`InputError`].
    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.size_mb.is_finite() && self.size_mb > 0.0) {
            return Err(InputError::NonPositiveSize {
                node: self.id.clone(),
                size_mb: self.size_mb,
            });
        }

        for (field, value) in [("quality", self.quality), ("cloud_cover", self.cloud_cover)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(InputError::OutOfRange {
                    node: self.id.clone(),
                    field,
                    value,
                });
            }
        }

        if self.visibility_windows.is_empty() {
            return Err(InputError::NoVisibilityWindows {
                node: self.id.clone(),
            });
        }

        for (index, window) in self.visibility_windows.iter().enumerate() {
            if window.end <= window.start {
                return Err(InputError::EmptyWindow {
                    node: self.id.clone(),
                    index,
                    start: window.start,
                    end: window.end,
                });
            }
            if index > 0 && window.start < self.visibility_windows[index - 1].end {
                return Err(InputError::OverlappingWindows {
                    node: self.id.clone(),
                    index,
                });
            }
        }

        Ok(())
    }

    /// Returns `true` if some declared window fully contains `[start, end]`.
    pub fn window_contains(&self, start: Timestamp, end: Timestamp) -> bool {
        self.visibility_windows
            .iter()
            .any(|w| w.contains(start, end))
    }
}

// ── ScheduleEntry (output) ────────────────────────────────────────────────────

/// One row of a strategy's result.
///
/// Serialised with the column names downstream comparison tooling expects.
/// `start` / `end` are both `None` for an unscheduled node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    #[serde(rename = "Node ID")]
    pub node_id: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Event")]
    pub event_type: String,
    /// Score rounded to two decimals.
    #[serde(rename = "Score")]
    pub score: f64,
    #[serde(rename = "Size (MB)")]
    pub size_mb: f64,
    #[serde(rename = "Start")]
    pub start: Option<Timestamp>,
    #[serde(rename = "End")]
    pub end: Option<Timestamp>,
}

impl ScheduleEntry {
    pub fn scheduled(node: &CaptureNode, start: Timestamp, end: Timestamp) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::unscheduled(node)
        }
    }

    pub fn unscheduled(node: &CaptureNode) -> Self {
        Self {
            node_id: node.id.clone(),
            region: node.region.clone(),
            event_type: node.event_type.clone(),
            score: round2(node.score),
            size_mb: node.size_mb,
            start: None,
            end: None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.start.is_some()
    }

    /// The allocated `(start, end)` pair, if any.
    pub fn interval(&self) -> Option<(Timestamp, Timestamp)> {
        self.start.zip(self.end)
    }
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ── Tests ─────────────────────────────────────────────────────────────────────
