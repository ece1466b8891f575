/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Downlink scheduler – allocates one shared satellite downlink among
//! competing captures.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── node.rs         – CaptureNode, VisibilityWindow, ScheduleEntry
//! ├── ingest/         – YAML workload → validated nodes
//! ├── config/         – YAML scheduler configuration
//! ├── priority/       – priority table, scoring and threshold filter
//! ├── scheduler/      – greedy, bounded search and annealing strategies
//! └── report.rs       – JSON schedule sink + comparison summary
//! ```
//!
//! Pipeline:
//!
//! ```text
//! workload ─► ingest ─► PriorityScorer::filter ─► survivors ─┬─► greedy ─────────┐
//!                                                           ├─► bounded_search ─┼─► report
//!                                                           └─► annealing ──────┘
//! ```

pub mod config;
pub mod ingest;
pub mod node;
pub mod priority;
pub mod report;
pub mod scheduler;
