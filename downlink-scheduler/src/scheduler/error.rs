/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for strategy selection.
//!
//! The strategies themselves never fail: empty input gives an empty
//! schedule, and a node that fits nowhere is reported as unscheduled (or
//! simply left out, depending on the strategy).  The only thing that can go
//! wrong at this layer is asking for a strategy that does not exist.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The strategy name passed to the dispatcher is not recognised.
    #[error("unknown scheduling strategy: '{0}' (valid: greedy, bounded_search, annealing)")]
    UnknownStrategy(String),
}
