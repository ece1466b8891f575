/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Static reference weights used by the priority scorer.

use std::collections::BTreeMap;

use anyhow::{ensure, Result};
use serde::Deserialize;

/// Weight applied to a region missing from the table.
pub const DEFAULT_REGION_WEIGHT: f64 = 0.3;

/// Weight applied to an event type missing from the table.
pub const DEFAULT_EVENT_WEIGHT: f64 = 0.2;

/// Per-hour exponential decay applied to capture age.
pub const DEFAULT_RECENCY_DECAY_RATE: f64 = 0.15;

const REFERENCE_REGIONS: &[(&str, f64)] = &[
    ("coastal", 0.9),
    ("urban", 0.8),
    ("forest", 0.5),
    ("agriculture", 0.4),
    ("mountain", 0.3),
    ("river", 0.85),
];

const REFERENCE_EVENTS: &[(&str, f64)] = &[
    ("flood", 1.0),
    ("fire", 0.95),
    ("urban_change", 0.7),
    ("storm", 0.9),
    ("normal", 0.2),
];

/// Region and event weights plus the recency decay rate.
///
/// Passed explicitly to the scorer; there is no process-wide table.  Any
/// section omitted from YAML falls back to the reference value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriorityTable {
    pub regions: BTreeMap<String, f64>,
    pub events: BTreeMap<String, f64>,
    pub recency_decay_rate: f64,
    pub default_region_weight: f64,
    pub default_event_weight: f64,
}

impl PriorityTable {
    /// The built-in reference table.
    pub fn reference() -> Self {
        let to_map = |pairs: &[(&str, f64)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            regions: to_map(REFERENCE_REGIONS),
            events: to_map(REFERENCE_EVENTS),
            recency_decay_rate: DEFAULT_RECENCY_DECAY_RATE,
            default_region_weight: DEFAULT_REGION_WEIGHT,
            default_event_weight: DEFAULT_EVENT_WEIGHT,
        }
    }

    pub fn region_weight(&self, region: &str) -> f64 {
        self.regions
            .get(region)
            .copied()
            .unwrap_or(self.default_region_weight)
    }

    pub fn event_weight(&self, event_type: &str) -> f64 {
        self.events
            .get(event_type)
            .copied()
            .unwrap_or(self.default_event_weight)
    }

    /// Every weight must lie in `[0, 1]` and the decay rate must be positive.
    pub fn validate(&self) -> Result<()> {
        let named = self
            .regions
            .iter()
            .map(|(k, v)| (format!("region '{k}'"), *v))
            .chain(self.events.iter().map(|(k, v)| (format!("event '{k}'"), *v)))
            .chain([
                ("default region".to_string(), self.default_region_weight),
                ("default event".to_string(), self.default_event_weight),
            ]);

        for (name, weight) in named {
            ensure!(
                (0.0..=1.0).contains(&weight),
                "{name} weight {weight} is outside [0, 1]"
            );
        }

        ensure!(
            self.recency_decay_rate.is_finite() && self.recency_decay_rate > 0.0,
            "recency_decay_rate must be positive, got {}",
            self.recency_decay_rate
        );
        Ok(())
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::reference()
    }
}
