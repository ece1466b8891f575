/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Workload loading: raw capture records → validated [`CaptureNode`]s.
//!
//! The expected YAML structure is:
//! ```yaml
//! nodes:
//!   - id: IMG001
//!     region: coastal
//!     event_type: flood
//!     quality: 0.92
//!     cloud_cover: 0.10
//!     size_mb: 30
//!     timestamp: "2025-06-01T09:30:00"
//!     visibility_windows:          # optional
//!       - { start: "2025-06-01T10:10:00", end: "2025-06-01T11:00:00" }
//! ```
//!
//! Records without `visibility_windows` get one window synthesised from the
//! [`DefaultWindow`] relative to the reference time.  An explicitly empty
//! list is an input error.  Invalid records are logged and skipped; they
//! never reach scoring.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::DefaultWindow;
use crate::node::{parse_timestamp, CaptureNode, InputError, Timestamp, VisibilityWindow};

// ── YAML records ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WorkloadFile {
    #[serde(default)]
    nodes: Vec<CaptureRecord>,
}

/// One capture as it appears in the data source.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureRecord {
    pub id: String,
    pub region: String,
    pub event_type: String,
    pub quality: f64,
    pub cloud_cover: f64,
    pub size_mb: f64,
    pub timestamp: String,
    #[serde(default)]
    pub visibility_windows: Option<Vec<WindowRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowRecord {
    pub start: String,
    pub end: String,
}

// ── Workload ──────────────────────────────────────────────────────────────────

/// Validated nodes in input order, plus every rejection encountered.
#[derive(Debug, Default)]
pub struct Workload {
    pub nodes: Vec<CaptureNode>,
    pub rejected: Vec<InputError>,
}

/// Read and validate the workload file at `path`.
///
/// # Errors
/// Fails only when the file cannot be read or is not structurally valid
/// YAML.  Per-record problems end up in [`Workload::rejected`].
pub fn load_workload(
    path: &Path,
    default_window: &DefaultWindow,
    reference_time: Timestamp,
) -> Result<Workload> {
    info!("Loading workload from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open workload file: {}", path.display()))?;

    let file: WorkloadFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

    Ok(build_workload(file.nodes, default_window, reference_time))
}

/// Validate `records` in order, dropping invalid ones and duplicate ids.
///
/// The first occurrence of an identifier wins; later duplicates are rejected.
pub fn build_workload(
    records: Vec<CaptureRecord>,
    default_window: &DefaultWindow,
    reference_time: Timestamp,
) -> Workload {
    let total = records.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let mut workload = Workload::default();

    for record in records {
        let result = node_from_record(record, default_window, reference_time).and_then(|node| {
            if seen.insert(node.id.clone()) {
                Ok(node)
            } else {
                Err(InputError::DuplicateId { node: node.id })
            }
        });

        match result {
            Ok(node) => {
                debug!(
                    node = %node.id,
                    windows = node.visibility_windows.len(),
                    size_mb = node.size_mb,
                    "record accepted"
                );
                workload.nodes.push(node);
            }
            Err(e) => {
                warn!("✗ record rejected: {e}");
                workload.rejected.push(e);
            }
        }
    }

    info!(
        total,
        accepted = workload.nodes.len(),
        rejected = workload.rejected.len(),
        "workload loaded"
    );
    workload
}

/// Convert one raw record into a validated node.
pub fn node_from_record(
    record: CaptureRecord,
    default_window: &DefaultWindow,
    reference_time: Timestamp,
) -> Result<CaptureNode, InputError> {
    let captured_at = parse_field(&record.id, "timestamp", &record.timestamp)?;

    let visibility_windows = match &record.visibility_windows {
        Some(list) => list
            .iter()
            .map(|w| -> Result<VisibilityWindow, InputError> {
                Ok(VisibilityWindow::new(
                    parse_field(&record.id, "window start", &w.start)?,
                    parse_field(&record.id, "window end", &w.end)?,
                ))
            })
            .collect::<Result<Vec<_>, InputError>>()?,
        None => {
            let window = default_window
                .offset()
                .zip(default_window.length())
                .and_then(|(offset, length)| {
                    VisibilityWindow::after(reference_time, offset, length)
                })
                .ok_or_else(|| InputError::DefaultWindowOutOfRange {
                    node: record.id.clone(),
                })?;
            vec![window]
        }
    };

    let node = CaptureNode {
        id: record.id,
        region: record.region,
        event_type: record.event_type,
        quality: record.quality,
        cloud_cover: record.cloud_cover,
        size_mb: record.size_mb,
        captured_at,
        visibility_windows,
        score: 0.0,
        filtered: false,
        prune_reason: None,
    };
    node.validate()?;
    Ok(node)
}

fn parse_field(node: &str, field: &'static str, raw: &str) -> Result<Timestamp, InputError> {
    parse_timestamp(raw).ok_or_else(|| InputError::InvalidTimestamp {
        node: node.to_string(),
        field,
        value: raw.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    fn reference() -> Timestamp {
        parse_timestamp("2025-06-01T10:00:00").unwrap()
    }

    fn record(id: &str) -> CaptureRecord {
        CaptureRecord {
            id: id.into(),
            region: "urban".into(),
            event_type: "fire".into(),
            quality: 0.8,
            cloud_cover: 0.2,
            size_mb: 12.0,
            timestamp: "2025-06-01T09:00:00".into(),
            visibility_windows: None,
        }
    }

    #[test]
    fn load_example_yaml() {
        let yaml = r#"
nodes:
  - id: IMG001
    region: coastal
    event_type: flood
    quality: 0.92
    cloud_cover: 0.1
    size_mb: 30
    timestamp: "2025-06-01T09:30:00"
    visibility_windows:
      - { start: "2025-06-01T10:10:00", end: "2025-06-01T11:00:00" }
      - { start: "2025-06-01 12:00", end: "2025-06-01 12:45" }
  - id: IMG002
    region: forest
    event_type: fire
    quality: 0.7
    cloud_cover: 0.3
    size_mb: 9.5
    timestamp: "2025-06-01 08:00:00"
"#;
        let f = yaml_tempfile(yaml);
        let w = load_workload(f.path(), &DefaultWindow::default(), reference()).unwrap();

        assert!(w.rejected.is_empty());
        assert_eq!(w.nodes.len(), 2);
        assert_eq!(w.nodes[0].id, "IMG001");
        assert_eq!(w.nodes[0].visibility_windows.len(), 2);
        assert_eq!(
            w.nodes[0].visibility_windows[1].start,
            parse_timestamp("2025-06-01T12:00:00").unwrap()
        );
        assert_eq!(w.nodes[1].size_mb, 9.5);
    }

    #[test]
    fn missing_windows_are_synthesised_from_reference_time() {
        let node = node_from_record(record("a"), &DefaultWindow::default(), reference()).unwrap();
        assert_eq!(node.visibility_windows.len(), 1);
        let w = node.visibility_windows[0];
        assert_eq!(w.start, parse_timestamp("2025-06-01T10:10:00").unwrap());
        assert_eq!(w.end, parse_timestamp("2025-06-01T11:00:00").unwrap());
    }

    #[test]
    fn default_window_past_time_range_is_rejected() {
        let far = DefaultWindow {
            offset_minutes: 60 * 24 * 365 * 300_000,
            length_minutes: 50,
        };
        let err = node_from_record(record("a"), &far, reference()).unwrap_err();
        assert_eq!(err, InputError::DefaultWindowOutOfRange { node: "a".into() });
    }

    #[test]
    fn explicit_empty_window_list_is_rejected() {
        let mut r = record("a");
        r.visibility_windows = Some(vec![]);
        let err = node_from_record(r, &DefaultWindow::default(), reference()).unwrap_err();
        assert!(matches!(err, InputError::NoVisibilityWindows { .. }));
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let mut r = record("a");
        r.timestamp = "not a time".into();
        let err = node_from_record(r, &DefaultWindow::default(), reference()).unwrap_err();
        assert!(matches!(
            err,
            InputError::InvalidTimestamp {
                field: "timestamp",
                ..
            }
        ));
    }

    #[test]
    fn invalid_records_are_skipped_not_fatal() {
        let mut negative = record("neg");
        negative.size_mb = -1.0;
        let mut inverted = record("inv");
        inverted.visibility_windows = Some(vec![WindowRecord {
            start: "2025-06-01T11:00:00".into(),
            end: "2025-06-01T10:00:00".into(),
        }]);

        let w = build_workload(
            vec![record("ok1"), negative, inverted, record("ok2")],
            &DefaultWindow::default(),
            reference(),
        );

        let ids: Vec<_> = w.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["ok1", "ok2"]);
        assert_eq!(w.rejected.len(), 2);
        assert!(matches!(w.rejected[0], InputError::NonPositiveSize { .. }));
        assert!(matches!(w.rejected[1], InputError::EmptyWindow { .. }));
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let mut second = record("dup");
        second.size_mb = 99.0;
        let w = build_workload(
            vec![record("dup"), second],
            &DefaultWindow::default(),
            reference(),
        );
        assert_eq!(w.nodes.len(), 1);
        assert_eq!(w.nodes[0].size_mb, 12.0);
        assert_eq!(
            w.rejected,
            vec![InputError::DuplicateId { node: "dup".into() }]
        );
    }

    #[test]
    fn empty_file_yields_empty_workload() {
        let f = yaml_tempfile("nodes: []\n");
        let w = load_workload(f.path(), &DefaultWindow::default(), reference()).unwrap();
        assert!(w.nodes.is_empty());
    }

    #[test]
    fn missing_file_returns_error() {
        let r = load_workload(
            Path::new("/nonexistent/workload.yaml"),
            &DefaultWindow::default(),
            reference(),
        );
        assert!(r.is_err());
    }
}
