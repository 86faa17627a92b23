//! Roster loading.
//!
//! A roster file is the artist source table: a JSON array of rows (objects
//! or arrays) or a CSV sheet export. Loading is batch-tolerant: bad rows are
//! collected as problems and reported, the load itself never aborts because
//! one record is bad.

mod csv;

pub use csv::parse_csv;

use crate::engine::ArtistMetrics;
use crate::normalizer::{normalize, FieldMapping, RawRow, SkippedRow};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// A non-fatal problem found while loading one row.
#[derive(Debug, PartialEq, Eq)]
pub enum RosterProblem {
    Skipped {
        /// 1-based row number in the source, headers excluded.
        row: usize,
        reason: SkippedRow,
    },
    MalformedValues {
        row: usize,
        name: String,
        fields: Vec<&'static str>,
    },
}

#[derive(Debug, Default)]
pub struct RosterLoadResult {
    pub artists: Vec<ArtistMetrics>,
    pub problems: Vec<RosterProblem>,
}

impl RosterLoadResult {
    pub fn skipped_count(&self) -> usize {
        self.problems
            .iter()
            .filter(|p| matches!(p, RosterProblem::Skipped { .. }))
            .count()
    }

    pub fn malformed_value_count(&self) -> usize {
        self.problems
            .iter()
            .map(|p| match p {
                RosterProblem::MalformedValues { fields, .. } => fields.len(),
                _ => 0,
            })
            .sum()
    }
}

/// Normalize a batch of raw rows.
pub fn normalize_rows(rows: &[RawRow], mapping: &FieldMapping) -> RosterLoadResult {
    let mut result = RosterLoadResult::default();
    for (i, raw) in rows.iter().enumerate() {
        let row = i + 1;
        match normalize(raw, mapping) {
            Ok(normalized) => {
                if !normalized.malformed_fields.is_empty() {
                    result.problems.push(RosterProblem::MalformedValues {
                        row,
                        name: normalized.metrics.name.clone(),
                        fields: normalized.malformed_fields,
                    });
                }
                result.artists.push(normalized.metrics);
            }
            Err(reason) => result.problems.push(RosterProblem::Skipped { row, reason }),
        }
    }
    result
}

/// Load a roster file (`.json` or `.csv`), normalize every row and log the
/// problems found along the way.
pub fn load_roster<P: AsRef<Path>>(path: P, mapping: &FieldMapping) -> Result<RosterLoadResult> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file: {:?}", path))?;

    let rows = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => rows_from_json(&content)?,
        Some("csv") => rows_from_csv(&content, mapping),
        other => bail!("Unsupported roster format: {:?} (want .json or .csv)", other),
    };

    let result = normalize_rows(&rows, mapping);

    if !result.problems.is_empty() {
        warn!("Found {} problems in {:?}:", result.problems.len(), path);
        for problem in result.problems.iter() {
            warn!("- {:?}", problem);
        }
    }
    info!(
        "Roster has {} acts ({} rows skipped, {} malformed values)",
        result.artists.len(),
        result.skipped_count(),
        result.malformed_value_count()
    );

    Ok(result)
}

/// Parse a JSON roster: an array of row objects or row arrays.
pub fn rows_from_json(content: &str) -> Result<Vec<RawRow>> {
    serde_json::from_str(content).context("Roster JSON must be an array of objects or arrays")
}

/// Parse a CSV roster. With a named mapping the first record is the header
/// and each row becomes a named map; with a positional mapping every record
/// is a positional row.
pub fn rows_from_csv(content: &str, mapping: &FieldMapping) -> Vec<RawRow> {
    let mut records = parse_csv(content);
    if !mapping.is_named() {
        return records
            .into_iter()
            .map(|cells| RawRow::Positional(cells.into_iter().map(Value::String).collect()))
            .collect();
    }

    if records.is_empty() {
        return Vec::new();
    }
    let header = records.remove(0);
    records
        .into_iter()
        .map(|cells| {
            let map = header
                .iter()
                .cloned()
                .zip(cells.into_iter().map(Value::String))
                .collect();
            RawRow::Named(map)
        })
        .collect()
}
