//! Raw row normalization.
//!
//! The many upstream sources (live sheet, CSV export, seed lists) disagree on
//! field layout and formatting. This module converts one raw row plus a
//! declarative field mapping into a canonical [`ArtistMetrics`], so the
//! engine never sees source-specific quirks.

mod mapping;

pub use mapping::{FieldMapping, FieldRef};

use crate::engine::ArtistMetrics;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A row as it arrives from a source: named cells or positional cells.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawRow {
    Named(serde_json::Map<String, Value>),
    Positional(Vec<Value>),
}

impl RawRow {
    fn get(&self, field: &FieldRef) -> Option<&Value> {
        match (self, field) {
            (RawRow::Named(map), FieldRef::Name(key)) => map.get(key),
            (RawRow::Positional(cells), FieldRef::Index(idx)) => cells.get(*idx),
            // Mapping kind and row kind disagree; the cell is simply absent.
            _ => None,
        }
    }
}

/// Soft rejection of one row. Batch loads report these and continue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkippedRow {
    #[error("row has no usable act name")]
    MissingName,
}

/// A normalized row: the canonical metrics plus the names of any fields
/// whose value could not be parsed and was defaulted to 0. The caller owns
/// logging those as data-quality warnings.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRow {
    pub metrics: ArtistMetrics,
    pub malformed_fields: Vec<&'static str>,
}

/// Normalize one raw row.
///
/// Numeric cells are stripped of `$`, thousands separators and surrounding
/// whitespace before parsing. Empty or missing cells normalize to 0 without
/// complaint (sparse sheets are normal); non-numeric or negative cells also
/// normalize to 0 but are reported in `malformed_fields`. This zero default
/// is lossy: a 0 may mean "no reach" or "no data", and the two are not
/// distinguished downstream.
pub fn normalize(row: &RawRow, mapping: &FieldMapping) -> Result<NormalizedRow, SkippedRow> {
    let name = match row.get(&mapping.name) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_owned(),
        _ => return Err(SkippedRow::MissingName),
    };

    let mut malformed_fields = Vec::new();
    let mut number = |field: &'static str, cell: Option<&Value>| -> f64 {
        let (value, malformed) = coerce_number(cell);
        if malformed {
            malformed_fields.push(field);
        }
        value
    };

    let cost = number("cost", row.get(&mapping.cost));
    let primary = number("primary_followers", row.get(&mapping.primary_followers));
    let associated = number(
        "associated_followers",
        row.get(&mapping.associated_followers),
    );
    let streaming = number(
        "streaming_listeners",
        row.get(&mapping.streaming_listeners),
    );

    Ok(NormalizedRow {
        metrics: ArtistMetrics::new(
            name,
            cost,
            primary as u64,
            associated as u64,
            streaming as u64,
        ),
        malformed_fields,
    })
}

/// Coerce one cell to a non-negative number.
///
/// Returns the value and whether it was malformed. Missing, null and empty
/// cells are 0 but not malformed; unparseable or negative cells are 0 and
/// malformed.
fn coerce_number(cell: Option<&Value>) -> (f64, bool) {
    match cell {
        None | Some(Value::Null) => (0.0, false),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(x) if x >= 0.0 => (x, false),
            // Negative input is unrepresentable in the source UI; clamp.
            Some(_) => (0.0, true),
            None => (0.0, true),
        },
        Some(Value::String(s)) => {
            let stripped: String = s
                .trim()
                .chars()
                .filter(|c| *c != '$' && *c != ',')
                .collect();
            if stripped.is_empty() {
                return (0.0, false);
            }
            match stripped.parse::<f64>() {
                Ok(x) if x >= 0.0 && x.is_finite() => (x, false),
                _ => (0.0, true),
            }
        }
        Some(_) => (0.0, true),
    }
}
