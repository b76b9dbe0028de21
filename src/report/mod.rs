//! Report domain types and row decoding
//!
//! Two tabular entities come back from the warehouse:
//! - [`ProjectUsage`]: one row per parking facility with per-source read
//!   counts and a distinct-event total (query 1)
//! - [`TimeSeriesRow`]: one row per (calendar day, normalized source) for
//!   a selected set of facilities (query 2)
//!
//! Both are immutable snapshots; nothing here mutates rows in place.

pub mod metrics;
pub mod sql;

use chrono::NaiveDate;
use rusqlite::types::Value;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::warehouse::WarehouseError;

/// Originating app for a scan event. The selector choice set is closed;
/// anything outside it only ever appears as the normalized legacy bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLabel {
    Kigo,
    Espacia,
    BestParking,
}

impl SourceLabel {
    pub const ALL: [SourceLabel; 3] = [
        SourceLabel::Kigo,
        SourceLabel::Espacia,
        SourceLabel::BestParking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLabel::Kigo => "kigo",
            SourceLabel::Espacia => "espacia",
            SourceLabel::BestParking => "bestparking",
        }
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kigo" => Ok(SourceLabel::Kigo),
            "espacia" => Ok(SourceLabel::Espacia),
            "bestparking" => Ok(SourceLabel::BestParking),
            other => Err(format!(
                "unknown source '{}' (expected kigo, espacia or bestparking)",
                other
            )),
        }
    }
}

/// Source after normalization: the three known apps, or the legacy bucket
/// that absorbs every unrecognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizedSource {
    Kigo,
    Espacia,
    BestParking,
    Legacy,
}

impl NormalizedSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizedSource::Kigo => "kigo",
            NormalizedSource::Espacia => "espacia",
            NormalizedSource::BestParking => "bestparking",
            NormalizedSource::Legacy => "legacy",
        }
    }

    /// Collapse a raw source tag onto the normalized enum.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "kigo" => NormalizedSource::Kigo,
            "espacia" => NormalizedSource::Espacia,
            "bestparking" => NormalizedSource::BestParking,
            _ => NormalizedSource::Legacy,
        }
    }
}

impl fmt::Display for NormalizedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-facility usage summary (query 1 row).
///
/// `reads_total` counts distinct event ids while the per-source columns
/// count conditional matches, so the bucket sum can in principle diverge
/// from the total if an event id repeats across source tags. The warehouse
/// is trusted on this; nothing re-checks it at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectUsage {
    pub project: String,
    pub reads_kigo: i64,
    pub reads_espacia: i64,
    pub reads_bestparking: i64,
    pub reads_legacy: i64,
    pub reads_total: i64,
}

/// Time-bucketed usage (query 2 row).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRow {
    pub day: NaiveDate,
    pub source: NormalizedSource,
    pub reads: i64,
}

// ============================================
// ROW DECODING
// ============================================

fn text_at(row: &[Value], idx: usize) -> Result<String, WarehouseError> {
    match row.get(idx) {
        Some(Value::Text(s)) => Ok(s.clone()),
        other => Err(WarehouseError::Decode(format!(
            "expected text in column {}, got {:?}",
            idx, other
        ))),
    }
}

fn integer_at(row: &[Value], idx: usize) -> Result<i64, WarehouseError> {
    match row.get(idx) {
        Some(Value::Integer(n)) => Ok(*n),
        // SQLite may hand back NULL for aggregates over zero rows
        Some(Value::Null) => Ok(0),
        other => Err(WarehouseError::Decode(format!(
            "expected integer in column {}, got {:?}",
            idx, other
        ))),
    }
}

impl ProjectUsage {
    /// Decode one positional query-1 row:
    /// (project, reads_kigo, reads_espacia, reads_bestparking, reads_legacy, reads_total)
    pub fn from_row(row: &[Value]) -> Result<Self, WarehouseError> {
        if row.len() != 6 {
            return Err(WarehouseError::Decode(format!(
                "expected 6 columns in usage row, got {}",
                row.len()
            )));
        }
        Ok(Self {
            project: text_at(row, 0)?,
            reads_kigo: integer_at(row, 1)?,
            reads_espacia: integer_at(row, 2)?,
            reads_bestparking: integer_at(row, 3)?,
            reads_legacy: integer_at(row, 4)?,
            reads_total: integer_at(row, 5)?,
        })
    }
}

impl TimeSeriesRow {
    /// Decode one positional query-2 row: (day, source, reads)
    pub fn from_row(row: &[Value]) -> Result<Self, WarehouseError> {
        if row.len() != 3 {
            return Err(WarehouseError::Decode(format!(
                "expected 3 columns in time series row, got {}",
                row.len()
            )));
        }
        let day_text = text_at(row, 0)?;
        let day = NaiveDate::parse_from_str(&day_text, "%Y-%m-%d").map_err(|e| {
            WarehouseError::Decode(format!("bad date '{}': {}", day_text, e))
        })?;
        Ok(Self {
            day,
            source: NormalizedSource::from_tag(&text_at(row, 1)?),
            reads: integer_at(row, 2)?,
        })
    }
}
