//! Derived share-of-reads percentages for a project selection

use serde::Serialize;

use super::ProjectUsage;

/// Share of total reads per source bucket, in percent, over the rows of a
/// usage summary restricted to the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionMetrics {
    pub kigo: f64,
    pub espacia: f64,
    pub bestparking: f64,
    pub legacy: f64,
}

impl SelectionMetrics {
    /// Compute the four percentages for `selection` over `usage`.
    ///
    /// Projects in the selection that are absent from `usage` contribute
    /// nothing. A selection whose summed `reads_total` is zero yields 0.0
    /// for every bucket; the division is never allowed to fail a render.
    pub fn for_selection(usage: &[ProjectUsage], selection: &[String]) -> Self {
        let mut kigo = 0i64;
        let mut espacia = 0i64;
        let mut bestparking = 0i64;
        let mut legacy = 0i64;
        let mut total = 0i64;

        for row in usage {
            if !selection.iter().any(|name| name == &row.project) {
                continue;
            }
            kigo += row.reads_kigo;
            espacia += row.reads_espacia;
            bestparking += row.reads_bestparking;
            legacy += row.reads_legacy;
            total += row.reads_total;
        }

        if total == 0 {
            return Self {
                kigo: 0.0,
                espacia: 0.0,
                bestparking: 0.0,
                legacy: 0.0,
            };
        }

        let pct = |n: i64| (n * 100) as f64 / total as f64;
        Self {
            kigo: pct(kigo),
            espacia: pct(espacia),
            bestparking: pct(bestparking),
            legacy: pct(legacy),
        }
    }
}
