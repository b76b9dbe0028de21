//! Aggregation query builders
//!
//! Both queries run entirely inside the warehouse; the local code only
//! shapes the SQL. Every user-influenced value that lands in a query
//! passes through [`quote_literal`] — project names come from upstream
//! data and must never escape their string-literal context.

use super::SourceLabel;

const KNOWN_SOURCES: &str = "'kigo', 'espacia', 'bestparking'";

const EVENT_JOIN: &str = "FROM gates g
JOIN lots l ON g.lot_id = l.id
JOIN qr_reads r ON g.qr_code = r.qr_code";

/// Quote a string as a SQL literal, doubling embedded single quotes.
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Query 1: per-facility usage summary.
///
/// One row per lot with at least one read from `source` (post-aggregation
/// HAVING filter — the other count columns still cover all sources). Row
/// order is the warehouse default; callers treat the result as a set
/// keyed by project name.
pub fn project_usage_sql(source: SourceLabel) -> String {
    let source_literal = quote_literal(source.as_str());
    format!(
        "SELECT l.name AS project,
       SUM(CASE WHEN r.source = 'kigo' THEN 1 ELSE 0 END) AS reads_kigo,
       SUM(CASE WHEN r.source = 'espacia' THEN 1 ELSE 0 END) AS reads_espacia,
       SUM(CASE WHEN r.source = 'bestparking' THEN 1 ELSE 0 END) AS reads_bestparking,
       SUM(CASE WHEN r.source IS NULL OR r.source NOT IN ({known}) THEN 1 ELSE 0 END) AS reads_legacy,
       COUNT(DISTINCT r.id) AS reads_total
{join}
GROUP BY l.name
HAVING SUM(CASE WHEN r.source = {src} THEN 1 ELSE 0 END) > 0",
        known = KNOWN_SOURCES,
        join = EVENT_JOIN,
        src = source_literal,
    )
}

/// Query 2: daily reads per normalized source for the selected lots.
///
/// Event timestamps are shifted by `utc_offset_hours` before truncating
/// to a calendar date, and unrecognized source tags collapse to the
/// legacy bucket before grouping.
///
/// Callers guarantee `projects` is non-empty; an empty slice would
/// produce `IN ()`, which the warehouse rejects.
pub fn time_series_sql(projects: &[String], utc_offset_hours: i64) -> String {
    let in_list = projects
        .iter()
        .map(|p| quote_literal(p))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT DATE(r.created, '{offset} hours') AS day,
       CASE WHEN r.source IN ({known}) THEN r.source ELSE 'legacy' END AS source,
       COUNT(DISTINCT r.id) AS reads
{join}
WHERE l.name IN ({lots})
GROUP BY day, source
ORDER BY day ASC",
        offset = utc_offset_hours,
        known = KNOWN_SOURCES,
        join = EVENT_JOIN,
        lots = in_list,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_literal_plain() {
        assert_eq!(quote_literal("Lot A"), "'Lot A'");
    }

    #[test]
    fn test_quote_literal_doubles_single_quotes() {
        assert_eq!(quote_literal("O'Hare Lot"), "'O''Hare Lot'");
        assert_eq!(quote_literal("''"), "''''''");
    }

    #[test]
    fn test_injection_attempt_stays_inside_literal() {
        let hostile = "x'); DROP TABLE qr_reads; --";
        let sql = time_series_sql(&[hostile.to_string()], -6);
        // The payload survives only as a quoted literal
        assert!(sql.contains("IN ('x''); DROP TABLE qr_reads; --')"));
        // Exactly one statement: no quote-terminated breakout
        assert!(!sql.contains("IN ('x');"));
    }

    #[test]
    fn test_project_usage_sql_filters_on_requested_source() {
        let sql = project_usage_sql(SourceLabel::Espacia);
        assert!(sql.contains("HAVING SUM(CASE WHEN r.source = 'espacia' THEN 1 ELSE 0 END) > 0"));
        // Count columns are unconditional on the filter source
        assert!(sql.contains("AS reads_kigo"));
        assert!(sql.contains("AS reads_bestparking"));
        assert!(sql.contains("COUNT(DISTINCT r.id) AS reads_total"));
    }

    #[test]
    fn test_time_series_sql_shape() {
        let projects = vec!["Lot A".to_string(), "Lot B".to_string()];
        let sql = time_series_sql(&projects, -6);
        assert!(sql.contains("DATE(r.created, '-6 hours')"));
        assert!(sql.contains("WHERE l.name IN ('Lot A', 'Lot B')"));
        assert!(sql.contains("ELSE 'legacy'"));
        assert!(sql.trim_end().ends_with("ORDER BY day ASC"));
    }
}
