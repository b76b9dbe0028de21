//! Dashboard session state machine
//!
//! Replaces the host-driven "rerun everything on interaction" model with
//! explicit transitions: `Idle` until a source is chosen, `SourceLoaded`
//! once query 1 has a snapshot, `ProjectsSelected` after a non-empty lot
//! selection drives query 2. Changing the source re-enters `SourceLoaded`;
//! changing the selection re-runs only stage 2.
//!
//! Query-1 results are memoized per source label for the lifetime of the
//! session, so repeating a selection with unchanged parameters is a cache
//! hit, not a network round-trip. Query 2 is never memoized; its key (the
//! selection set) is high-cardinality.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::report::metrics::SelectionMetrics;
use crate::report::sql::{project_usage_sql, time_series_sql};
use crate::report::{ProjectUsage, SourceLabel, TimeSeriesRow};
use crate::warehouse::{QueryExecutor, WarehouseError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error("no source loaded yet; choose a source before selecting projects")]
    NoSourceLoaded,

    #[error("project selection is empty")]
    EmptySelection,
}

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    SourceLoaded(SourceLabel),
    ProjectsSelected(SourceLabel, Vec<String>),
}

/// Stage-2 output: the time series plus the derived share percentages.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub time_series: Vec<TimeSeriesRow>,
    pub metrics: SelectionMetrics,
}

/// One analyst session over an injected read-only query executor.
pub struct DashboardSession<E: QueryExecutor> {
    executor: E,
    utc_offset_hours: i64,
    usage_cache: HashMap<SourceLabel, Vec<ProjectUsage>>,
    state: SessionState,
}

impl<E: QueryExecutor> DashboardSession<E> {
    pub fn new(executor: E, utc_offset_hours: i64) -> Self {
        Self {
            executor,
            utc_offset_hours,
            usage_cache: HashMap::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Stage 1: load the usage summary for `source`.
    ///
    /// A repeated call with the same label serves the cached snapshot
    /// without touching the warehouse. Any failure propagates unchanged
    /// and leaves the previous state intact.
    pub fn select_source(&mut self, source: SourceLabel) -> Result<&[ProjectUsage], SessionError> {
        if !self.usage_cache.contains_key(&source) {
            let sql = project_usage_sql(source);
            let rows = self.executor.query(&sql)?;
            let usage = rows
                .iter()
                .map(|row| ProjectUsage::from_row(row))
                .collect::<Result<Vec<_>, _>>()?;
            self.usage_cache.insert(source, usage);
        }
        self.state = SessionState::SourceLoaded(source);
        Ok(&self.usage_cache[&source])
    }

    /// Stage 2: time series plus share percentages for a non-empty lot
    /// selection, drawn from the currently loaded source's summary.
    pub fn select_projects(&mut self, projects: &[String]) -> Result<SelectionView, SessionError> {
        let source = match &self.state {
            SessionState::Idle => return Err(SessionError::NoSourceLoaded),
            SessionState::SourceLoaded(s) | SessionState::ProjectsSelected(s, _) => *s,
        };
        if projects.is_empty() {
            return Err(SessionError::EmptySelection);
        }

        let sql = time_series_sql(projects, self.utc_offset_hours);
        let rows = self.executor.query(&sql)?;
        let time_series = rows
            .iter()
            .map(|row| TimeSeriesRow::from_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        // Percentages derive from the already-fetched stage-1 snapshot
        let usage = &self.usage_cache[&source];
        let metrics = SelectionMetrics::for_selection(usage, projects);

        self.state = SessionState::ProjectsSelected(source, projects.to_vec());
        Ok(SelectionView {
            time_series,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Value;
    use std::cell::RefCell;

    /// Fake executor that serves canned rows and counts queries.
    struct CountingExecutor {
        usage_rows: Vec<Vec<Value>>,
        series_rows: Vec<Vec<Value>>,
        queries: RefCell<Vec<String>>,
    }

    impl CountingExecutor {
        fn new(usage_rows: Vec<Vec<Value>>, series_rows: Vec<Vec<Value>>) -> Self {
            Self {
                usage_rows,
                series_rows,
                queries: RefCell::new(vec![]),
            }
        }
    }

    impl QueryExecutor for &CountingExecutor {
        fn query(&self, sql: &str) -> Result<Vec<Vec<Value>>, WarehouseError> {
            self.queries.borrow_mut().push(sql.to_string());
            if sql.contains("GROUP BY l.name") {
                Ok(self.usage_rows.clone())
            } else {
                Ok(self.series_rows.clone())
            }
        }
    }

    fn usage_row(project: &str, kigo: i64, espacia: i64, total: i64) -> Vec<Value> {
        vec![
            Value::Text(project.to_string()),
            Value::Integer(kigo),
            Value::Integer(espacia),
            Value::Integer(0),
            Value::Integer(total - kigo - espacia),
            Value::Integer(total),
        ]
    }

    #[test]
    fn test_select_source_is_memoized() {
        let exec = CountingExecutor::new(vec![usage_row("Lot A", 5, 0, 20)], vec![]);
        let mut session = DashboardSession::new(&exec, -6);

        let first = session.select_source(SourceLabel::Kigo).unwrap().to_vec();
        let second = session.select_source(SourceLabel::Kigo).unwrap().to_vec();

        assert_eq!(first, second);
        assert_eq!(exec.queries.borrow().len(), 1);
    }

    #[test]
    fn test_changing_source_queries_again() {
        let exec = CountingExecutor::new(vec![usage_row("Lot A", 5, 0, 20)], vec![]);
        let mut session = DashboardSession::new(&exec, -6);

        session.select_source(SourceLabel::Kigo).unwrap();
        session.select_source(SourceLabel::Espacia).unwrap();
        session.select_source(SourceLabel::Kigo).unwrap();

        // One query per distinct label, the revisit is a cache hit
        assert_eq!(exec.queries.borrow().len(), 2);
        assert_eq!(*session.state(), SessionState::SourceLoaded(SourceLabel::Kigo));
    }

    #[test]
    fn test_select_projects_before_source_fails() {
        let exec = CountingExecutor::new(vec![], vec![]);
        let mut session = DashboardSession::new(&exec, -6);
        let err = session.select_projects(&["Lot A".to_string()]).unwrap_err();
        assert!(matches!(err, SessionError::NoSourceLoaded));
    }

    #[test]
    fn test_empty_selection_is_local_error() {
        let exec = CountingExecutor::new(vec![usage_row("Lot A", 5, 0, 20)], vec![]);
        let mut session = DashboardSession::new(&exec, -6);
        session.select_source(SourceLabel::Kigo).unwrap();

        let err = session.select_projects(&[]).unwrap_err();
        assert!(matches!(err, SessionError::EmptySelection));
        // Stage 2 never reached the warehouse
        assert_eq!(exec.queries.borrow().len(), 1);
    }

    #[test]
    fn test_selection_view_combines_series_and_metrics() {
        let series = vec![vec![
            Value::Text("2024-03-01".to_string()),
            Value::Text("kigo".to_string()),
            Value::Integer(5),
        ]];
        let exec = CountingExecutor::new(vec![usage_row("Lot A", 10, 5, 20)], series);
        let mut session = DashboardSession::new(&exec, -6);
        session.select_source(SourceLabel::Kigo).unwrap();

        let view = session.select_projects(&["Lot A".to_string()]).unwrap();
        assert_eq!(view.time_series.len(), 1);
        assert_eq!(view.metrics.kigo, 50.0);
        assert_eq!(view.metrics.espacia, 25.0);
        assert_eq!(view.metrics.legacy, 25.0);
        assert!(matches!(
            session.state(),
            SessionState::ProjectsSelected(SourceLabel::Kigo, _)
        ));
    }

    #[test]
    fn test_selection_change_reissues_stage_two() {
        let exec = CountingExecutor::new(vec![usage_row("Lot A", 10, 5, 20)], vec![]);
        let mut session = DashboardSession::new(&exec, -6);
        session.select_source(SourceLabel::Kigo).unwrap();

        session.select_projects(&["Lot A".to_string()]).unwrap();
        session.select_projects(&["Lot A".to_string()]).unwrap();

        // 1 usage query + 2 time series queries: selections are not memoized
        assert_eq!(exec.queries.borrow().len(), 3);
    }
}
