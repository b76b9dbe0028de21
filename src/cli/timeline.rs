//! Timeline command implementation

use anyhow::Result;

use crate::report::SourceLabel;
use crate::session::DashboardSession;
use crate::warehouse::QueryExecutor;

pub fn run<E: QueryExecutor>(
    session: &mut DashboardSession<E>,
    source: SourceLabel,
    projects: Vec<String>,
    json: bool,
) -> Result<()> {
    session.select_source(source)?;
    let view = session.select_projects(&projects)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("Share of reads for {} selected lot(s):", projects.len());
    println!(
        "  kigo: {:.1}%  espacia: {:.1}%  bestparking: {:.1}%  legacy: {:.1}%",
        view.metrics.kigo, view.metrics.espacia, view.metrics.bestparking, view.metrics.legacy
    );
    println!();

    if view.time_series.is_empty() {
        println!("No reads recorded for the selected lots.");
        return Ok(());
    }

    println!("{:<12} {:<14} {:>8}", "Date", "Source", "Reads");
    println!("{}", "-".repeat(36));

    for row in &view.time_series {
        println!(
            "{:<12} {:<14} {:>8}",
            row.day.format("%Y-%m-%d").to_string(),
            row.source.as_str(),
            row.reads,
        );
    }

    Ok(())
}
