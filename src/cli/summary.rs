//! Summary command implementation

use anyhow::Result;

use crate::report::SourceLabel;
use crate::session::DashboardSession;
use crate::warehouse::QueryExecutor;

pub fn run<E: QueryExecutor>(
    session: &mut DashboardSession<E>,
    source: SourceLabel,
    json: bool,
) -> Result<()> {
    let usage = session.select_source(source)?;

    if json {
        println!("{}", serde_json::to_string_pretty(usage)?);
        return Ok(());
    }

    if usage.is_empty() {
        println!("No lots with '{}' reads found.", source);
        return Ok(());
    }

    println!(
        "{:<30} {:>10} {:>10} {:>12} {:>10} {:>10}",
        "Project", "Kigo", "Espacia", "BestParking", "Legacy", "Total"
    );
    println!("{}", "-".repeat(88));

    for row in usage {
        println!(
            "{:<30} {:>10} {:>10} {:>12} {:>10} {:>10}",
            row.project,
            row.reads_kigo,
            row.reads_espacia,
            row.reads_bestparking,
            row.reads_legacy,
            row.reads_total,
        );
    }

    Ok(())
}
