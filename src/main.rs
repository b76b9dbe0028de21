use anyhow::Result;
use clap::{Parser, Subcommand};

use gatescan::cli::{sources, summary, timeline};
use gatescan::config::Config;
use gatescan::report::SourceLabel;
use gatescan::session::DashboardSession;
use gatescan::warehouse::SqliteWarehouse;

#[derive(Parser)]
#[command(name = "gatescan")]
#[command(about = "Parking-gate QR scan analytics over a read-only SQL warehouse")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "gatescan.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-lot usage summary for one source app
    Summary {
        /// Source app (kigo, espacia, bestparking)
        #[arg(short, long)]
        source: SourceLabel,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Daily reads and share percentages for selected lots
    Timeline {
        /// Source app (kigo, espacia, bestparking)
        #[arg(short, long)]
        source: SourceLabel,

        /// Lot names to include (repeatable)
        #[arg(short, long, required = true, num_args = 1..)]
        projects: Vec<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the valid source labels
    Sources,
}

fn open_session(config: &Config) -> Result<DashboardSession<SqliteWarehouse>> {
    let warehouse = SqliteWarehouse::open(&config.warehouse_path())?;
    Ok(DashboardSession::new(
        warehouse,
        config.report.utc_offset_hours,
    ))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).unwrap_or_default();

    match cli.command {
        Commands::Summary { source, json } => {
            let mut session = open_session(&config)?;
            summary::run(&mut session, source, json)?;
        }
        Commands::Timeline {
            source,
            projects,
            json,
        } => {
            let mut session = open_session(&config)?;
            timeline::run(&mut session, source, projects, json)?;
        }
        Commands::Sources => {
            sources::run()?;
        }
    }

    Ok(())
}
