pub mod cli;
pub mod config;
pub mod report;
pub mod session;
pub mod warehouse;

pub use config::Config;
pub use session::DashboardSession;
pub use warehouse::{QueryExecutor, SqliteWarehouse};
