//! Sources command implementation

use anyhow::Result;

use crate::report::SourceLabel;

pub fn run() -> Result<()> {
    println!("Available sources:");
    for label in SourceLabel::ALL {
        println!("  {}", label);
    }
    Ok(())
}
