//! Offline tooling that reads the whole sample table.

use anyhow::Result;
use clap::Subcommand;
use sqlx::PgPool;

mod export;
mod stats;

#[derive(Debug, Subcommand)]
pub enum BulkCommand {
    /// Write every stored sample to stdout as CSV
    Export,
    /// Print sample counts per carrier and generation as JSON
    Stats,
}

pub async fn run(pool: PgPool, command: BulkCommand) -> Result<()> {
    match command {
        BulkCommand::Export => export::run(pool).await?,
        BulkCommand::Stats => stats::run(pool).await?,
    }

    Ok(())
}
