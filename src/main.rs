use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use actix_web::{middleware::Logger, App, HttpServer};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod bounds;
mod bulk;
mod config;
mod db;
mod error;
mod http;
mod lookup;
mod model;
mod number;
mod query;
mod submission;
mod tile;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve queries, tiles and submissions over HTTP
    Serve { port: Option<u16> },
    /// Offline operations over every stored sample
    #[clap(subcommand)]
    Bulk(bulk::BulkCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signalmap=info,actix_web=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let path = match cli.config.as_deref() {
        Some(x) => x,
        None => Path::new("config.toml"),
    };
    let config = config::load(path)?;

    let pool = db::connect(&config.database_url, config.pool_size).await?;
    sqlx::migrate!().run(&pool).await?;

    match cli.command {
        Command::Serve { port } => {
            let state = http::State {
                store: Arc::new(db::PgSampleStore::new(pool)),
                tiles: tile::TileRoot(config.tile_root),
                motd: http::Motd(config.motd),
            };
            let port = port.unwrap_or(config.http_port);
            tracing::info!(port, pool_size = config.pool_size, "listening");

            HttpServer::new(move || {
                App::new()
                    .wrap(Logger::default())
                    .configure(|cfg| state.configure(cfg))
            })
            .bind(("0.0.0.0", port))?
            .run()
            .await?;
        }

        Command::Bulk(command) => bulk::run(pool, command).await?,
    };

    Ok(())
}
