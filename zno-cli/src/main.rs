//! Command line entry point: staging load, migration and the maintenance console.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::load::LoadArgs;
use commands::migrate::MigrateArgs;
use zno_telemetry::tracing::init_tracing;

#[derive(Parser)]
#[command(
    name = "zno",
    about = "Normalizes the ZNO open-data registration dataset"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the CSV export into the staging table
    Load(LoadArgs),
    /// Migrate staged records into the normalized tables; the destination must be empty
    Migrate(MigrateArgs),
    /// Query, add and delete records interactively
    Console,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(env!("CARGO_PKG_NAME"));

    let config = config::load_zno_config()?;

    match args.command {
        Command::Load(load_args) => load_args.run(&config).await,
        Command::Migrate(migrate_args) => migrate_args.run(&config).await,
        Command::Console => commands::console::run(&config).await,
    }
}
