//! dbinv: dynamic inventory from a MySQL database
//!
//! Reads host rows and categorized parameters from the database and prints
//! the resulting inventory as Ansible dynamic-inventory JSON on stdout.
//! Logs go to stderr so the JSON stream stays clean.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use eyre::WrapErr;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dbinv_core::{Inventory, TableSchema, populate};
use dbinv_db::{DbSession, queries};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "dbinv")]
#[command(about = "Database-backed dynamic inventory source", long_about = None)]
struct Cli {
    /// Path to the inventory source file (*.dbinv.toml)
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full inventory
    List,
    /// Print one host's variables
    Host {
        /// Hostname to look up
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let inventory = build_inventory(&config)
        .await
        .wrap_err("inventory population failed")?;

    let output = match cli.command {
        Commands::List => inventory.to_ansible(),
        Commands::Host { name } => inventory
            .host_vars(&name)
            .map_or_else(|| json!({}), |vars| json!(vars)),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Fetch and materialize the full inventory over one scoped connection
async fn build_inventory(config: &Config) -> Result<Inventory> {
    let mut session = DbSession::connect(&config.database).await?;

    let columns = session.inventory_columns().await?;
    let schema = TableSchema::new(columns);

    let query = config.query.as_deref().unwrap_or(queries::INVENTORY_SCAN);
    let rows = session.inventory_rows(query).await?;

    let mut inventory = Inventory::new();
    populate(&schema, &rows, &mut session, &mut inventory).await?;

    session.close().await?;

    info!(
        hosts = inventory.hosts().len(),
        groups = inventory.groups().len(),
        "inventory ready"
    );
    Ok(inventory)
}
