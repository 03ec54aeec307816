/******************************************************************************
 * RENTAL STORE COMMAND LINE
 *
 * Runs a single data-access operation against either the PostgreSQL store or
 * the in-memory double and prints the result as JSON.
 ******************************************************************************/

use anyhow::{ Context, Result };
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use rental_store::{
    commands::{ self, Command },
    create_store,
    db::{ Database, DbConfig },
    InMemoryRentalStore,
    RentalDataStore,
    StoreKind,
};

/// Rental data-access CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backing store to run against
    #[arg(long, value_enum, default_value = "postgres", env = "RENTAL_STORE")]
    store: StoreKind,

    /// JSON fixture loaded into the in-memory store
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Store operation to run
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();
    env_logger::init();

    // Parse command line arguments
    let cli = Cli::parse();

    let store = open_store(&cli).await?;

    match commands::execute(store.as_ref(), cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", serde_json::to_string_pretty(&err.descriptor())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Build the requested store; only the database kind touches the network
async fn open_store(cli: &Cli) -> Result<Box<dyn RentalDataStore>> {
    match (cli.store, &cli.seed) {
        (StoreKind::InMemory, Some(path)) => {
            let store = InMemoryRentalStore::from_json_file(path)?;
            Ok(Box::new(store))
        }
        (StoreKind::InMemory, None) => create_store(StoreKind::InMemory, None),
        (StoreKind::Database, seed) => {
            if seed.is_some() {
                log::warn!("--seed only applies to the in-memory store; ignoring it");
            }
            let db_config = DbConfig::from_env().context("Failed to get database configuration")?;
            let db = Database::connect(db_config).await.context("Failed to connect to database")?;
            create_store(StoreKind::Database, Some(db.pool().clone()))
        }
    }
}
