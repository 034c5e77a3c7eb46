mod db;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefinder-cli")]
#[command(about = "Store finder command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Insert every store from a YAML seed file
    Seed {
        /// Path to the seed file
        path: PathBuf,
        /// Validate the file without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Find nearby stores stocking a product and print them as JSON
    Search {
        /// Product title to search for (case-insensitive substring)
        q: String,
        /// Latitude of the search origin
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the search origin
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in kilometres (defaults to `STOREFINDER_DEFAULT_RADIUS_KM`)
        #[arg(long)]
        radius_km: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storefinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Migrate) => {
            let pool = db::connect(&config).await?;
            db::run_migrate(&pool).await?;
            pool.close().await;
        }
        Some(Commands::Seed { path, dry_run }) => {
            db::run_seed(&config, &path, dry_run).await?;
        }
        Some(Commands::Search {
            q,
            lat,
            lng,
            radius_km,
        }) => {
            let radius_km = radius_km.unwrap_or(config.default_radius_km);
            let pool = db::connect(&config).await?;
            let result = search::run_search(&pool, &q, lat, lng, radius_km).await;
            pool.close().await;
            result?;
        }
        None => println!("no command given; run `storefinder-cli --help`"),
    }

    Ok(())
}
