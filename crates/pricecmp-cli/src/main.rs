mod interactive;
mod search;
mod terminal;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pricecmp_client::{AvailabilityFilter, ComparisonClient, SortKey, StoreFilter};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricecmp")]
#[command(about = "Compare product prices across StarTech and Ryans")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search once, print the results and exit
    Search {
        /// Product to search for; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Only show one store (all, startech, ryans)
        #[arg(long, default_value_t = StoreFilter::All)]
        store: StoreFilter,
        /// Only show in-stock products (all, available)
        #[arg(long, default_value_t = AvailabilityFilter::All)]
        availability: AvailabilityFilter,
        /// Result order (price-asc, price-desc, store-name)
        #[arg(long, default_value_t = SortKey::PriceAsc)]
        sort: SortKey,
        /// Print the results as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Read searches and filter changes from stdin (the default)
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = pricecmp_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = ComparisonClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build comparison client: {e}"))?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Search {
            query,
            store,
            availability,
            sort,
            json,
        } => {
            let filters = pricecmp_client::FilterState {
                store,
                availability,
                sort,
            };
            Ok(search::run_search(&config, &client, &query.join(" "), filters, json).await)
        }
        Commands::Interactive => {
            interactive::run_interactive(&config, &client).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
