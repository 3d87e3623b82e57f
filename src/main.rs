use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use trip_planner::api::AppState;
use trip_planner::itinerary::ItineraryPlanner;
use trip_planner::llm::{ItineraryWriter, OpenAiWriter};
use trip_planner::search::TripSearch;
use trip_planner::{
    AirportDataset, AmadeusClient, LocationResolver, LocationSearch, TripPlannerConfig, logging,
    web,
};

#[derive(Parser)]
#[command(name = "trip-planner")]
#[command(about = "Travel planning backend for flights, hotels and activities")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Listen port, overrides server.port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Resolve a place name to an IATA code and exit
    Resolve {
        /// City, airport name or code
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = TripPlannerConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    let _log_guard = logging::init_logging(&config.logging, cli.verbose)?;

    let client = Arc::new(
        AmadeusClient::new(&config.provider).context("Failed to create provider client")?,
    );
    let airports = Arc::new(AirportDataset::new(&config.resolver.airports_path));
    let remote: Arc<dyn LocationSearch> = client.clone();
    let resolver = Arc::new(LocationResolver::new(
        Some(remote),
        airports,
        &config.resolver,
    ));

    match cli.command {
        Commands::Resolve { query } => {
            match resolver.resolve(&query).await {
                Some(code) => println!("{code}"),
                None => anyhow::bail!("Could not resolve '{query}'"),
            }
            Ok(())
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }

            let search = Arc::new(TripSearch::new(client, resolver, &config));
            search.results_store().reset().await;

            let writer = OpenAiWriter::from_config(&config.llm)
                .context("Failed to create LLM client")?
                .map(|writer| Arc::new(writer) as Arc<dyn ItineraryWriter>);
            if writer.is_none() {
                info!("No LLM key configured, itineraries will not include day plans");
            }

            let planner = Arc::new(ItineraryPlanner::new(search.clone(), writer));
            info!(
                "Using provider {} ({} environment)",
                search.client().base_url(),
                config.provider.hostname
            );

            web::run(AppState::new(search, planner), &config.server).await
        }
    }
}
