use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use parkfinder_core::Environment;
use tracing_subscriber::EnvFilter;

mod commands;
mod presenter;
mod render;

#[derive(Debug, Parser)]
#[command(name = "parkfinder")]
#[command(about = "Find park district activities near you")]
struct Cli {
    /// Catalog YAML; defaults to `PARKFINDER_CATALOG_PATH`.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where the user is. Without coordinates the session behaves as if
/// geolocation failed.
#[derive(Debug, Clone, Default, PartialEq, Args)]
struct LocationArgs {
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Geosearch label for a manually chosen location, e.g.
    /// "Hyde Park, Chicago, Illinois". Must name the configured region.
    #[arg(long, requires = "lat")]
    place: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List parks, nearest first when a location is given.
    Parks {
        #[command(flatten)]
        location: LocationArgs,

        /// Distance in miles for the nearby auto-selection.
        #[arg(long)]
        radius: Option<String>,

        /// Only show parks whose label contains this text.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Build and validate a search, then print the query.
    Search {
        #[command(flatten)]
        location: LocationArgs,

        #[arg(long)]
        radius: Option<String>,

        /// Park to include; repeatable.
        #[arg(long = "park")]
        parks: Vec<String>,

        /// Activity category; repeatable.
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Whole category group, e.g. "Aquatics"; repeatable.
        #[arg(long = "category-group")]
        category_groups: Vec<String>,

        /// Age group; repeatable.
        #[arg(long = "age-group")]
        age_groups: Vec<String>,

        /// Print the query as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Page through results for the search held by the activity service.
    Results {
        /// Number of "load more" pages to fetch.
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// After loading, highlight the card for this park.
        #[arg(long)]
        highlight: Option<String>,
    },
}

/// Colored log output is for local terminals only.
fn colored_logs(env: Environment) -> bool {
    matches!(env, Environment::Development)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = parkfinder_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(colored_logs(config.env))
        .init();

    let catalog_path = cli.catalog.unwrap_or_else(|| config.catalog_path.clone());

    match cli.command {
        Some(Commands::Parks {
            location,
            radius,
            filter,
        }) => {
            let catalog = commands::load_catalog(&catalog_path)?;
            commands::run_parks(&config, &catalog, &location, radius, filter)?;
        }
        Some(Commands::Search {
            location,
            radius,
            parks,
            categories,
            category_groups,
            age_groups,
            json,
        }) => {
            let catalog = commands::load_catalog(&catalog_path)?;
            let request = commands::SearchRequest {
                radius,
                parks,
                categories,
                category_groups,
                age_groups,
            };
            commands::run_search(&config, &catalog, &location, request, json)?;
        }
        Some(Commands::Results { pages, highlight }) => {
            let catalog = commands::load_catalog(&catalog_path)?;
            commands::run_results(&config, &catalog, pages, highlight).await?;
        }
        None => println!("parkfinder ready; see --help for commands"),
    }

    Ok(())
}
