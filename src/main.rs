use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ecoroute::api::AppState;
use ecoroute::eco::{
    eco_equivalence, impact_message, negative_feedback, recommendation_badge, slope_percent,
};
use ecoroute::{
    CachedProvider, Coordinate, DirectionsProvider, EcoEngine, EcoRouteConfig, EligibilityPolicy,
    EmissionModel, EnrichedRoute, OpenRouteClient, PersistentCache, RouteComparison, RoutePlanner,
    TransportMode, TripStore, logging, web,
};

#[derive(Parser)]
#[command(name = "ecoroute", version, about = "Compare routes by their environmental impact")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Port to listen on, overriding the config
        #[arg(long)]
        port: Option<u16>,
    },
    /// Compare every mode between two `lon,lat` points
    Compare {
        #[arg(allow_hyphen_values = true)]
        origin: String,
        #[arg(allow_hyphen_values = true)]
        destination: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = EcoRouteConfig::load_from_path(cli.config)?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging)?;

    match cli.command {
        Command::Serve { port } => serve(&config, port).await,
        Command::Compare {
            origin,
            destination,
        } => compare(&config, &origin, &destination).await,
    }
}

fn open_cache(config: &EcoRouteConfig) -> Result<PersistentCache> {
    let path = config.cache.path();
    PersistentCache::open(&path)
        .with_context(|| format!("Failed to open cache at {}", path.display()))
}

fn engine(config: &EcoRouteConfig) -> EcoEngine {
    EcoEngine::new(
        EmissionModel::new(config.emission_rates),
        EligibilityPolicy::default(),
    )
}

/// The directions provider, behind the route cache when enabled
fn directions(
    client: Arc<OpenRouteClient>,
    cache: Option<PersistentCache>,
    config: &EcoRouteConfig,
) -> Arc<dyn DirectionsProvider> {
    if let Some(cache) = cache.filter(|_| config.cache.enabled) {
        let ttl = Duration::from_secs(u64::from(config.cache.ttl_hours) * 3_600);
        return Arc::new(CachedProvider::new(client, cache, ttl));
    }
    client
}

async fn serve(config: &EcoRouteConfig, port: Option<u16>) -> Result<()> {
    let client = Arc::new(OpenRouteClient::new(&config.provider)?);
    let cache = open_cache(config)?;

    let planner = RoutePlanner::new(
        directions(client.clone(), Some(cache.clone()), config),
        engine(config),
    );
    let state = AppState {
        planner: Arc::new(planner),
        places: client,
        trips: TripStore::new(cache),
    };

    let port = port.unwrap_or(config.server.port);
    let timeout = Duration::from_secs(config.server.request_timeout_seconds.into());
    web::run(state, port, timeout).await
}

async fn compare(config: &EcoRouteConfig, origin: &str, destination: &str) -> Result<()> {
    let origin = Coordinate::parse_pair(origin)?;
    let destination = Coordinate::parse_pair(destination)?;

    let client = Arc::new(OpenRouteClient::new(&config.provider)?);
    let cache = if config.cache.enabled {
        Some(open_cache(config)?)
    } else {
        None
    };
    let planner = RoutePlanner::new(directions(client, cache, config), engine(config));

    let comparison = match planner.plan(origin, destination).await {
        Ok(comparison) => comparison,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };
    print_comparison(&comparison, planner.engine());
    Ok(())
}

fn print_route(route: &EnrichedRoute) {
    println!(
        "  {:<11} {:>8.1} km {:>14} {:>10}  EcoScore {:>3}  {:>4}% avg climb  {}",
        route.mode.title(),
        route.distance_km,
        route.duration_formatted,
        route.co2_formatted(),
        route.display_score(),
        slope_percent(route.elevation_gain_m, route.summary.distance_km()),
        route.mode.caption()
    );
}

fn print_comparison(comparison: &RouteComparison, engine: &EcoEngine) {
    println!("Straight-line distance: {:.1} km", comparison.straight_line_km);

    match &comparison.recommended {
        Some(best) => {
            println!("\nRecommended:");
            print_route(best);

            let saved = engine
                .emissions
                .co2_saved(best.summary.distance_km(), best.mode);
            if let Some(badge) = recommendation_badge(best.mode, saved) {
                println!("  [{badge}]");
            }
            if let Some(message) = impact_message(saved) {
                println!("  {message}");
            }
            if let Some(equivalence) = eco_equivalence(saved) {
                println!("  {equivalence}");
            }
        }
        None => println!("\nNo mode suits this distance."),
    }

    if !comparison.alternatives.is_empty() {
        println!("\nAlternatives:");
        let best_grams = comparison
            .recommended
            .as_ref()
            .map_or(0, |best| best.co2_grams);
        for route in &comparison.alternatives {
            print_route(route);
            if let Some(feedback) = negative_feedback(route.co2_grams, best_grams) {
                println!("    {} ({:?})", feedback.message, feedback.severity);
            }
        }
    }

    if let Some(driving) = comparison.route(TransportMode::Driving) {
        println!(
            "\nDriving emits {} for this trip.",
            driving.co2_formatted()
        );
    }

    for hidden in &comparison.hidden {
        println!("  - {} ({:.1} km)", hidden.reason, hidden.distance_km);
    }
    for failure in &comparison.failures {
        println!("  ! {}: {}", failure.mode.title(), failure.reason);
    }
}
