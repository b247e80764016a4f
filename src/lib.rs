//! `EcoRoute` - Multi-modal route comparison by environmental impact
//!
//! This library fetches routes for several transport modes, derives the
//! modes a routing service cannot provide, and ranks everything by
//! estimated CO₂ emissions and an EcoScore.

pub mod api;
pub mod cache;
pub mod config;
pub mod eco;
pub mod error;
pub mod logging;
pub mod models;
pub mod routing;
pub mod trips;
pub mod web;

// Re-export core types for public API
pub use cache::{CacheBatch, PersistentCache};
pub use config::EcoRouteConfig;
pub use eco::{EcoEngine, EmissionModel, EligibilityPolicy, EnrichedRoute};
pub use error::EcoRouteError;
pub use models::{Coordinate, ModeFailure, ModeResult, Route, RouteSummary, TransportMode};
pub use routing::{
    CachedProvider, DirectionsProvider, OpenRouteClient, PlaceSearch, RouteComparison,
    RoutePlanner,
};
pub use trips::{TripRecord, TripStats, TripStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, EcoRouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
