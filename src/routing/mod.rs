//! Routing module
//!
//! Fetches native routes from the directions provider, derives the
//! synthetic modes and assembles the ranked comparison.

pub mod cached;
pub mod geo;
pub mod openroute;
pub mod planner;
pub mod provider;
pub mod synthesis;

pub use cached::CachedProvider;
pub use geo::straight_line_km;
pub use openroute::OpenRouteClient;
pub use planner::{FailedMode, RouteComparison, RoutePlanner};
pub use provider::{DirectionsProvider, Place, PlaceSearch};
pub use synthesis::{RouteSynthesizer, SynthesisFactors};
