use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Coordinate, Route, TransportMode};

/// External service that routes natively supported profiles.
///
/// Retries, rate limiting and caching belong to implementations; the
/// planner calls each profile once and records whatever comes back.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(
        &self,
        mode: TransportMode,
        origin: Coordinate,
        destination: Coordinate,
    ) -> crate::Result<Route>;
}

#[async_trait]
impl<P: DirectionsProvider + ?Sized> DirectionsProvider for Arc<P> {
    async fn route(
        &self,
        mode: TransportMode,
        origin: Coordinate,
        destination: Coordinate,
    ) -> crate::Result<Route> {
        (**self).route(mode, origin, destination).await
    }
}

/// A geocoding candidate for a free-text query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub coordinate: Coordinate,
}

/// Resolves free-text queries to places
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, query: &str) -> crate::Result<Vec<Place>>;
}
