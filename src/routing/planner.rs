//! End-to-end comparison of every transport mode between two points

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::EcoRouteError;
use crate::eco::{EcoEngine, EnrichedRoute, HiddenMode};
use crate::models::{Coordinate, ModeFailure, ModeResult, TransportMode};
use crate::routing::geo::straight_line_km;
use crate::routing::provider::DirectionsProvider;
use crate::routing::synthesis::RouteSynthesizer;

/// A mode that produced no route, with the reason shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedMode {
    pub mode: TransportMode,
    pub reason: String,
}

/// Ranked outcome of a planning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteComparison {
    pub straight_line_km: f64,
    /// Lowest-emission eligible route, if any mode is eligible
    pub recommended: Option<EnrichedRoute>,
    /// Remaining eligible routes, ascending CO₂
    pub alternatives: Vec<EnrichedRoute>,
    pub hidden: Vec<HiddenMode>,
    pub failures: Vec<FailedMode>,
}

impl RouteComparison {
    /// Recommended route followed by the alternatives
    pub fn routes(&self) -> impl Iterator<Item = &EnrichedRoute> {
        self.recommended.iter().chain(self.alternatives.iter())
    }

    #[must_use]
    pub fn route(&self, mode: TransportMode) -> Option<&EnrichedRoute> {
        self.routes().find(|route| route.mode == mode)
    }
}

pub struct RoutePlanner {
    provider: Arc<dyn DirectionsProvider>,
    synthesizer: RouteSynthesizer,
    engine: EcoEngine,
}

impl RoutePlanner {
    pub fn new(provider: Arc<dyn DirectionsProvider>, engine: EcoEngine) -> Self {
        Self {
            provider,
            synthesizer: RouteSynthesizer::default(),
            engine,
        }
    }

    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: RouteSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    #[must_use]
    pub fn engine(&self) -> &EcoEngine {
        &self.engine
    }

    /// Fetch all native modes concurrently; each outcome is kept as data
    async fn fetch_native(&self, origin: Coordinate, destination: Coordinate) -> Vec<ModeResult> {
        let requests = TransportMode::NATIVE.into_iter().map(|mode| async move {
            match self.provider.route(mode, origin, destination).await {
                Ok(route) if route.is_usable() => {
                    debug!(
                        "{} route: {:.1} km, {} points",
                        mode,
                        route.summary.distance_km(),
                        route.geometry.len()
                    );
                    ModeResult::success(mode, route)
                }
                Ok(_) => {
                    warn!("{} route has fewer than two points", mode);
                    ModeResult::failed(mode, ModeFailure::provider("Route has no usable geometry"))
                }
                Err(e) => {
                    warn!("{} route failed: {}", mode, e);
                    ModeResult::failed(mode, ModeFailure::provider(provider_reason(e)))
                }
            }
        });

        join_all(requests).await
    }

    /// Route, synthesize, enrich and rank every mode.
    ///
    /// Individual mode failures end up in `failures`; only when nothing at
    /// all could be routed does this return [`EcoRouteError::NoRoutes`].
    #[tracing::instrument(skip(self))]
    pub async fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> crate::Result<RouteComparison> {
        origin.validate()?;
        destination.validate()?;

        let straight_line_km = straight_line_km(&origin, &destination);
        let mut results = self.fetch_native(origin, destination).await;

        let driving = results
            .iter()
            .find(|result| result.mode() == TransportMode::Driving)
            .cloned()
            .unwrap_or_else(|| {
                ModeResult::failed(
                    TransportMode::Driving,
                    ModeFailure::provider("Driving route was not requested"),
                )
            });
        results.extend(self.synthesizer.synthesize(&driving, origin, destination));

        if !results.iter().any(ModeResult::is_success) {
            let reasons = results
                .iter()
                .filter_map(|result| {
                    result
                        .failure()
                        .map(|failure| format!("{}: {}", result.mode(), failure))
                })
                .collect();
            return Err(EcoRouteError::NoRoutes { reasons });
        }

        let failures: Vec<FailedMode> = results
            .iter()
            .filter_map(|result| {
                result.failure().map(|failure| FailedMode {
                    mode: result.mode(),
                    reason: failure.to_string(),
                })
            })
            .collect();

        let ranking = self.engine.policy.rank(self.engine.enrich_all(&results));
        info!(
            "Planned {:.1} km trip: {} shown, {} hidden, {} failed",
            straight_line_km,
            usize::from(ranking.recommended.is_some()) + ranking.alternatives.len(),
            ranking.hidden.len(),
            failures.len()
        );

        Ok(RouteComparison {
            straight_line_km,
            recommended: ranking.recommended,
            alternatives: ranking.alternatives,
            hidden: ranking.hidden,
            failures,
        })
    }
}

/// Provider errors carry their own message; other errors keep their prefix
fn provider_reason(error: EcoRouteError) -> String {
    match error {
        EcoRouteError::Provider { message } => message,
        other => other.to_string(),
    }
}
