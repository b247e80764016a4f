//! Routed paths and per-mode outcomes

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Coordinate, TransportMode};

/// Ordered travel path from origin to destination
pub type RouteGeometry = Vec<Coordinate>;

/// Totals reported for a routed path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RouteSummary {
    /// Build a summary, clamping negative or non-finite values to zero
    #[must_use]
    pub fn new(distance_meters: f64, duration_seconds: f64) -> Self {
        let sanitize = |value: f64| if value.is_finite() { value.max(0.0) } else { 0.0 };
        Self {
            distance_meters: sanitize(distance_meters),
            duration_seconds: sanitize(duration_seconds),
        }
    }

    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}

/// A usable route: summary plus geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub summary: RouteSummary,
    pub geometry: RouteGeometry,
}

impl Route {
    #[must_use]
    pub fn new(summary: RouteSummary, geometry: RouteGeometry) -> Self {
        Self { summary, geometry }
    }

    /// A route needs at least two points to be drawn or scored
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.geometry.len() >= 2
    }
}

/// Why a mode produced no route
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModeFailure {
    /// The directions provider errored or returned nothing usable
    #[error("{reason}")]
    Provider { reason: String },

    /// The driving baseline a synthetic mode depends on is missing
    #[error("Driving route unavailable: {reason}")]
    SynthesisUnavailable { reason: String },
}

impl ModeFailure {
    pub fn provider<S: Into<String>>(reason: S) -> Self {
        Self::Provider {
            reason: reason.into(),
        }
    }

    pub fn synthesis_unavailable<S: Into<String>>(reason: S) -> Self {
        Self::SynthesisUnavailable {
            reason: reason.into(),
        }
    }

    /// The underlying reason without the variant prefix
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            ModeFailure::Provider { reason } | ModeFailure::SynthesisUnavailable { reason } => {
                reason
            }
        }
    }
}

/// Outcome of fetching or synthesizing one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModeResult {
    Success { mode: TransportMode, route: Route },
    Failed { mode: TransportMode, failure: ModeFailure },
}

impl ModeResult {
    #[must_use]
    pub fn success(mode: TransportMode, route: Route) -> Self {
        Self::Success { mode, route }
    }

    #[must_use]
    pub fn failed(mode: TransportMode, failure: ModeFailure) -> Self {
        Self::Failed { mode, failure }
    }

    #[must_use]
    pub fn mode(&self) -> TransportMode {
        match self {
            ModeResult::Success { mode, .. } | ModeResult::Failed { mode, .. } => *mode,
        }
    }

    #[must_use]
    pub fn route(&self) -> Option<&Route> {
        match self {
            ModeResult::Success { route, .. } => Some(route),
            ModeResult::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&ModeFailure> {
        match self {
            ModeResult::Success { .. } => None,
            ModeResult::Failed { failure, .. } => Some(failure),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ModeResult::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_clamps_invalid_values() {
        let summary = RouteSummary::new(-12.0, f64::NAN);
        assert_eq!(summary.distance_meters, 0.0);
        assert_eq!(summary.duration_seconds, 0.0);
        assert_eq!(RouteSummary::new(2500.0, 60.0).distance_km(), 2.5);
    }

    #[test]
    fn test_mode_result_accessors() {
        let route = Route::new(
            RouteSummary::new(1000.0, 600.0),
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01)],
        );
        let ok = ModeResult::success(TransportMode::Walking, route.clone());
        assert!(ok.is_success());
        assert_eq!(ok.route(), Some(&route));
        assert!(ok.failure().is_none());

        let failed = ModeResult::failed(TransportMode::Bus, ModeFailure::provider("timeout"));
        assert_eq!(failed.mode(), TransportMode::Bus);
        assert!(failed.route().is_none());
        assert_eq!(failed.failure().map(ModeFailure::reason), Some("timeout"));
    }

    #[test]
    fn test_failure_display() {
        let failure = ModeFailure::synthesis_unavailable("HTTP 500");
        assert_eq!(failure.to_string(), "Driving route unavailable: HTTP 500");
        assert_eq!(failure.reason(), "HTTP 500");
    }

    #[test]
    fn test_single_point_route_is_unusable() {
        let route = Route::new(RouteSummary::new(0.0, 0.0), vec![Coordinate::new(0.0, 0.0)]);
        assert!(!route.is_usable());
    }
}
