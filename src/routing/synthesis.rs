//! Route synthesis for modes the directions provider cannot route
//!
//! Bus, motorcycle and airplane routes are derived from the driving route,
//! which is passed in explicitly. When that baseline failed, every
//! synthetic mode reports why instead of disappearing.

use tracing::debug;

use crate::models::{Coordinate, ModeFailure, ModeResult, Route, RouteSummary, TransportMode};
use crate::routing::geo::straight_line_km;

/// Mode-specific transformation constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisFactors {
    /// Buses stop along the way
    pub bus_duration_factor: f64,
    /// Motorcycles filter through traffic
    pub motorcycle_duration_factor: f64,
    pub cruise_speed_kmh: f64,
    /// Check-in, boarding and landing
    pub ground_overhead_seconds: f64,
    /// Flights are only offered beyond this straight-line distance
    pub flight_threshold_km: f64,
}

impl Default for SynthesisFactors {
    fn default() -> Self {
        Self {
            bus_duration_factor: 1.3,
            motorcycle_duration_factor: 0.9,
            cruise_speed_kmh: 800.0,
            ground_overhead_seconds: 7_200.0,
            flight_threshold_km: 500.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteSynthesizer {
    factors: SynthesisFactors,
}

impl RouteSynthesizer {
    #[must_use]
    pub fn new(factors: SynthesisFactors) -> Self {
        Self { factors }
    }

    /// Derive bus, motorcycle and (for long trips) airplane results.
    ///
    /// `straight_km` only gates whether a flight is synthesized and how long
    /// it is airborne; it never replaces a routed distance.
    #[must_use]
    pub fn synthesize(
        &self,
        driving: &ModeResult,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Vec<ModeResult> {
        let baseline = match driving {
            ModeResult::Success { route, .. } if route.is_usable() => route,
            ModeResult::Success { .. } => {
                return self.unavailable("driving route has no usable geometry");
            }
            ModeResult::Failed { failure, .. } => return self.unavailable(failure.reason()),
        };

        let straight_km = straight_line_km(&origin, &destination);
        let mut results = vec![
            ModeResult::success(
                TransportMode::Bus,
                self.scaled(baseline, self.factors.bus_duration_factor),
            ),
            ModeResult::success(
                TransportMode::Motorcycle,
                self.scaled(baseline, self.factors.motorcycle_duration_factor),
            ),
        ];

        if straight_km > self.factors.flight_threshold_km {
            results.push(ModeResult::success(
                TransportMode::Airplane,
                self.flight(baseline, straight_km, origin, destination),
            ));
        } else {
            debug!(
                "Skipping flight: {:.1} km straight line is within {} km",
                straight_km, self.factors.flight_threshold_km
            );
        }

        results
    }

    /// Same distance and geometry as driving, duration scaled
    fn scaled(&self, driving: &Route, duration_factor: f64) -> Route {
        Route::new(
            RouteSummary::new(
                driving.summary.distance_meters,
                driving.summary.duration_seconds * duration_factor,
            ),
            driving.geometry.clone(),
        )
    }

    /// Driving distance for the CO₂ figure, direct segment for the path
    fn flight(
        &self,
        driving: &Route,
        straight_km: f64,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Route {
        let airborne_seconds = straight_km / self.factors.cruise_speed_kmh * 3_600.0;
        Route::new(
            RouteSummary::new(
                driving.summary.distance_meters,
                airborne_seconds + self.factors.ground_overhead_seconds,
            ),
            vec![origin, destination],
        )
    }

    fn unavailable(&self, reason: &str) -> Vec<ModeResult> {
        debug!("Driving baseline unavailable, no synthetic routes: {}", reason);
        TransportMode::SYNTHETIC
            .into_iter()
            .map(|mode| ModeResult::failed(mode, ModeFailure::synthesis_unavailable(reason)))
            .collect()
    }
}
