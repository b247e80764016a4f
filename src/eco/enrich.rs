//! Per-route metrics: distance, duration, ascent, CO₂ and EcoScore

use serde::{Deserialize, Serialize};

use crate::eco::{EligibilityPolicy, EmissionModel, ScoreBreakdown, elevation_gain, eco_score};
use crate::models::{ModeResult, Route, RouteGeometry, RouteSummary, TransportMode};

/// A successful route with everything the UI and trip log need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRoute {
    pub mode: TransportMode,
    pub summary: RouteSummary,
    pub geometry: RouteGeometry,
    /// Kilometers, one decimal
    pub distance_km: f64,
    pub duration_formatted: String,
    pub elevation_gain_m: u32,
    pub co2_grams: u64,
    /// Exact `clamp(base - penalties, 0, 100)`
    pub eco_score: f64,
    pub breakdown: ScoreBreakdown,
}

impl EnrichedRoute {
    /// Integer score as displayed
    #[must_use]
    pub fn display_score(&self) -> u8 {
        self.eco_score.round().clamp(0.0, 100.0) as u8
    }

    #[must_use]
    pub fn co2_formatted(&self) -> String {
        format_co2(self.co2_grams)
    }
}

/// Emission model and eligibility policy applied together
#[derive(Debug, Clone, Default)]
pub struct EcoEngine {
    pub emissions: EmissionModel,
    pub policy: EligibilityPolicy,
}

impl EcoEngine {
    #[must_use]
    pub fn new(emissions: EmissionModel, policy: EligibilityPolicy) -> Self {
        Self { emissions, policy }
    }

    /// Compute all derived metrics for one route
    #[must_use]
    pub fn enrich(&self, mode: TransportMode, route: &Route) -> EnrichedRoute {
        let distance_km = route.summary.distance_km();
        let elevation_gain_m = elevation_gain(&route.geometry);
        let (eco_score, breakdown) =
            eco_score(distance_km, elevation_gain_m, route.geometry.len());

        EnrichedRoute {
            mode,
            summary: route.summary,
            geometry: route.geometry.clone(),
            distance_km: (distance_km * 10.0).round() / 10.0,
            duration_formatted: format_duration(route.summary.duration_seconds),
            elevation_gain_m,
            co2_grams: self.emissions.estimate(distance_km, mode),
            eco_score,
            breakdown,
        }
    }

    /// Enrich the usable successes of a batch, skipping failures
    #[must_use]
    pub fn enrich_all(&self, results: &[ModeResult]) -> Vec<EnrichedRoute> {
        results
            .iter()
            .filter_map(|result| match result {
                ModeResult::Success { mode, route } if route.is_usable() => {
                    Some(self.enrich(*mode, route))
                }
                _ => None,
            })
            .collect()
    }
}

/// `H hr MM min` from one hour on, `M min` below
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let total_minutes = (seconds / 60.0).round() as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{hours} hr {minutes:02} min")
    } else {
        format!("{minutes} min")
    }
}

/// Grams below one kilogram, kilograms with two decimals above
#[must_use]
pub fn format_co2(grams: u64) -> String {
    if grams < 1000 {
        format!("{grams} g")
    } else {
        format!("{:.2} kg", grams as f64 / 1000.0)
    }
}
