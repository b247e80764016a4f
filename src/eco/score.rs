//! EcoScore: a bounded 0-100 sustainability score with an auditable breakdown

use serde::{Deserialize, Serialize};

pub const BASE_SCORE: f64 = 100.0;
const DISTANCE_PENALTY_PER_KM: f64 = 2.0;
const ELEVATION_PENALTY_PER_METER: f64 = 0.3;
const TURN_PENALTY: f64 = 0.5;
/// Geometry points per approximated turn
const POINTS_PER_TURN: usize = 10;

/// The arithmetic behind a score.
///
/// Penalties are stored already rounded to one decimal, so
/// `base_score - penalties` shown to the user equals the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_score: f64,
    pub distance_penalty: f64,
    pub elevation_penalty: f64,
    pub turns_penalty: f64,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn total_penalty(&self) -> f64 {
        self.distance_penalty + self.elevation_penalty + self.turns_penalty
    }

    /// `clamp(base - distance - elevation - turns, 0, 100)`
    #[must_use]
    pub fn score(&self) -> f64 {
        (self.base_score - self.distance_penalty - self.elevation_penalty - self.turns_penalty)
            .clamp(0.0, BASE_SCORE)
    }
}

/// Path complexity proxy: one "turn" per ten geometry points
#[must_use]
pub fn turn_count(point_count: usize) -> usize {
    point_count / POINTS_PER_TURN
}

/// Score a route from its distance, ascent and geometry size
#[must_use]
pub fn eco_score(
    distance_km: f64,
    elevation_gain_m: u32,
    point_count: usize,
) -> (f64, ScoreBreakdown) {
    let distance_km = if distance_km.is_finite() {
        distance_km.max(0.0)
    } else {
        0.0
    };
    let breakdown = ScoreBreakdown {
        base_score: BASE_SCORE,
        distance_penalty: round1(distance_km * DISTANCE_PENALTY_PER_KM),
        elevation_penalty: round1(f64::from(elevation_gain_m) * ELEVATION_PENALTY_PER_METER),
        turns_penalty: round1(turn_count(point_count) as f64 * TURN_PENALTY),
    };
    (breakdown.score(), breakdown)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
