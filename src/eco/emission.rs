//! Emission model: per-mode CO₂ rates and distance-based estimates
//!
//! Rates are static policy constants, not measurements. They live in a
//! [`RateTable`] value so every consumer (scoring, comparison, display)
//! reads the same numbers and tests can substitute their own table.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::TransportMode;

/// Grams of CO₂ emitted per kilometer, per mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default = "default_walking_rate")]
    pub walking: f64,
    #[serde(default = "default_cycling_rate")]
    pub cycling: f64,
    #[serde(default = "default_bus_rate")]
    pub bus: f64,
    #[serde(default = "default_motorcycle_rate")]
    pub motorcycle: f64,
    #[serde(default = "default_driving_rate")]
    pub driving: f64,
    #[serde(default = "default_airplane_rate")]
    pub airplane: f64,
}

fn default_walking_rate() -> f64 {
    0.0
}

fn default_cycling_rate() -> f64 {
    0.0
}

fn default_bus_rate() -> f64 {
    50.0
}

fn default_motorcycle_rate() -> f64 {
    100.0
}

fn default_driving_rate() -> f64 {
    150.0
}

fn default_airplane_rate() -> f64 {
    250.0
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            walking: default_walking_rate(),
            cycling: default_cycling_rate(),
            bus: default_bus_rate(),
            motorcycle: default_motorcycle_rate(),
            driving: default_driving_rate(),
            airplane: default_airplane_rate(),
        }
    }
}

impl RateTable {
    #[must_use]
    pub fn rate(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Walking => self.walking,
            TransportMode::Cycling => self.cycling,
            TransportMode::Bus => self.bus,
            TransportMode::Motorcycle => self.motorcycle,
            TransportMode::Driving => self.driving,
            TransportMode::Airplane => self.airplane,
        }
    }

    /// Rates must be finite and non-negative
    pub fn validate(&self) -> crate::Result<()> {
        for mode in TransportMode::ALL {
            let rate = self.rate(mode);
            if !rate.is_finite() || rate < 0.0 {
                return Err(crate::EcoRouteError::config(format!(
                    "Emission rate for {mode} must be a non-negative number, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

/// Converts distances into CO₂ estimates
#[derive(Debug, Clone, Default)]
pub struct EmissionModel {
    rates: RateTable,
}

impl EmissionModel {
    #[must_use]
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    #[must_use]
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Grams of CO₂ per kilometer for a mode
    #[must_use]
    pub fn emission_rate(&self, mode: TransportMode) -> f64 {
        self.rates.rate(mode)
    }

    /// Rate lookup by provider identifier or name.
    ///
    /// Unknown identifiers fall back to a zero rate instead of failing.
    #[must_use]
    pub fn rate_for_id(&self, id: &str) -> f64 {
        match id.parse::<TransportMode>() {
            Ok(mode) => self.emission_rate(mode),
            Err(_) => {
                warn!("No emission rate for mode '{}', assuming 0 g/km", id);
                0.0
            }
        }
    }

    /// `round(distance_km * rate)` grams, never negative
    #[must_use]
    pub fn estimate(&self, distance_km: f64, mode: TransportMode) -> u64 {
        grams(distance_km, self.emission_rate(mode))
    }

    /// Estimate keyed by identifier, with the same zero-rate fallback as
    /// [`EmissionModel::rate_for_id`]
    #[must_use]
    pub fn estimate_for_id(&self, distance_km: f64, id: &str) -> u64 {
        grams(distance_km, self.rate_for_id(id))
    }

    /// CO₂ avoided by taking `mode` instead of driving the same distance
    #[must_use]
    pub fn co2_saved(&self, distance_km: f64, mode: TransportMode) -> u64 {
        self.estimate(distance_km, TransportMode::Driving)
            .saturating_sub(self.estimate(distance_km, mode))
    }

    /// Compare two legs and name the greener one
    #[must_use]
    pub fn compare(
        &self,
        a: (f64, TransportMode),
        b: (f64, TransportMode),
    ) -> EmissionComparison {
        let emission_a = self.estimate(a.0, a.1);
        let emission_b = self.estimate(b.0, b.1);
        EmissionComparison {
            emission_a,
            emission_b,
            difference: emission_a.abs_diff(emission_b),
            greenest: if emission_a < emission_b {
                Greenest::A
            } else {
                Greenest::B
            },
        }
    }
}

fn grams(distance_km: f64, rate: f64) -> u64 {
    let distance_km = if distance_km.is_finite() {
        distance_km.max(0.0)
    } else {
        0.0
    };
    // float-to-int `as` saturates, so absurd distances cannot wrap
    (distance_km * rate).round() as u64
}

/// Which side of a comparison emits less
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Greenest {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionComparison {
    pub emission_a: u64,
    pub emission_b: u64,
    pub difference: u64,
    /// Ties resolve to `B`
    pub greenest: Greenest,
}
