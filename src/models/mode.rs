//! Transport modes compared by the engine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EcoRouteError;

/// A specific means of transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Walking,
    Cycling,
    Bus,
    Motorcycle,
    Driving,
    Airplane,
}

impl TransportMode {
    /// Every mode, in fetch/synthesis order
    pub const ALL: [TransportMode; 6] = [
        TransportMode::Walking,
        TransportMode::Cycling,
        TransportMode::Driving,
        TransportMode::Bus,
        TransportMode::Motorcycle,
        TransportMode::Airplane,
    ];

    /// Modes the directions provider can route directly
    pub const NATIVE: [TransportMode; 3] = [
        TransportMode::Walking,
        TransportMode::Cycling,
        TransportMode::Driving,
    ];

    /// Modes fabricated from the driving baseline
    pub const SYNTHETIC: [TransportMode; 3] = [
        TransportMode::Bus,
        TransportMode::Motorcycle,
        TransportMode::Airplane,
    ];

    /// Provider profile identifier
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            TransportMode::Walking => "foot-walking",
            TransportMode::Cycling => "cycling-regular",
            TransportMode::Bus => "bus",
            TransportMode::Motorcycle => "bike-motorcycle",
            TransportMode::Driving => "driving-car",
            TransportMode::Airplane => "airplane",
        }
    }

    /// Plain lowercase name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TransportMode::Walking => "walking",
            TransportMode::Cycling => "cycling",
            TransportMode::Bus => "bus",
            TransportMode::Motorcycle => "motorcycle",
            TransportMode::Driving => "driving",
            TransportMode::Airplane => "airplane",
        }
    }

    /// Title shown on route cards
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            TransportMode::Walking => "Walking",
            TransportMode::Cycling => "Cycling",
            TransportMode::Bus => "Bus",
            TransportMode::Motorcycle => "Motorcycle",
            TransportMode::Driving => "Driving",
            TransportMode::Airplane => "Flight",
        }
    }

    /// Short caption describing how the route travels
    #[must_use]
    pub fn caption(self) -> &'static str {
        match self {
            TransportMode::Walking => "Via Pedestrian Route",
            TransportMode::Cycling => "Via Bike Lane",
            TransportMode::Bus => "Via Public Transit",
            TransportMode::Motorcycle => "Via Highway",
            TransportMode::Driving => "Via Main Road",
            TransportMode::Airplane => "Direct Flight",
        }
    }

    #[must_use]
    pub fn is_native(self) -> bool {
        Self::NATIVE.contains(&self)
    }

    /// Walking and cycling emit nothing at the tailpipe
    #[must_use]
    pub fn is_zero_emission(self) -> bool {
        matches!(self, TransportMode::Walking | TransportMode::Cycling)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransportMode {
    type Err = EcoRouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        TransportMode::ALL
            .into_iter()
            .find(|mode| mode.id() == needle || mode.name() == needle)
            .ok_or_else(|| EcoRouteError::unknown_mode(s))
    }
}
