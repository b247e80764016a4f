//! WGS84 coordinates with optional elevation

use serde::{Deserialize, Serialize};

use crate::EcoRouteError;

/// A point on a route, in travel order
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Elevation in meters, when the provider reports it
    pub elevation: Option<f64>,
}

impl Coordinate {
    #[must_use]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation: None,
        }
    }

    #[must_use]
    pub fn with_elevation(longitude: f64, latitude: f64, elevation: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation: Some(elevation),
        }
    }

    /// Elevation with missing values read as sea level
    #[must_use]
    pub fn elevation_or_zero(&self) -> f64 {
        self.elevation.unwrap_or(0.0)
    }

    /// Reject coordinates outside the WGS84 ranges
    pub fn validate(&self) -> crate::Result<()> {
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(EcoRouteError::validation(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(EcoRouteError::validation(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        Ok(())
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lon = (self.longitude * multiplier).round() / multiplier;
        let lat = (self.latitude * multiplier).round() / multiplier;
        (lon, lat)
    }

    /// Cache key fragment, stable to roughly 10 m
    #[must_use]
    pub fn cache_key(&self) -> String {
        let (lon, lat) = self.rounded(4);
        format!("{lon:.4},{lat:.4}")
    }

    /// Parse `lon,lat` as typed on the command line
    pub fn parse_pair(input: &str) -> crate::Result<Self> {
        let mut parts = input.split(',').map(str::trim);
        let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(EcoRouteError::validation(format!(
                "expected `lon,lat`, got `{input}`"
            )));
        };
        let parse = |value: &str| {
            value.parse::<f64>().map_err(|_| {
                EcoRouteError::validation(format!("`{value}` is not a number"))
            })
        };
        let coordinate = Self::new(parse(lon)?, parse(lat)?);
        coordinate.validate()?;
        Ok(coordinate)
    }
}
