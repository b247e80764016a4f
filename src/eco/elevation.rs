//! Cumulative ascent along a route

use crate::models::Coordinate;

/// Total ascent in whole meters.
///
/// Only climbs count; descents never offset them. Missing elevations are
/// read as 0 m.
#[must_use]
pub fn elevation_gain(geometry: &[Coordinate]) -> u32 {
    if geometry.len() < 2 {
        return 0;
    }

    let gain: f64 = geometry
        .windows(2)
        .map(|pair| pair[1].elevation_or_zero() - pair[0].elevation_or_zero())
        .filter(|delta| *delta > 0.0)
        .sum();

    gain.round() as u32
}

/// Average slope in percent, rounded to one decimal
#[must_use]
pub fn slope_percent(ascent_meters: u32, distance_km: f64) -> f64 {
    if !(distance_km > 0.0) {
        return 0.0;
    }
    let slope = f64::from(ascent_meters) / (distance_km * 1000.0) * 100.0;
    (slope * 10.0).round() / 10.0
}
