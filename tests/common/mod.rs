//! Scripted providers shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use ecoroute::routing::Place;
use ecoroute::{
    Coordinate, DirectionsProvider, EcoRouteError, PlaceSearch, Route, RouteSummary,
    TransportMode,
};

/// Answers each mode from a fixed script; unscripted modes fail
#[derive(Default)]
pub struct ScriptedProvider {
    script: HashMap<TransportMode, Result<(f64, f64), String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Succeed with the given road distance (m) and duration (s)
    pub fn ok(mut self, mode: TransportMode, distance_m: f64, duration_s: f64) -> Self {
        self.script.insert(mode, Ok((distance_m, duration_s)));
        self
    }

    pub fn fail(mut self, mode: TransportMode, reason: &str) -> Self {
        self.script.insert(mode, Err(reason.to_string()));
        self
    }
}

/// Ten evenly spaced points, climbing one meter per step
pub fn line(origin: Coordinate, destination: Coordinate) -> Vec<Coordinate> {
    (0..10)
        .map(|i| {
            let t = f64::from(i) / 9.0;
            Coordinate::with_elevation(
                origin.longitude + (destination.longitude - origin.longitude) * t,
                origin.latitude + (destination.latitude - origin.latitude) * t,
                100.0 + f64::from(i),
            )
        })
        .collect()
}

#[async_trait]
impl DirectionsProvider for ScriptedProvider {
    async fn route(
        &self,
        mode: TransportMode,
        origin: Coordinate,
        destination: Coordinate,
    ) -> ecoroute::Result<Route> {
        match self.script.get(&mode) {
            Some(Ok((distance_m, duration_s))) => Ok(Route::new(
                RouteSummary::new(*distance_m, *duration_s),
                line(origin, destination),
            )),
            Some(Err(reason)) => Err(EcoRouteError::provider(reason.clone())),
            None => Err(EcoRouteError::provider(format!("{mode} is not scripted"))),
        }
    }
}

/// Knows a single place; the query "fail" simulates an outage
pub struct ScriptedPlaces;

#[async_trait]
impl PlaceSearch for ScriptedPlaces {
    async fn search(&self, query: &str) -> ecoroute::Result<Vec<Place>> {
        match query {
            "fail" => Err(EcoRouteError::provider("geocoder unavailable")),
            "" => Err(EcoRouteError::validation("Search text cannot be empty")),
            _ => Ok(vec![Place {
                name: "Berlin, Germany".to_string(),
                coordinate: Coordinate::new(13.40495, 52.52001),
            }]),
        }
    }
}

/// Two points about 2 km apart
pub fn short_trip() -> (Coordinate, Coordinate) {
    (Coordinate::new(10.0, 50.0), Coordinate::new(10.0, 50.018))
}

/// Two points 550 km apart along a meridian
pub fn long_trip() -> (Coordinate, Coordinate) {
    (
        Coordinate::new(10.0, 45.0),
        Coordinate::new(10.0, 45.0 + 550.0 / 111.194_926_644_558_73),
    )
}

/// Walking, cycling and driving all succeed over the same road distance
pub fn all_native(distance_m: f64, driving_s: f64) -> ScriptedProvider {
    ScriptedProvider::new()
        .ok(TransportMode::Walking, distance_m, driving_s * 8.0)
        .ok(TransportMode::Cycling, distance_m, driving_s * 3.0)
        .ok(TransportMode::Driving, distance_m, driving_s)
}
