//! End-to-end planning against a scripted directions provider

mod common;

use std::process::Command;
use std::sync::Arc;

use common::{ScriptedProvider, all_native, long_trip, short_trip};
use ecoroute::{EcoEngine, EcoRouteError, RoutePlanner, TransportMode};

fn planner(provider: ScriptedProvider) -> RoutePlanner {
    RoutePlanner::new(Arc::new(provider), EcoEngine::default())
}

fn modes<'a>(routes: impl Iterator<Item = &'a ecoroute::EnrichedRoute>) -> Vec<TransportMode> {
    routes.map(|route| route.mode).collect()
}

#[tokio::test]
async fn test_short_trip_recommends_walking() {
    let (origin, destination) = short_trip();
    let comparison = planner(all_native(2_500.0, 300.0))
        .plan(origin, destination)
        .await
        .unwrap();

    assert!(comparison.straight_line_km < 3.0);
    assert_eq!(
        modes(comparison.routes()),
        vec![
            TransportMode::Walking,
            TransportMode::Cycling,
            TransportMode::Bus,
            TransportMode::Driving,
        ]
    );

    let walking = comparison.recommended.as_ref().unwrap();
    assert_eq!(walking.co2_grams, 0);
    assert_eq!(walking.distance_km, 2.5);
    assert_eq!(walking.elevation_gain_m, 9);
    assert_eq!(comparison.route(TransportMode::Bus).unwrap().co2_grams, 125);
    assert_eq!(comparison.route(TransportMode::Driving).unwrap().co2_grams, 375);

    assert_eq!(comparison.hidden.len(), 1);
    assert_eq!(comparison.hidden[0].mode, TransportMode::Motorcycle);
    assert_eq!(comparison.hidden[0].reason, "Too short for a motorcycle");
    assert!(comparison.failures.is_empty());
}

#[tokio::test]
async fn test_long_trip_synthesizes_flight() {
    let (origin, destination) = long_trip();
    let comparison = planner(all_native(600_000.0, 21_600.0))
        .plan(origin, destination)
        .await
        .unwrap();

    assert!((comparison.straight_line_km - 550.0).abs() < 0.01);
    assert_eq!(
        modes(comparison.routes()),
        vec![TransportMode::Bus, TransportMode::Driving, TransportMode::Airplane]
    );

    let flight = comparison.route(TransportMode::Airplane).unwrap();
    let expected = 550.0 / 800.0 * 3_600.0 + 7_200.0;
    assert!((flight.summary.duration_seconds - expected).abs() < 1.0);
    assert_eq!(flight.summary.distance_meters, 600_000.0);
    assert_eq!(flight.geometry, vec![origin, destination]);
    assert_eq!(flight.co2_grams, 150_000);

    let bus = comparison.route(TransportMode::Bus).unwrap();
    assert!((bus.summary.duration_seconds - 21_600.0 * 1.3).abs() < 1e-6);
    assert_eq!(bus.co2_grams, 30_000);

    let hidden: Vec<_> = comparison.hidden.iter().map(|h| h.mode).collect();
    assert_eq!(
        hidden,
        vec![TransportMode::Walking, TransportMode::Cycling, TransportMode::Motorcycle]
    );
}

#[tokio::test]
async fn test_driving_failure_marks_synthetic_modes_unavailable() {
    let (origin, destination) = short_trip();
    let provider = ScriptedProvider::new()
        .ok(TransportMode::Walking, 2_500.0, 1_800.0)
        .ok(TransportMode::Cycling, 2_500.0, 600.0)
        .fail(TransportMode::Driving, "Could not find routable point");

    let comparison = planner(provider).plan(origin, destination).await.unwrap();

    assert_eq!(
        modes(comparison.routes()),
        vec![TransportMode::Walking, TransportMode::Cycling]
    );
    assert_eq!(comparison.failures.len(), 4);
    assert_eq!(comparison.failures[0].mode, TransportMode::Driving);
    assert_eq!(comparison.failures[0].reason, "Could not find routable point");
    for failure in &comparison.failures[1..] {
        assert!(!failure.mode.is_native());
        assert_eq!(
            failure.reason,
            "Driving route unavailable: Could not find routable point"
        );
    }
}

#[tokio::test]
async fn test_all_modes_failing_is_no_routes() {
    let (origin, destination) = short_trip();
    let provider = ScriptedProvider::new()
        .fail(TransportMode::Walking, "timeout")
        .fail(TransportMode::Cycling, "timeout")
        .fail(TransportMode::Driving, "timeout");

    let result = planner(provider).plan(origin, destination).await;

    match result {
        Err(EcoRouteError::NoRoutes { reasons }) => {
            assert_eq!(reasons.len(), 6);
            assert_eq!(reasons[0], "walking: timeout");
        }
        other => panic!("expected NoRoutes, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_eligible_mode_leaves_recommendation_empty() {
    // walking only succeeds, and it's far too long to walk
    let (origin, destination) = short_trip();
    let provider = ScriptedProvider::new()
        .ok(TransportMode::Walking, 12_000.0, 9_000.0)
        .fail(TransportMode::Cycling, "offline")
        .fail(TransportMode::Driving, "offline");

    let comparison = planner(provider).plan(origin, destination).await.unwrap();

    assert!(comparison.recommended.is_none());
    assert!(comparison.alternatives.is_empty());
    assert_eq!(comparison.hidden[0].reason, "Too far for walking");
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_ecoroute"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Compare routes by their environmental impact"));
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("compare"));
}

#[test]
fn test_cli_rejects_bad_coordinates() {
    let output = Command::new(env!("CARGO_BIN_EXE_ecoroute"))
        .args(["--config", "/nonexistent/ecoroute.toml", "compare", "not-a-point", "10,50"])
        .env("OPENROUTE_API_KEY", "test_key_12345")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("lon,lat"), "stderr: {stderr}");
}
