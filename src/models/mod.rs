//! Data models for the EcoRoute engine
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: WGS84 points with optional elevation
//! - Mode: the closed set of transport modes
//! - Route: summaries, geometries and per-mode outcomes

pub mod coordinate;
pub mod mode;
pub mod route;

// Re-export all public types for convenient access
pub use coordinate::Coordinate;
pub use mode::TransportMode;
pub use route::{ModeFailure, ModeResult, Route, RouteGeometry, RouteSummary};
