//! OpenRouteService directions and geocoding client
//!
//! Transient HTTP failures are retried by middleware with exponential
//! backoff; everything else surfaces as a provider error for the mode.

use std::env;
use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::config::ProviderConfig;
use crate::models::{Coordinate, Route, RouteSummary, TransportMode};
use crate::routing::provider::{DirectionsProvider, Place, PlaceSearch};
use crate::EcoRouteError;

pub const API_KEY_ENV: &str = "OPENROUTE_API_KEY";
const PLACE_RESULTS: u8 = 5;

// --- Data Structures for parsing ORS responses ---
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<RouteFeature>,
}

#[derive(Debug, Deserialize)]
struct RouteFeature {
    properties: RouteProperties,
    geometry: LineString,
}

#[derive(Debug, Deserialize)]
struct RouteProperties {
    #[serde(default)]
    summary: Summary,
}

/// ORS omits zero-valued fields
#[derive(Debug, Default, Deserialize)]
struct Summary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct LineString {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    geometry: PointGeometry,
    #[serde(default)]
    properties: GeocodeProperties,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    coordinates: [f64; 2],
}

#[derive(Debug, Default, Deserialize)]
struct GeocodeProperties {
    label: Option<String>,
    name: Option<String>,
}

/// OpenRouteService client for walking, cycling and driving profiles
pub struct OpenRouteClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
}

impl OpenRouteClient {
    /// Build a client; the key comes from config or `OPENROUTE_API_KEY`
    pub fn new(config: &ProviderConfig) -> crate::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                EcoRouteError::config(format!(
                    "Missing OpenRouteService API key. Set provider.api_key or {API_KEY_ENV}."
                ))
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("EcoRoute/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EcoRouteError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn directions(
        &self,
        mode: TransportMode,
        origin: Coordinate,
        destination: Coordinate,
    ) -> anyhow::Result<Route> {
        let url = format!("{}/v2/directions/{}/geojson", self.base_url, mode.id());
        let body = json!({
            "coordinates": [
                [origin.longitude, origin.latitude],
                [destination.longitude, destination.latitude]
            ],
            "elevation": true
        });

        debug!("[PROVIDER] Requesting {} route", mode.id());
        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)
            .context("Failed to send directions request")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read directions response")?;

        if !status.is_success() {
            return Err(anyhow!(describe_error(status, &text)));
        }

        parse_directions(&text)
    }

    async fn geocode(&self, query: &str) -> anyhow::Result<Vec<Place>> {
        let url = format!(
            "{}/geocode/search?text={}&size={}",
            self.base_url,
            urlencoding::encode(query),
            PLACE_RESULTS
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .await
            .map_err(transport_error)
            .context("Failed to send geocoding request")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read geocoding response")?;

        if !status.is_success() {
            return Err(anyhow!(describe_error(status, &text)));
        }

        parse_places(&text)
    }
}

#[async_trait]
impl DirectionsProvider for OpenRouteClient {
    #[instrument(skip(self))]
    async fn route(
        &self,
        mode: TransportMode,
        origin: Coordinate,
        destination: Coordinate,
    ) -> crate::Result<Route> {
        if !mode.is_native() {
            return Err(EcoRouteError::provider(format!(
                "OpenRouteService has no {} profile",
                mode
            )));
        }
        Ok(self.directions(mode, origin, destination).await?)
    }
}

#[async_trait]
impl PlaceSearch for OpenRouteClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> crate::Result<Vec<Place>> {
        if query.trim().is_empty() {
            return Err(EcoRouteError::validation("Search text cannot be empty"));
        }
        Ok(self.geocode(query).await?)
    }
}

/// Drop the request URL from transport errors; they end up in API responses
fn transport_error(err: reqwest_middleware::Error) -> anyhow::Error {
    match err {
        reqwest_middleware::Error::Reqwest(e) => e.without_url().into(),
        reqwest_middleware::Error::Middleware(e) => e,
    }
}

/// First feature of a directions GeoJSON response
fn parse_directions(text: &str) -> anyhow::Result<Route> {
    let collection: FeatureCollection =
        serde_json::from_str(text).context("Failed to parse directions response")?;

    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No route found in directions response"))?;

    let geometry = feature
        .geometry
        .coordinates
        .iter()
        .filter_map(|position| match position.as_slice() {
            [lon, lat] => Some(Coordinate::new(*lon, *lat)),
            [lon, lat, elevation, ..] => Some(Coordinate::with_elevation(*lon, *lat, *elevation)),
            _ => None,
        })
        .collect();

    let summary = feature.properties.summary;
    Ok(Route::new(
        RouteSummary::new(summary.distance, summary.duration),
        geometry,
    ))
}

fn parse_places(text: &str) -> anyhow::Result<Vec<Place>> {
    let response: GeocodeResponse =
        serde_json::from_str(text).context("Failed to parse geocoding response")?;

    Ok(response
        .features
        .into_iter()
        .map(|feature| {
            let [lon, lat] = feature.geometry.coordinates;
            let name = feature
                .properties
                .label
                .or(feature.properties.name)
                .unwrap_or_else(|| format!("{lat:.4}, {lon:.4}"));
            Place {
                name,
                coordinate: Coordinate::new(lon, lat),
            }
        })
        .collect())
}

/// Turn an ORS error body into a readable reason.
///
/// ORS answers either `{"error": {"code": .., "message": ..}}` or
/// `{"error": "text"}`; anything else is reported raw.
fn describe_error(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    match parsed.as_ref().and_then(|value| value.get("error")) {
        Some(Value::Object(detail)) => {
            let message = detail
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            match detail.get("code").and_then(Value::as_u64) {
                Some(code) => format!("API error (code {code}): {message}"),
                None => format!("API error: {message}"),
            }
        }
        Some(Value::String(message)) => format!("API error: {message}"),
        _ if body.trim().is_empty() => format!("HTTP {status}"),
        _ => format!("HTTP {status}: {}", body.trim()),
    }
}
