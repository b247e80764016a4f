//! Trip history: per-user totals, daily streaks and recent trips
//!
//! Everything is stored in the persistent cache without expiry.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::EcoRouteError;
use crate::cache::{CacheBatch, PersistentCache};
use crate::eco::{EmissionModel, EnrichedRoute};
use crate::models::TransportMode;

/// Trips kept per user
pub const HISTORY_LIMIT: usize = 30;
/// Trips returned by [`TripStore::recent_trips`] when no limit is given
pub const DEFAULT_RECENT_LIMIT: usize = 7;

/// One completed journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub mode: TransportMode,
    pub distance_km: f64,
    /// Compared with driving the same distance
    pub co2_saved_g: u64,
    pub elevation_gain_m: u32,
    pub eco_score: f64,
    pub recorded_at: DateTime<Utc>,
}

impl TripRecord {
    pub fn new(
        mode: TransportMode,
        distance_km: f64,
        elevation_gain_m: u32,
        eco_score: f64,
        recorded_at: DateTime<Utc>,
        emissions: &EmissionModel,
    ) -> crate::Result<Self> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(EcoRouteError::validation(format!(
                "trip distance must be a non-negative number, got {distance_km}"
            )));
        }
        Ok(Self {
            mode,
            distance_km,
            co2_saved_g: emissions.co2_saved(distance_km, mode),
            elevation_gain_m,
            eco_score: eco_score.clamp(0.0, 100.0),
            recorded_at,
        })
    }

    /// Record the trip a user chose from a comparison
    #[must_use]
    pub fn from_route(
        route: &EnrichedRoute,
        emissions: &EmissionModel,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let distance_km = route.summary.distance_km();
        Self {
            mode: route.mode,
            distance_km,
            co2_saved_g: emissions.co2_saved(distance_km, route.mode),
            elevation_gain_m: route.elevation_gain_m,
            eco_score: route.eco_score,
            recorded_at,
        }
    }

    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.recorded_at.date_naive()
    }
}

/// Running totals for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripStats {
    pub total_distance_km: f64,
    pub total_co2_saved_g: u64,
    pub total_trips: u32,
    /// Consecutive days with at least one trip
    pub streak_days: u32,
    pub last_trip_day: Option<NaiveDate>,
    pub total_elevation_gain_m: u64,
}

impl TripStats {
    /// Add a trip to the totals and advance the streak.
    ///
    /// Another trip on the same day keeps the streak, a trip on the next
    /// day extends it, and any gap starts over at one. Back-dated trips
    /// count towards the totals but leave the streak alone.
    pub fn record(&mut self, trip: &TripRecord) {
        self.total_distance_km += trip.distance_km;
        self.total_co2_saved_g = self.total_co2_saved_g.saturating_add(trip.co2_saved_g);
        self.total_trips = self.total_trips.saturating_add(1);
        self.total_elevation_gain_m = self
            .total_elevation_gain_m
            .saturating_add(u64::from(trip.elevation_gain_m));

        let day = trip.day();
        match self.last_trip_day {
            Some(last) if day <= last => {}
            Some(last) if last.succ_opt() == Some(day) => {
                self.streak_days += 1;
                self.last_trip_day = Some(day);
            }
            _ => {
                self.streak_days = 1;
                self.last_trip_day = Some(day);
            }
        }
    }
}

/// Per-user trip history on top of [`PersistentCache`]
#[derive(Clone)]
pub struct TripStore {
    cache: PersistentCache,
    writes: Arc<Mutex<()>>,
}

fn stats_key(user: &str) -> String {
    format!("trips:{user}:stats")
}

fn history_key(user: &str) -> String {
    format!("trips:{user}:history")
}

fn check_user(user: &str) -> crate::Result<&str> {
    let user = user.trim();
    if user.is_empty() {
        return Err(EcoRouteError::validation("user id cannot be empty"));
    }
    if user.contains(':') {
        return Err(EcoRouteError::validation("user id cannot contain ':'"));
    }
    Ok(user)
}

fn cache_error(e: anyhow::Error) -> EcoRouteError {
    EcoRouteError::cache(format!("{e:#}"))
}

impl TripStore {
    pub fn new(cache: PersistentCache) -> Self {
        Self {
            cache,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Store a trip and return the updated totals
    pub async fn save_trip(&self, user: &str, trip: TripRecord) -> crate::Result<TripStats> {
        let user = check_user(user)?;
        let _guard = self.writes.lock().await;

        let mut stats = self.stats(user).await?;
        stats.record(&trip);

        let mut history = self.history(user).await?;
        history.push_back(trip);
        while history.len() > HISTORY_LIMIT {
            history.pop_front();
        }

        let mut batch = CacheBatch::new();
        batch
            .put_forever(&stats_key(user), &stats)
            .map_err(cache_error)?;
        batch
            .put_forever(&history_key(user), &Vec::from(history))
            .map_err(cache_error)?;
        self.cache.commit(batch).await.map_err(cache_error)?;

        debug!(
            "Saved trip for {}: {} trips, {} day streak",
            user, stats.total_trips, stats.streak_days
        );
        Ok(stats)
    }

    /// Totals for a user; empty stats when nothing was recorded yet
    pub async fn stats(&self, user: &str) -> crate::Result<TripStats> {
        let user = check_user(user)?;
        Ok(self
            .cache
            .get::<TripStats>(&stats_key(user))
            .await
            .map_err(cache_error)?
            .unwrap_or_default())
    }

    /// The last `limit` trips, newest first
    pub async fn recent_trips(&self, user: &str, limit: usize) -> crate::Result<Vec<TripRecord>> {
        let user = check_user(user)?;
        let history = self.history(user).await?;
        Ok(history.into_iter().rev().take(limit).collect())
    }

    async fn history(&self, user: &str) -> crate::Result<VecDeque<TripRecord>> {
        Ok(self
            .cache
            .get::<Vec<TripRecord>>(&history_key(user))
            .await
            .map_err(cache_error)?
            .map(VecDeque::from)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn trip(mode: TransportMode, km: f64, recorded_at: DateTime<Utc>) -> TripRecord {
        TripRecord::new(mode, km, 10, 90.0, recorded_at, &EmissionModel::default()).unwrap()
    }

    #[test]
    fn test_trip_saves_against_driving() {
        let cycling = trip(TransportMode::Cycling, 4.0, at(2025, 3, 1, 8));
        assert_eq!(cycling.co2_saved_g, 600);

        let driving = trip(TransportMode::Driving, 4.0, at(2025, 3, 1, 8));
        assert_eq!(driving.co2_saved_g, 0);

        let flight = trip(TransportMode::Airplane, 600.0, at(2025, 3, 1, 8));
        assert_eq!(flight.co2_saved_g, 0);
    }

    #[test]
    fn test_negative_distance_is_rejected() {
        let result = TripRecord::new(
            TransportMode::Walking,
            -1.0,
            0,
            0.0,
            at(2025, 3, 1, 8),
            &EmissionModel::default(),
        );
        assert!(matches!(result, Err(EcoRouteError::Validation { .. })));
    }

    #[test]
    fn test_trip_from_enriched_route() {
        use crate::eco::EcoEngine;
        use crate::models::{Coordinate, Route, RouteSummary};

        let engine = EcoEngine::default();
        let route = Route::new(
            RouteSummary::new(4_000.0, 900.0),
            vec![
                Coordinate::with_elevation(10.0, 50.0, 100.0),
                Coordinate::with_elevation(10.0, 50.03, 112.0),
            ],
        );
        let enriched = engine.enrich(TransportMode::Cycling, &route);

        let trip = TripRecord::from_route(&enriched, &engine.emissions, at(2025, 4, 2, 18));

        assert_eq!(trip.mode, TransportMode::Cycling);
        assert_eq!(trip.distance_km, 4.0);
        assert_eq!(trip.co2_saved_g, 600);
        assert_eq!(trip.elevation_gain_m, 12);
        assert_eq!(trip.eco_score, enriched.eco_score);
        assert_eq!(trip.day(), NaiveDate::from_ymd_opt(2025, 4, 2).unwrap());
    }

    #[rstest]
    #[case::first_trip(None, 0, (2025, 3, 10), 1)]
    #[case::same_day(Some((2025, 3, 10)), 4, (2025, 3, 10), 4)]
    #[case::next_day(Some((2025, 3, 9)), 4, (2025, 3, 10), 5)]
    #[case::across_month(Some((2025, 2, 28)), 2, (2025, 3, 1), 3)]
    #[case::gap(Some((2025, 3, 7)), 4, (2025, 3, 10), 1)]
    #[case::back_dated(Some((2025, 3, 12)), 4, (2025, 3, 10), 4)]
    fn test_streak_rules(
        #[case] last: Option<(i32, u32, u32)>,
        #[case] streak: u32,
        #[case] today: (i32, u32, u32),
        #[case] expected: u32,
    ) {
        let mut stats = TripStats {
            streak_days: streak,
            last_trip_day: last.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..TripStats::default()
        };

        stats.record(&trip(
            TransportMode::Walking,
            1.0,
            at(today.0, today.1, today.2, 12),
        ));

        assert_eq!(stats.streak_days, expected);
        assert_eq!(stats.total_trips, 1);
    }

    #[tokio::test]
    async fn test_store_accumulates_and_caps_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = TripStore::new(PersistentCache::open(dir.path().join("db")).unwrap());

        for day in 1..=35 {
            store
                .save_trip("alice", trip(TransportMode::Cycling, 2.0, at(2025, 1, day.min(31), 9)))
                .await
                .unwrap();
        }

        let stats = store.stats("alice").await.unwrap();
        assert_eq!(stats.total_trips, 35);
        assert_eq!(stats.total_co2_saved_g, 35 * 300);
        assert_eq!(stats.total_elevation_gain_m, 350);
        assert_eq!(stats.streak_days, 31);

        let all = store.recent_trips("alice", 100).await.unwrap();
        assert_eq!(all.len(), HISTORY_LIMIT);

        let recent = store.recent_trips("alice", DEFAULT_RECENT_LIMIT).await.unwrap();
        assert_eq!(recent.len(), DEFAULT_RECENT_LIMIT);
        assert_eq!(recent.first(), all.first());
    }

    #[tokio::test]
    async fn test_users_are_separate() {
        let dir = tempfile::tempdir().unwrap();
        let store = TripStore::new(PersistentCache::open(dir.path().join("db")).unwrap());

        store
            .save_trip("alice", trip(TransportMode::Walking, 1.5, at(2025, 5, 1, 7)))
            .await
            .unwrap();

        assert_eq!(store.stats("bob").await.unwrap(), TripStats::default());
        assert!(store.recent_trips("bob", 7).await.unwrap().is_empty());
        assert!(matches!(
            store.stats("  ").await,
            Err(EcoRouteError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_recent_trips_are_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = TripStore::new(PersistentCache::open(dir.path().join("db")).unwrap());

        for (day, mode) in [
            (1, TransportMode::Walking),
            (2, TransportMode::Cycling),
            (3, TransportMode::Bus),
        ] {
            store
                .save_trip("carol", trip(mode, 3.0, at(2025, 7, day, 9)))
                .await
                .unwrap();
        }

        let recent = store.recent_trips("carol", 2).await.unwrap();
        let modes: Vec<_> = recent.iter().map(|trip| trip.mode).collect();
        assert_eq!(modes, vec![TransportMode::Bus, TransportMode::Cycling]);
        assert_eq!(
            store.stats("carol").await.unwrap().total_trips,
            store.recent_trips("carol", 100).await.unwrap().len() as u32
        );
    }
}
