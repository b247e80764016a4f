//! Distance-based eligibility rules and emission ranking

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::eco::EnrichedRoute;
use crate::models::TransportMode;

/// One end of an eligibility window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    Inclusive(f64),
    Exclusive(f64),
}

impl Limit {
    fn admits_above(self, distance_km: f64) -> bool {
        match self {
            Limit::Inclusive(km) => distance_km >= km,
            Limit::Exclusive(km) => distance_km > km,
        }
    }

    fn admits_below(self, distance_km: f64) -> bool {
        match self {
            Limit::Inclusive(km) => distance_km <= km,
            Limit::Exclusive(km) => distance_km < km,
        }
    }
}

/// Distance window in which a mode is worth showing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRule {
    pub min: Option<Limit>,
    pub max: Option<Limit>,
}

impl EligibilityRule {
    pub const ALWAYS: EligibilityRule = EligibilityRule {
        min: None,
        max: None,
    };

    #[must_use]
    pub fn at_most(km: f64) -> Self {
        Self {
            min: None,
            max: Some(Limit::Inclusive(km)),
        }
    }

    #[must_use]
    pub fn at_least(km: f64) -> Self {
        Self {
            min: Some(Limit::Inclusive(km)),
            max: None,
        }
    }

    #[must_use]
    pub fn longer_than(km: f64) -> Self {
        Self {
            min: Some(Limit::Exclusive(km)),
            max: None,
        }
    }

    #[must_use]
    pub fn between(min_km: f64, max_km: f64) -> Self {
        Self {
            min: Some(Limit::Inclusive(min_km)),
            max: Some(Limit::Inclusive(max_km)),
        }
    }

    #[must_use]
    pub fn check(&self, distance_km: f64) -> Eligibility {
        if self.min.is_some_and(|min| !min.admits_above(distance_km)) {
            Eligibility::TooShort
        } else if self.max.is_some_and(|max| !max.admits_below(distance_km)) {
            Eligibility::TooFar
        } else {
            Eligibility::Eligible
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    TooShort,
    TooFar,
}

/// Per-mode eligibility rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EligibilityTable {
    pub walking: EligibilityRule,
    pub cycling: EligibilityRule,
    pub bus: EligibilityRule,
    pub motorcycle: EligibilityRule,
    pub driving: EligibilityRule,
    pub airplane: EligibilityRule,
}

impl Default for EligibilityTable {
    fn default() -> Self {
        Self {
            walking: EligibilityRule::at_most(3.0),
            cycling: EligibilityRule::at_most(5.0),
            bus: EligibilityRule::at_least(2.0),
            motorcycle: EligibilityRule::between(5.0, 200.0),
            driving: EligibilityRule::ALWAYS,
            airplane: EligibilityRule::longer_than(500.0),
        }
    }
}

impl EligibilityTable {
    #[must_use]
    pub fn rule(&self, mode: TransportMode) -> &EligibilityRule {
        match mode {
            TransportMode::Walking => &self.walking,
            TransportMode::Cycling => &self.cycling,
            TransportMode::Bus => &self.bus,
            TransportMode::Motorcycle => &self.motorcycle,
            TransportMode::Driving => &self.driving,
            TransportMode::Airplane => &self.airplane,
        }
    }
}

/// A computed route the policy chose not to show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenMode {
    pub mode: TransportMode,
    pub distance_km: f64,
    pub reason: String,
}

/// Lowest-emission route first, the rest in ascending order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub recommended: Option<EnrichedRoute>,
    pub alternatives: Vec<EnrichedRoute>,
    pub hidden: Vec<HiddenMode>,
}

/// Decides which modes to present and in which order
#[derive(Debug, Clone, Default)]
pub struct EligibilityPolicy {
    table: EligibilityTable,
}

impl EligibilityPolicy {
    #[must_use]
    pub fn new(table: EligibilityTable) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn is_eligible(&self, mode: TransportMode, distance_km: f64) -> bool {
        self.check(mode, distance_km) == Eligibility::Eligible
    }

    #[must_use]
    pub fn check(&self, mode: TransportMode, distance_km: f64) -> Eligibility {
        self.table.rule(mode).check(distance_km)
    }

    /// Eligibility keyed by identifier; unknown modes are always shown
    #[must_use]
    pub fn is_eligible_id(&self, id: &str, distance_km: f64) -> bool {
        match id.parse::<TransportMode>() {
            Ok(mode) => self.is_eligible(mode, distance_km),
            Err(_) => {
                warn!("No eligibility rule for mode '{}', showing it", id);
                true
            }
        }
    }

    /// Filter by eligibility, then order by emissions.
    ///
    /// Sorting is stable, so equal emissions keep their input order.
    #[must_use]
    pub fn rank(&self, routes: Vec<EnrichedRoute>) -> Ranking {
        let mut shown = Vec::with_capacity(routes.len());
        let mut hidden = Vec::new();

        for route in routes {
            let distance_km = route.summary.distance_km();
            match self.check(route.mode, distance_km) {
                Eligibility::Eligible => shown.push(route),
                verdict => {
                    debug!(
                        "Hiding {} at {:.1} km: {:?}",
                        route.mode, distance_km, verdict
                    );
                    hidden.push(HiddenMode {
                        mode: route.mode,
                        distance_km: route.distance_km,
                        reason: hidden_reason(route.mode, verdict),
                    });
                }
            }
        }

        shown.sort_by_key(|route| route.co2_grams);
        let mut shown = shown.into_iter();
        Ranking {
            recommended: shown.next(),
            alternatives: shown.collect(),
            hidden,
        }
    }
}

fn hidden_reason(mode: TransportMode, verdict: Eligibility) -> String {
    let subject = match mode {
        TransportMode::Walking => "walking",
        TransportMode::Cycling => "cycling",
        TransportMode::Bus => "the bus",
        TransportMode::Motorcycle => "a motorcycle",
        TransportMode::Driving => "driving",
        TransportMode::Airplane => "a flight",
    };
    match verdict {
        Eligibility::TooShort => format!("Too short for {subject}"),
        Eligibility::TooFar => format!("Too far for {subject}"),
        Eligibility::Eligible => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eco::EcoEngine;
    use crate::models::{Coordinate, Route, RouteSummary};
    use rstest::rstest;

    #[rstest]
    #[case(TransportMode::Walking, 3.0, true)]
    #[case(TransportMode::Walking, 3.01, false)]
    #[case(TransportMode::Cycling, 5.0, true)]
    #[case(TransportMode::Cycling, 5.01, false)]
    #[case(TransportMode::Bus, 1.99, false)]
    #[case(TransportMode::Bus, 2.0, true)]
    #[case(TransportMode::Motorcycle, 4.99, false)]
    #[case(TransportMode::Motorcycle, 5.0, true)]
    #[case(TransportMode::Motorcycle, 200.0, true)]
    #[case(TransportMode::Motorcycle, 200.01, false)]
    #[case(TransportMode::Driving, 0.0, true)]
    #[case(TransportMode::Driving, 100_000.0, true)]
    #[case(TransportMode::Airplane, 500.0, false)]
    #[case(TransportMode::Airplane, 500.01, true)]
    fn test_eligibility_boundaries(
        #[case] mode: TransportMode,
        #[case] distance_km: f64,
        #[case] expected: bool,
    ) {
        assert_eq!(
            EligibilityPolicy::default().is_eligible(mode, distance_km),
            expected
        );
    }

    #[test]
    fn test_unknown_identifier_is_eligible() {
        let policy = EligibilityPolicy::default();
        assert!(policy.is_eligible_id("electric-car", 10_000.0));
        assert!(!policy.is_eligible_id("foot-walking", 10.0));
    }

    fn enriched(mode: TransportMode, distance_m: f64) -> EnrichedRoute {
        let route = Route::new(
            RouteSummary::new(distance_m, 600.0),
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.02)],
        );
        EcoEngine::default().enrich(mode, &route)
    }

    #[test]
    fn test_rank_orders_by_emissions_and_keeps_ties_stable() {
        let routes = vec![
            enriched(TransportMode::Driving, 2_500.0),
            enriched(TransportMode::Cycling, 2_400.0),
            enriched(TransportMode::Walking, 2_300.0),
            enriched(TransportMode::Bus, 2_500.0),
        ];

        let ranking = EligibilityPolicy::default().rank(routes);

        let recommended = ranking.recommended.unwrap();
        assert_eq!(recommended.mode, TransportMode::Cycling);
        let order: Vec<_> = ranking.alternatives.iter().map(|r| r.mode).collect();
        assert_eq!(
            order,
            vec![TransportMode::Walking, TransportMode::Bus, TransportMode::Driving]
        );
        assert!(ranking.hidden.is_empty());
    }

    #[test]
    fn test_rank_reports_hidden_modes() {
        let routes = vec![
            enriched(TransportMode::Walking, 12_000.0),
            enriched(TransportMode::Motorcycle, 12_000.0),
            enriched(TransportMode::Bus, 1_000.0),
        ];

        let ranking = EligibilityPolicy::default().rank(routes);

        assert_eq!(ranking.recommended.unwrap().mode, TransportMode::Motorcycle);
        assert!(ranking.alternatives.is_empty());
        let reasons: Vec<_> = ranking.hidden.iter().map(|h| h.reason.as_str()).collect();
        assert_eq!(reasons, vec!["Too far for walking", "Too short for the bus"]);
    }

    #[test]
    fn test_rank_of_nothing() {
        let ranking = EligibilityPolicy::default().rank(Vec::new());
        assert!(ranking.recommended.is_none());
        assert!(ranking.alternatives.is_empty());
    }

    #[test]
    fn test_substituted_table() {
        let policy = EligibilityPolicy::new(EligibilityTable {
            walking: EligibilityRule::at_most(10.0),
            ..EligibilityTable::default()
        });
        assert!(policy.is_eligible(TransportMode::Walking, 8.0));
    }
}
