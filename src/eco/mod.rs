//! Eco module
//!
//! Pure, stateless computations applied to every route:
//! - Emission rates and CO₂ estimates
//! - Elevation gain along a geometry
//! - EcoScore with its breakdown
//! - Distance-based eligibility and emission ranking
//! - Impact messages for the UI

pub mod elevation;
pub mod emission;
pub mod enrich;
pub mod impact;
pub mod policy;
pub mod score;

pub use elevation::{elevation_gain, slope_percent};
pub use emission::{EmissionComparison, EmissionModel, Greenest, RateTable};
pub use enrich::{EcoEngine, EnrichedRoute, format_co2, format_duration};
pub use impact::{
    Feedback, Severity, eco_equivalence, impact_message, negative_feedback, recommendation_badge,
};
pub use policy::{
    Eligibility, EligibilityPolicy, EligibilityRule, EligibilityTable, HiddenMode, Limit, Ranking,
};
pub use score::{ScoreBreakdown, eco_score, turn_count};
