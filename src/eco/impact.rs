//! Human-readable impact feedback for saved or emitted CO₂
//!
//! Thresholds are expressed in kilograms, inputs in grams.

use serde::{Deserialize, Serialize};

use crate::models::TransportMode;

/// CO₂ a tree absorbs per day, kg
const TREE_DAY_KG: f64 = 0.06;
/// CO₂ to produce one plastic bottle, kg
const PLASTIC_BOTTLE_KG: f64 = 0.082;
/// CO₂ per mile driven, kg
const MILE_DRIVEN_KG: f64 = 0.411;
const PHONE_CHARGE_KG: f64 = 0.008;
const LAPTOP_HOUR_KG: f64 = 0.155;

fn kilograms(grams: u64) -> f64 {
    grams as f64 / 1000.0
}

fn count(kg: f64, unit: f64) -> u64 {
    (kg / unit).round() as u64
}

/// Encouraging message scaled to the amount saved
#[must_use]
pub fn impact_message(saved_grams: u64) -> Option<String> {
    if saved_grams == 0 {
        return None;
    }
    let kg = kilograms(saved_grams);
    let message = if kg >= 100.0 {
        format!("Like {} trees breathing for a day!", count(kg, TREE_DAY_KG))
    } else if kg >= 50.0 {
        format!("Like a tree breathing for {} days!", count(kg, TREE_DAY_KG))
    } else if kg >= 20.0 {
        format!(
            "Equivalent to {} plastic bottles not produced!",
            count(kg, PLASTIC_BOTTLE_KG)
        )
    } else if kg >= 10.0 {
        format!("Like a tree breathing for {} days!", count(kg, TREE_DAY_KG))
    } else if kg >= 5.0 {
        "Small steps make big differences!".to_string()
    } else {
        "Every bit counts for our planet!".to_string()
    };
    Some(message)
}

/// Everyday equivalent of the amount saved, from 5 kg up
#[must_use]
pub fn eco_equivalence(saved_grams: u64) -> Option<String> {
    let kg = kilograms(saved_grams);
    if kg >= 100.0 {
        Some(format!(
            "Saves {} tree-days of carbon absorption",
            count(kg, TREE_DAY_KG)
        ))
    } else if kg >= 50.0 {
        Some(format!(
            "Equal to not driving {} miles",
            count(kg, MILE_DRIVEN_KG)
        ))
    } else if kg >= 20.0 {
        Some(format!(
            "Equal to {} smartphone charges",
            count(kg, PHONE_CHARGE_KG)
        ))
    } else if kg >= 5.0 {
        Some(format!(
            "Equal to {} hours of laptop use",
            count(kg, LAPTOP_HOUR_KG)
        ))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Moderate,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    pub severity: Severity,
}

/// Warning for a choice that emits more than the baseline
#[must_use]
pub fn negative_feedback(emitted_grams: u64, baseline_grams: u64) -> Option<Feedback> {
    if baseline_grams == 0 {
        return None;
    }
    let worse_percent =
        (emitted_grams as f64 - baseline_grams as f64) / baseline_grams as f64 * 100.0;

    let (message, severity) = if worse_percent > 50.0 {
        ("Environment Impact: Very High", Severity::Critical)
    } else if worse_percent > 20.0 {
        ("Environment Impact: High", Severity::High)
    } else if worse_percent > 0.0 {
        ("Consider a greener option", Severity::Moderate)
    } else {
        return None;
    };

    Some(Feedback {
        message: message.to_string(),
        severity,
    })
}

/// Badge for low-emission modes that actually save something
#[must_use]
pub fn recommendation_badge(mode: TransportMode, saved_grams: u64) -> Option<&'static str> {
    if saved_grams == 0 {
        return None;
    }
    match mode {
        mode if mode.is_zero_emission() => Some("100% Eco"),
        TransportMode::Bus => Some("Eco Choice"),
        _ => None,
    }
}
