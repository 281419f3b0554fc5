//! # Safety Checks
//!
//! Turns a calculated prescription into the flags a bedside caller shows:
//! venous access route, calorie-to-nitrogen balance, lipid share of
//! non-protein energy, and targets that fall outside the consensus ranges.
//!
//! Nothing here alters the prescription.
//!
//! ## Example
//!
//! ```rust
//! use pn_core::calculations::prescription::{calculate, PrescriptionInput};
//! use pn_core::safety::{assess, AccessRoute, SafetyThresholds};
//!
//! let input = PrescriptionInput {
//!     day_of_life: 1,
//!     current_weight_kg: 1.2,
//!     birth_weight_grams: 1200.0,
//!     total_liquid_target_ml_per_kg: 75.0,
//!     glucose_infusion_rate_mg_per_kg_min: 6.0,
//!     amino_acid_target_g_per_kg: 2.0,
//!     lipid_target_g_per_kg: 1.5,
//!     sodium_target_mmol_per_kg: 0.0,
//!     potassium_target_mmol_per_kg: 0.0,
//!     subtracted_fluid_ml: 0.0,
//! };
//!
//! let safety = assess(&calculate(&input), &SafetyThresholds::default());
//! assert_eq!(safety.access_route, AccessRoute::Peripheral);
//! assert!(safety.is_balanced());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::prescription::{PrescriptionInput, PrescriptionResult, SplitAdjustment};
use crate::constants::{
    CALORIE_NITROGEN_MAX, CALORIE_NITROGEN_MIN, LIPID_SHARE_MAX_PERCENT, LIPID_SHARE_MIN_PERCENT,
    MAX_PERIPHERAL_GLUCOSE_PERCENT, MAX_PERIPHERAL_OSMOLARITY,
};
use crate::errors::{CalcError, CalcResult};
use crate::ranges::{Interval, Parameter, RangeBounds};

/// Limits used to flag a prescription.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyThresholds {
    /// Osmolarity above this requires central access (mOsm/L)
    pub max_peripheral_osmolarity_mosm_per_l: f64,

    /// Dextrose concentration above this requires central access (%)
    pub max_peripheral_glucose_percent: f64,

    /// Acceptable non-protein calorie to nitrogen ratio
    pub calorie_to_nitrogen: Interval,

    /// Acceptable lipid share of non-protein calories (%)
    pub lipid_share_percent: Interval,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        SafetyThresholds {
            max_peripheral_osmolarity_mosm_per_l: MAX_PERIPHERAL_OSMOLARITY,
            max_peripheral_glucose_percent: MAX_PERIPHERAL_GLUCOSE_PERCENT,
            calorie_to_nitrogen: Interval::new(CALORIE_NITROGEN_MIN, CALORIE_NITROGEN_MAX),
            lipid_share_percent: Interval::new(LIPID_SHARE_MIN_PERCENT, LIPID_SHARE_MAX_PERCENT),
        }
    }
}

impl SafetyThresholds {
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.max_peripheral_osmolarity_mosm_per_l > 0.0) {
            return Err(CalcError::config(
                "thresholds.max_peripheral_osmolarity_mosm_per_l",
                "Must be positive",
            ));
        }
        if !(self.max_peripheral_glucose_percent > 0.0) {
            return Err(CalcError::config(
                "thresholds.max_peripheral_glucose_percent",
                "Must be positive",
            ));
        }
        for (key, interval) in [
            ("thresholds.calorie_to_nitrogen", self.calorie_to_nitrogen),
            ("thresholds.lipid_share_percent", self.lipid_share_percent),
        ] {
            if !(interval.min <= interval.max) {
                return Err(CalcError::config(key, format!("min {} exceeds max {}", interval.min, interval.max)));
            }
        }
        Ok(())
    }
}

/// Recommended venous access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessRoute {
    Peripheral,
    Central,
}

/// Position of a value relative to its acceptable interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioStatus {
    Below,
    Within,
    Above,
}

impl RatioStatus {
    fn of(value: f64, interval: Interval) -> Self {
        if value < interval.min {
            RatioStatus::Below
        } else if value > interval.max {
            RatioStatus::Above
        } else {
            RatioStatus::Within
        }
    }
}

/// Safety flags for one prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyAssessment {
    pub access_route: AccessRoute,
    pub osmolarity_requires_central: bool,
    pub glucose_requires_central: bool,
    pub calorie_to_nitrogen: RatioStatus,
    pub lipid_share: RatioStatus,
    /// Dextrose split could not deliver the requested GIR
    pub glucose_target_missed: bool,

    // Values the flags were derived from, for messages
    osmolarity_mosm_per_l: f64,
    glucose_concentration_percent: f64,
    calorie_to_nitrogen_ratio: f64,
    lipid_share_percent: f64,
    thresholds: SafetyThresholds,
}

impl SafetyAssessment {
    /// True when both energy ratios are within their intervals
    pub fn is_balanced(&self) -> bool {
        self.calorie_to_nitrogen == RatioStatus::Within && self.lipid_share == RatioStatus::Within
    }

    /// Human-readable warnings, empty when nothing is flagged
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let t = &self.thresholds;

        if self.osmolarity_requires_central {
            warnings.push(format!(
                "Osmolarity {:.0} mOsm/L exceeds {:.0}: verify infusion route, central line recommended",
                self.osmolarity_mosm_per_l, t.max_peripheral_osmolarity_mosm_per_l
            ));
        }
        if self.glucose_requires_central {
            warnings.push(format!(
                "Dextrose concentration {:.1}% exceeds {:.1}%: central line recommended",
                self.glucose_concentration_percent, t.max_peripheral_glucose_percent
            ));
        }
        if self.calorie_to_nitrogen != RatioStatus::Within {
            warnings.push(format!(
                "Calorie:nitrogen ratio {:.1}:1 outside {}",
                self.calorie_to_nitrogen_ratio, t.calorie_to_nitrogen
            ));
        }
        if self.lipid_share != RatioStatus::Within {
            warnings.push(format!(
                "Lipid share of non-protein calories {:.0}% outside {}%",
                self.lipid_share_percent, t.lipid_share_percent
            ));
        }
        if self.glucose_target_missed {
            warnings.push("Requested GIR cannot be delivered exactly in the available volume".to_string());
        }
        warnings
    }
}

/// Evaluate a prescription against the safety thresholds.
pub fn assess(result: &PrescriptionResult, thresholds: &SafetyThresholds) -> SafetyAssessment {
    let osmolarity_requires_central = result.osmolarity_mosm_per_l > thresholds.max_peripheral_osmolarity_mosm_per_l;
    let glucose_requires_central = result.glucose_concentration_percent > thresholds.max_peripheral_glucose_percent;

    let access_route = if osmolarity_requires_central || glucose_requires_central {
        AccessRoute::Central
    } else {
        AccessRoute::Peripheral
    };

    SafetyAssessment {
        access_route,
        osmolarity_requires_central,
        glucose_requires_central,
        calorie_to_nitrogen: RatioStatus::of(result.calorie_to_nitrogen_ratio, thresholds.calorie_to_nitrogen),
        lipid_share: RatioStatus::of(
            result.lipid_share_of_non_protein_calories_percent,
            thresholds.lipid_share_percent,
        ),
        glucose_target_missed: result.glucose_split_adjustment != SplitAdjustment::None,
        osmolarity_mosm_per_l: result.osmolarity_mosm_per_l,
        glucose_concentration_percent: result.glucose_concentration_percent,
        calorie_to_nitrogen_ratio: result.calorie_to_nitrogen_ratio,
        lipid_share_percent: result.lipid_share_of_non_protein_calories_percent,
        thresholds: *thresholds,
    }
}

// ============================================================================
// Range Deviations
// ============================================================================

/// Which side of the interval a target fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Below,
    Above,
}

/// A target outside its consensus interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeDeviation {
    pub parameter: Parameter,
    pub value: f64,
    pub bounds: Interval,
    pub direction: Direction,
}

impl fmt::Display for RangeDeviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.direction {
            Direction::Below => "below",
            Direction::Above => "above",
        };
        write!(
            f,
            "{} {} {} is {} recommended {} {}",
            self.parameter,
            self.value,
            self.parameter.unit(),
            side,
            self.bounds,
            self.parameter.unit()
        )
    }
}

/// Every target of `input` that lies outside `bounds`.
pub fn range_deviations(input: &PrescriptionInput, bounds: &RangeBounds) -> Vec<RangeDeviation> {
    bounds
        .iter()
        .filter_map(|(parameter, interval)| {
            let value = input.target(parameter);
            let direction = if value < interval.min {
                Direction::Below
            } else if value > interval.max {
                Direction::Above
            } else {
                return None;
            };
            Some(RangeDeviation {
                parameter,
                value,
                bounds: interval,
                direction,
            })
        })
        .collect()
}
