//! # Enteral Feeds and Fluid Subtractions
//!
//! Milk feeds and drug infusions use part of the daily liquid allowance, so
//! their volume is removed from the PN bag. Milk also brings calories that
//! count toward the combined EN + PN energy intake.
//!
//! ## Example
//!
//! ```rust
//! use pn_core::calculations::enteral::{total_subtracted_fluid_ml, EnteralFeed, FluidSubtraction, MilkType};
//!
//! let feed = EnteralFeed::new(10.0, MilkType::Standard);
//! let dopamine: FluidSubtraction = "dopamine=4.8".parse().unwrap();
//!
//! let subtracted = total_subtracted_fluid_ml(Some(&feed), &[dopamine]);
//! assert!((subtracted - 14.8).abs() < 1e-9);
//! assert!((feed.calories_kcal() - 6.7).abs() < 1e-9);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculations::prescription::PrescriptionResult;
use crate::constants::{MILK_PRETERM_68_KCAL_PER_ML, MILK_PRETERM_81_KCAL_PER_ML, MILK_STANDARD_KCAL_PER_ML};
use crate::errors::{CalcError, CalcResult};

/// Milk type by caloric density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilkType {
    /// Breast milk or standard formula, 0.67 kcal/ml
    #[default]
    Standard,
    /// Preterm formula, 0.68 kcal/ml
    Preterm68,
    /// Preterm formula, 0.81 kcal/ml
    Preterm81,
}

impl MilkType {
    pub const ALL: [MilkType; 3] = [MilkType::Standard, MilkType::Preterm68, MilkType::Preterm81];

    pub fn kcal_per_ml(&self) -> f64 {
        match self {
            MilkType::Standard => MILK_STANDARD_KCAL_PER_ML,
            MilkType::Preterm68 => MILK_PRETERM_68_KCAL_PER_ML,
            MilkType::Preterm81 => MILK_PRETERM_81_KCAL_PER_ML,
        }
    }

    /// Short identifier used on the command line and in JSON
    pub fn code(&self) -> &'static str {
        match self {
            MilkType::Standard => "standard",
            MilkType::Preterm68 => "preterm68",
            MilkType::Preterm81 => "preterm81",
        }
    }
}

impl fmt::Display for MilkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} kcal/ml)", self.code(), self.kcal_per_ml())
    }
}

impl FromStr for MilkType {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        MilkType::ALL
            .into_iter()
            .find(|m| m.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CalcError::invalid_input("milk_type", s, "Expected standard, preterm68 or preterm81")
            })
    }
}

/// Daily enteral milk intake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnteralFeed {
    /// Total milk volume per day (ml)
    pub volume_ml: f64,
    pub milk_type: MilkType,
}

impl EnteralFeed {
    pub fn new(volume_ml: f64, milk_type: MilkType) -> Self {
        EnteralFeed { volume_ml, milk_type }
    }

    /// Energy delivered by the feed (kcal/day)
    pub fn calories_kcal(&self) -> f64 {
        self.volume_ml * self.milk_type.kcal_per_ml()
    }
}

/// Non-PN volume to remove from the liquid allowance, e.g. a vasoactive drip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidSubtraction {
    pub label: String,
    pub volume_ml: f64,
}

impl FluidSubtraction {
    pub fn new(label: impl Into<String>, volume_ml: f64) -> Self {
        FluidSubtraction {
            label: label.into(),
            volume_ml,
        }
    }
}

/// Parses `label=volume`, e.g. `dopamine=4.8`.
impl FromStr for FluidSubtraction {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        let (label, volume) = s
            .split_once('=')
            .ok_or_else(|| CalcError::invalid_input("infusion", s, "Expected label=ml"))?;

        let label = label.trim();
        if label.is_empty() {
            return Err(CalcError::invalid_input("infusion", s, "Label is empty"));
        }

        let volume_ml: f64 = volume
            .trim()
            .parse()
            .map_err(|_| CalcError::invalid_input("infusion", s, "Volume is not a number"))?;
        if !volume_ml.is_finite() || volume_ml < 0.0 {
            return Err(CalcError::invalid_input("infusion", s, "Volume must be non-negative"));
        }

        Ok(FluidSubtraction::new(label, volume_ml))
    }
}

/// Volume removed from the PN allocation: milk plus every other infusion.
pub fn total_subtracted_fluid_ml(feed: Option<&EnteralFeed>, others: &[FluidSubtraction]) -> f64 {
    let milk = feed.map_or(0.0, |f| f.volume_ml);
    milk + others.iter().map(|o| o.volume_ml).sum::<f64>()
}

/// Combined EN + PN energy (kcal/kg/day).
///
/// The PN result reports energy per kg; it is scaled back to a daily total,
/// the milk calories are added, and the sum is divided by weight again.
/// Returns 0 for a non-positive weight.
pub fn combined_calories_kcal_per_kg(result: &PrescriptionResult, weight_kg: f64, feed: Option<&EnteralFeed>) -> f64 {
    if weight_kg <= 0.0 {
        return 0.0;
    }
    let enteral_kcal = feed.map_or(0.0, EnteralFeed::calories_kcal);
    (result.total_calories_kcal_per_kg * weight_kg + enteral_kcal) / weight_kg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::prescription::{calculate, PrescriptionInput};

    fn input_with_feed(feed: &EnteralFeed) -> PrescriptionInput {
        PrescriptionInput {
            day_of_life: 1,
            current_weight_kg: 1.23,
            birth_weight_grams: 1200.0,
            total_liquid_target_ml_per_kg: 75.0,
            glucose_infusion_rate_mg_per_kg_min: 6.0,
            amino_acid_target_g_per_kg: 2.0,
            lipid_target_g_per_kg: 1.5,
            sodium_target_mmol_per_kg: 0.0,
            potassium_target_mmol_per_kg: 0.0,
            subtracted_fluid_ml: total_subtracted_fluid_ml(Some(feed), &[]),
        }
    }

    #[test]
    fn test_milk_densities() {
        assert_eq!(MilkType::Standard.kcal_per_ml(), 0.67);
        assert_eq!(MilkType::Preterm68.kcal_per_ml(), 0.68);
        assert_eq!(MilkType::Preterm81.kcal_per_ml(), 0.81);
    }

    #[test]
    fn test_milk_type_parsing() {
        assert_eq!("preterm81".parse::<MilkType>().unwrap(), MilkType::Preterm81);
        assert_eq!(" Standard ".parse::<MilkType>().unwrap(), MilkType::Standard);
        assert!("cow".parse::<MilkType>().is_err());
    }

    #[test]
    fn test_milk_type_json_names() {
        assert_eq!(serde_json::to_string(&MilkType::Preterm68).unwrap(), "\"preterm68\"");
        assert_eq!(serde_json::to_string(&MilkType::Standard).unwrap(), "\"standard\"");
    }

    #[test]
    fn test_subtraction_parsing() {
        let sub: FluidSubtraction = "dopamine = 4.8".parse().unwrap();
        assert_eq!(sub.label, "dopamine");
        assert_eq!(sub.volume_ml, 4.8);

        assert!("dopamine".parse::<FluidSubtraction>().is_err());
        assert!("=4".parse::<FluidSubtraction>().is_err());
        assert!("dopamine=abc".parse::<FluidSubtraction>().is_err());
        assert!("dopamine=-2".parse::<FluidSubtraction>().is_err());
    }

    #[test]
    fn test_total_subtraction() {
        let others = vec![
            FluidSubtraction::new("dopamine", 2.4),
            FluidSubtraction::new("flush", 3.6),
        ];
        assert!((total_subtracted_fluid_ml(None, &others) - 6.0).abs() < 1e-9);

        let feed = EnteralFeed::new(10.0, MilkType::Preterm81);
        assert!((total_subtracted_fluid_ml(Some(&feed), &others) - 16.0).abs() < 1e-9);
        assert_eq!(total_subtracted_fluid_ml(None, &[]), 0.0);
    }

    #[test]
    fn test_combined_calories() {
        let feed = EnteralFeed::new(10.0, MilkType::Standard);
        let input = input_with_feed(&feed);
        let result = calculate(&input);

        let combined = combined_calories_kcal_per_kg(&result, input.current_weight_kg, Some(&feed));
        let expected = result.total_calories_kcal_per_kg + 6.7 / 1.23;
        assert!((combined - expected).abs() < 1e-9);

        let pn_only = combined_calories_kcal_per_kg(&result, input.current_weight_kg, None);
        assert!((pn_only - result.total_calories_kcal_per_kg).abs() < 1e-9);
    }

    #[test]
    fn test_combined_calories_zero_weight() {
        let feed = EnteralFeed::new(10.0, MilkType::Standard);
        let result = calculate(&input_with_feed(&feed));
        assert_eq!(combined_calories_kcal_per_kg(&result, 0.0, Some(&feed)), 0.0);
    }
}
