//! # Prescription Report
//!
//! Bundles everything a caller shows for one calculation: the consensus
//! ranges, the input, the result, safety flags and range deviations. The
//! report serializes to JSON for API use and renders as a plain-text sheet
//! via `Display`.
//!
//! ## Example
//!
//! ```rust
//! use pn_core::calculations::{EnteralFeed, MilkType, PrescriptionInput};
//! use pn_core::config::CalculatorSettings;
//! use pn_core::report::PrescriptionReport;
//!
//! let feed = EnteralFeed::new(10.0, MilkType::Standard);
//! let input = PrescriptionInput {
//!     day_of_life: 1,
//!     current_weight_kg: 1.23,
//!     birth_weight_grams: 1200.0,
//!     total_liquid_target_ml_per_kg: 75.0,
//!     glucose_infusion_rate_mg_per_kg_min: 6.0,
//!     amino_acid_target_g_per_kg: 2.0,
//!     lipid_target_g_per_kg: 1.5,
//!     sodium_target_mmol_per_kg: 0.0,
//!     potassium_target_mmol_per_kg: 0.0,
//!     subtracted_fluid_ml: feed.volume_ml,
//! };
//!
//! let report = PrescriptionReport::build(&input, &CalculatorSettings::default(), Some(feed));
//! println!("{}", report);
//! let json = report.to_json_pretty().unwrap();
//! assert!(json.contains("\"generated_at\""));
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::enteral::{combined_calories_kcal_per_kg, EnteralFeed};
use crate::calculations::prescription::{calculate_with, PrescriptionInput, PrescriptionResult};
use crate::config::CalculatorSettings;
use crate::errors::CalcResult;
use crate::ranges::{mineral_ranges, ClinicalPhase, InfantClass, MineralRanges, RangeBounds};
use crate::safety::{assess, range_deviations, AccessRoute, RangeDeviation, SafetyAssessment};

/// Enteral part of the energy intake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnteralSummary {
    pub feed: EnteralFeed,
    /// Milk energy (kcal/day)
    pub calories_kcal: f64,
    /// EN + PN energy (kcal/kg/day)
    pub combined_calories_kcal_per_kg: f64,
}

/// Full output of one prescription calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionReport {
    pub generated_at: DateTime<Utc>,
    pub infant_class: InfantClass,
    pub phase: ClinicalPhase,
    pub ranges: RangeBounds,
    pub minerals: MineralRanges,
    pub input: PrescriptionInput,
    pub result: PrescriptionResult,
    pub safety: SafetyAssessment,
    pub deviations: Vec<RangeDeviation>,
    pub enteral: Option<EnteralSummary>,
}

impl PrescriptionReport {
    /// Resolve ranges, calculate and assess in one step.
    ///
    /// The input is used as given; clamp it first with
    /// [`PrescriptionInput::clamped_to`] if out-of-range targets should not
    /// reach the calculator.
    pub fn build(input: &PrescriptionInput, settings: &CalculatorSettings, feed: Option<EnteralFeed>) -> Self {
        let is_term = input.is_term();
        let ranges = input.ranges(settings.range_policy);
        let result = calculate_with(input, settings);
        let safety = assess(&result, &settings.thresholds);
        let deviations = range_deviations(input, &ranges);

        let enteral = feed.map(|feed| EnteralSummary {
            feed,
            calories_kcal: feed.calories_kcal(),
            combined_calories_kcal_per_kg: combined_calories_kcal_per_kg(&result, input.current_weight_kg, Some(&feed)),
        });

        PrescriptionReport {
            generated_at: Utc::now(),
            infant_class: InfantClass::classify(input.birth_weight_grams, is_term),
            phase: ClinicalPhase::from_day_of_life(input.day_of_life),
            ranges,
            minerals: mineral_ranges(is_term),
            input: input.clone(),
            result,
            safety,
            deviations,
            enteral,
        }
    }

    pub fn to_json_pretty(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for PrescriptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = &self.input;
        let r = &self.result;
        let rule = "=======================================";

        writeln!(f, "{}", rule)?;
        writeln!(f, "  NEONATAL PN PRESCRIPTION")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;
        writeln!(
            f,
            "Patient:  DOL {}, BW {:.0} g ({}), weight {:.2} kg",
            input.day_of_life,
            input.birth_weight_grams,
            self.infant_class.display_name(),
            input.current_weight_kg
        )?;
        writeln!(f, "Phase:    {}", self.phase.display_name())?;
        writeln!(f)?;

        writeln!(f, "Consensus ranges:")?;
        for (parameter, interval) in self.ranges.iter() {
            writeln!(
                f,
                "  {:<14} {:>8} {:<10} (recommended {})",
                parameter.display_name(),
                input.target(parameter),
                parameter.unit(),
                interval
            )?;
        }
        writeln!(
            f,
            "  Minerals (mmol/kg/d): Ca {}, P {}, Mg {}",
            self.minerals.calcium, self.minerals.phosphorus, self.minerals.magnesium
        )?;
        writeln!(f)?;

        writeln!(f, "Volumes (ml/day):")?;
        writeln!(f, "  Total liquid     {:>8.1}", r.total_daily_liquid_ml)?;
        writeln!(f, "  Subtracted       {:>8.1}", input.subtracted_fluid_ml)?;
        writeln!(f, "  PN volume        {:>8.1}  ({:.2} ml/h)", r.pn_volume_ml, r.flow_rate_ml_per_hour)?;
        writeln!(f, "  10% dextrose     {:>8.1}", r.glucose_10_percent_ml)?;
        writeln!(f, "  50% dextrose     {:>8.1}", r.glucose_50_percent_ml)?;
        writeln!(f, "  6% amino acid    {:>8.1}", r.amino_acid_volume_ml)?;
        writeln!(f, "  20% lipid        {:>8.1}", r.lipid_volume_ml)?;
        writeln!(f, "  10% NaCl         {:>8.1}", r.sodium_volume_ml)?;
        writeln!(f, "  10% KCl          {:>8.1}", r.potassium_volume_ml)?;
        if r.additive_reservation_ml > 0.0 {
            writeln!(f, "  Additives        {:>8.1}", r.additive_reservation_ml)?;
        }
        writeln!(f)?;

        writeln!(f, "Metrics:")?;
        writeln!(f, "  Dextrose         {:>8.1} %", r.glucose_concentration_percent)?;
        writeln!(f, "  Osmolarity       {:>8.0} mOsm/L", r.osmolarity_mosm_per_l)?;
        writeln!(f, "  PN energy        {:>8.1} kcal/kg/d", r.total_calories_kcal_per_kg)?;
        if let Some(enteral) = &self.enteral {
            writeln!(
                f,
                "  EN + PN energy   {:>8.1} kcal/kg/d ({:.0} ml {})",
                enteral.combined_calories_kcal_per_kg, enteral.feed.volume_ml, enteral.feed.milk_type
            )?;
        }
        writeln!(
            f,
            "  Energy split     carb {}% / protein {}% / fat {}%",
            r.calorie_ratios.carb_percent, r.calorie_ratios.protein_percent, r.calorie_ratios.fat_percent
        )?;
        writeln!(f, "  NPC:N            {:>8.1} :1", r.calorie_to_nitrogen_ratio)?;
        writeln!(f, "  Lipid of NPC     {:>8.0} %", r.lipid_share_of_non_protein_calories_percent)?;
        writeln!(f)?;

        let route = match self.safety.access_route {
            AccessRoute::Peripheral => "peripheral line acceptable",
            AccessRoute::Central => "CENTRAL LINE",
        };
        writeln!(f, "Access:   {}", route)?;

        let warnings = self.safety.warnings();
        if !warnings.is_empty() || !self.deviations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings:")?;
            for warning in &warnings {
                writeln!(f, "  [WARN] {}", warning)?;
            }
            for deviation in &self.deviations {
                writeln!(f, "  [RANGE] {}", deviation)?;
            }
        }
        writeln!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::enteral::MilkType;
    use crate::ranges::Interval;

    fn input() -> PrescriptionInput {
        PrescriptionInput {
            day_of_life: 3,
            current_weight_kg: 1.15,
            birth_weight_grams: 1200.0,
            total_liquid_target_ml_per_kg: 110.0,
            glucose_infusion_rate_mg_per_kg_min: 7.0,
            amino_acid_target_g_per_kg: 3.0,
            lipid_target_g_per_kg: 2.0,
            sodium_target_mmol_per_kg: 2.0,
            potassium_target_mmol_per_kg: 1.0,
            subtracted_fluid_ml: 12.0,
        }
    }

    #[test]
    fn test_build_report() {
        let feed = EnteralFeed::new(12.0, MilkType::Preterm81);
        let report = PrescriptionReport::build(&input(), &CalculatorSettings::default(), Some(feed));

        assert_eq!(report.infant_class, InfantClass::Preterm1000To1499);
        assert_eq!(report.phase, ClinicalPhase::Recovery);
        assert_eq!(report.ranges.total_liquid, Interval::new(100.0, 130.0));
        assert!(report.deviations.is_empty());

        let enteral = report.enteral.expect("feed summary");
        assert!((enteral.calories_kcal - 9.72).abs() < 1e-9);
        assert!(enteral.combined_calories_kcal_per_kg > report.result.total_calories_kcal_per_kg);
    }

    #[test]
    fn test_report_uses_settings_policy() {
        let settings = CalculatorSettings {
            range_policy: crate::ranges::RangePolicy::DayOfLifeRamp,
            ..CalculatorSettings::default()
        };
        let report = PrescriptionReport::build(&input(), &settings, None);
        // Day 3 ramp: AA capped at 3.5
        assert_eq!(report.ranges.amino_acid, Interval::new(3.5, 3.5));
        assert_eq!(report.deviations.len(), 1);
        assert!(report.enteral.is_none());
    }

    #[test]
    fn test_text_rendering() {
        let report = PrescriptionReport::build(&input(), &CalculatorSettings::default(), None);
        let text = report.to_string();
        assert!(text.contains("NEONATAL PN PRESCRIPTION"));
        assert!(text.contains("DOL 3"));
        assert!(text.contains("Recovery"));
        assert!(text.contains("10% dextrose"));
    }

    #[test]
    fn test_json_output() {
        let report = PrescriptionReport::build(&input(), &CalculatorSettings::default(), None);
        let json = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "Recovery");
        assert_eq!(value["input"]["day_of_life"], 3);
        assert!(value["result"]["pn_volume_ml"].as_f64().unwrap() > 0.0);
    }
}
