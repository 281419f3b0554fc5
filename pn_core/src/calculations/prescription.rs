//! # PN Prescription Calculation
//!
//! Converts per-kilogram nutrition targets into stock-solution volumes, pump
//! rate, dextrose concentration, an osmolarity estimate and energy ratios.
//!
//! ## Behaviour
//!
//! - Pure and total: every numeric input produces a result, nothing panics
//! - PN volume never goes negative when subtracted feeds exceed the target
//! - The 10%/50% dextrose split is clamped to the volume actually available;
//!   delivered glucose is recomputed from the clamped volumes
//! - Every division by a possibly-zero quantity falls back to 0
//!
//! ## Example
//!
//! ```rust
//! use pn_core::calculations::prescription::{calculate, PrescriptionInput};
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
//! let result = calculate(&input);
//!
//! assert!((result.pn_volume_ml - 90.0).abs() < 1e-9);
//! assert!((result.flow_rate_ml_per_hour - 3.75).abs() < 1e-9);
//! println!("10% dextrose: {:.1} ml", result.glucose_10_percent_ml);
//! println!("50% dextrose: {:.1} ml", result.glucose_50_percent_ml);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CalculatorSettings;
use crate::constants::*;
use crate::errors::{CalcError, CalcResult};
use crate::ranges::{self, Parameter, RangeBounds, RangePolicy};
use crate::units::{GPerKgDay, MgPerKgMin, MlPerDay, MlPerHour};

/// Input parameters for one PN prescription.
///
/// Targets are per kilogram of current weight and per day, except GIR which
/// is per minute. They are expected to lie within the consensus ranges, but
/// the calculator does not enforce that; see [`PrescriptionInput::clamped_to`].
///
/// ## JSON Example
///
/// ```json
/// {
///   "day_of_life": 3,
///   "current_weight_kg": 1.18,
///   "birth_weight_grams": 1200.0,
///   "total_liquid_target_ml_per_kg": 110.0,
///   "glucose_infusion_rate_mg_per_kg_min": 7.0,
///   "amino_acid_target_g_per_kg": 3.0,
///   "lipid_target_g_per_kg": 2.0,
///   "sodium_target_mmol_per_kg": 2.0,
///   "potassium_target_mmol_per_kg": 1.0,
///   "subtracted_fluid_ml": 24.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionInput {
    /// Days since birth, starting at 1
    pub day_of_life: u32,

    /// Current dosing weight (kg)
    pub current_weight_kg: f64,

    /// Birth weight (g); selects term/preterm and the liquid ladder
    pub birth_weight_grams: f64,

    /// Total daily liquid (ml/kg/day)
    pub total_liquid_target_ml_per_kg: f64,

    /// Glucose infusion rate (mg/kg/min)
    pub glucose_infusion_rate_mg_per_kg_min: f64,

    /// Amino acid dose (g/kg/day)
    pub amino_acid_target_g_per_kg: f64,

    /// Lipid dose (g/kg/day)
    pub lipid_target_g_per_kg: f64,

    /// Sodium (mmol/kg/day)
    pub sodium_target_mmol_per_kg: f64,

    /// Potassium (mmol/kg/day)
    pub potassium_target_mmol_per_kg: f64,

    /// Volume given by other routes (enteral feeds, drug infusions), ml/day
    #[serde(default)]
    pub subtracted_fluid_ml: f64,
}

impl PrescriptionInput {
    /// Validate input parameters.
    ///
    /// [`calculate`] accepts anything; callers that take user input should
    /// reject it here first.
    pub fn validate(&self) -> CalcResult<()> {
        if self.day_of_life == 0 {
            return Err(CalcError::invalid_input(
                "day_of_life",
                "0",
                "Day of life starts at 1",
            ));
        }
        if !self.current_weight_kg.is_finite() || self.current_weight_kg <= 0.0 {
            return Err(CalcError::invalid_input(
                "current_weight_kg",
                self.current_weight_kg.to_string(),
                "Weight must be positive",
            ));
        }
        if self.current_weight_kg > MAX_NEONATAL_WEIGHT_KG {
            return Err(CalcError::invalid_input(
                "current_weight_kg",
                self.current_weight_kg.to_string(),
                "Weight exceeds 10 kg - check units (kg, not g)",
            ));
        }
        if !self.birth_weight_grams.is_finite() || self.birth_weight_grams <= 0.0 {
            return Err(CalcError::invalid_input(
                "birth_weight_grams",
                self.birth_weight_grams.to_string(),
                "Birth weight must be positive",
            ));
        }

        let non_negative = [
            ("total_liquid_target_ml_per_kg", self.total_liquid_target_ml_per_kg),
            ("glucose_infusion_rate_mg_per_kg_min", self.glucose_infusion_rate_mg_per_kg_min),
            ("amino_acid_target_g_per_kg", self.amino_acid_target_g_per_kg),
            ("lipid_target_g_per_kg", self.lipid_target_g_per_kg),
            ("sodium_target_mmol_per_kg", self.sodium_target_mmol_per_kg),
            ("potassium_target_mmol_per_kg", self.potassium_target_mmol_per_kg),
            ("subtracted_fluid_ml", self.subtracted_fluid_ml),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Value must be a non-negative number",
                ));
            }
        }
        Ok(())
    }

    /// Term classification derived from birth weight
    pub fn is_term(&self) -> bool {
        ranges::is_term(self.birth_weight_grams)
    }

    /// Consensus ranges for this infant
    pub fn ranges(&self, policy: RangePolicy) -> RangeBounds {
        ranges::resolve_ranges_with(self.day_of_life, self.birth_weight_grams, self.is_term(), policy)
    }

    /// Current value of a range-checked target
    pub fn target(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::TotalLiquid => self.total_liquid_target_ml_per_kg,
            Parameter::GlucoseInfusionRate => self.glucose_infusion_rate_mg_per_kg_min,
            Parameter::AminoAcid => self.amino_acid_target_g_per_kg,
            Parameter::Lipid => self.lipid_target_g_per_kg,
            Parameter::Sodium => self.sodium_target_mmol_per_kg,
            Parameter::Potassium => self.potassium_target_mmol_per_kg,
        }
    }

    /// Copy with every target clamped into its consensus interval.
    ///
    /// During the transition phase the electrolyte intervals are `[0, 0]`,
    /// so sodium and potassium come back as zero.
    pub fn clamped_to(&self, bounds: &RangeBounds) -> PrescriptionInput {
        PrescriptionInput {
            total_liquid_target_ml_per_kg: bounds.total_liquid.clamp(self.total_liquid_target_ml_per_kg),
            glucose_infusion_rate_mg_per_kg_min: bounds
                .glucose_infusion_rate
                .clamp(self.glucose_infusion_rate_mg_per_kg_min),
            amino_acid_target_g_per_kg: bounds.amino_acid.clamp(self.amino_acid_target_g_per_kg),
            lipid_target_g_per_kg: bounds.lipid.clamp(self.lipid_target_g_per_kg),
            sodium_target_mmol_per_kg: bounds.sodium.clamp(self.sodium_target_mmol_per_kg),
            potassium_target_mmol_per_kg: bounds.potassium.clamp(self.potassium_target_mmol_per_kg),
            ..self.clone()
        }
    }
}

/// Share of PN energy from each macronutrient, in whole percent.
///
/// Each share is rounded on its own, so the sum can be 99 or 101.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalorieRatios {
    pub carb_percent: i32,
    pub protein_percent: i32,
    pub fat_percent: i32,
}

impl CalorieRatios {
    pub fn total(&self) -> i32 {
        self.carb_percent + self.protein_percent + self.fat_percent
    }
}

/// How the dextrose split was adjusted to fit the available volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAdjustment {
    /// Exact solution, requested glucose delivered
    #[default]
    None,
    /// Target below what 10% alone delivers; 50% dropped, more glucose given
    TenPercentOnly,
    /// Target above what fits even at 50%; 10% dropped, less glucose given
    FiftyPercentOnly,
}

/// Volumes of 10% and 50% dextrose filling the remaining volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlucoseSplit {
    pub glucose_10_percent_ml: f64,
    pub glucose_50_percent_ml: f64,
    pub adjustment: SplitAdjustment,
}

impl GlucoseSplit {
    /// Glucose mass actually delivered by the split (g)
    pub fn glucose_grams(&self) -> f64 {
        self.glucose_10_percent_ml * GLUCOSE_10_G_PER_ML + self.glucose_50_percent_ml * GLUCOSE_50_G_PER_ML
    }
}

/// Solve `gs10 + gs50 = V`, `0.1·gs10 + 0.5·gs50 = G` for the dextrose split.
///
/// A negative 50% volume means the 10% solution alone already exceeds the
/// target, so the whole volume goes to 10%. A negative 10% volume means the
/// target is out of reach, so the whole volume goes to 50%.
///
/// # Example
///
/// ```rust
/// use pn_core::calculations::prescription::{split_glucose, SplitAdjustment};
///
/// let split = split_glucose(7.0, 30.0);
/// assert!((split.glucose_grams() - 7.0).abs() < 1e-9);
/// assert_eq!(split.adjustment, SplitAdjustment::None);
///
/// let infeasible = split_glucose(20.0, 30.0);
/// assert_eq!(infeasible.glucose_50_percent_ml, 30.0);
/// assert_eq!(infeasible.adjustment, SplitAdjustment::FiftyPercentOnly);
/// ```
pub fn split_glucose(glucose_grams: f64, remaining_volume_ml: f64) -> GlucoseSplit {
    let gs50 = (glucose_grams - GLUCOSE_10_G_PER_ML * remaining_volume_ml)
        / (GLUCOSE_50_G_PER_ML - GLUCOSE_10_G_PER_ML);
    let gs10 = remaining_volume_ml - gs50;

    if gs50 < 0.0 {
        debug!(glucose_grams, remaining_volume_ml, "glucose target below 10% delivery, using 10% only");
        GlucoseSplit {
            glucose_10_percent_ml: remaining_volume_ml,
            glucose_50_percent_ml: 0.0,
            adjustment: SplitAdjustment::TenPercentOnly,
        }
    } else if gs10 < 0.0 {
        debug!(glucose_grams, remaining_volume_ml, "glucose target exceeds available volume, using 50% only");
        GlucoseSplit {
            glucose_10_percent_ml: 0.0,
            glucose_50_percent_ml: remaining_volume_ml,
            adjustment: SplitAdjustment::FiftyPercentOnly,
        }
    } else {
        GlucoseSplit {
            glucose_10_percent_ml: gs10,
            glucose_50_percent_ml: gs50,
            adjustment: SplitAdjustment::None,
        }
    }
}

/// Results of a PN prescription calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_daily_liquid_ml": 90.0,
///   "pn_volume_ml": 90.0,
///   "flow_rate_ml_per_hour": 3.75,
///   "glucose_10_percent_ml": 25.33,
///   "glucose_50_percent_ml": 15.67,
///   "glucose_split_adjustment": "none",
///   "amino_acid_volume_ml": 40.0,
///   "lipid_volume_ml": 9.0,
///   "sodium_volume_ml": 0.0,
///   "potassium_volume_ml": 0.0,
///   "glucose_concentration_percent": 11.52,
///   "osmolarity_mosm_per_l": 789.33,
///   "total_calories_kcal_per_kg": 50.88,
///   "calorie_ratios": { "carb_percent": 58, "protein_percent": 16, "fat_percent": 27 },
///   "calorie_to_nitrogen_ratio": 133.99,
///   "lipid_share_of_non_protein_calories_percent": 31.49
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionResult {
    /// Daily liquid before subtraction: target × weight (ml)
    pub total_daily_liquid_ml: f64,

    /// Volume delivered as PN after subtraction (ml/day), never negative
    pub pn_volume_ml: f64,

    /// Pump rate over 24 h (ml/h)
    pub flow_rate_ml_per_hour: f64,

    // === Solution Volumes (ml/day) ===
    /// 10% dextrose
    pub glucose_10_percent_ml: f64,

    /// 50% dextrose
    pub glucose_50_percent_ml: f64,

    /// Whether the dextrose split had to be clamped
    pub glucose_split_adjustment: SplitAdjustment,

    /// 6% amino acid
    pub amino_acid_volume_ml: f64,

    /// 20% lipid emulsion
    pub lipid_volume_ml: f64,

    /// 10% NaCl
    pub sodium_volume_ml: f64,

    /// 10% KCl
    pub potassium_volume_ml: f64,

    /// Volume reserved for trace elements and vitamins (ml)
    pub additive_reservation_ml: f64,

    // === Glucose ===
    /// Glucose requested by the GIR target (g/day)
    pub requested_glucose_g: f64,

    /// Glucose actually delivered by the dextrose split (g/day)
    pub delivered_glucose_g: f64,

    /// Dextrose concentration of the PN bag (%)
    pub glucose_concentration_percent: f64,

    // === Derived Metrics ===
    /// Estimated osmolarity (mOsm/L)
    pub osmolarity_mosm_per_l: f64,

    /// PN energy per kg (kcal/kg/day), enteral calories excluded
    pub total_calories_kcal_per_kg: f64,

    /// Energy split between carbohydrate, protein and fat
    pub calorie_ratios: CalorieRatios,

    /// Non-protein calories per gram of nitrogen
    pub calorie_to_nitrogen_ratio: f64,

    /// Lipid share of non-protein calories (%)
    pub lipid_share_of_non_protein_calories_percent: f64,
}

impl PrescriptionResult {
    /// Sum of all stock-solution volumes (ml)
    pub fn total_solution_volume_ml(&self) -> f64 {
        self.glucose_10_percent_ml
            + self.glucose_50_percent_ml
            + self.amino_acid_volume_ml
            + self.lipid_volume_ml
            + self.sodium_volume_ml
            + self.potassium_volume_ml
    }

    /// True when the requested GIR was delivered exactly
    pub fn glucose_target_met(&self) -> bool {
        self.glucose_split_adjustment == SplitAdjustment::None
    }
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn percent(part: f64, whole: f64) -> i32 {
    ((part / whole) * 100.0).round() as i32
}

/// Calculate a PN prescription with default settings (no additive reservation).
///
/// This is a pure function: identical inputs give bit-identical results and
/// no input makes it fail.
pub fn calculate(input: &PrescriptionInput) -> PrescriptionResult {
    calculate_with(input, &CalculatorSettings::default())
}

/// Validate the input and settings, then calculate.
///
/// # Returns
///
/// * `Ok(PrescriptionResult)` - Calculation results
/// * `Err(CalcError)` - If the input or settings are invalid
pub fn calculate_checked(input: &PrescriptionInput, settings: &CalculatorSettings) -> CalcResult<PrescriptionResult> {
    input.validate()?;
    settings.validate()?;
    Ok(calculate_with(input, settings))
}

/// Calculate a PN prescription under explicit settings.
pub fn calculate_with(input: &PrescriptionInput, settings: &CalculatorSettings) -> PrescriptionResult {
    let weight = input.current_weight_kg;

    // === Volume Budget ===
    let total_daily_liquid_ml = input.total_liquid_target_ml_per_kg * weight;
    let pn_volume_ml = (total_daily_liquid_ml - input.subtracted_fluid_ml).max(0.0);
    let flow_rate_ml_per_hour = MlPerHour::from(MlPerDay(pn_volume_ml)).value();

    // === Solute Volumes ===
    let amino_acid_g = input.amino_acid_target_g_per_kg * weight;
    let lipid_g = input.lipid_target_g_per_kg * weight;
    let electrolyte_mmol = (input.sodium_target_mmol_per_kg + input.potassium_target_mmol_per_kg) * weight;

    let amino_acid_volume_ml = amino_acid_g / AMINO_ACID_G_PER_ML;
    let lipid_volume_ml = lipid_g / LIPID_G_PER_ML;
    let sodium_volume_ml = input.sodium_target_mmol_per_kg * weight / SODIUM_MMOL_PER_ML;
    let potassium_volume_ml = input.potassium_target_mmol_per_kg * weight / POTASSIUM_MMOL_PER_ML;
    let additive_reservation_ml = settings.additive_reservation_ml_per_kg * weight;

    // === Dextrose Split ===
    let requested_glucose_g =
        GPerKgDay::from(MgPerKgMin(input.glucose_infusion_rate_mg_per_kg_min)).value() * weight;
    let remaining_volume_ml = (pn_volume_ml
        - amino_acid_volume_ml
        - lipid_volume_ml
        - sodium_volume_ml
        - potassium_volume_ml
        - additive_reservation_ml)
        .max(0.0);

    let split = split_glucose(requested_glucose_g, remaining_volume_ml);
    let delivered_glucose_g = split.glucose_grams();
    let glucose_concentration_percent = ratio_or_zero(delivered_glucose_g, pn_volume_ml) * 100.0;

    // === Energy ===
    let glucose_kcal = delivered_glucose_g * GLUCOSE_KCAL_PER_G;
    let amino_acid_kcal = amino_acid_g * AMINO_ACID_KCAL_PER_G;
    let lipid_kcal = lipid_g * LIPID_KCAL_PER_G;
    let pn_kcal = glucose_kcal + amino_acid_kcal + lipid_kcal;
    let total_calories_kcal_per_kg = ratio_or_zero(pn_kcal, weight);

    let ratio_denominator = if pn_kcal == 0.0 { 1.0 } else { pn_kcal };
    let calorie_ratios = CalorieRatios {
        carb_percent: percent(glucose_kcal, ratio_denominator),
        protein_percent: percent(amino_acid_kcal, ratio_denominator),
        fat_percent: percent(lipid_kcal, ratio_denominator),
    };

    let nitrogen_g = amino_acid_g / PROTEIN_TO_NITROGEN;
    let non_protein_kcal = glucose_kcal + lipid_kcal;
    let calorie_to_nitrogen_ratio = ratio_or_zero(non_protein_kcal, nitrogen_g);
    let lipid_share_of_non_protein_calories_percent = ratio_or_zero(lipid_kcal, non_protein_kcal) * 100.0;

    // === Osmolarity Estimate ===
    let osmolarity_mosm_per_l = if pn_volume_ml > 0.0 {
        delivered_glucose_g / pn_volume_ml * ML_PER_L * OSMOLAR_FACTOR_GLUCOSE
            + amino_acid_g / pn_volume_ml * ML_PER_L * OSMOLAR_FACTOR_AMINO_ACID
            + electrolyte_mmol * OSMOLAR_FACTOR_ELECTROLYTE / (pn_volume_ml / ML_PER_L)
    } else {
        0.0
    };

    debug!(
        pn_volume_ml,
        remaining_volume_ml,
        glucose_concentration_percent,
        osmolarity_mosm_per_l,
        total_calories_kcal_per_kg,
        "calculated PN prescription"
    );

    PrescriptionResult {
        total_daily_liquid_ml,
        pn_volume_ml,
        flow_rate_ml_per_hour,
        glucose_10_percent_ml: split.glucose_10_percent_ml,
        glucose_50_percent_ml: split.glucose_50_percent_ml,
        glucose_split_adjustment: split.adjustment,
        amino_acid_volume_ml,
        lipid_volume_ml,
        sodium_volume_ml,
        potassium_volume_ml,
        additive_reservation_ml,
        requested_glucose_g,
        delivered_glucose_g,
        glucose_concentration_percent,
        osmolarity_mosm_per_l,
        total_calories_kcal_per_kg,
        calorie_ratios,
        calorie_to_nitrogen_ratio,
        lipid_share_of_non_protein_calories_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::resolve_ranges;

    const TOL: f64 = 1e-9;

    fn day_one_preterm() -> PrescriptionInput {
        PrescriptionInput {
            day_of_life: 1,
            current_weight_kg: 1.2,
            birth_weight_grams: 1200.0,
            total_liquid_target_ml_per_kg: 75.0,
            glucose_infusion_rate_mg_per_kg_min: 6.0,
            amino_acid_target_g_per_kg: 2.0,
            lipid_target_g_per_kg: 1.5,
            sodium_target_mmol_per_kg: 0.0,
            potassium_target_mmol_per_kg: 0.0,
            subtracted_fluid_ml: 0.0,
        }
    }

    #[test]
    fn test_volume_budget() {
        let result = calculate(&day_one_preterm());

        // 75 ml/kg × 1.2 kg = 90 ml, over 24 h = 3.75 ml/h
        assert!((result.total_daily_liquid_ml - 90.0).abs() < TOL);
        assert!((result.pn_volume_ml - 90.0).abs() < TOL);
        assert!((result.flow_rate_ml_per_hour - 3.75).abs() < TOL);

        // 2.0 × 1.2 / 0.06 = 40 ml, 1.5 × 1.2 / 0.20 = 9 ml
        assert!((result.amino_acid_volume_ml - 40.0).abs() < TOL);
        assert!((result.lipid_volume_ml - 9.0).abs() < TOL);
        assert_eq!(result.sodium_volume_ml, 0.0);
        assert_eq!(result.potassium_volume_ml, 0.0);
    }

    #[test]
    fn test_dextrose_split_fills_remaining_volume() {
        let result = calculate(&day_one_preterm());

        // 90 - 40 - 9 = 41 ml left for dextrose
        let dextrose = result.glucose_10_percent_ml + result.glucose_50_percent_ml;
        assert!((dextrose - 41.0).abs() < TOL);

        // G = 6 × 1.2 × 1.44 = 10.368 g, feasible at 41 ml (4.1..20.5 g)
        assert!((result.requested_glucose_g - 10.368).abs() < TOL);
        assert!((result.delivered_glucose_g - 10.368).abs() < TOL);
        // gs50 = (10.368 - 4.1) / 0.4 = 15.67
        assert!((result.glucose_50_percent_ml - 15.67).abs() < TOL);
        assert!((result.glucose_10_percent_ml - 25.33).abs() < TOL);
        assert!(result.glucose_target_met());
    }

    #[test]
    fn test_derived_metrics() {
        let result = calculate(&day_one_preterm());

        // 10.368 / 90 = 11.52%
        assert!((result.glucose_concentration_percent - 11.52).abs() < 1e-6);

        // kcal: glucose 35.2512, AA 9.6, lipid 16.2 → 61.0512 / 1.2
        assert!((result.total_calories_kcal_per_kg - 50.876).abs() < 1e-6);
        assert_eq!(
            result.calorie_ratios,
            CalorieRatios { carb_percent: 58, protein_percent: 16, fat_percent: 27 }
        );

        // nitrogen 2.4 / 6.25 = 0.384 g; NPC 51.4512 kcal
        assert!((result.calorie_to_nitrogen_ratio - 133.987_5).abs() < 1e-6);
        assert!((result.lipid_share_of_non_protein_calories_percent - 31.486_1).abs() < 1e-3);

        // 10.368/90×5000 + 2.4/90×8000 = 576 + 213.33
        assert!((result.osmolarity_mosm_per_l - 789.333_333).abs() < 1e-3);
    }

    #[test]
    fn test_subtraction_exceeding_target_zeroes_pn() {
        let input = PrescriptionInput {
            current_weight_kg: 1.0,
            total_liquid_target_ml_per_kg: 10.0,
            subtracted_fluid_ml: 50.0,
            ..day_one_preterm()
        };
        let result = calculate(&input);

        assert_eq!(result.pn_volume_ml, 0.0);
        assert_eq!(result.flow_rate_ml_per_hour, 0.0);
        assert_eq!(result.glucose_concentration_percent, 0.0);
        assert_eq!(result.osmolarity_mosm_per_l, 0.0);
        assert_eq!(result.glucose_10_percent_ml, 0.0);
        assert_eq!(result.glucose_50_percent_ml, 0.0);
        assert!(result.total_calories_kcal_per_kg.is_finite());
        assert!(result.calorie_to_nitrogen_ratio.is_finite());
        assert!(result.lipid_share_of_non_protein_calories_percent.is_finite());
    }

    #[test]
    fn test_split_feasible_delivers_exact_glucose() {
        for (glucose, volume) in [(4.1, 41.0), (10.0, 41.0), (20.5, 41.0), (3.0, 12.0)] {
            let split = split_glucose(glucose, volume);
            assert!(split.glucose_10_percent_ml >= 0.0);
            assert!(split.glucose_50_percent_ml >= 0.0);
            assert!((split.glucose_10_percent_ml + split.glucose_50_percent_ml - volume).abs() < TOL);
            assert!((split.glucose_grams() - glucose).abs() < TOL);
        }
    }

    #[test]
    fn test_split_infeasible_high_uses_fifty_percent_only() {
        let split = split_glucose(25.0, 41.0);
        assert_eq!(split.glucose_50_percent_ml, 41.0);
        assert_eq!(split.glucose_10_percent_ml, 0.0);
        assert_eq!(split.adjustment, SplitAdjustment::FiftyPercentOnly);
        assert!((split.glucose_grams() - 20.5).abs() < TOL);
    }

    #[test]
    fn test_split_infeasible_low_uses_ten_percent_only() {
        let split = split_glucose(2.0, 41.0);
        assert_eq!(split.glucose_10_percent_ml, 41.0);
        assert_eq!(split.glucose_50_percent_ml, 0.0);
        assert_eq!(split.adjustment, SplitAdjustment::TenPercentOnly);

        let zero = split_glucose(0.0, 30.0);
        assert_eq!(zero.glucose_10_percent_ml, 30.0);
        assert_eq!(zero.glucose_50_percent_ml, 0.0);
    }

    #[test]
    fn test_crowded_bag_reports_best_achievable_glucose() {
        // Solutes take almost the whole bag; GIR 12 cannot fit
        let input = PrescriptionInput {
            glucose_infusion_rate_mg_per_kg_min: 12.0,
            amino_acid_target_g_per_kg: 3.5,
            lipid_target_g_per_kg: 3.5,
            ..day_one_preterm()
        };
        let result = calculate(&input);

        // 90 - 70 - 21 < 0 → nothing left for dextrose
        assert_eq!(result.glucose_10_percent_ml, 0.0);
        assert_eq!(result.glucose_50_percent_ml, 0.0);
        assert_eq!(result.delivered_glucose_g, 0.0);
        assert!(!result.glucose_target_met());
    }

    #[test]
    fn test_additive_reservation_shrinks_dextrose_volume() {
        let settings = CalculatorSettings {
            additive_reservation_ml_per_kg: 2.0,
            ..CalculatorSettings::default()
        };
        let result = calculate_with(&day_one_preterm(), &settings);

        assert!((result.additive_reservation_ml - 2.4).abs() < TOL);
        let dextrose = result.glucose_10_percent_ml + result.glucose_50_percent_ml;
        assert!((dextrose - 38.6).abs() < TOL);
        assert!((result.delivered_glucose_g - 10.368).abs() < TOL);
    }

    #[test]
    fn test_electrolyte_volumes() {
        let input = PrescriptionInput {
            day_of_life: 4,
            sodium_target_mmol_per_kg: 3.4,
            potassium_target_mmol_per_kg: 1.34,
            current_weight_kg: 1.0,
            ..day_one_preterm()
        };
        let result = calculate(&input);
        assert!((result.sodium_volume_ml - 2.0).abs() < TOL);
        assert!((result.potassium_volume_ml - 1.0).abs() < TOL);
    }

    #[test]
    fn test_calorie_ratios_stay_near_one_hundred() {
        let mut input = day_one_preterm();
        for gir in [3.0, 4.5, 6.0, 8.0, 12.0] {
            for lipid in [0.0, 1.0, 2.5, 3.5] {
                input.glucose_infusion_rate_mg_per_kg_min = gir;
                input.lipid_target_g_per_kg = lipid;
                let ratios = calculate(&input).calorie_ratios;
                assert!(ratios.carb_percent >= 0 && ratios.protein_percent >= 0 && ratios.fat_percent >= 0);
                assert!((ratios.total() - 100).abs() <= 2, "sum {} for gir {gir}", ratios.total());
            }
        }
    }

    #[test]
    fn test_no_energy_gives_zero_ratios() {
        let input = PrescriptionInput {
            glucose_infusion_rate_mg_per_kg_min: 0.0,
            amino_acid_target_g_per_kg: 0.0,
            lipid_target_g_per_kg: 0.0,
            total_liquid_target_ml_per_kg: 0.0,
            ..day_one_preterm()
        };
        let result = calculate(&input);
        assert_eq!(result.calorie_ratios, CalorieRatios::default());
        assert_eq!(result.calorie_to_nitrogen_ratio, 0.0);
        assert_eq!(result.lipid_share_of_non_protein_calories_percent, 0.0);
    }

    #[test]
    fn test_zero_weight_does_not_produce_nan() {
        let input = PrescriptionInput {
            current_weight_kg: 0.0,
            ..day_one_preterm()
        };
        let result = calculate(&input);
        assert_eq!(result.pn_volume_ml, 0.0);
        assert_eq!(result.total_calories_kcal_per_kg, 0.0);
        assert_eq!(result.calorie_to_nitrogen_ratio, 0.0);
    }

    #[test]
    fn test_idempotent() {
        let input = day_one_preterm();
        let first = calculate(&input);
        let second = calculate(&input);
        assert_eq!(first, second);
        assert_eq!(first.osmolarity_mosm_per_l.to_bits(), second.osmolarity_mosm_per_l.to_bits());
    }

    #[test]
    fn test_validation() {
        assert!(day_one_preterm().validate().is_ok());

        let mut input = day_one_preterm();
        input.day_of_life = 0;
        assert_eq!(input.validate().unwrap_err().error_code(), "INVALID_INPUT");

        let mut input = day_one_preterm();
        input.current_weight_kg = 1200.0;
        assert!(input.validate().is_err());

        let mut input = day_one_preterm();
        input.subtracted_fluid_ml = -5.0;
        match input.validate() {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "subtracted_fluid_ml"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        let mut input = day_one_preterm();
        input.lipid_target_g_per_kg = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_calculate_checked() {
        let settings = CalculatorSettings::default();
        assert!(calculate_checked(&day_one_preterm(), &settings).is_ok());

        let mut input = day_one_preterm();
        input.birth_weight_grams = 0.0;
        assert!(calculate_checked(&input, &settings).is_err());
    }

    #[test]
    fn test_clamped_to_ranges() {
        let input = PrescriptionInput {
            total_liquid_target_ml_per_kg: 150.0,
            glucose_infusion_rate_mg_per_kg_min: 2.0,
            sodium_target_mmol_per_kg: 3.0,
            potassium_target_mmol_per_kg: 2.0,
            ..day_one_preterm()
        };
        let bounds = resolve_ranges(1, 1200.0, false);
        let clamped = input.clamped_to(&bounds);

        assert_eq!(clamped.total_liquid_target_ml_per_kg, 90.0);
        assert_eq!(clamped.glucose_infusion_rate_mg_per_kg_min, 4.0);
        assert_eq!(clamped.amino_acid_target_g_per_kg, 2.0);
        assert_eq!(clamped.sodium_target_mmol_per_kg, 0.0);
        assert_eq!(clamped.potassium_target_mmol_per_kg, 0.0);
        assert_eq!(clamped.current_weight_kg, input.current_weight_kg);
    }

    #[test]
    fn test_serialization() {
        let input = day_one_preterm();
        let json = serde_json::to_string_pretty(&input).unwrap();
        let roundtrip: PrescriptionInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);

        let result = calculate(&input);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"glucose_split_adjustment\":\"none\""));
    }

    #[test]
    fn test_subtraction_defaults_to_zero_in_json() {
        let json = r#"{
            "day_of_life": 2,
            "current_weight_kg": 1.0,
            "birth_weight_grams": 1000.0,
            "total_liquid_target_ml_per_kg": 80.0,
            "glucose_infusion_rate_mg_per_kg_min": 5.0,
            "amino_acid_target_g_per_kg": 2.0,
            "lipid_target_g_per_kg": 1.0,
            "sodium_target_mmol_per_kg": 0.0,
            "potassium_target_mmol_per_kg": 0.0
        }"#;
        let input: PrescriptionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.subtracted_fluid_ml, 0.0);
    }
}
