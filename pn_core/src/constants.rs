//! # Clinical Constants
//!
//! Every fixed value the calculator uses lives here so the arithmetic stays
//! auditable and guideline updates touch a single file.
//!
//! Solution strengths match the standard neonatal PN stock: 6% amino acid,
//! 20% lipid emulsion, 10% NaCl, 10% KCl, 10% and 50% dextrose.

// -- Stock solution strengths --

/// 6% amino acid solution (g/ml)
pub const AMINO_ACID_G_PER_ML: f64 = 0.06;

/// 20% lipid emulsion (g/ml)
pub const LIPID_G_PER_ML: f64 = 0.20;

/// 10% NaCl (mmol Na per ml)
pub const SODIUM_MMOL_PER_ML: f64 = 1.7;

/// 10% KCl (mmol K per ml)
pub const POTASSIUM_MMOL_PER_ML: f64 = 1.34;

/// 10% dextrose (g/ml)
pub const GLUCOSE_10_G_PER_ML: f64 = 0.10;

/// 50% dextrose (g/ml)
pub const GLUCOSE_50_G_PER_ML: f64 = 0.50;

// -- Caloric densities (kcal/g) --

/// Dextrose monohydrate
pub const GLUCOSE_KCAL_PER_G: f64 = 3.4;

/// Amino acid
pub const AMINO_ACID_KCAL_PER_G: f64 = 4.0;

/// Lipid
pub const LIPID_KCAL_PER_G: f64 = 9.0;

// -- Enteral milk densities (kcal/ml) --

/// Breast milk / standard formula
pub const MILK_STANDARD_KCAL_PER_ML: f64 = 0.67;

/// Preterm formula, 68 kcal/100 ml
pub const MILK_PRETERM_68_KCAL_PER_ML: f64 = 0.68;

/// Preterm formula, 81 kcal/100 ml
pub const MILK_PRETERM_81_KCAL_PER_ML: f64 = 0.81;

// -- Conversions --

/// mg/kg/min to g/kg/day: 1440 min/day ÷ 1000 mg/g
pub const MG_PER_KG_MIN_TO_G_PER_KG_DAY: f64 = 1.44;

pub const HOURS_PER_DAY: f64 = 24.0;

/// Grams of protein per gram of nitrogen
pub const PROTEIN_TO_NITROGEN: f64 = 6.25;

pub const ML_PER_L: f64 = 1000.0;

// -- Empirical osmolar contributions --
//
// Heuristic per-unit factors of the bedside estimate. They are not derived
// from pharmacopeial osmolality and must stay fixed for comparable results.

/// mOsm per g of glucose per liter
pub const OSMOLAR_FACTOR_GLUCOSE: f64 = 5.0;

/// mOsm per g of amino acid per liter
pub const OSMOLAR_FACTOR_AMINO_ACID: f64 = 8.0;

/// mOsm per mmol of Na or K (salt dissociates into two particles)
pub const OSMOLAR_FACTOR_ELECTROLYTE: f64 = 2.0;

// -- Classification --

/// Birth weight at or above which an infant is treated as term (g)
pub const TERM_BIRTH_WEIGHT_G: f64 = 2500.0;

/// Last day of life of the transition phase (no Na/K supplementation)
pub const TRANSITION_LAST_DAY: u32 = 2;

/// Last day of life of the recovery phase; stable growth follows
pub const RECOVERY_LAST_DAY: u32 = 14;

/// Upper bound on dosing weight accepted by input validation (kg)
pub const MAX_NEONATAL_WEIGHT_KG: f64 = 10.0;

// -- Safety thresholds (defaults) --

/// Above this estimate a central line is recommended (mOsm/L)
pub const MAX_PERIPHERAL_OSMOLARITY: f64 = 900.0;

/// Above this dextrose concentration a central line is recommended (%)
pub const MAX_PERIPHERAL_GLUCOSE_PERCENT: f64 = 12.5;

/// Acceptable non-protein calorie to nitrogen ratio
pub const CALORIE_NITROGEN_MIN: f64 = 125.0;
pub const CALORIE_NITROGEN_MAX: f64 = 187.5;

/// Acceptable lipid share of non-protein calories (%)
pub const LIPID_SHARE_MIN_PERCENT: f64 = 25.0;
pub const LIPID_SHARE_MAX_PERCENT: f64 = 40.0;
