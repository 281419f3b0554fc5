//! # Consensus Range Resolver
//!
//! Looks up the recommended interval for every adjustable PN parameter from
//! day of life, birth weight and term/preterm classification. Values follow
//! the 2025 neonatal PN expert consensus (liquid ladder, GIR, electrolytes).
//!
//! The resolver is total: days and weights outside the tables fall into the
//! nearest or last bucket. Day of life 0 is not meaningful and is rejected by
//! [`PrescriptionInput::validate`](crate::calculations::PrescriptionInput::validate)
//! before a calculation runs.
//!
//! ## Example
//!
//! ```rust
//! use pn_core::ranges::{resolve_ranges, Interval};
//!
//! let bounds = resolve_ranges(1, 900.0, false);
//! assert_eq!(bounds.total_liquid, Interval::new(60.0, 100.0));
//! assert_eq!(bounds.sodium, Interval::ZERO);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{RECOVERY_LAST_DAY, TERM_BIRTH_WEIGHT_G, TRANSITION_LAST_DAY};

// ============================================================================
// Interval
// ============================================================================

/// Closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// The `[0, 0]` interval used while supplementation is deferred
    pub const ZERO: Interval = Interval { min: 0.0, max: 0.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Interval { min, max }
    }

    /// True when `value` lies within the closed interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp `value` into the interval
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// True for the `[0, 0]` interval
    pub fn is_zero(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }

    /// Interval width
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Adjustable prescription parameter that carries a consensus range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    TotalLiquid,
    GlucoseInfusionRate,
    AminoAcid,
    Lipid,
    Sodium,
    Potassium,
}

impl Parameter {
    /// All parameters in display order
    pub const ALL: [Parameter; 6] = [
        Parameter::TotalLiquid,
        Parameter::GlucoseInfusionRate,
        Parameter::AminoAcid,
        Parameter::Lipid,
        Parameter::Sodium,
        Parameter::Potassium,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Parameter::TotalLiquid => "Total liquid",
            Parameter::GlucoseInfusionRate => "GIR",
            Parameter::AminoAcid => "Amino acid",
            Parameter::Lipid => "Lipid",
            Parameter::Sodium => "Sodium",
            Parameter::Potassium => "Potassium",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::TotalLiquid => "ml/kg/d",
            Parameter::GlucoseInfusionRate => "mg/kg/min",
            Parameter::AminoAcid | Parameter::Lipid => "g/kg/d",
            Parameter::Sodium | Parameter::Potassium => "mmol/kg/d",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Consensus intervals for every adjustable parameter.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_liquid": { "min": 60.0, "max": 90.0 },
///   "glucose_infusion_rate": { "min": 4.0, "max": 12.0 },
///   "amino_acid": { "min": 1.5, "max": 3.5 },
///   "lipid": { "min": 1.0, "max": 3.5 },
///   "sodium": { "min": 0.0, "max": 0.0 },
///   "potassium": { "min": 0.0, "max": 0.0 }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    /// Total liquid (ml/kg/day)
    pub total_liquid: Interval,
    /// Glucose infusion rate (mg/kg/min)
    pub glucose_infusion_rate: Interval,
    /// Amino acid (g/kg/day)
    pub amino_acid: Interval,
    /// Lipid (g/kg/day)
    pub lipid: Interval,
    /// Sodium (mmol/kg/day)
    pub sodium: Interval,
    /// Potassium (mmol/kg/day)
    pub potassium: Interval,
}

impl RangeBounds {
    /// Interval for a single parameter
    pub fn get(&self, parameter: Parameter) -> Interval {
        match parameter {
            Parameter::TotalLiquid => self.total_liquid,
            Parameter::GlucoseInfusionRate => self.glucose_infusion_rate,
            Parameter::AminoAcid => self.amino_acid,
            Parameter::Lipid => self.lipid,
            Parameter::Sodium => self.sodium,
            Parameter::Potassium => self.potassium,
        }
    }

    /// Iterate `(parameter, interval)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Parameter, Interval)> + '_ {
        Parameter::ALL.iter().map(move |p| (*p, self.get(*p)))
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Term classification by birth weight (≥ 2500 g).
pub fn is_term(birth_weight_grams: f64) -> bool {
    birth_weight_grams >= TERM_BIRTH_WEIGHT_G
}

/// Birth category selecting the liquid ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfantClass {
    Term,
    /// Preterm, birth weight below 1000 g
    PretermUnder1000,
    /// Preterm, birth weight 1000-1499 g
    Preterm1000To1499,
    /// Preterm, birth weight 1500 g or more
    Preterm1500Plus,
}

impl InfantClass {
    pub fn classify(birth_weight_grams: f64, is_term: bool) -> Self {
        if is_term {
            InfantClass::Term
        } else if birth_weight_grams < 1000.0 {
            InfantClass::PretermUnder1000
        } else if birth_weight_grams < 1500.0 {
            InfantClass::Preterm1000To1499
        } else {
            InfantClass::Preterm1500Plus
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InfantClass::Term => "Term",
            InfantClass::PretermUnder1000 => "Preterm <1000 g",
            InfantClass::Preterm1000To1499 => "Preterm 1000-1499 g",
            InfantClass::Preterm1500Plus => "Preterm >=1500 g",
        }
    }

    /// Liquid ladder for days 1, 2, 3, 4-5, 6+ (ml/kg/day)
    fn liquid_ladder(&self) -> &'static [Interval; 5] {
        match self {
            InfantClass::Term => &TERM_LIQUID,
            InfantClass::PretermUnder1000 => &PRETERM_UNDER_1000_LIQUID,
            InfantClass::Preterm1000To1499 => &PRETERM_1000_TO_1499_LIQUID,
            InfantClass::Preterm1500Plus => &PRETERM_1500_PLUS_LIQUID,
        }
    }
}

/// Clinical phase driving electrolyte supplementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClinicalPhase {
    /// Days 1-2: diuresis not yet established, Na/K deferred
    Transition,
    /// Days 3-14
    Recovery,
    /// After day 14
    StableGrowth,
}

impl ClinicalPhase {
    pub fn from_day_of_life(day_of_life: u32) -> Self {
        if day_of_life <= TRANSITION_LAST_DAY {
            ClinicalPhase::Transition
        } else if day_of_life <= RECOVERY_LAST_DAY {
            ClinicalPhase::Recovery
        } else {
            ClinicalPhase::StableGrowth
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ClinicalPhase::Transition => "Transition",
            ClinicalPhase::Recovery => "Recovery",
            ClinicalPhase::StableGrowth => "Stable growth",
        }
    }
}

// ============================================================================
// Tables
// ============================================================================

const TERM_LIQUID: [Interval; 5] = [
    Interval::new(40.0, 60.0),
    Interval::new(50.0, 70.0),
    Interval::new(60.0, 80.0),
    Interval::new(60.0, 100.0),
    Interval::new(140.0, 170.0),
];

const PRETERM_UNDER_1000_LIQUID: [Interval; 5] = [
    Interval::new(60.0, 100.0),
    Interval::new(80.0, 120.0),
    Interval::new(100.0, 140.0),
    Interval::new(120.0, 160.0),
    Interval::new(140.0, 160.0),
];

const PRETERM_1000_TO_1499_LIQUID: [Interval; 5] = [
    Interval::new(60.0, 90.0),
    Interval::new(80.0, 110.0),
    Interval::new(100.0, 130.0),
    Interval::new(120.0, 150.0),
    Interval::new(140.0, 160.0),
];

const PRETERM_1500_PLUS_LIQUID: [Interval; 5] = [
    Interval::new(60.0, 80.0),
    Interval::new(80.0, 100.0),
    Interval::new(100.0, 120.0),
    Interval::new(120.0, 140.0),
    Interval::new(140.0, 160.0),
];

const GIR_PRETERM: Interval = Interval::new(4.0, 12.0);
const GIR_TERM: Interval = Interval::new(3.0, 10.0);

const AMINO_ACID_SPAN: Interval = Interval::new(1.5, 3.5);
const LIPID_SPAN: Interval = Interval::new(1.0, 3.5);

const SODIUM_STANDARD: Interval = Interval::new(2.0, 3.0);
const SODIUM_LOW_BW_STABLE: Interval = Interval::new(2.0, 4.0);
const POTASSIUM_RECOVERY: Interval = Interval::new(1.0, 2.0);
const POTASSIUM_STABLE: Interval = Interval::new(2.0, 3.0);

/// Starting dose, daily increment and ceiling of a ramped macronutrient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseLadder {
    pub start: Interval,
    pub increment: Interval,
    pub max: f64,
}

impl DoseLadder {
    /// Interval on a given day: both bounds climb by the increment each day
    /// after day 1 and are capped at `max`.
    pub fn on_day(&self, day_of_life: u32) -> Interval {
        let days = day_of_life.saturating_sub(1) as f64;
        Interval::new(
            (self.start.min + self.increment.min * days).min(self.max),
            (self.start.max + self.increment.max * days).min(self.max),
        )
    }
}

pub const AMINO_ACID_LADDER: DoseLadder = DoseLadder {
    start: Interval::new(1.5, 2.5),
    increment: Interval::new(1.0, 1.5),
    max: 3.5,
};

pub const LIPID_LADDER: DoseLadder = DoseLadder {
    start: Interval::new(1.0, 2.0),
    increment: Interval::new(0.5, 1.0),
    max: 3.5,
};

/// How amino acid and lipid intervals are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Full allowable span from starting dose to maximum, independent of day
    #[default]
    Fixed,
    /// Interval climbs with day of life up to the ceiling
    DayOfLifeRamp,
}

// ============================================================================
// Resolver
// ============================================================================

fn liquid_bucket(day_of_life: u32) -> usize {
    match day_of_life {
        1 => 0,
        2 => 1,
        3 => 2,
        0 | 4 | 5 => 3,
        _ => 4,
    }
}

/// Resolve consensus ranges with the default (fixed) amino acid/lipid policy.
///
/// # Example
///
/// ```rust
/// use pn_core::ranges::{resolve_ranges, Interval};
///
/// let term_day_7 = resolve_ranges(7, 3200.0, true);
/// assert_eq!(term_day_7.total_liquid, Interval::new(140.0, 170.0));
/// assert_eq!(term_day_7.glucose_infusion_rate, Interval::new(3.0, 10.0));
/// ```
pub fn resolve_ranges(day_of_life: u32, birth_weight_grams: f64, is_term: bool) -> RangeBounds {
    resolve_ranges_with(day_of_life, birth_weight_grams, is_term, RangePolicy::Fixed)
}

/// Resolve consensus ranges under an explicit amino acid/lipid policy.
pub fn resolve_ranges_with(
    day_of_life: u32,
    birth_weight_grams: f64,
    is_term: bool,
    policy: RangePolicy,
) -> RangeBounds {
    let class = InfantClass::classify(birth_weight_grams, is_term);
    let phase = ClinicalPhase::from_day_of_life(day_of_life);

    let total_liquid = class.liquid_ladder()[liquid_bucket(day_of_life)];

    let glucose_infusion_rate = if is_term { GIR_TERM } else { GIR_PRETERM };

    let (amino_acid, lipid) = match policy {
        RangePolicy::Fixed => (AMINO_ACID_SPAN, LIPID_SPAN),
        RangePolicy::DayOfLifeRamp => (
            AMINO_ACID_LADDER.on_day(day_of_life),
            LIPID_LADDER.on_day(day_of_life),
        ),
    };

    let sodium = match phase {
        ClinicalPhase::Transition => Interval::ZERO,
        ClinicalPhase::StableGrowth if !is_term && birth_weight_grams < 1500.0 => {
            SODIUM_LOW_BW_STABLE
        }
        _ => SODIUM_STANDARD,
    };

    let potassium = match phase {
        ClinicalPhase::Transition => Interval::ZERO,
        ClinicalPhase::Recovery => POTASSIUM_RECOVERY,
        ClinicalPhase::StableGrowth => POTASSIUM_STABLE,
    };

    debug!(
        day_of_life,
        birth_weight_grams,
        is_term,
        ?class,
        ?phase,
        ?policy,
        "resolved consensus ranges"
    );

    RangeBounds {
        total_liquid,
        glucose_infusion_rate,
        amino_acid,
        lipid,
        sodium,
        potassium,
    }
}

// ============================================================================
// Minerals (reference only)
// ============================================================================

/// Calcium, phosphorus and magnesium reference ranges (mmol/kg/day).
///
/// Not consumed by the calculator; reported alongside the prescription.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MineralRanges {
    pub calcium: Interval,
    pub phosphorus: Interval,
    pub magnesium: Interval,
}

pub fn mineral_ranges(is_term: bool) -> MineralRanges {
    if is_term {
        MineralRanges {
            calcium: Interval::new(1.0, 1.5),
            phosphorus: Interval::new(0.8, 1.2),
            magnesium: Interval::new(0.2, 0.3),
        }
    } else {
        MineralRanges {
            calcium: Interval::new(1.5, 2.0),
            phosphorus: Interval::new(1.3, 1.7),
            magnesium: Interval::new(0.2, 0.3),
        }
    }
}
