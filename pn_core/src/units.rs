//! # Unit Types
//!
//! Type-safe wrappers for the clinical units used by the calculator. These
//! provide compile-time safety against unit confusion while remaining
//! lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Neonatal PN uses a small, consistent set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Units
//!
//! - Mass: grams (g) for birth weight, kilograms (kg) for dosing weight
//! - Volume rate: ml per day (prescription total), ml per hour (pump rate)
//! - Glucose delivery: mg/kg/min (GIR) and g/kg/day
//!
//! ## Example
//!
//! ```rust
//! use pn_core::units::{Grams, Kilograms, MgPerKgMin, GPerKgDay};
//!
//! let birth_weight = Grams(1200.0);
//! let kg: Kilograms = birth_weight.into();
//! assert_eq!(kg.0, 1.2);
//!
//! let daily: GPerKgDay = MgPerKgMin(5.0).into();
//! assert!((daily.0 - 7.2).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

use crate::constants::{HOURS_PER_DAY, MG_PER_KG_MIN_TO_G_PER_KG_DAY};

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in grams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub f64);

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

impl From<Grams> for Kilograms {
    fn from(g: Grams) -> Self {
        Kilograms(g.0 / 1000.0)
    }
}

impl From<Kilograms> for Grams {
    fn from(kg: Kilograms) -> Self {
        Grams(kg.0 * 1000.0)
    }
}

// ============================================================================
// Volume Rate Units
// ============================================================================

/// Volume per day in milliliters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MlPerDay(pub f64);

/// Pump rate in milliliters per hour
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MlPerHour(pub f64);

impl From<MlPerDay> for MlPerHour {
    fn from(daily: MlPerDay) -> Self {
        MlPerHour(daily.0 / HOURS_PER_DAY)
    }
}

impl From<MlPerHour> for MlPerDay {
    fn from(hourly: MlPerHour) -> Self {
        MlPerDay(hourly.0 * HOURS_PER_DAY)
    }
}

// ============================================================================
// Glucose Delivery Units
// ============================================================================

/// Glucose infusion rate in mg per kg per minute (GIR)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MgPerKgMin(pub f64);

/// Glucose delivery in grams per kg per day
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GPerKgDay(pub f64);

// mg/kg/min × 1440 min/day ÷ 1000 mg/g
impl From<MgPerKgMin> for GPerKgDay {
    fn from(gir: MgPerKgMin) -> Self {
        GPerKgDay(gir.0 * MG_PER_KG_MIN_TO_G_PER_KG_DAY)
    }
}

impl From<GPerKgDay> for MgPerKgMin {
    fn from(daily: GPerKgDay) -> Self {
        MgPerKgMin(daily.0 / MG_PER_KG_MIN_TO_G_PER_KG_DAY)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Grams);
impl_arithmetic!(Kilograms);
impl_arithmetic!(MlPerDay);
impl_arithmetic!(MlPerHour);
impl_arithmetic!(MgPerKgMin);
impl_arithmetic!(GPerKgDay);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grams_to_kilograms() {
        let g = Grams(2500.0);
        let kg: Kilograms = g.into();
        assert_eq!(kg.0, 2.5);
    }

    #[test]
    fn test_daily_volume_to_pump_rate() {
        let rate: MlPerHour = MlPerDay(90.0).into();
        assert_eq!(rate.0, 3.75);

        let back: MlPerDay = rate.into();
        assert_eq!(back.0, 90.0);
    }

    #[test]
    fn test_gir_to_daily_glucose() {
        // 6 mg/kg/min = 8.64 g/kg/day
        let daily: GPerKgDay = MgPerKgMin(6.0).into();
        assert!((daily.0 - 8.64).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Kilograms(1.5);
        let b = Kilograms(0.5);
        assert_eq!((a + b).0, 2.0);
        assert_eq!((a - b).0, 1.0);
        assert_eq!((a * 2.0).0, 3.0);
        assert_eq!((a / 3.0).0, 0.5);
    }

    #[test]
    fn test_serialization() {
        let rate = MlPerHour(3.75);
        let json = serde_json::to_string(&rate).unwrap();
        assert_eq!(json, "3.75");

        let roundtrip: MlPerHour = serde_json::from_str(&json).unwrap();
        assert_eq!(rate, roundtrip);
    }
}
