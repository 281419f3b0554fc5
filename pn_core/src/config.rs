//! # Calculator Settings
//!
//! Policy knobs that differ between units and guideline versions. Every key
//! is optional; a missing key takes its default.
//!
//! ## TOML Example
//!
//! ```toml
//! additive_reservation_ml_per_kg = 1.0
//! range_policy = "day_of_life_ramp"
//!
//! [thresholds]
//! max_peripheral_osmolarity_mosm_per_l = 900.0
//! max_peripheral_glucose_percent = 12.5
//! calorie_to_nitrogen = { min = 125.0, max = 187.5 }
//! lipid_share_percent = { min = 25.0, max = 40.0 }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pn_core::config::CalculatorSettings;
//! use pn_core::ranges::RangePolicy;
//!
//! let settings = CalculatorSettings::from_toml_str("range_policy = \"day_of_life_ramp\"").unwrap();
//! assert_eq!(settings.range_policy, RangePolicy::DayOfLifeRamp);
//! assert_eq!(settings.additive_reservation_ml_per_kg, 0.0);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::ranges::RangePolicy;
use crate::safety::SafetyThresholds;

/// Settings shared by every calculation in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Volume held back per kg for trace elements and multivitamins before
    /// the dextrose split (ml/kg). Default 0.
    pub additive_reservation_ml_per_kg: f64,

    /// How amino acid and lipid ranges are resolved
    pub range_policy: RangePolicy,

    /// Safety flag limits
    pub thresholds: SafetyThresholds,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        CalculatorSettings {
            additive_reservation_ml_per_kg: 0.0,
            range_policy: RangePolicy::Fixed,
            thresholds: SafetyThresholds::default(),
        }
    }
}

impl CalculatorSettings {
    /// Parse settings from TOML text and validate them
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let settings: CalculatorSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let settings = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), ?settings, "loaded calculator settings");
        Ok(settings)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::serialization(e.to_string()))
    }

    pub fn validate(&self) -> CalcResult<()> {
        let reservation = self.additive_reservation_ml_per_kg;
        if !reservation.is_finite() || reservation < 0.0 {
            return Err(CalcError::config(
                "additive_reservation_ml_per_kg",
                format!("{} is not a non-negative volume", reservation),
            ));
        }
        self.thresholds.validate()
    }
}
