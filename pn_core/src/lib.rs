//! # pn_core - Neonatal Parenteral-Nutrition Calculation Engine
//!
//! `pn_core` turns per-kilogram nutrition targets into the solution volumes of
//! a neonatal PN bag and checks them against consensus ranges. All inputs and
//! outputs are JSON-serializable so any front end (CLI, web form, API) can call
//! the same contract.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Total**: `calculate` never fails; validation is a separate entry point
//!
//! ## Quick Start
//!
//! ```rust
//! use pn_core::{calculate, resolve_ranges, PrescriptionInput};
//!
//! let bounds = resolve_ranges(1, 1200.0, false);
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
//! }
//! .clamped_to(&bounds);
//!
//! let result = calculate(&input);
//! assert!((result.pn_volume_ml - 90.0).abs() < 1e-9);
//! assert!((result.flow_rate_ml_per_hour - 3.75).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`ranges`] - Consensus range resolver and infant classification
//! - [`calculations`] - Prescription calculator and enteral feeds
//! - [`safety`] - Access route, energy balance and range deviation flags
//! - [`report`] - Bundled report with JSON and plain-text output
//! - [`config`] - TOML calculator settings
//! - [`formulas`] - Formula registry behind `FORMULAS.md`
//! - [`constants`] - Solution strengths and clinical thresholds
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod constants;
pub mod errors;
pub mod formulas;
pub mod ranges;
pub mod report;
pub mod safety;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, calculate_checked, calculate_with, PrescriptionInput, PrescriptionResult};
pub use config::CalculatorSettings;
pub use errors::{CalcError, CalcResult};
pub use ranges::{resolve_ranges, resolve_ranges_with, Interval, RangeBounds, RangePolicy};
pub use report::PrescriptionReport;
pub use safety::{assess, SafetyAssessment, SafetyThresholds};
