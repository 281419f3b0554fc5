//! # PN Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> *Result` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`prescription`] - PN solution volumes, osmolarity and energy metrics
//! - [`enteral`] - Milk feeds, other infusions and combined EN + PN energy

pub mod enteral;
pub mod prescription;

// Re-export commonly used types
pub use enteral::{combined_calories_kcal_per_kg, total_subtracted_fluid_ml, EnteralFeed, FluidSubtraction, MilkType};
pub use prescription::{
    calculate, calculate_checked, calculate_with, split_glucose, CalorieRatios, GlucoseSplit, PrescriptionInput,
    PrescriptionResult, SplitAdjustment,
};
