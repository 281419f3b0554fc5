use std::path::PathBuf;

use clap::Parser;
use pn_core::calculations::{FluidSubtraction, MilkType};

/// Command line arguments. Patient defaults match a 1.2 kg preterm on day 1.
#[derive(Debug, Parser)]
#[command(name = "pn_cli")]
#[command(about = "Neonatal parenteral-nutrition prescription calculator")]
pub struct Args {
    /// Day of life (1 = day of birth)
    #[arg(long, default_value_t = 1)]
    pub day_of_life: u32,

    /// Birth weight in grams (>= 2500 g is term)
    #[arg(long, default_value_t = 1200.0)]
    pub birth_weight: f64,

    /// Current weight in kg
    #[arg(long, default_value_t = 1.23)]
    pub weight: f64,

    /// Total liquid target (ml/kg/day)
    #[arg(long, default_value_t = 75.0)]
    pub liquid: f64,

    /// Glucose infusion rate (mg/kg/min)
    #[arg(long, default_value_t = 6.0)]
    pub gir: f64,

    /// Amino acid target (g/kg/day)
    #[arg(long, default_value_t = 2.0)]
    pub amino_acid: f64,

    /// Lipid target (g/kg/day)
    #[arg(long, default_value_t = 1.5)]
    pub lipid: f64,

    /// Sodium target (mmol/kg/day)
    #[arg(long, default_value_t = 0.0)]
    pub sodium: f64,

    /// Potassium target (mmol/kg/day)
    #[arg(long, default_value_t = 0.0)]
    pub potassium: f64,

    /// Daily enteral milk volume (ml), subtracted from the PN volume
    #[arg(long, default_value_t = 0.0)]
    pub milk_volume: f64,

    /// Milk type: standard, preterm68 or preterm81
    #[arg(long, default_value = "standard")]
    pub milk_type: MilkType,

    /// Other infusion to subtract, as label=ml (repeatable)
    #[arg(long = "infusion", value_name = "LABEL=ML")]
    pub infusions: Vec<FluidSubtraction>,

    /// Read the prescription input from a JSON file instead of the flags above
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Calculator settings (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Clamp targets into the consensus ranges before calculating
    #[arg(long)]
    pub clamp: bool,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
