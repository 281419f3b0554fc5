//! # Formula Registry
//!
//! Every formula the prescription calculator applies, with its variables,
//! source and the function that implements it. The registry feeds the
//! generated `FORMULAS.md` so pharmacists can audit the arithmetic without
//! reading Rust.
//!
//! ## Usage
//!
//! ```rust
//! use pn_core::formulas::{Formula, FormulaCategory};
//!
//! let meta = Formula::GlucoseSplit.metadata();
//! assert_eq!(meta.category, FormulaCategory::Dextrose);
//! println!("Formula: {}", meta.formula_plain);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Source References
// ============================================================================

/// Where a formula or constant comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceReference {
    /// Neonatal PN expert consensus
    Consensus { year: u16, topic: &'static str },
    /// Strength printed on the stock solution label
    SolutionLabel { product: &'static str },
    /// Unit conversion or plain arithmetic
    Arithmetic,
}

impl SourceReference {
    pub fn citation(&self) -> String {
        match self {
            SourceReference::Consensus { year, topic } => {
                format!("Neonatal PN consensus {}, {}", year, topic)
            }
            SourceReference::SolutionLabel { product } => format!("Solution label: {}", product),
            SourceReference::Arithmetic => "Unit conversion".to_string(),
        }
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Groups formulas in the order the calculator applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaCategory {
    VolumeBudget,
    SoluteVolumes,
    Dextrose,
    Energy,
    Balance,
    Osmolarity,
}

impl FormulaCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            FormulaCategory::VolumeBudget => "Volume Budget",
            FormulaCategory::SoluteVolumes => "Solute Volumes",
            FormulaCategory::Dextrose => "Dextrose",
            FormulaCategory::Energy => "Energy",
            FormulaCategory::Balance => "Energy Balance",
            FormulaCategory::Osmolarity => "Osmolarity",
        }
    }

    /// Sort order (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            FormulaCategory::VolumeBudget => 1,
            FormulaCategory::SoluteVolumes => 2,
            FormulaCategory::Dextrose => 3,
            FormulaCategory::Energy => 4,
            FormulaCategory::Balance => 5,
            FormulaCategory::Osmolarity => 6,
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

#[derive(Debug, Clone)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: &'static str,
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

/// Everything needed to document one formula.
#[derive(Debug, Clone)]
pub struct FormulaMetadata {
    pub name: &'static str,
    pub description: &'static str,
    /// Plain-text formula for markdown
    pub formula_plain: &'static str,
    pub reference: SourceReference,
    pub variables: Vec<Variable>,
    /// Guards and clamps applied around the formula
    pub notes: Vec<&'static str>,
    pub category: FormulaCategory,
    /// Module implementing the formula, relative to `pn_core/src`
    pub source_module: &'static str,
    pub source_function: &'static str,
}

// ============================================================================
// Formula Enum
// ============================================================================

/// Every formula used by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formula {
    TotalDailyLiquid,
    PnVolume,
    FlowRate,
    AminoAcidVolume,
    LipidVolume,
    SodiumVolume,
    PotassiumVolume,
    AdditiveReservation,
    GlucoseMass,
    RemainingVolume,
    GlucoseSplit,
    DeliveredGlucose,
    GlucoseConcentration,
    PnCalories,
    CalorieRatios,
    CombinedCalories,
    CalorieToNitrogen,
    LipidShare,
    Osmolarity,
}

const PRESCRIPTION: &str = "calculations/prescription.rs";

impl Formula {
    pub fn metadata(&self) -> FormulaMetadata {
        match self {
            Formula::TotalDailyLiquid => FormulaMetadata {
                name: "Total Daily Liquid",
                description: "Daily liquid allowance before subtracting feeds and infusions",
                formula_plain: "V_total = liquid * w",
                reference: SourceReference::Arithmetic,
                variables: vec![
                    Variable::new("liquid", "Total liquid target", "ml/kg/day"),
                    Variable::new("w", "Current weight", "kg"),
                ],
                notes: vec![],
                category: FormulaCategory::VolumeBudget,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::PnVolume => FormulaMetadata {
                name: "PN Volume",
                description: "Volume left for the PN bag after enteral feeds and other infusions",
                formula_plain: "V_pn = max(0, V_total - V_sub)",
                reference: SourceReference::Arithmetic,
                variables: vec![
                    Variable::new("V_total", "Total daily liquid", "ml"),
                    Variable::new("V_sub", "Subtracted fluid", "ml"),
                ],
                notes: vec!["Clamped at 0 when subtractions exceed the allowance"],
                category: FormulaCategory::VolumeBudget,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::FlowRate => FormulaMetadata {
                name: "Flow Rate",
                description: "Pump rate for continuous infusion over 24 hours",
                formula_plain: "Q = V_pn / 24",
                reference: SourceReference::Arithmetic,
                variables: vec![
                    Variable::new("Q", "Flow rate", "ml/h"),
                    Variable::new("V_pn", "PN volume", "ml/day"),
                ],
                notes: vec![],
                category: FormulaCategory::VolumeBudget,
                source_module: "units.rs",
                source_function: "MlPerHour::from",
            },

            Formula::AminoAcidVolume => FormulaMetadata {
                name: "Amino Acid Volume",
                description: "Volume of 6% amino acid solution",
                formula_plain: "V_aa = aa * w / 0.06",
                reference: SourceReference::SolutionLabel { product: "6% amino acid, 0.06 g/ml" },
                variables: vec![
                    Variable::new("aa", "Amino acid target", "g/kg/day"),
                    Variable::new("w", "Current weight", "kg"),
                ],
                notes: vec![],
                category: FormulaCategory::SoluteVolumes,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::LipidVolume => FormulaMetadata {
                name: "Lipid Volume",
                description: "Volume of 20% lipid emulsion",
                formula_plain: "V_lipid = lipid * w / 0.20",
                reference: SourceReference::SolutionLabel { product: "20% lipid emulsion, 0.20 g/ml" },
                variables: vec![
                    Variable::new("lipid", "Lipid target", "g/kg/day"),
                    Variable::new("w", "Current weight", "kg"),
                ],
                notes: vec![],
                category: FormulaCategory::SoluteVolumes,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::SodiumVolume => FormulaMetadata {
                name: "Sodium Volume",
                description: "Volume of 10% sodium chloride",
                formula_plain: "V_na = na * w / 1.7",
                reference: SourceReference::SolutionLabel { product: "10% NaCl, 1.7 mmol/ml" },
                variables: vec![
                    Variable::new("na", "Sodium target", "mmol/kg/day"),
                    Variable::new("w", "Current weight", "kg"),
                ],
                notes: vec![],
                category: FormulaCategory::SoluteVolumes,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::PotassiumVolume => FormulaMetadata {
                name: "Potassium Volume",
                description: "Volume of 10% potassium chloride",
                formula_plain: "V_k = k * w / 1.34",
                reference: SourceReference::SolutionLabel { product: "10% KCl, 1.34 mmol/ml" },
                variables: vec![
                    Variable::new("k", "Potassium target", "mmol/kg/day"),
                    Variable::new("w", "Current weight", "kg"),
                ],
                notes: vec![],
                category: FormulaCategory::SoluteVolumes,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::AdditiveReservation => FormulaMetadata {
                name: "Additive Reservation",
                description: "Volume held back for trace elements and vitamins",
                formula_plain: "V_add = r * w",
                reference: SourceReference::Arithmetic,
                variables: vec![
                    Variable::new("r", "additive_reservation_ml_per_kg setting", "ml/kg"),
                    Variable::new("w", "Current weight", "kg"),
                ],
                notes: vec!["r defaults to 0"],
                category: FormulaCategory::SoluteVolumes,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::GlucoseMass => FormulaMetadata {
                name: "Glucose Mass",
                description: "Daily glucose requested by the GIR target",
                formula_plain: "G = gir * w * 1.44",
                reference: SourceReference::Arithmetic,
                variables: vec![
                    Variable::new("gir", "Glucose infusion rate", "mg/kg/min"),
                    Variable::new("w", "Current weight", "kg"),
                    Variable::new("G", "Requested glucose", "g/day"),
                ],
                notes: vec!["1.44 = 1440 min/day / 1000 mg/g"],
                category: FormulaCategory::Dextrose,
                source_module: "units.rs",
                source_function: "GPerKgDay::from",
            },

            Formula::RemainingVolume => FormulaMetadata {
                name: "Remaining Volume",
                description: "PN volume left for dextrose after the other solutions",
                formula_plain: "R = max(0, V_pn - V_aa - V_lipid - V_na - V_k - V_add)",
                reference: SourceReference::Arithmetic,
                variables: vec![Variable::new("R", "Volume available for dextrose", "ml")],
                notes: vec!["Clamped at 0"],
                category: FormulaCategory::Dextrose,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::GlucoseSplit => FormulaMetadata {
                name: "Dextrose Split",
                description: "Mix of 10% and 50% dextrose delivering G grams in R ml",
                formula_plain: "V_50 = (G - 0.10 * R) / 0.40, V_10 = R - V_50",
                reference: SourceReference::SolutionLabel { product: "10% and 50% dextrose" },
                variables: vec![
                    Variable::new("G", "Requested glucose", "g"),
                    Variable::new("R", "Volume available for dextrose", "ml"),
                    Variable::new("V_10", "10% dextrose volume", "ml"),
                    Variable::new("V_50", "50% dextrose volume", "ml"),
                ],
                notes: vec![
                    "V_50 < 0: V_50 = 0, V_10 = R",
                    "V_10 < 0: V_10 = 0, V_50 = R",
                ],
                category: FormulaCategory::Dextrose,
                source_module: PRESCRIPTION,
                source_function: "split_glucose",
            },

            Formula::DeliveredGlucose => FormulaMetadata {
                name: "Delivered Glucose",
                description: "Glucose actually delivered after any split clamping",
                formula_plain: "G_act = 0.10 * V_10 + 0.50 * V_50",
                reference: SourceReference::Arithmetic,
                variables: vec![Variable::new("G_act", "Delivered glucose", "g")],
                notes: vec![],
                category: FormulaCategory::Dextrose,
                source_module: PRESCRIPTION,
                source_function: "GlucoseSplit::glucose_grams",
            },

            Formula::GlucoseConcentration => FormulaMetadata {
                name: "Dextrose Concentration",
                description: "Final dextrose concentration of the PN bag",
                formula_plain: "C_glu = G_act / V_pn * 100",
                reference: SourceReference::Arithmetic,
                variables: vec![Variable::new("C_glu", "Dextrose concentration", "%")],
                notes: vec!["0 when V_pn is 0", "Above 12.5% requires central access"],
                category: FormulaCategory::Dextrose,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::PnCalories => FormulaMetadata {
                name: "PN Energy",
                description: "Energy from glucose, amino acid and lipid per kg",
                formula_plain: "E = (3.4 * G_act + 4 * aa * w + 9 * lipid * w) / w",
                reference: SourceReference::Consensus { year: 2025, topic: "energy" },
                variables: vec![Variable::new("E", "PN energy", "kcal/kg/day")],
                notes: vec!["0 when w is 0"],
                category: FormulaCategory::Energy,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::CalorieRatios => FormulaMetadata {
                name: "Energy Split",
                description: "Share of PN energy from carbohydrate, protein and fat",
                formula_plain: "p_i = round(kcal_i / kcal_total * 100)",
                reference: SourceReference::Arithmetic,
                variables: vec![Variable::new("p_i", "Component share", "%")],
                notes: vec![
                    "Each share rounded independently, the sum may differ from 100",
                    "Denominator 1 when there are no calories",
                ],
                category: FormulaCategory::Energy,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::CombinedCalories => FormulaMetadata {
                name: "EN + PN Energy",
                description: "PN energy plus milk energy per kg",
                formula_plain: "E_total = (E * w + V_milk * kcal_ml) / w",
                reference: SourceReference::SolutionLabel { product: "milk 0.67, preterm formula 0.68 or 0.81 kcal/ml" },
                variables: vec![
                    Variable::new("V_milk", "Daily milk volume", "ml"),
                    Variable::new("kcal_ml", "Milk caloric density", "kcal/ml"),
                ],
                notes: vec!["0 when w is 0"],
                category: FormulaCategory::Energy,
                source_module: "calculations/enteral.rs",
                source_function: "combined_calories_kcal_per_kg",
            },

            Formula::CalorieToNitrogen => FormulaMetadata {
                name: "Non-Protein Calorie to Nitrogen Ratio",
                description: "Non-protein energy per gram of nitrogen",
                formula_plain: "NPC:N = (3.4 * G_act + 9 * lipid * w) / (aa * w / 6.25)",
                reference: SourceReference::Consensus { year: 2025, topic: "protein-energy balance" },
                variables: vec![Variable::new("NPC:N", "Calorie to nitrogen ratio", "kcal/g N")],
                notes: vec!["0 when no amino acid is given", "Target 125 - 187.5"],
                category: FormulaCategory::Balance,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::LipidShare => FormulaMetadata {
                name: "Lipid Share of Non-Protein Energy",
                description: "Fraction of non-protein energy supplied by lipid",
                formula_plain: "L% = 9 * lipid * w / (3.4 * G_act + 9 * lipid * w) * 100",
                reference: SourceReference::Consensus { year: 2025, topic: "lipid" },
                variables: vec![Variable::new("L%", "Lipid share", "%")],
                notes: vec!["0 when there is no non-protein energy", "Target 25 - 40%"],
                category: FormulaCategory::Balance,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },

            Formula::Osmolarity => FormulaMetadata {
                name: "Osmolarity Estimate",
                description: "Bedside estimate of PN osmolarity",
                formula_plain: "Osm = G_act / V_pn * 1000 * 5 + aa * w / V_pn * 1000 * 8 + (na + k) * w * 2 / (V_pn / 1000)",
                reference: SourceReference::Consensus { year: 2025, topic: "venous access" },
                variables: vec![
                    Variable::new("Osm", "Osmolarity", "mOsm/L"),
                    Variable::new("V_pn", "PN volume", "ml"),
                ],
                notes: vec!["0 when V_pn is 0", "Above 900 mOsm/L requires central access"],
                category: FormulaCategory::Osmolarity,
                source_module: PRESCRIPTION,
                source_function: "calculate_with",
            },
        }
    }

    pub fn in_category(category: FormulaCategory) -> Vec<Formula> {
        ALL_FORMULAS
            .iter()
            .filter(|f| f.metadata().category == category)
            .copied()
            .collect()
    }

    /// Categories in sort order
    pub fn all_categories() -> Vec<FormulaCategory> {
        use FormulaCategory::*;
        let mut cats = vec![VolumeBudget, SoluteVolumes, Dextrose, Energy, Balance, Osmolarity];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

pub static ALL_FORMULAS: &[Formula] = &[
    Formula::TotalDailyLiquid,
    Formula::PnVolume,
    Formula::FlowRate,
    Formula::AminoAcidVolume,
    Formula::LipidVolume,
    Formula::SodiumVolume,
    Formula::PotassiumVolume,
    Formula::AdditiveReservation,
    Formula::GlucoseMass,
    Formula::RemainingVolume,
    Formula::GlucoseSplit,
    Formula::DeliveredGlucose,
    Formula::GlucoseConcentration,
    Formula::PnCalories,
    Formula::CalorieRatios,
    Formula::CombinedCalories,
    Formula::CalorieToNitrogen,
    Formula::LipidShare,
    Formula::Osmolarity,
];

// ============================================================================
// Markdown Generation
// ============================================================================

/// Render the registry as `FORMULAS.md`.
///
/// # Example
///
/// ```rust
/// let markdown = pn_core::formulas::generate_formulas_markdown();
/// assert!(markdown.contains("## Dextrose"));
/// ```
pub fn generate_formulas_markdown() -> String {
    let mut output = String::with_capacity(16_000);

    output.push_str(
        r#"# PN Calculator Formulas Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-formulas`

Every formula the prescription calculator applies, in calculation order.
Volumes are per day unless stated otherwise; `w` is current weight in kg.

## Stock Solutions

| Solution | Strength |
|----------|----------|
| 10% dextrose | 0.10 g/ml |
| 50% dextrose | 0.50 g/ml |
| 6% amino acid | 0.06 g/ml |
| 20% lipid | 0.20 g/ml |
| 10% NaCl | 1.7 mmol/ml |
| 10% KCl | 1.34 mmol/ml |

---

"#,
    );

    let categories = Formula::all_categories();

    for category in &categories {
        let formulas = Formula::in_category(*category);
        if formulas.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for formula in formulas {
            let meta = formula.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`](src/{})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.notes.is_empty() {
                output.push_str("**Notes:**\n");
                for note in &meta.notes {
                    output.push_str(&format!("- {}\n", note));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Formulas:** {}\n- **Categories:** {}\n",
        ALL_FORMULAS.len(),
        categories.len()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_formulas_have_metadata() {
        assert_eq!(ALL_FORMULAS.len(), 19);

        for formula in ALL_FORMULAS {
            let meta = formula.metadata();
            assert!(!meta.name.is_empty(), "Formula {:?} has no name", formula);
            assert!(!meta.formula_plain.is_empty(), "Formula {:?} has no formula", formula);
            assert!(!meta.variables.is_empty(), "Formula {:?} has no variables", formula);
            assert!(!meta.source_function.is_empty(), "Formula {:?} has no source", formula);
        }

        let split = Formula::GlucoseSplit.metadata();
        assert!(split.formula_plain.contains("/ 0.40"));
    }

    #[test]
    fn test_every_category_is_used() {
        for category in Formula::all_categories() {
            assert!(!Formula::in_category(category).is_empty(), "{:?} is empty", category);
        }
    }

    #[test]
    fn test_categories_sorted() {
        let cats = Formula::all_categories();
        assert_eq!(cats.first(), Some(&FormulaCategory::VolumeBudget));
        assert_eq!(cats.last(), Some(&FormulaCategory::Osmolarity));
    }

    #[test]
    fn test_citation() {
        let label = SourceReference::SolutionLabel { product: "10% KCl" };
        assert_eq!(label.citation(), "Solution label: 10% KCl");
        assert_eq!(SourceReference::Arithmetic.citation(), "Unit conversion");
    }

    #[test]
    fn test_generate_formulas_markdown() {
        let markdown = generate_formulas_markdown();

        assert!(markdown.contains("# PN Calculator Formulas Reference"), "Missing title");
        assert!(markdown.contains("Auto-generated from source code"), "Missing auto-gen notice");
        assert!(markdown.contains("## Stock Solutions"));
        assert!(markdown.contains("## Volume Budget"));
        assert!(markdown.contains("## Osmolarity"));
        assert!(markdown.contains("### Dextrose Split"));
        assert!(markdown.contains("`Q = V_pn / 24`"));
        assert!(markdown.contains("src/calculations/prescription.rs"));
        assert!(markdown.contains("**Total Formulas:** 19"));
        assert!(markdown.contains("**Categories:** 6"));
    }
}
