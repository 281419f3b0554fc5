//! # PN Calculator CLI
//!
//! Command-line front end for `pn_core`. Builds a prescription input from
//! flags or a JSON file, optionally clamps it into the consensus ranges, and
//! prints the prescription sheet or the JSON report.
//!
//! ```bash
//! pn_cli --day-of-life 3 --weight 1.15 --liquid 110 --gir 7 \
//!        --milk-volume 12 --milk-type preterm81 --infusion dopamine=2.4
//! ```

mod args;
mod logger;

use std::fs;
use std::path::Path;

use clap::Parser;
use pn_core::calculations::{total_subtracted_fluid_ml, EnteralFeed};
use pn_core::safety::range_deviations;
use pn_core::{CalcError, CalcResult, CalculatorSettings, PrescriptionInput, PrescriptionReport};
use tracing::{debug, info};

use crate::args::Args;

fn load_input(path: &Path) -> CalcResult<PrescriptionInput> {
    let text = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}

fn enteral_feed(args: &Args) -> CalcResult<Option<EnteralFeed>> {
    if !args.milk_volume.is_finite() || args.milk_volume < 0.0 {
        return Err(CalcError::invalid_input(
            "milk_volume",
            args.milk_volume.to_string(),
            "Must be a non-negative volume",
        ));
    }
    Ok((args.milk_volume > 0.0).then(|| EnteralFeed::new(args.milk_volume, args.milk_type)))
}

/// Input from `--input` or the patient flags, with feed and infusion volumes
/// added to the subtraction.
fn prescription_input(args: &Args, feed: Option<&EnteralFeed>) -> CalcResult<PrescriptionInput> {
    let mut input = match &args.input {
        Some(path) => {
            info!(path = %path.display(), "loading prescription input");
            load_input(path)?
        }
        None => PrescriptionInput {
            day_of_life: args.day_of_life,
            current_weight_kg: args.weight,
            birth_weight_grams: args.birth_weight,
            total_liquid_target_ml_per_kg: args.liquid,
            glucose_infusion_rate_mg_per_kg_min: args.gir,
            amino_acid_target_g_per_kg: args.amino_acid,
            lipid_target_g_per_kg: args.lipid,
            sodium_target_mmol_per_kg: args.sodium,
            potassium_target_mmol_per_kg: args.potassium,
            subtracted_fluid_ml: 0.0,
        },
    };

    input.subtracted_fluid_ml += total_subtracted_fluid_ml(feed, &args.infusions);
    Ok(input)
}

fn run(args: &Args) -> CalcResult<()> {
    let settings = match &args.config {
        Some(path) => CalculatorSettings::load(path)?,
        None => CalculatorSettings::default(),
    };

    let feed = enteral_feed(args)?;
    let mut input = prescription_input(args, feed.as_ref())?;
    input.validate()?;

    info!(
        day_of_life = input.day_of_life,
        weight_kg = input.current_weight_kg,
        subtracted_ml = input.subtracted_fluid_ml,
        "calculating prescription"
    );

    if args.clamp {
        let bounds = input.ranges(settings.range_policy);
        for deviation in range_deviations(&input, &bounds) {
            info!(%deviation, "clamping target into consensus range");
        }
        input = input.clamped_to(&bounds);
    }

    let report = PrescriptionReport::build(&input, &settings, feed);
    debug!(access_route = ?report.safety.access_route, deviations = report.deviations.len(), "report built");

    if args.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error [{}]: {}", e.error_code(), e);
        if let Ok(json) = serde_json::to_string(&e) {
            eprintln!("{}", json);
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["pn_cli"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_input_from_flags() {
        let args = parse(&["--weight", "1.2", "--infusion", "dopamine=4.8"]);
        let input = prescription_input(&args, None).unwrap();

        assert_eq!(input.current_weight_kg, 1.2);
        assert_eq!(input.total_liquid_target_ml_per_kg, 75.0);
        assert!((input.subtracted_fluid_ml - 4.8).abs() < 1e-9);
    }

    #[test]
    fn test_milk_adds_to_subtraction() {
        let args = parse(&["--milk-volume", "10", "--infusion", "flush=2"]);
        let feed = enteral_feed(&args).unwrap();
        assert!(feed.is_some());

        let input = prescription_input(&args, feed.as_ref()).unwrap();
        assert!((input.subtracted_fluid_ml - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_feed_without_volume() {
        let args = parse(&[]);
        assert!(enteral_feed(&args).unwrap().is_none());
    }

    #[test]
    fn test_missing_input_file() {
        let args = parse(&["--input", "does/not/exist.json"]);
        let err = prescription_input(&args, None).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_input_file_round_trip() {
        let path = std::env::temp_dir().join(format!("pn_cli_input_{}.json", std::process::id()));
        let original = prescription_input(&parse(&["--day-of-life", "4", "--sodium", "2"]), None).unwrap();
        fs::write(&path, serde_json::to_string(&original).unwrap()).unwrap();

        let args = parse(&["--input", path.to_str().unwrap(), "--infusion", "dopamine=1.5"]);
        let loaded = prescription_input(&args, None).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.day_of_life, 4);
        assert_eq!(loaded.sodium_target_mmol_per_kg, 2.0);
        assert!((loaded.subtracted_fluid_ml - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_run_default_patient() {
        let args = parse(&["--clamp", "--json"]);
        assert!(run(&args).is_ok());
    }
}
