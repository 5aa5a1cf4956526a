//! CLI argument definitions and shared statics.

use bolus_core::{FoodTag, Meal, UnitMode};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "bolus", version, about = "Meal bolus calculator")]
pub struct Cli {
    /// Path to the dosing profile TOML; built-in defaults when omitted
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results and errors as JSON
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins when set
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend a meal bolus with its injection plan
    Dose {
        /// Meal slot: breakfast, lunch or dinner
        #[arg(long)]
        meal: Meal,
        /// Grams of carbohydrate
        #[arg(long, value_parser = finite_number)]
        carbs: f64,
        /// Current blood glucose, in the profile's unit
        #[arg(long, value_parser = finite_number)]
        bg: f64,
        /// Insulin on board, in units
        #[arg(long, value_name = "UNITS", value_parser = insulin_on_board)]
        iob: Option<f64>,
        /// Meal is high in fat/protein (add-on and staggered dose)
        #[arg(long, action = ArgAction::SetTrue)]
        high_fat_protein: bool,
        /// Food tag (low_gi, high_gi, alcohol, ...); repeatable
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<FoodTag>,
    },
    /// Correction bolus only
    Correction {
        /// Current blood glucose, in the profile's unit
        #[arg(long, value_parser = finite_number)]
        bg: f64,
        /// Insulin on board, in units
        #[arg(long, value_name = "UNITS", value_parser = insulin_on_board)]
        iob: Option<f64>,
    },
    /// Estimate ISF from total daily dose
    Isf {
        /// Total daily dose, in units
        #[arg(long, value_parser = finite_number)]
        tdd: f64,
        /// mmol or mgdl; the profile's unit when omitted
        #[arg(long)]
        unit: Option<UnitMode>,
    },
    /// Carbohydrate grams in a portion
    Carbs {
        /// Carbs per 100 g (or 100 ml)
        #[arg(long = "per-100", value_name = "GRAMS", value_parser = finite_number)]
        per_100: f64,
        /// Portion size in g (ml with --alcohol)
        #[arg(long, value_parser = finite_number)]
        portion: f64,
        /// Portion is a drink measured in ml
        #[arg(long, action = ArgAction::SetTrue)]
        alcohol: bool,
    },
    /// Load and validate the profile, then print a summary
    SelfCheck,
}

/// Numeric argument that must be a real number: NaN and infinities are refused.
fn finite_number(s: &str) -> Result<f64, String> {
    let v: f64 = s.trim().parse().map_err(|e| format!("{e}"))?;
    if !v.is_finite() {
        return Err(format!("{s:?} is not a finite number"));
    }
    Ok(v)
}

fn insulin_on_board(s: &str) -> Result<f64, String> {
    let v = finite_number(s)?;
    if v < 0.0 {
        return Err("insulin on board must be >= 0".to_string());
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_must_be_finite() {
        assert_eq!(finite_number("7.5"), Ok(7.5));
        assert_eq!(finite_number("-2"), Ok(-2.0));
        assert!(finite_number("NaN").is_err());
        assert!(finite_number("inf").is_err());
        assert!(finite_number("-infinity").is_err());
        assert!(finite_number("lots").is_err());
    }

    #[test]
    fn insulin_on_board_is_non_negative() {
        assert_eq!(insulin_on_board("0"), Ok(0.0));
        assert_eq!(insulin_on_board("1.5"), Ok(1.5));
        assert!(insulin_on_board("-4").is_err());
        assert!(insulin_on_board("NaN").is_err());
    }

    #[test]
    fn output_flags_work_after_the_subcommand() {
        let args = ["bolus", "isf", "--tdd", "40", "--json", "--log-level", "warn"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.json);
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
    }
}
