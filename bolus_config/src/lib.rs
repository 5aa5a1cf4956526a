#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Profile schema for the bolus advisor.
//!
//! - `Config` and its sub-structs are deserialized from TOML; `validate` only
//!   covers conflicting keys and logging, value ranges are checked by `bolus_core`.
//! - Every field has a default, so an empty file (or no file at all) yields the
//!   stock adult profile. Runtime settings are built from this schema by
//!   `bolus_core` via `TryFrom`.
use serde::Deserialize;
use std::path::Path;

/// Blood-glucose unit the profile is expressed in.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    #[default]
    Mmol,
    Mgdl,
}

/// Insulin-to-carb ratios (grams covered per unit) per meal slot.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MealRatios {
    pub breakfast: f64,
    pub lunch: f64,
    pub dinner: f64,
}

impl Default for MealRatios {
    fn default() -> Self {
        Self {
            breakfast: 8.0,
            lunch: 7.0,
            dinner: 10.0,
        }
    }
}

/// A stagger entry: `pct` of the dose is deferred by `delay_min` minutes.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct StaggerCfg {
    pub pct: f64,
    #[serde(default)]
    pub delay_min: u32,
}

/// Per-meal stagger used on the high fat/protein path.
/// Dinner's entry doubles as the fallback for the other meals.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MealSplits {
    pub breakfast: Option<StaggerCfg>,
    pub lunch: Option<StaggerCfg>,
    pub dinner: Option<StaggerCfg>,
}

impl Default for MealSplits {
    fn default() -> Self {
        Self {
            breakfast: None,
            lunch: None,
            dinner: Some(StaggerCfg {
                pct: 0.3,
                delay_min: 90,
            }),
        }
    }
}

/// Stagger hints keyed by glycemic tag, used when the fat/protein flag is off.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GiSplitDefaults {
    pub low_gi: StaggerCfg,
    pub high_gi: StaggerCfg,
}

impl Default for GiSplitDefaults {
    fn default() -> Self {
        Self {
            low_gi: StaggerCfg {
                pct: 0.3,
                delay_min: 60,
            },
            high_gi: StaggerCfg::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Profile {
    pub unit_mode: UnitMode,
    pub icr: MealRatios,
    /// Insulin sensitivity factor. Leave unset to derive it from `tdd`.
    pub isf: Option<f64>,
    /// Total daily dose in units; only used when `isf` is absent.
    pub tdd: Option<f64>,
    pub target_bg: f64,
    /// Pen granularity: 0.5 or 1.0
    pub pen_increment: f64,
    pub max_dose: f64,
    pub max_single_dose: f64,
    pub consider_iob: bool,
    pub iob_fraction_for_correction: f64,
    pub dinner_addon_pct: f64,
    pub split: MealSplits,
    pub gi_split_defaults: GiSplitDefaults,
}

/// ISF used when neither `isf` nor `tdd` is configured (TDD ~61u, rule of 100).
pub const DEFAULT_ISF: f64 = 1.6;

impl Default for Profile {
    fn default() -> Self {
        Self {
            unit_mode: UnitMode::Mmol,
            icr: MealRatios::default(),
            isf: None,
            tdd: None,
            target_bg: 6.0,
            pen_increment: 0.5,
            max_dose: 25.0,
            max_single_dose: 12.0,
            consider_iob: true,
            iob_fraction_for_correction: 1.0,
            dinner_addon_pct: 0.15,
            split: MealSplits::default(),
            gi_split_defaults: GiSplitDefaults::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Daily,
    Hourly,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    pub rotation: LogRotation,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub profile: Profile,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a profile file. Validation is left to the caller.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("open profile {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("parse profile {:?}: {}", path, e))
}

impl Config {
    /// Checks that belong to the file itself: conflicting keys and the logging
    /// table. Numeric profile values are checked once the profile is turned
    /// into runtime settings.
    pub fn validate(&self) -> eyre::Result<()> {
        let p = &self.profile;
        if p.isf.is_some() && p.tdd.is_some() {
            eyre::bail!("set either profile.isf or profile.tdd, not both");
        }

        if let Some(file) = &self.logging.file
            && file.trim().is_empty()
        {
            eyre::bail!("logging.file must not be empty when set");
        }

        Ok(())
    }
}
