//! Runtime dosing profile.
//!
//! `DosingSettings` is the immutable snapshot every calculation reads. It is
//! separate from the TOML schema in `bolus_config`; see `conversions` for the bridge.

use crate::correction::CorrectionParams;
use crate::error::{Result, invalid};
use crate::types::{GiSplitDefaults, Meal, MealTable, PenIncrement, StaggerPolicy, UnitMode};

/// Clinician-tunable profile.
#[derive(Debug, Clone, PartialEq)]
pub struct DosingSettings {
    pub unit_mode: UnitMode,
    /// Grams of carbohydrate covered by one unit, per meal slot.
    pub icr: MealTable<f64>,
    /// BG drop per unit (in `unit_mode`). Must be > 0.
    pub isf: f64,
    pub target_bg: f64,
    pub pen_increment: PenIncrement,
    /// Cap on a recommendation's total (immediate + delayed).
    pub max_dose: f64,
    /// Cap per injection; larger doses are split across sites.
    pub max_single_dose: f64,
    /// Whether insulin on board offsets the correction at all.
    pub consider_iob: bool,
    /// Share of insulin on board subtracted from the correction, in [0, 1].
    pub iob_fraction_for_correction: f64,
    /// Add-on applied to the carb bolus for high fat/protein meals (0.15 = +15%).
    pub dinner_addon_pct: f64,
    /// High fat/protein stagger per meal; dinner's entry is the fallback.
    pub split: MealTable<Option<StaggerPolicy>>,
    pub gi_split_defaults: GiSplitDefaults,
}

impl Default for DosingSettings {
    fn default() -> Self {
        Self {
            unit_mode: UnitMode::Mmol,
            icr: MealTable {
                breakfast: 8.0,
                lunch: 7.0,
                dinner: 10.0,
            },
            isf: 1.6,
            target_bg: 6.0,
            pen_increment: PenIncrement::Half,
            max_dose: 25.0,
            max_single_dose: 12.0,
            consider_iob: true,
            iob_fraction_for_correction: 1.0,
            dinner_addon_pct: 0.15,
            split: MealTable {
                breakfast: None,
                lunch: None,
                dinner: Some(StaggerPolicy {
                    pct: 0.3,
                    delay_min: 90,
                }),
            },
            gi_split_defaults: GiSplitDefaults::default(),
        }
    }
}

impl DosingSettings {
    /// Stagger for the high fat/protein path: the meal's own entry when it defers
    /// something, otherwise dinner's.
    pub fn fat_protein_split(&self, meal: Meal) -> StaggerPolicy {
        match self.split.get(meal) {
            Some(s) if s.is_active() => *s,
            _ => self.split.dinner.unwrap_or(StaggerPolicy::NONE),
        }
    }

    /// Correction inputs for a BG reading. Insulin on board only counts when
    /// the profile says so.
    pub fn correction_params(&self, current_bg: f64, iob: Option<f64>) -> CorrectionParams {
        CorrectionParams {
            current_bg,
            target_bg: self.target_bg,
            isf: self.isf,
            iob: if self.consider_iob {
                iob.unwrap_or(0.0).max(0.0)
            } else {
                0.0
            },
            iob_fraction: self.iob_fraction_for_correction,
            pen_increment: self.pen_increment,
            max_dose: self.max_dose,
        }
    }

    /// Reject profiles the calculators cannot meaningfully use. This is the one
    /// place numeric profile values are checked; messages name the profile key.
    ///
    /// Callers are expected to run this once before handing the profile to
    /// `calc_meal_dose`; the calculators themselves only re-check ISF.
    pub fn validate(&self) -> Result<()> {
        if !(self.isf.is_finite() && self.isf > 0.0) {
            return Err(invalid("isf must be > 0"));
        }
        if !(self.target_bg.is_finite() && self.target_bg > 0.0) {
            return Err(invalid("target_bg must be > 0"));
        }
        for (meal, icr) in self.icr.iter() {
            if !(icr.is_finite() && *icr > 0.0) {
                return Err(invalid(match meal {
                    Meal::Breakfast => "icr.breakfast must be > 0",
                    Meal::Lunch => "icr.lunch must be > 0",
                    Meal::Dinner => "icr.dinner must be > 0",
                }));
            }
        }

        // Caps
        if !(self.max_dose.is_finite() && self.max_dose > 0.0) {
            return Err(invalid("max_dose must be > 0"));
        }
        if !(self.max_single_dose.is_finite() && self.max_single_dose > 0.0) {
            return Err(invalid("max_single_dose must be > 0"));
        }
        if self.max_single_dose < self.pen_increment.units() {
            return Err(invalid("max_single_dose must be >= pen_increment"));
        }

        if !(0.0..=1.0).contains(&self.iob_fraction_for_correction) {
            return Err(invalid("iob_fraction_for_correction must be in [0, 1]"));
        }
        if !(self.dinner_addon_pct.is_finite() && self.dinner_addon_pct >= 0.0) {
            return Err(invalid("dinner_addon_pct must be >= 0"));
        }

        // Stagger tables
        for (meal, split) in self.split.iter() {
            if let Some(p) = split {
                check_stagger(
                    p,
                    match meal {
                        Meal::Breakfast => "split.breakfast.pct must be in [0, 1]",
                        Meal::Lunch => "split.lunch.pct must be in [0, 1]",
                        Meal::Dinner => "split.dinner.pct must be in [0, 1]",
                    },
                    match meal {
                        Meal::Breakfast => "split.breakfast.delay_min must be <= 1440",
                        Meal::Lunch => "split.lunch.delay_min must be <= 1440",
                        Meal::Dinner => "split.dinner.delay_min must be <= 1440",
                    },
                )?;
            }
        }
        check_stagger(
            &self.gi_split_defaults.low_gi,
            "gi_split_defaults.low_gi.pct must be in [0, 1]",
            "gi_split_defaults.low_gi.delay_min must be <= 1440",
        )?;
        check_stagger(
            &self.gi_split_defaults.high_gi,
            "gi_split_defaults.high_gi.pct must be in [0, 1]",
            "gi_split_defaults.high_gi.delay_min must be <= 1440",
        )?;
        Ok(())
    }
}

/// Longest stagger delay accepted, in minutes.
pub const MAX_STAGGER_DELAY_MIN: u32 = 24 * 60;

fn check_stagger(p: &StaggerPolicy, pct_msg: &'static str, delay_msg: &'static str) -> Result<()> {
    if !(0.0..=1.0).contains(&p.pct) {
        return Err(invalid(pct_msg));
    }
    if p.delay_min > MAX_STAGGER_DELAY_MIN {
        return Err(invalid(delay_msg));
    }
    Ok(())
}
