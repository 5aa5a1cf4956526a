//! Conversions bridging `bolus_config` types to `bolus_core` types.

use crate::config::DosingSettings;
use crate::correction::calc_isf_from_tdd;
use crate::error::Report;
use crate::types::{GiSplitDefaults, MealTable, PenIncrement, StaggerPolicy, UnitMode};

// ── MealRatios ───────────────────────────────────────────────────────────────

impl From<&bolus_config::MealRatios> for MealTable<f64> {
    fn from(c: &bolus_config::MealRatios) -> Self {
        Self {
            breakfast: c.breakfast,
            lunch: c.lunch,
            dinner: c.dinner,
        }
    }
}

// ── MealSplits ───────────────────────────────────────────────────────────────

impl From<&bolus_config::MealSplits> for MealTable<Option<StaggerPolicy>> {
    fn from(c: &bolus_config::MealSplits) -> Self {
        Self {
            breakfast: c.breakfast.map(StaggerPolicy::from),
            lunch: c.lunch.map(StaggerPolicy::from),
            dinner: c.dinner.map(StaggerPolicy::from),
        }
    }
}

// ── GiSplitDefaults ──────────────────────────────────────────────────────────

impl From<&bolus_config::GiSplitDefaults> for GiSplitDefaults {
    fn from(c: &bolus_config::GiSplitDefaults) -> Self {
        Self {
            low_gi: c.low_gi.into(),
            high_gi: c.high_gi.into(),
        }
    }
}

// ── Profile ──────────────────────────────────────────────────────────────────

/// ISF precedence: explicit `isf`, else derived from `tdd`, else the stock value.
impl TryFrom<&bolus_config::Profile> for DosingSettings {
    type Error = Report;

    fn try_from(p: &bolus_config::Profile) -> Result<Self, Self::Error> {
        let unit_mode = UnitMode::from(p.unit_mode);
        let isf = match (p.isf, p.tdd) {
            (Some(isf), _) => isf,
            (None, Some(tdd)) => calc_isf_from_tdd(tdd, unit_mode)?,
            (None, None) => bolus_config::DEFAULT_ISF,
        };
        let pen_increment = PenIncrement::try_from(p.pen_increment).map_err(Report::new)?;
        Ok(Self {
            unit_mode,
            icr: (&p.icr).into(),
            isf,
            target_bg: p.target_bg,
            pen_increment,
            max_dose: p.max_dose,
            max_single_dose: p.max_single_dose,
            consider_iob: p.consider_iob,
            iob_fraction_for_correction: p.iob_fraction_for_correction,
            dinner_addon_pct: p.dinner_addon_pct,
            split: (&p.split).into(),
            gi_split_defaults: (&p.gi_split_defaults).into(),
        })
    }
}

impl TryFrom<&bolus_config::Config> for DosingSettings {
    type Error = Report;

    fn try_from(c: &bolus_config::Config) -> Result<Self, Self::Error> {
        Self::try_from(&c.profile)
    }
}

