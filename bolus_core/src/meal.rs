//! Meal-aware dose calculator: carb bolus, correction, add-ons and timing.

use crate::config::DosingSettings;
use crate::correction::{Correction, calc_correction_dose};
use crate::error::{Result, invalid};
use crate::plan::{SplitPlan, SplitPlanParams, build_split_plan};
use crate::round::{fmt1, round_half_up};
use crate::types::{FoodTag, Meal, StaggerPolicy};

pub const HYPO_NOTE: &str = "BG below target range: treat low before bolusing.";
pub const HIGH_GI_NOTE: &str = "High-GI food: consider a pre-bolus (e.g., 10-15 min) if safe.";

/// Situational facts for one calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct DoseInputs {
    pub meal: Meal,
    /// Grams of carbohydrate; zero or negative means no carb bolus.
    pub carbs: f64,
    pub current_bg: f64,
    /// Rapid-acting insulin still active, in units.
    pub iob: Option<f64>,
    /// Only an explicit `Some(true)` enables the fat/protein add-on and stagger.
    pub high_fat_protein: Option<bool>,
    pub tags: Vec<FoodTag>,
}

impl DoseInputs {
    pub fn new(meal: Meal, carbs: f64, current_bg: f64) -> Self {
        Self {
            meal,
            carbs,
            current_bg,
            iob: None,
            high_fat_protein: None,
            tags: Vec::new(),
        }
    }

    fn has_tag(&self, tag: &FoodTag) -> bool {
        self.tags.contains(tag)
    }
}

/// Unrounded dose components, kept for transparency.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoseBreakdown {
    pub carb_bolus: f64,
    pub correction_bolus: f64,
    pub protein_fat_addon: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DoseResult {
    /// Sum of the plan's immediate injections.
    pub immediate: f64,
    pub delayed: f64,
    pub delayed_after_min: Option<u32>,
    pub breakdown: DoseBreakdown,
    pub plan: SplitPlan,
    pub notes: Vec<String>,
}

impl DoseResult {
    pub fn total(&self) -> f64 {
        self.immediate + self.delayed
    }
}

/// Where the stagger for a meal comes from. Fat/protein beats any GI hint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaggerChoice {
    None,
    LowGi(StaggerPolicy),
    HighGi,
    FatProtein(StaggerPolicy),
}

impl StaggerChoice {
    pub fn policy(&self) -> StaggerPolicy {
        match self {
            StaggerChoice::LowGi(p) | StaggerChoice::FatProtein(p) => *p,
            StaggerChoice::None | StaggerChoice::HighGi => StaggerPolicy::NONE,
        }
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            StaggerChoice::FatProtein(_) => Some("high fat/protein meal"),
            StaggerChoice::LowGi(_) => Some("low-GI food"),
            StaggerChoice::None | StaggerChoice::HighGi => None,
        }
    }
}

/// Decide the stagger source for `inputs`.
///
/// 1. fat/protein flag: the meal's split, falling back to dinner's
/// 2. `low_gi` tag: the low-GI default
/// 3. `high_gi` tag: advisory only
/// 4. nothing
pub fn select_stagger(settings: &DosingSettings, inputs: &DoseInputs) -> StaggerChoice {
    if inputs.high_fat_protein == Some(true) {
        StaggerChoice::FatProtein(settings.fat_protein_split(inputs.meal))
    } else if inputs.has_tag(&FoodTag::LowGi) {
        StaggerChoice::LowGi(settings.gi_split_defaults.low_gi)
    } else if inputs.has_tag(&FoodTag::HighGi) {
        StaggerChoice::HighGi
    } else {
        StaggerChoice::None
    }
}

fn percent(fraction: f64) -> i64 {
    round_half_up(fraction * 100.0) as i64
}

fn hypo_result() -> DoseResult {
    DoseResult {
        plan: SplitPlan {
            notes: vec![HYPO_NOTE.to_string()],
            ..SplitPlan::default()
        },
        notes: vec![HYPO_NOTE.to_string()],
        ..DoseResult::default()
    }
}

/// NaN or infinite readings never reach the hypoglycemia guard.
fn check_inputs(d: &DoseInputs) -> Result<()> {
    if !d.current_bg.is_finite() {
        return Err(invalid("current BG must be a finite number"));
    }
    if !d.carbs.is_finite() {
        return Err(invalid("carbs must be a finite number"));
    }
    if d.iob.is_some_and(|iob| !iob.is_finite()) {
        return Err(invalid("IOB must be a finite number"));
    }
    Ok(())
}

/// Recommend a meal dose with its injection plan.
///
/// Fails on an invalid ISF or a non-finite input; low BG is a valid zero-dose result.
pub fn calc_meal_dose(s: &DosingSettings, d: &DoseInputs) -> Result<DoseResult> {
    check_inputs(d)?;
    if d.current_bg < s.unit_mode.hypo_threshold() {
        tracing::warn!(
            current_bg = d.current_bg,
            threshold = s.unit_mode.hypo_threshold(),
            "hypoglycemia guard: no bolus"
        );
        return Ok(hypo_result());
    }
    let mut notes = Vec::new();

    // Carbs
    let icr = *s.icr.get(d.meal);
    let carb_bolus = if d.carbs > 0.0 && icr > 0.0 {
        d.carbs / icr
    } else {
        0.0
    };

    // Correction (dead-band + IOB)
    let correction_bolus =
        calc_correction_dose(&s.correction_params(d.current_bg, d.iob))?.recommended;
    if correction_bolus > 0.0 {
        notes.push(format!(
            "Correction applied: {} {} above target using ISF {}.",
            fmt1(d.current_bg - s.target_bg),
            s.unit_mode.label(),
            s.isf
        ));
        if let Some(iob) = d.iob
            && s.consider_iob
            && iob > 0.0
        {
            notes.push(format!("IOB considered ({iob}u)."));
        }
    }

    // Fat/protein add-on
    let fat_protein = d.high_fat_protein == Some(true);
    let addon_pct = if fat_protein { s.dinner_addon_pct } else { 0.0 };
    let protein_fat_addon = if addon_pct > 0.0 {
        carb_bolus * addon_pct
    } else {
        0.0
    };
    if protein_fat_addon > 0.0 {
        notes.push(format!(
            "High fat/protein add-on: +{}% of carb bolus.",
            percent(addon_pct)
        ));
    }

    // Cap applies before timing; the plan only redistributes.
    let total_raw = carb_bolus + correction_bolus + protein_fat_addon;
    let total = total_raw.min(s.max_dose);

    let choice = select_stagger(s, d);
    match choice {
        StaggerChoice::LowGi(p) if p.is_active() => notes.push(format!(
            "Low-GI timing: suggesting {}% at +{} min (timing only).",
            percent(p.pct),
            p.delay_min
        )),
        StaggerChoice::HighGi => notes.push(HIGH_GI_NOTE.to_string()),
        _ => {}
    }
    let policy = choice.policy();
    let stagger = policy.is_active();

    let plan = build_split_plan(&SplitPlanParams {
        total_dose: total,
        pen_increment: s.pen_increment,
        max_per_shot: s.max_single_dose,
        stagger_pct: if stagger { policy.pct } else { 0.0 },
        stagger_delay_min: if stagger { policy.delay_min } else { 0 },
        reason: choice.reason().map(str::to_string),
    });

    if stagger {
        notes.push(format!(
            "Stagger plan: {}/{} split with +{} min delay.",
            percent(1.0 - policy.pct),
            percent(policy.pct),
            policy.delay_min
        ));
    }

    tracing::debug!(
        meal = %d.meal,
        total_raw,
        total,
        stagger = ?choice,
        shots = plan.injections_now.len(),
        "meal dose computed"
    );

    Ok(DoseResult {
        immediate: plan.immediate_total(),
        delayed: plan.injection_later.unwrap_or(0.0),
        delayed_after_min: plan.delay_min,
        breakdown: DoseBreakdown {
            carb_bolus,
            correction_bolus,
            protein_fat_addon,
        },
        plan,
        notes,
    })
}

/// Meal dose alongside the standalone correction for the same BG and IOB.
#[derive(Debug, Clone, PartialEq)]
pub struct DoseCalculation {
    pub meal_dose: DoseResult,
    pub correction: Correction,
}

pub fn calculate(settings: &DosingSettings, inputs: &DoseInputs) -> Result<DoseCalculation> {
    let meal_dose = calc_meal_dose(settings, inputs)?;
    let correction =
        calc_correction_dose(&settings.correction_params(inputs.current_bg, inputs.iob))?;
    Ok(DoseCalculation {
        meal_dose,
        correction,
    })
}
