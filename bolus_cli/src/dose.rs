//! Command execution: profile mapping, calculator calls, and output rendering.

use bolus_core::error::Result as CoreResult;
use bolus_core::{
    Correction, DoseCalculation, DoseInputs, DoseResult, DosingSettings, FoodTag, Meal, UnitMode,
    calc_correction_dose, calc_isf_from_tdd, calculate, carbs_for_portion, fmt1, portion_unit,
};
use serde_json::{Value, json};
use std::fmt::Write as _;

/// One command's result, ready for either output mode.
pub struct Rendered {
    pub human: String,
    pub json: Value,
}

impl Rendered {
    pub fn into_output(self, json: bool) -> String {
        if json { self.json.to_string() } else { self.human }
    }
}

fn shots(units: &[f64]) -> String {
    units.iter().map(|&u| fmt1(u)).collect::<Vec<_>>().join(" + ")
}

fn plan_json(r: &DoseResult) -> Value {
    json!({
        "injections_now": r.plan.injections_now,
        "injection_later": r.plan.injection_later,
        "delay_min": r.plan.delay_min,
        "notes": r.plan.notes,
    })
}

fn correction_json(c: &Correction) -> Value {
    json!({ "raw": c.raw, "recommended": c.recommended })
}

pub fn run_dose(
    settings: &DosingSettings,
    meal: Meal,
    carbs: f64,
    bg: f64,
    iob: Option<f64>,
    high_fat_protein: bool,
    tags: Vec<FoodTag>,
) -> CoreResult<Rendered> {
    let inputs = DoseInputs {
        iob,
        high_fat_protein: Some(high_fat_protein),
        tags,
        ..DoseInputs::new(meal, carbs, bg)
    };
    let DoseCalculation {
        meal_dose: r,
        correction,
    } = calculate(settings, &inputs)?;
    tracing::info!(
        %meal,
        carbs,
        bg,
        immediate = r.immediate,
        delayed = r.delayed,
        "dose recommended"
    );

    let mut human = String::new();
    let _ = writeln!(human, "Meal: {meal}");
    if r.plan.injections_now.is_empty() {
        let _ = writeln!(human, "Immediate: 0.0 u");
    } else {
        let _ = writeln!(
            human,
            "Immediate: {} u ({})",
            fmt1(r.immediate),
            shots(&r.plan.injections_now)
        );
    }
    if let Some(delay) = r.delayed_after_min {
        let _ = writeln!(human, "Delayed: {} u at +{delay} min", fmt1(r.delayed));
    }
    let _ = writeln!(human, "Total: {} u", fmt1(r.total()));
    let _ = writeln!(
        human,
        "Breakdown: carbs {} u, correction {} u, fat/protein {} u",
        fmt1(r.breakdown.carb_bolus),
        fmt1(r.breakdown.correction_bolus),
        fmt1(r.breakdown.protein_fat_addon)
    );
    let plan_only = r.plan.notes.iter().filter(|n| !r.notes.contains(n));
    for note in r.notes.iter().chain(plan_only) {
        let _ = writeln!(human, "- {note}");
    }

    let json = json!({
        "command": "dose",
        "meal": meal.as_str(),
        "immediate": r.immediate,
        "delayed": r.delayed,
        "delayed_after_min": r.delayed_after_min,
        "total": r.total(),
        "breakdown": {
            "carb_bolus": r.breakdown.carb_bolus,
            "correction_bolus": r.breakdown.correction_bolus,
            "protein_fat_addon": r.breakdown.protein_fat_addon,
        },
        "plan": plan_json(&r),
        "notes": r.notes,
        "correction": correction_json(&correction),
    });
    Ok(Rendered { human, json })
}

pub fn run_correction(settings: &DosingSettings, bg: f64, iob: Option<f64>) -> CoreResult<Rendered> {
    let c = calc_correction_dose(&settings.correction_params(bg, iob))?;
    let human = format!(
        "Correction: {} u (raw {} u, target {} {})\n",
        fmt1(c.recommended),
        fmt1(c.raw),
        fmt1(settings.target_bg),
        settings.unit_mode.label()
    );
    let mut json = correction_json(&c);
    json["command"] = json!("correction");
    Ok(Rendered { human, json })
}

pub fn run_isf(tdd: f64, unit_mode: UnitMode) -> CoreResult<Rendered> {
    let isf = calc_isf_from_tdd(tdd, unit_mode)?;
    let human = format!(
        "ISF: {} {} per unit (rule of {})\n",
        fmt1(isf),
        unit_mode.label(),
        unit_mode.isf_rule()
    );
    let json = json!({
        "command": "isf",
        "tdd": tdd,
        "unit": unit_mode.label(),
        "isf": isf,
    });
    Ok(Rendered { human, json })
}

pub fn run_carbs(per_100: f64, portion: f64, alcohol: bool) -> Rendered {
    let tags = if alcohol { vec![FoodTag::Alcohol] } else { Vec::new() };
    let unit = portion_unit(&tags);
    let carbs = carbs_for_portion(per_100, portion);
    Rendered {
        human: format!("Carbs: {} g in {portion} {unit}\n", fmt1(carbs)),
        json: json!({
            "command": "carbs",
            "carbs": carbs,
            "portion": portion,
            "unit": unit,
        }),
    }
}

pub fn run_self_check(settings: &DosingSettings) -> Rendered {
    let s = settings;
    let mut human = format!(
        "Profile OK: {}, ISF {}, target {}, pen {}u, max {} u ({} u per shot)\n",
        s.unit_mode.label(),
        fmt1(s.isf),
        fmt1(s.target_bg),
        s.pen_increment,
        fmt1(s.max_dose),
        fmt1(s.max_single_dose)
    );
    for (meal, icr) in s.icr.iter() {
        let _ = writeln!(human, "ICR {meal}: 1 u per {} g", fmt1(*icr));
    }
    let json = json!({
        "command": "self-check",
        "status": "ok",
        "unit": s.unit_mode.label(),
        "isf": s.isf,
        "target_bg": s.target_bg,
        "pen_increment": s.pen_increment.units(),
        "max_dose": s.max_dose,
        "max_single_dose": s.max_single_dose,
    });
    Rendered { human, json }
}
