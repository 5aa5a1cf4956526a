//! Injection plan: immediate shots plus an optional staggered dose.

use crate::round::{clamp, round_to_pen};
use crate::splitter::{effective_cap, split_into_injections};
use crate::types::PenIncrement;

/// Timing and site layout of a dose. The plan never changes the total, only
/// when and where it is injected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitPlan {
    /// Doses to inject now, each a multiple of the pen increment.
    pub injections_now: Vec<f64>,
    /// Single delayed dose, present only when it rounds to something deliverable.
    pub injection_later: Option<f64>,
    /// Minutes until `injection_later`.
    pub delay_min: Option<u32>,
    pub notes: Vec<String>,
}

impl SplitPlan {
    pub fn immediate_total(&self) -> f64 {
        self.injections_now.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlanParams {
    pub total_dose: f64,
    pub pen_increment: PenIncrement,
    /// Normalized with `effective_cap`; 0 means uncapped.
    pub max_per_shot: f64,
    /// Fraction of the total given later, in [0, 1]. 0 disables staggering.
    pub stagger_pct: f64,
    pub stagger_delay_min: u32,
    /// Short explanation appended to the stagger note ("high fat/protein meal").
    pub reason: Option<String>,
}

impl Default for SplitPlanParams {
    fn default() -> Self {
        Self {
            total_dose: 0.0,
            pen_increment: PenIncrement::Half,
            max_per_shot: 12.0,
            stagger_pct: 0.0,
            stagger_delay_min: 0,
            reason: None,
        }
    }
}

pub fn build_split_plan(p: &SplitPlanParams) -> SplitPlan {
    let mut notes = Vec::new();
    let total = p.total_dose.max(0.0);
    let cap = effective_cap(p.max_per_shot, p.pen_increment);

    let later_raw = clamp(total * p.stagger_pct, 0.0, total);
    let now_raw = clamp(total - later_raw, 0.0, total);

    let mut now = split_into_injections(now_raw, cap, p.pen_increment);

    // Delayed part goes in one shot; anything above the cap joins the immediate shots.
    let mut later = None;
    if later_raw > 0.0 {
        let capped = later_raw.min(cap);
        later = Some(round_to_pen(capped, p.pen_increment));
        if later_raw > cap {
            let overflow = round_to_pen(later_raw - capped, p.pen_increment);
            if overflow > 0.0 {
                now.push(overflow);
                notes.push(format!(
                    "Delayed dose exceeded {cap}u cap; moved {overflow}u to the immediate plan."
                ));
            }
        }
    }
    let later = later.filter(|&u| u > 0.0);

    if now.iter().any(|&s| s > cap) {
        notes.push(format!(
            "One or more immediate injections exceed {cap}u; consider adding another site."
        ));
    }
    if now.len() > 1 {
        notes.push(format!(
            "Split due to max {cap}u per injection for reliable absorption."
        ));
    }

    let delay_min = later.map(|_| p.stagger_delay_min);
    if let Some(units) = later
        && p.stagger_delay_min > 0
    {
        let reason = p
            .reason
            .as_deref()
            .map(|r| format!(" ({r})"))
            .unwrap_or_default();
        notes.push(format!(
            "Staggered {units}u at +{} min{reason}.",
            p.stagger_delay_min
        ));
    }

    SplitPlan {
        injections_now: now,
        injection_later: later,
        delay_min,
        notes,
    }
}
