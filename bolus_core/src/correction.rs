//! Correction bolus and ISF estimation.

use crate::error::{Result, invalid};
use crate::round::{EPS, round_to_pen};
use crate::types::{PenIncrement, UnitMode};

/// Estimate ISF from total daily dose.
/// - mmol/L: rule of 100 (`ISF = 100 / TDD`)
/// - mg/dL: rule of 1800 (`ISF = 1800 / TDD`)
pub fn calc_isf_from_tdd(tdd: f64, unit_mode: UnitMode) -> Result<f64> {
    if !tdd.is_finite() || tdd <= 0.0 {
        return Err(invalid("TDD must be > 0"));
    }
    Ok(unit_mode.isf_rule() / tdd)
}

/// Inputs for a standalone correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionParams {
    pub current_bg: f64,
    pub target_bg: f64,
    /// BG drop per unit; must be > 0.
    pub isf: f64,
    /// Units still active from earlier boluses; negative values count as 0.
    pub iob: f64,
    /// Share of `iob` subtracted from the correction.
    pub iob_fraction: f64,
    pub pen_increment: PenIncrement,
    pub max_dose: f64,
}

impl Default for CorrectionParams {
    fn default() -> Self {
        Self {
            current_bg: 0.0,
            target_bg: 0.0,
            isf: 1.0,
            iob: 0.0,
            iob_fraction: 1.0,
            pen_increment: PenIncrement::Half,
            max_dose: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Correction {
    /// Units after the insulin-on-board offset, before capping and rounding.
    pub raw: f64,
    /// Capped and rounded to the pen increment.
    pub recommended: f64,
}

/// Units needed to bring `current_bg` down to `target_bg`.
///
/// Two dead-bands suppress corrections too small to deliver at the pen's
/// granularity:
/// - before insulin on board: a BG excess of at most `isf * step / 2`
/// - after insulin on board: fewer than `step / 2` units left
pub fn calc_correction_dose(p: &CorrectionParams) -> Result<Correction> {
    if !(p.isf.is_finite() && p.isf > 0.0) {
        return Err(invalid("ISF must be > 0"));
    }
    if !p.current_bg.is_finite() {
        return Err(invalid("current BG must be a finite number"));
    }

    let step = p.pen_increment.units();
    let dead_band_bg = p.isf * (step / 2.0); // ISF 1.6, 0.5u pen -> 0.4 mmol/L
    let delta_bg = p.current_bg - p.target_bg;
    if delta_bg <= dead_band_bg + EPS {
        return Ok(Correction::default());
    }

    // Negative insulin on board would add to the correction.
    let iob = p.iob.max(0.0);
    let correction = (delta_bg / p.isf - iob * p.iob_fraction).max(0.0);
    if correction < step / 2.0 - EPS {
        tracing::trace!(correction, "correction absorbed by insulin on board");
        return Ok(Correction::default());
    }

    let recommended = round_to_pen(correction.min(p.max_dose), p.pen_increment);
    Ok(Correction {
        raw: correction,
        recommended,
    })
}
