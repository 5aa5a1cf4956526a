//! Divide a dose into injections that respect a per-shot cap.

use crate::round::{EPS, round_to_step};
use crate::types::PenIncrement;

/// Upper bound on single-increment nudges while reconciling rounding drift.
pub const MAX_RECONCILE_STEPS: usize = 100;

/// Per-shot cap actually enforced: non-positive or non-finite means uncapped,
/// and anything below one increment is raised to one increment.
pub fn effective_cap(max_per_shot: f64, pen_increment: PenIncrement) -> f64 {
    if max_per_shot.is_finite() && max_per_shot > 0.0 {
        max_per_shot.max(pen_increment.units())
    } else {
        f64::INFINITY
    }
}

/// Split `total` into the fewest injections of at most `max_per_shot` units.
///
/// - The returned shots sum to `total` rounded to the pen increment.
/// - Each shot is a positive multiple of the increment and `<= max_per_shot`.
/// - `total <= 0` (after rounding) yields no injections.
/// - A non-positive or non-finite `max_per_shot` disables the cap; a cap below
///   one increment is raised to one increment.
pub fn split_into_injections(total: f64, max_per_shot: f64, pen_increment: PenIncrement) -> Vec<f64> {
    let step = pen_increment.units();
    let cap = effective_cap(max_per_shot, pen_increment);

    let rounded_total = round_to_step(total, step);
    if rounded_total <= 0.0 {
        return Vec::new();
    }

    // Fewest shots the cap allows, evenly loaded.
    let count = ((rounded_total / cap).ceil() as usize).max(1);
    let base = (rounded_total / count as f64).min(cap);
    let mut shots = vec![round_to_step(base, step); count];

    let drift = |shots: &[f64]| round_to_step(rounded_total - shots.iter().sum::<f64>(), step);
    let mut delta = drift(&shots);
    let mut budget = MAX_RECONCILE_STEPS;
    while delta.abs() >= step - EPS {
        if budget == 0 {
            tracing::warn!(total, delta, "injection split left unreconciled drift");
            break;
        }
        budget -= 1;
        let sign = if delta > 0.0 { 1.0 } else { -1.0 };
        if !nudge(&mut shots, sign, step, cap) {
            tracing::trace!(delta, "no shot can absorb the remaining drift");
            break;
        }
        delta = drift(&shots);
    }

    shots.retain(|&u| u > EPS);
    shots
}

/// Move one shot by `sign * step`, staying within `[step, cap]`.
/// Candidates are ordered by their remainder against the step: smallest first
/// when adding, largest first when removing. Ties keep shot order.
fn nudge(shots: &mut [f64], sign: f64, step: f64, cap: f64) -> bool {
    let mut order: Vec<usize> = (0..shots.len()).collect();
    order.sort_by(|&a, &b| {
        let (ra, rb) = (shots[a] % step, shots[b] % step);
        if sign > 0.0 {
            ra.total_cmp(&rb)
        } else {
            rb.total_cmp(&ra)
        }
    });

    for i in order {
        let candidate = shots[i] + sign * step;
        if candidate >= step - EPS && candidate <= cap + EPS {
            shots[i] = round_to_step(candidate, step);
            return true;
        }
    }
    false
}
