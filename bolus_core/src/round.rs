//! Rounding and clamping primitives shared by every calculator.
//!
//! All rounding goes through `round_half_up` so that ties resolve the same way
//! everywhere (toward +inf), independent of `f64::round`'s ties-away-from-zero.

use crate::types::PenIncrement;

/// Absolute tolerance used for every threshold comparison in the engine.
pub const EPS: f64 = 1e-9;

/// Round to the nearest integer, ties toward +inf (`2.5 -> 3`, `-2.5 -> -2`).
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Round `x` to the nearest multiple of `step` without clamping.
#[inline]
pub(crate) fn round_to_step(x: f64, step: f64) -> f64 {
    round_half_up(x / step) * step
}

/// Round a dose to the pen's granularity and clamp it to `>= 0`.
#[inline]
pub fn round_to_pen(units: f64, increment: PenIncrement) -> f64 {
    round_to_step(units, increment.units()).max(0.0)
}

/// Bound `n` to `[min, max]`. Pass `0.0` / `f64::INFINITY` for the open defaults.
#[inline]
pub fn clamp(n: f64, min: f64, max: f64) -> f64 {
    n.min(max).max(min)
}

/// Round to one decimal place with the engine's tie rule.
#[inline]
pub fn round1(x: f64) -> f64 {
    round_half_up(x * 10.0) / 10.0
}

/// Display helper: one decimal, ties toward +inf (`2.25 -> "2.3"`).
pub fn fmt1(x: f64) -> String {
    format!("{:.1}", round1(x))
}
