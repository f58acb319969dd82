// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Phase Normaliser
// ─────────────────────────────────────────────────────────────────────

use std::f64::consts::{PI, TAU};

/// Fold an arbitrary phase into (−π, π].
///
/// In-range inputs are returned unchanged; NaN and ±Inf propagate as NaN.
#[inline]
pub fn normalize_phase(theta: f64) -> f64 {
    if theta > -PI && theta <= PI {
        return theta;
    }
    let r = theta.rem_euclid(TAU);
    if r > PI {
        r - TAU
    } else {
        r
    }
}

/// Shortest angular distance between two phases, in [0, π].
#[inline]
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (normalize_phase(a) - normalize_phase(b)).abs();
    d.min(TAU - d)
}
