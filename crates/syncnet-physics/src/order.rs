// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Kuramoto Order Parameters
// ─────────────────────────────────────────────────────────────────────
//! Global and topology-weighted synchronisation metrics.

use crate::topology::Connections;

/// Global order parameter R = |⟨e^{iθ}⟩| ∈ [0, 1].
///
/// Summed relative to the first phase, so identical phases give exactly
/// 1.0. An empty slice gives 0.0.
pub fn global_order(phases: &[f64]) -> f64 {
    let Some(&reference) = phases.first() else {
        return 0.0;
    };
    let (sum_sin, sum_cos) = phases.iter().fold((0.0, 0.0), |(s, c), &th| {
        let d = th - reference;
        (s + d.sin(), c + d.cos())
    });
    (sum_cos.hypot(sum_sin) / phases.len() as f64).clamp(0.0, 1.0)
}

/// Local order parameter.
///
///   r_loc = Σ_i |Σ_{j ∈ M_i} e^{i(θ_j − θ_i)}| / Σ_i |M_i|
///
/// High when each neighbourhood is internally coherent, even if
/// separate neighbourhoods sit at different phases. 0.0 when the
/// topology has no connections or does not match `phases` in size.
pub fn local_order(phases: &[f64], connections: &Connections) -> f64 {
    if phases.len() != connections.len() {
        return 0.0;
    }
    let mut magnitude_sum = 0.0;
    let mut pairs = 0usize;
    for (i, &theta_i) in phases.iter().enumerate() {
        let neighbours = connections.adjacent(i);
        if neighbours.is_empty() {
            continue;
        }
        let (s, c) = neighbours.iter().fold((0.0, 0.0), |(s, c), &j| {
            let d = phases[j] - theta_i;
            (s + d.sin(), c + d.cos())
        });
        magnitude_sum += c.hypot(s);
        pairs += neighbours.len();
    }
    if pairs == 0 {
        return 0.0;
    }
    (magnitude_sum / pairs as f64).clamp(0.0, 1.0)
}
