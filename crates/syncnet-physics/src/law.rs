// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Phase Derivative Law
// ─────────────────────────────────────────────────────────────────────
//! Pluggable dθ/dt law for one oscillator.
//!
//! The integrators only ever call [`PhaseLaw::phase_derivative`], so a
//! network variant that changes the coupling supplies its own law and
//! reuses everything else.

use crate::topology::Connections;

/// Everything a law may read about oscillator `index` during one stage.
#[derive(Debug, Clone, Copy)]
pub struct CouplingInput<'a> {
    pub index: usize,
    /// Natural frequency ω_i.
    pub frequency: f64,
    /// Frozen stage snapshot of the full phase vector.
    pub phases: &'a [f64],
    /// Neighbour indices of `index`.
    pub neighbors: &'a [usize],
    /// Global coupling multiplier K.
    pub weight: f64,
    /// Phase-difference multiplier q.
    pub cluster: u32,
}

impl<'a> CouplingInput<'a> {
    /// Oscillator count N.
    pub fn size(&self) -> usize {
        self.phases.len()
    }

    pub fn neighbor_phases(&self) -> impl Iterator<Item = f64> + 'a {
        let (phases, neighbors) = (self.phases, self.neighbors);
        neighbors.iter().map(move |&j| phases[j])
    }
}

/// Phase velocity of a single oscillator.
///
/// Must be pure: solvers evaluate it several times per step on
/// different stage vectors.
pub trait PhaseLaw: Send + Sync {
    fn phase_derivative(&self, t: f64, theta: f64, input: &CouplingInput<'_>) -> f64;
}

/// Classic Kuramoto coupling:
///
///   dθ_i/dt = ω_i + (K / N) Σ_{j ∈ M_i} sin(q (θ_j − θ_i))
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Kuramoto;

impl PhaseLaw for Kuramoto {
    fn phase_derivative(&self, _t: f64, theta: f64, input: &CouplingInput<'_>) -> f64 {
        let q = input.cluster as f64;
        let coupling: f64 = input
            .neighbor_phases()
            .map(|theta_j| (q * (theta_j - theta)).sin())
            .sum();
        input.frequency + coupling * input.weight / input.size() as f64
    }
}

/// The right-hand side of the network ODE: a law bound to frequencies,
/// topology and coupling constants.
pub struct PhaseSystem<'a, L: PhaseLaw + ?Sized> {
    pub law: &'a L,
    pub frequencies: &'a [f64],
    pub connections: &'a Connections,
    pub weight: f64,
    pub cluster: u32,
}

impl<'a, L: PhaseLaw + ?Sized> PhaseSystem<'a, L> {
    pub fn size(&self) -> usize {
        self.frequencies.len()
    }

    /// dθ_index/dt evaluated on the snapshot `phases`.
    #[inline]
    pub fn derivative(&self, t: f64, index: usize, phases: &[f64]) -> f64 {
        let input = CouplingInput {
            index,
            frequency: self.frequencies[index],
            phases,
            neighbors: self.connections.adjacent(index),
            weight: self.weight,
            cluster: self.cluster,
        };
        self.law.phase_derivative(t, phases[index], &input)
    }

    /// Evaluate every oscillator against the same frozen `phases`.
    ///
    /// Each slot of `out` is written exactly once.
    #[cfg(not(feature = "parallel"))]
    pub fn derivatives(&self, t: f64, phases: &[f64], out: &mut [f64]) {
        for (i, d) in out.iter_mut().enumerate() {
            *d = self.derivative(t, i, phases);
        }
    }

    /// Evaluate every oscillator against the same frozen `phases`.
    ///
    /// Each slot of `out` is written exactly once, from a rayon worker.
    #[cfg(feature = "parallel")]
    pub fn derivatives(&self, t: f64, phases: &[f64], out: &mut [f64]) {
        use rayon::prelude::*;

        out.par_iter_mut()
            .enumerate()
            .for_each(|(i, d)| *d = self.derivative(t, i, phases));
    }
}
