// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — SyncNet Physics Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Oscillator physics for the SyncNet kernel: phase normalisation,
//! Kuramoto order parameters, the pluggable phase-derivative law, and
//! the Euler / RK4 / RKF45 integrators.
//!
//!   dθ_i/dt = ω_i + (K / N) Σ_{j ∈ M_i} sin(q (θ_j − θ_i))
//!
//! Every integrator stage reads a frozen snapshot of the phase vector,
//! so the whole network advances synchronously.

pub mod law;
pub mod order;
pub mod phase;
pub mod solver;
pub mod topology;

pub use law::{CouplingInput, Kuramoto, PhaseLaw, PhaseSystem};
pub use order::{global_order, local_order};
pub use phase::{circular_distance, normalize_phase};
pub use solver::{Integrator, StepReport};
pub use topology::{Connections, Topology};
