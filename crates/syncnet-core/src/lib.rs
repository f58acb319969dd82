// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — SyncNet Kernel Core
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Kuramoto oscillatory network used as a clustering engine: oscillators
//! whose phases lock together form one ensemble.
//!
//! # Invariants
//!
//! 1. **Synchronous stepping**: every integrator stage reads one frozen
//!    phase vector; no oscillator sees a neighbour's partially advanced
//!    phase.
//!
//! 2. **Fixed structure**: oscillator count, natural frequencies,
//!    topology, `weight` and `cluster` are set at construction and never
//!    change. Only phases evolve.
//!
//! 3. **Bounded convergence loop**: `simulate_dynamic` always ends in a
//!    `Termination` state; `max_dynamic_steps` caps runs whose order
//!    neither reaches the target nor settles.
//!
//! 4. **No silent correction**: NaN/Inf phases propagate through the
//!    integrators and surface as `Termination::NonFinite`.

pub mod ensemble;
pub mod network;
pub mod simulation;

pub use ensemble::{allocate_ensembles, DEFAULT_ENSEMBLE_TOLERANCE};
pub use network::{AbortHandle, SyncNetwork};

pub use syncnet_physics::{Connections, CouplingInput, Kuramoto, PhaseLaw, Topology};
pub use syncnet_types::{
    ConnectionType, DynamicOutcome, DynamicSample, InitialPhases, Oscillator, SolveType,
    SyncConfig, SyncEnsembles, SyncError, SyncResult, Termination, Trajectory,
};
