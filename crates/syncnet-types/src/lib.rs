// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — SyncNet Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Data model, configuration, and error hierarchy for the SyncNet
//! kernel. SyncNet is a Kuramoto oscillatory network used as a
//! clustering engine.

pub mod config;
pub mod dynamics;
pub mod error;

pub use config::{
    AdaptiveSettings, ConnectionType, ConvergenceOrder, DynamicSettings, InitialPhases,
    PhaseWrapping, SolveType, SyncConfig, MIN_ABSOLUTE_TOLERANCE,
};
pub use dynamics::{
    DynamicOutcome, DynamicSample, Oscillator, SyncEnsembles, Termination, Trajectory,
};
pub use error::{SyncError, SyncResult};
