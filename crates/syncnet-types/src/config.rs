// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — SyncNet Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Numerical method used to advance the phase vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveType {
    /// Explicit Euler, one derivative evaluation per macro-step.
    #[default]
    Fast,
    /// Classic four-stage Runge-Kutta on fixed micro-steps.
    Rk4,
    /// Runge-Kutta-Fehlberg 4(5) with adaptive micro-steps.
    Rkf45,
}

/// Built-in coupling topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    /// Every oscillator coupled to every other one.
    #[default]
    AllToAll,
    /// Square grid, von Neumann neighbourhood (up/down/left/right).
    GridFour,
    /// Square grid, Moore neighbourhood (including diagonals).
    GridEight,
    /// Chain where each oscillator is linked to its predecessor and successor.
    ListBidir,
    /// No coupling at all.
    None,
}

/// Initial phase distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialPhases {
    /// Uniform random over the full circle.
    #[default]
    RandomUniform,
    /// Evenly spaced: θ_i = 2πi / N.
    Equipartition,
    /// All phases equal to zero.
    Identical,
}

/// Whether phases are folded back into (−π, π] after each macro-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseWrapping {
    #[default]
    Normalized,
    /// Monotonic phases, for velocity and trajectory analysis.
    Unwrapped,
}

/// Order parameter watched by the convergence-driven simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceOrder {
    #[default]
    Global,
    Local,
}

/// Smallest absolute tolerance the adaptive solver accepts; anything
/// tighter sits below f64 roundoff for unit-scale phases.
pub const MIN_ABSOLUTE_TOLERANCE: f64 = 1e-15;

/// Step-size control for the adaptive solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveSettings {
    /// Absolute local error tolerance per oscillator.
    pub absolute_tolerance: f64,
    /// Relative local error tolerance per oscillator.
    pub relative_tolerance: f64,
    /// Smallest sub-step; a step this small is accepted unconditionally.
    pub min_step: f64,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self {
            absolute_tolerance: 1e-8,
            relative_tolerance: 1e-6,
            min_step: 1e-9,
        }
    }
}

/// Default arguments for `simulate_dynamic`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicSettings {
    /// Macro-step between two order checks.
    pub step: f64,
    /// Micro-step used inside each macro-step.
    pub integration_step: f64,
    /// Order change below which the run counts as stalled.
    pub change_threshold: f64,
}

impl Default for DynamicSettings {
    fn default() -> Self {
        Self {
            step: 0.1,
            integration_step: 0.01,
            change_threshold: 1e-6,
        }
    }
}

/// Construction parameters for a sync network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Global coupling multiplier.
    /// Default: 1.0.
    pub weight: f64,

    /// Natural frequencies are drawn as `frequency_factor · U[0, 1)`.
    /// Default: 0.0 (identical frequencies).
    pub frequency_factor: f64,

    /// Multiplier q on the phase difference inside the coupling sine.
    /// Default: 1 (classic Kuramoto).
    pub cluster: u32,

    pub connection: ConnectionType,

    pub initial_phases: InitialPhases,

    /// RNG seed for phases and frequencies; `None` seeds from entropy.
    pub seed: Option<u64>,

    pub wrapping: PhaseWrapping,

    pub adaptive: AdaptiveSettings,

    pub convergence_order: ConvergenceOrder,

    /// Consecutive below-threshold order changes needed to declare a stall.
    /// Default: 1.
    pub stall_patience: usize,

    /// Ceiling on macro-steps in `simulate_dynamic`.
    /// Default: 100 000.
    pub max_dynamic_steps: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            weight: 1.0,
            frequency_factor: 0.0,
            cluster: 1,
            connection: ConnectionType::AllToAll,
            initial_phases: InitialPhases::RandomUniform,
            seed: None,
            wrapping: PhaseWrapping::Normalized,
            adaptive: AdaptiveSettings::default(),
            convergence_order: ConvergenceOrder::Global,
            stall_patience: 1,
            max_dynamic_steps: 100_000,
        }
    }
}

impl SyncConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> SyncResult<()> {
        if !self.weight.is_finite() {
            return Err(SyncError::Config(format!(
                "weight must be finite, got {}",
                self.weight
            )));
        }
        if !self.frequency_factor.is_finite() {
            return Err(SyncError::Config(format!(
                "frequency_factor must be finite, got {}",
                self.frequency_factor
            )));
        }
        if self.cluster < 1 {
            return Err(SyncError::Config("cluster must be >= 1".to_string()));
        }
        let a = &self.adaptive;
        if !(a.absolute_tolerance >= MIN_ABSOLUTE_TOLERANCE
            && a.absolute_tolerance.is_finite()
            && a.relative_tolerance >= 0.0
            && a.relative_tolerance.is_finite())
        {
            return Err(SyncError::Config(format!(
                "adaptive tolerances out of range, got abs={} (min {MIN_ABSOLUTE_TOLERANCE}) rel={}",
                a.absolute_tolerance, a.relative_tolerance
            )));
        }
        if !(a.min_step > 0.0 && a.min_step.is_finite()) {
            return Err(SyncError::Config(format!(
                "adaptive min_step must be > 0, got {}",
                a.min_step
            )));
        }
        if self.stall_patience < 1 {
            return Err(SyncError::Config(
                "stall_patience must be >= 1".to_string(),
            ));
        }
        if self.max_dynamic_steps < 1 {
            return Err(SyncError::Config(
                "max_dynamic_steps must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SyncError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
