// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — SyncNet Dynamics Types
// ─────────────────────────────────────────────────────────────────────
//! Oscillator state, recorded trajectories, and clustering output.

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// A single phase oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    /// Current phase (rad). Not restricted to a canonical range.
    pub phase: f64,
    /// Natural angular frequency (rad/s).
    pub frequency: f64,
}

impl Oscillator {
    pub fn new(phase: f64, frequency: f64) -> Self {
        Self { phase, frequency }
    }
}

/// One recorded (time, phase) pair of one oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicSample {
    pub time: f64,
    pub phase: f64,
}

/// Recorded network dynamics.
///
/// Flat step-major storage: `phases[k * size + i]` is the phase of
/// oscillator `i` at `times[k]`. Every oscillator shares the same time
/// stamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    size: usize,
    times: Vec<f64>,
    phases: Vec<f64>,
}

impl Trajectory {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            times: Vec::new(),
            phases: Vec::new(),
        }
    }

    /// Pre-allocate room for `states` recorded network states.
    pub fn with_capacity(size: usize, states: usize) -> Self {
        Self {
            size,
            times: Vec::with_capacity(states),
            phases: Vec::with_capacity(states.saturating_mul(size)),
        }
    }

    /// Append the full phase vector observed at `time`.
    pub fn record(&mut self, time: f64, phases: &[f64]) -> SyncResult<()> {
        if phases.len() != self.size {
            return Err(SyncError::Dimension {
                expected: self.size,
                actual: phases.len(),
            });
        }
        self.times.push(time);
        self.phases.extend_from_slice(phases);
        Ok(())
    }

    /// Number of oscillators per state.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of recorded network states.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Phase vector of the `step`-th recorded state.
    pub fn state(&self, step: usize) -> Option<&[f64]> {
        if step >= self.len() {
            return None;
        }
        let start = step * self.size;
        Some(&self.phases[start..start + self.size])
    }

    pub fn last_state(&self) -> Option<&[f64]> {
        self.len().checked_sub(1).and_then(|k| self.state(k))
    }

    pub fn last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Samples of one oscillator in time order.
    ///
    /// Empty when `index` is out of range.
    pub fn samples(&self, index: usize) -> impl Iterator<Item = DynamicSample> + '_ {
        let size = self.size;
        let valid = index < size;
        self.times
            .iter()
            .enumerate()
            .filter(move |_| valid)
            .map(move |(k, &time)| DynamicSample {
                time,
                phase: self.phases[k * size + index],
            })
    }

    /// Owned per-oscillator sample sequence.
    pub fn oscillator_dynamic(&self, index: usize) -> Vec<DynamicSample> {
        self.samples(index).collect()
    }
}

/// Partition of oscillator indices into synchronous ensembles.
///
/// Members are ascending within an ensemble; ensembles are ordered by
/// their smallest member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEnsembles {
    clusters: Vec<Vec<usize>>,
}

impl SyncEnsembles {
    /// Wrap pre-built clusters, normalising their order.
    pub fn new(mut clusters: Vec<Vec<usize>>) -> Self {
        clusters.retain(|c| !c.is_empty());
        for cluster in clusters.iter_mut() {
            cluster.sort_unstable();
        }
        clusters.sort_unstable_by_key(|c| c[0]);
        Self { clusters }
    }

    /// Number of ensembles.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.clusters.iter().map(Vec::as_slice)
    }

    pub fn get(&self, ensemble: usize) -> Option<&[usize]> {
        self.clusters.get(ensemble).map(Vec::as_slice)
    }

    /// Index of the ensemble containing `oscillator`.
    pub fn ensemble_of(&self, oscillator: usize) -> Option<usize> {
        self.clusters
            .iter()
            .position(|c| c.binary_search(&oscillator).is_ok())
    }

    pub fn into_inner(self) -> Vec<Vec<usize>> {
        self.clusters
    }
}

/// Terminal state of a convergence-driven simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Order reached or exceeded the target.
    Converged,
    /// Order stopped changing before reaching the target.
    Stalled,
    /// Macro-step ceiling reached.
    StepLimit,
    /// Order became NaN or infinite.
    NonFinite,
    /// Stopped through the network's abort handle.
    Aborted,
}

/// Result of `simulate_dynamic`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicOutcome {
    pub trajectory: Trajectory,
    /// Order parameter at termination.
    pub order: f64,
    /// Macro-steps taken.
    pub steps: usize,
    /// Simulated time at termination.
    pub time: f64,
    pub termination: Termination,
}

impl DynamicOutcome {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}
