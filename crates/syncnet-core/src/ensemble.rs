// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Sync Ensemble Allocation
// ─────────────────────────────────────────────────────────────────────
//! Partition oscillators into clusters of (near-)equal phase.
//!
//! Two oscillators are linked when their circular phase distance is at
//! most `tolerance`; ensembles are the connected components of that
//! graph, so chains A~B~C end up together even if A and C are far apart.

use std::collections::VecDeque;

use syncnet_physics::{circular_distance, normalize_phase, PhaseLaw};
use syncnet_types::SyncEnsembles;

use crate::network::SyncNetwork;

/// Default phase tolerance for ensemble allocation (rad).
pub const DEFAULT_ENSEMBLE_TOLERANCE: f64 = 0.01;

/// Group `phases` into synchronous ensembles.
///
/// A non-positive or NaN `tolerance` yields one singleton per oscillator.
pub fn allocate_ensembles(phases: &[f64], tolerance: f64) -> SyncEnsembles {
    let n = phases.len();
    if !(tolerance > 0.0) {
        return SyncEnsembles::new((0..n).map(|i| vec![i]).collect());
    }

    let normalized: Vec<f64> = phases.iter().map(|&th| normalize_phase(th)).collect();
    let mut assigned = vec![false; n];
    let mut clusters = Vec::new();
    let mut frontier = VecDeque::new();

    for seed in 0..n {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut cluster = vec![seed];
        frontier.push_back(seed);

        while let Some(member) = frontier.pop_front() {
            for candidate in 0..n {
                if !assigned[candidate]
                    && circular_distance(normalized[member], normalized[candidate]) <= tolerance
                {
                    assigned[candidate] = true;
                    cluster.push(candidate);
                    frontier.push_back(candidate);
                }
            }
        }
        clusters.push(cluster);
    }

    SyncEnsembles::new(clusters)
}

impl<L: PhaseLaw> SyncNetwork<L> {
    /// Allocate synchronous ensembles from the current phases.
    ///
    /// See [`DEFAULT_ENSEMBLE_TOLERANCE`] for the customary tolerance.
    pub fn allocate_sync_ensembles(&self, tolerance: f64) -> SyncEnsembles {
        allocate_ensembles(&self.phases, tolerance)
    }
}
