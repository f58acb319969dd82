// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Sync Network
// ─────────────────────────────────────────────────────────────────────
//! Owned oscillator network: phases, natural frequencies, coupling
//! topology, and the phase-derivative law selected at construction.

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use syncnet_physics::{
    global_order, local_order, normalize_phase, Connections, Integrator, Kuramoto, PhaseLaw,
    PhaseSystem, StepReport, Topology,
};
use syncnet_types::{
    ConvergenceOrder, InitialPhases, Oscillator, PhaseWrapping, SolveType, SyncConfig, SyncError,
    SyncResult,
};

/// Cooperative stop signal for long `simulate_dynamic` runs.
///
/// Once raised it stays raised until [`AbortHandle::reset`].
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn abort(&self) {
        log::info!("sync network: abort requested");
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Kuramoto oscillatory network.
///
/// Generic over the phase law; `Kuramoto` unless a variant supplies its
/// own. Order and ensemble queries borrow the network read-only;
/// simulation mutates phases in place.
pub struct SyncNetwork<L: PhaseLaw = Kuramoto> {
    pub(crate) phases: Vec<f64>,
    frequencies: Vec<f64>,
    connections: Connections,
    weight: f64,
    cluster: u32,
    law: L,
    pub(crate) config: SyncConfig,
    integrator: Integrator,
    abort: AbortHandle,
}

impl SyncNetwork<Kuramoto> {
    /// Build a classic Kuramoto network of `size` oscillators.
    pub fn new(size: usize, config: &SyncConfig) -> SyncResult<Self> {
        Self::with_law(size, config, Kuramoto)
    }
}

impl<L: PhaseLaw> SyncNetwork<L> {
    /// Build a network with a custom phase law.
    ///
    /// Frequencies are `frequency_factor · U[0, 1)`; phases follow
    /// `config.initial_phases`. Both are drawn from one seeded stream.
    pub fn with_law(size: usize, config: &SyncConfig, law: L) -> SyncResult<Self> {
        if size == 0 {
            return Err(SyncError::Validation(
                "network needs at least one oscillator".to_string(),
            ));
        }
        config.validate()?;
        let connections = Connections::build(config.connection, size)?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let phases: Vec<f64> = (0..size)
            .map(|i| match config.initial_phases {
                InitialPhases::RandomUniform => normalize_phase(rng.gen::<f64>() * TAU),
                InitialPhases::Equipartition => normalize_phase(i as f64 * TAU / size as f64),
                InitialPhases::Identical => 0.0,
            })
            .collect();
        let frequencies: Vec<f64> = (0..size)
            .map(|_| config.frequency_factor * rng.gen::<f64>())
            .collect();

        log::debug!(
            "sync network: n={size} connection={:?} initial={:?} weight={} q={}",
            config.connection,
            config.initial_phases,
            config.weight,
            config.cluster
        );
        Ok(Self::assemble(phases, frequencies, connections, config, law))
    }

    /// Build from explicit oscillator state and an external topology.
    pub fn from_oscillators(
        oscillators: &[Oscillator],
        topology: &dyn Topology,
        config: &SyncConfig,
        law: L,
    ) -> SyncResult<Self> {
        if oscillators.is_empty() {
            return Err(SyncError::Validation(
                "network needs at least one oscillator".to_string(),
            ));
        }
        config.validate()?;
        if topology.size() != oscillators.len() {
            return Err(SyncError::Topology(format!(
                "topology covers {} oscillators, network has {}",
                topology.size(),
                oscillators.len()
            )));
        }
        let connections = Connections::from_topology(topology)?;
        let phases = oscillators.iter().map(|o| o.phase).collect();
        let frequencies = oscillators.iter().map(|o| o.frequency).collect();
        Ok(Self::assemble(phases, frequencies, connections, config, law))
    }

    fn assemble(
        phases: Vec<f64>,
        frequencies: Vec<f64>,
        connections: Connections,
        config: &SyncConfig,
        law: L,
    ) -> Self {
        let integrator = Integrator::new(phases.len(), config.adaptive);
        Self {
            phases,
            frequencies,
            connections,
            weight: config.weight,
            cluster: config.cluster,
            law,
            config: config.clone(),
            integrator,
            abort: AbortHandle::default(),
        }
    }

    /// Number of oscillators.
    pub fn size(&self) -> usize {
        self.phases.len()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn cluster(&self) -> u32 {
        self.cluster
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn law(&self) -> &L {
        &self.law
    }

    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn oscillator(&self, index: usize) -> Option<Oscillator> {
        Some(Oscillator::new(
            *self.phases.get(index)?,
            self.frequencies[index],
        ))
    }

    /// Snapshot of all oscillators.
    pub fn oscillators(&self) -> Vec<Oscillator> {
        self.phases
            .iter()
            .zip(&self.frequencies)
            .map(|(&p, &f)| Oscillator::new(p, f))
            .collect()
    }

    /// Replace the phase vector (e.g. to re-seed between runs).
    pub fn set_phases(&mut self, phases: &[f64]) -> SyncResult<()> {
        if phases.len() != self.size() {
            return Err(SyncError::Dimension {
                expected: self.size(),
                actual: phases.len(),
            });
        }
        self.phases.copy_from_slice(phases);
        Ok(())
    }

    /// Handle that stops a running `simulate_dynamic` from another thread.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Global Kuramoto order parameter R ∈ [0, 1].
    pub fn sync_order(&self) -> f64 {
        global_order(&self.phases)
    }

    /// Neighbourhood-weighted order parameter.
    pub fn sync_local_order(&self) -> f64 {
        local_order(&self.phases, &self.connections)
    }

    pub(crate) fn convergence_order(&self) -> f64 {
        match self.config.convergence_order {
            ConvergenceOrder::Global => self.sync_order(),
            ConvergenceOrder::Local => self.sync_local_order(),
        }
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.abort.is_aborted()
    }

    /// Advance every oscillator by one macro-step starting at time `t`.
    ///
    /// Phases are folded into (−π, π] afterwards unless the network is
    /// configured with `PhaseWrapping::Unwrapped`.
    pub fn advance(
        &mut self,
        solver: SolveType,
        t: f64,
        step: f64,
        int_step: f64,
    ) -> SyncResult<StepReport> {
        let system = PhaseSystem {
            law: &self.law,
            frequencies: &self.frequencies,
            connections: &self.connections,
            weight: self.weight,
            cluster: self.cluster,
        };
        let report = self
            .integrator
            .advance(&system, solver, t, step, int_step, &mut self.phases)?;
        if self.config.wrapping == PhaseWrapping::Normalized {
            for th in self.phases.iter_mut() {
                *th = normalize_phase(*th);
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use syncnet_physics::CouplingInput;
    use syncnet_types::ConnectionType;

    fn seeded(initial: InitialPhases) -> SyncConfig {
        SyncConfig {
            initial_phases: initial,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            SyncNetwork::new(0, &SyncConfig::default()),
            Err(SyncError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_grid_rejected() {
        let cfg = SyncConfig {
            connection: ConnectionType::GridEight,
            ..Default::default()
        };
        assert!(matches!(
            SyncNetwork::new(7, &cfg),
            Err(SyncError::Topology(_))
        ));
    }

    #[test]
    fn test_random_phases_in_range_and_reproducible() {
        let a = SyncNetwork::new(32, &seeded(InitialPhases::RandomUniform)).unwrap();
        let b = SyncNetwork::new(32, &seeded(InitialPhases::RandomUniform)).unwrap();
        assert_eq!(a.phases(), b.phases());
        assert!(a.phases().iter().all(|&th| th > -PI && th <= PI));
    }

    #[test]
    fn test_equipartition_is_desynchronised() {
        let net = SyncNetwork::new(8, &seeded(InitialPhases::Equipartition)).unwrap();
        assert!(net.sync_order() < 1e-9);
    }

    #[test]
    fn test_identical_phases_fully_synchronised() {
        let net = SyncNetwork::new(5, &seeded(InitialPhases::Identical)).unwrap();
        assert_eq!(net.sync_order(), 1.0);
        assert!((net.sync_local_order() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_factor_scales_frequencies() {
        let cfg = SyncConfig {
            frequency_factor: 3.0,
            seed: Some(1),
            ..Default::default()
        };
        let net = SyncNetwork::new(20, &cfg).unwrap();
        assert!(net.frequencies().iter().all(|&w| (0.0..3.0).contains(&w)));
        assert!(net.frequencies().iter().any(|&w| w > 0.0));
    }

    #[test]
    fn test_from_oscillators_checks_topology_size() {
        let oscs = [Oscillator::new(0.0, 1.0), Oscillator::new(1.0, 2.0)];
        let topo = Connections::build(ConnectionType::AllToAll, 3).unwrap();
        assert!(SyncNetwork::from_oscillators(&oscs, &topo, &SyncConfig::default(), Kuramoto)
            .is_err());

        let topo = Connections::build(ConnectionType::AllToAll, 2).unwrap();
        let net =
            SyncNetwork::from_oscillators(&oscs, &topo, &SyncConfig::default(), Kuramoto).unwrap();
        assert_eq!(net.oscillators(), oscs.to_vec());
        assert_eq!(net.oscillator(1), Some(Oscillator::new(1.0, 2.0)));
        assert_eq!(net.oscillator(2), None);
    }

    #[test]
    fn test_wrapping_modes() {
        let oscs = [Oscillator::new(3.0, 10.0)];
        let topo = Connections::build(ConnectionType::None, 1).unwrap();

        let mut wrapped =
            SyncNetwork::from_oscillators(&oscs, &topo, &SyncConfig::default(), Kuramoto)
                .unwrap();
        wrapped.advance(SolveType::Fast, 0.0, 0.1, 0.1).unwrap();
        assert!((wrapped.phases()[0] - normalize_phase(4.0)).abs() < 1e-12);

        let cfg = SyncConfig {
            wrapping: PhaseWrapping::Unwrapped,
            ..Default::default()
        };
        let mut unwrapped = SyncNetwork::from_oscillators(&oscs, &topo, &cfg, Kuramoto).unwrap();
        unwrapped.advance(SolveType::Fast, 0.0, 0.1, 0.1).unwrap();
        assert!((unwrapped.phases()[0] - 4.0).abs() < 1e-12);
    }

    /// Variant law: oscillators repel instead of attract.
    struct Repulsive;

    impl PhaseLaw for Repulsive {
        fn phase_derivative(&self, t: f64, theta: f64, input: &CouplingInput<'_>) -> f64 {
            2.0 * input.frequency - Kuramoto.phase_derivative(t, theta, input)
        }
    }

    #[test]
    fn test_custom_law_drives_network() {
        let cfg = SyncConfig {
            initial_phases: InitialPhases::Identical,
            seed: Some(3),
            ..Default::default()
        };
        let mut net = SyncNetwork::with_law(4, &cfg, Repulsive).unwrap();
        net.set_phases(&[0.0, 0.1, 0.2, 0.3]).unwrap();
        let before = net.sync_order();
        for k in 0..200 {
            net.advance(SolveType::Rk4, k as f64 * 0.05, 0.05, 0.01).unwrap();
        }
        assert!(net.sync_order() < before);
    }

    #[test]
    fn test_abort_handle_shared() {
        let net = SyncNetwork::new(2, &SyncConfig::default()).unwrap();
        let handle = net.abort_handle();
        assert!(!net.is_aborted());
        handle.abort();
        assert!(net.is_aborted());
        handle.reset();
        assert!(!net.is_aborted());
    }
}
