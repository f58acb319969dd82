// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Simulation Drivers
// ─────────────────────────────────────────────────────────────────────
//! Fixed-duration and convergence-driven simulation loops.
//!
//! Running ─┬─▶ Converged   (order ≥ target)
//!          ├─▶ Stalled     (|Δorder| < threshold for `stall_patience` steps)
//!          ├─▶ StepLimit   (`max_dynamic_steps` reached)
//!          ├─▶ NonFinite   (order is NaN/Inf)
//!          └─▶ Aborted     (abort handle raised)

use syncnet_physics::PhaseLaw;
use syncnet_types::{DynamicOutcome, SolveType, SyncError, SyncResult, Termination, Trajectory};

use crate::network::SyncNetwork;

impl<L: PhaseLaw> SyncNetwork<L> {
    /// Simulate `total_time` in `steps` equal macro-steps.
    ///
    /// With `collect_dynamic` the trajectory holds the initial state and
    /// every macro-step (`steps + 1` states); otherwise only the final
    /// state. The micro-step is a tenth of the macro-step.
    pub fn simulate(
        &mut self,
        steps: usize,
        total_time: f64,
        solver: SolveType,
        collect_dynamic: bool,
    ) -> SyncResult<Trajectory> {
        if steps == 0 {
            return Err(SyncError::Validation("steps must be >= 1".to_string()));
        }
        if !(total_time > 0.0 && total_time.is_finite()) {
            return Err(SyncError::Validation(format!(
                "total_time must be positive and finite, got {total_time}"
            )));
        }

        let step = total_time / steps as f64;
        let int_step = step / 10.0;
        let mut trajectory = if collect_dynamic {
            Trajectory::with_capacity(self.size(), steps + 1)
        } else {
            Trajectory::with_capacity(self.size(), 1)
        };
        if collect_dynamic {
            trajectory.record(0.0, &self.phases)?;
        }

        log::debug!(
            "simulate: n={} steps={steps} time={total_time} solver={solver:?}",
            self.size()
        );
        let mut sub_steps = 0usize;
        for k in 0..steps {
            let t = k as f64 * step;
            sub_steps += self.advance(solver, t, step, int_step)?.sub_steps;
            if collect_dynamic {
                trajectory.record((k + 1) as f64 * step, &self.phases)?;
            }
        }
        if !collect_dynamic {
            trajectory.record(steps as f64 * step, &self.phases)?;
        }
        log::debug!(
            "simulate: done, sub_steps={sub_steps} R={:.4}",
            self.sync_order()
        );
        Ok(trajectory)
    }

    /// Fixed-topology, fixed-step-count simulation; same contract as
    /// [`SyncNetwork::simulate`].
    pub fn simulate_static(
        &mut self,
        steps: usize,
        total_time: f64,
        solver: SolveType,
        collect_dynamic: bool,
    ) -> SyncResult<Trajectory> {
        self.simulate(steps, total_time, solver, collect_dynamic)
    }

    /// Simulate until the order parameter reaches `target_order` or stops
    /// changing.
    ///
    /// Each macro-step has length `step` and is integrated with micro-step
    /// `integration_step`. The watched order is global unless configured
    /// as `ConvergenceOrder::Local`. Termination is bounded by
    /// `SyncConfig::max_dynamic_steps`.
    pub fn simulate_dynamic(
        &mut self,
        target_order: f64,
        solver: SolveType,
        collect_dynamic: bool,
        step: f64,
        integration_step: f64,
        change_threshold: f64,
    ) -> SyncResult<DynamicOutcome> {
        if !(step > 0.0 && step.is_finite()) {
            return Err(SyncError::Validation(format!(
                "step must be positive and finite, got {step}"
            )));
        }
        if !(integration_step > 0.0 && integration_step.is_finite()) {
            return Err(SyncError::Validation(format!(
                "integration_step must be positive and finite, got {integration_step}"
            )));
        }

        let max_steps = self.config.max_dynamic_steps;
        let patience = self.config.stall_patience;
        let mut trajectory = Trajectory::new(self.size());
        let mut time = 0.0;
        let mut steps = 0usize;
        let mut calm_steps = 0usize;
        let mut order = self.convergence_order();

        if collect_dynamic {
            trajectory.record(time, &self.phases)?;
        }

        let termination = loop {
            if !order.is_finite() {
                log::warn!("simulate_dynamic: order became non-finite after {steps} steps");
                break Termination::NonFinite;
            }
            if order >= target_order {
                break Termination::Converged;
            }
            if self.is_aborted() {
                break Termination::Aborted;
            }
            if steps >= max_steps {
                log::warn!(
                    "simulate_dynamic: step limit {max_steps} reached at R={order:.6} \
                     (target {target_order})"
                );
                break Termination::StepLimit;
            }

            self.advance(solver, time, step, integration_step)?;
            steps += 1;
            time = steps as f64 * step;
            if collect_dynamic {
                trajectory.record(time, &self.phases)?;
            }

            let previous = order;
            order = self.convergence_order();
            if (order - previous).abs() < change_threshold {
                calm_steps += 1;
                if calm_steps >= patience && order < target_order {
                    break Termination::Stalled;
                }
            } else {
                calm_steps = 0;
            }
        };

        if !collect_dynamic {
            trajectory.record(time, &self.phases)?;
        }
        log::debug!(
            "simulate_dynamic: {termination:?} after {steps} steps, R={order:.6}, t={time}"
        );
        Ok(DynamicOutcome {
            trajectory,
            order,
            steps,
            time,
            termination,
        })
    }
}
