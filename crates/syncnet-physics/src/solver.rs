// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Phase Integrators
// ─────────────────────────────────────────────────────────────────────
//! Synchronous integrators for the network phase ODE.
//!
//! - `Fast`:  explicit Euler over the whole macro-step.
//! - `Rk4`:   classic Runge-Kutta on ceil(macro / micro) equal sub-steps.
//! - `Rkf45`: Runge-Kutta-Fehlberg 4(5), adaptive sub-steps ≤ micro.
//!
//! Each stage evaluates every oscillator from the same frozen vector
//! into a scratch buffer before anything is written back. Pre-allocated
//! scratch keeps the stepping loop allocation-free.

use syncnet_types::{AdaptiveSettings, SolveType, SyncError, SyncResult};

use crate::law::{PhaseLaw, PhaseSystem};

// Fehlberg tableau.
const A2: [f64; 1] = [1.0 / 4.0];
const A3: [f64; 2] = [3.0 / 32.0, 9.0 / 32.0];
const A4: [f64; 3] = [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0];
const A5: [f64; 4] = [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0];
const A6: [f64; 5] = [
    -8.0 / 27.0,
    2.0,
    -3544.0 / 2565.0,
    1859.0 / 4104.0,
    -11.0 / 40.0,
];
const C: [f64; 6] = [0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0];
/// Fifth-order weights (propagated solution).
const B5: [f64; 6] = [
    16.0 / 135.0,
    0.0,
    6656.0 / 12825.0,
    28561.0 / 56430.0,
    -9.0 / 50.0,
    2.0 / 55.0,
];
/// B5 − B4: embedded error estimate.
const E: [f64; 6] = [
    1.0 / 360.0,
    0.0,
    -128.0 / 4275.0,
    -2197.0 / 75240.0,
    1.0 / 50.0,
    2.0 / 55.0,
];

const SAFETY: f64 = 0.9;
const MIN_SHRINK: f64 = 0.2;
const MAX_GROWTH: f64 = 5.0;
/// Upper bound on fixed sub-steps per macro-step.
const MAX_SUB_STEPS: usize = 10_000_000;

/// Work done by one `advance` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Accepted sub-steps.
    pub sub_steps: usize,
    /// Sub-steps rejected by the adaptive error check.
    pub rejected: usize,
}

/// Stateful integrator owning all per-step scratch.
pub struct Integrator {
    n: usize,
    adaptive: AdaptiveSettings,
    // Stage derivatives k1..k6
    k: [Vec<f64>; 6],
    // Stage input vector
    stage: Vec<f64>,
    // Candidate solution of an adaptive sub-step
    candidate: Vec<f64>,
}

impl Integrator {
    pub fn new(n: usize, adaptive: AdaptiveSettings) -> Self {
        Self {
            n,
            adaptive,
            k: std::array::from_fn(|_| vec![0.0; n]),
            stage: vec![0.0; n],
            candidate: vec![0.0; n],
        }
    }

    /// Advance `phases` from `t` to `t + macro_step`.
    ///
    /// `micro_step` is the sub-step length for `Rk4` and the upper bound
    /// for `Rkf45`; `Fast` ignores it. Phases are left unwrapped and
    /// non-finite values propagate untouched.
    pub fn advance<L: PhaseLaw + ?Sized>(
        &mut self,
        system: &PhaseSystem<'_, L>,
        solver: SolveType,
        t: f64,
        macro_step: f64,
        micro_step: f64,
        phases: &mut [f64],
    ) -> SyncResult<StepReport> {
        if phases.len() != self.n || system.size() != self.n {
            return Err(SyncError::Dimension {
                expected: self.n,
                actual: if phases.len() != self.n {
                    phases.len()
                } else {
                    system.size()
                },
            });
        }
        if !(macro_step > 0.0 && macro_step.is_finite()) {
            return Err(SyncError::Validation(format!(
                "macro step must be positive and finite, got {macro_step}"
            )));
        }
        if solver != SolveType::Fast && !(micro_step > 0.0 && micro_step.is_finite()) {
            return Err(SyncError::Validation(format!(
                "micro step must be positive and finite, got {micro_step}"
            )));
        }

        let report = match solver {
            SolveType::Fast => {
                self.euler(system, t, macro_step, phases);
                StepReport {
                    sub_steps: 1,
                    rejected: 0,
                }
            }
            SolveType::Rk4 => {
                // Tolerate ratios like 10.000000000000002 from decimal steps.
                let ratio = (macro_step / micro_step - 1e-9).ceil().max(1.0);
                if ratio > MAX_SUB_STEPS as f64 {
                    return Err(SyncError::Validation(format!(
                        "micro step {micro_step} needs {ratio:e} sub-steps, limit is {MAX_SUB_STEPS}"
                    )));
                }
                let sub_steps = ratio as usize;
                let h = macro_step / sub_steps as f64;
                for s in 0..sub_steps {
                    self.rk4(system, t + s as f64 * h, h, phases);
                }
                StepReport {
                    sub_steps,
                    rejected: 0,
                }
            }
            SolveType::Rkf45 => self.rkf45(system, t, macro_step, micro_step, phases),
        };
        Ok(report)
    }

    fn euler<L: PhaseLaw + ?Sized>(
        &mut self,
        system: &PhaseSystem<'_, L>,
        t: f64,
        h: f64,
        phases: &mut [f64],
    ) {
        let k1 = &mut self.k[0];
        system.derivatives(t, phases, k1);
        for (th, d) in phases.iter_mut().zip(k1.iter()) {
            *th += h * d;
        }
    }

    fn rk4<L: PhaseLaw + ?Sized>(
        &mut self,
        system: &PhaseSystem<'_, L>,
        t: f64,
        h: f64,
        phases: &mut [f64],
    ) {
        let [k1, k2, k3, k4, _, _] = &mut self.k;
        let stage = &mut self.stage;

        system.derivatives(t, phases, k1);

        for i in 0..self.n {
            stage[i] = phases[i] + 0.5 * h * k1[i];
        }
        system.derivatives(t + 0.5 * h, stage.as_slice(), k2);

        for i in 0..self.n {
            stage[i] = phases[i] + 0.5 * h * k2[i];
        }
        system.derivatives(t + 0.5 * h, stage.as_slice(), k3);

        for i in 0..self.n {
            stage[i] = phases[i] + h * k3[i];
        }
        system.derivatives(t + h, stage.as_slice(), k4);

        for i in 0..self.n {
            phases[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
    }

    fn rkf45<L: PhaseLaw + ?Sized>(
        &mut self,
        system: &PhaseSystem<'_, L>,
        t: f64,
        span: f64,
        h_max: f64,
        phases: &mut [f64],
    ) -> StepReport {
        let t_end = t + span;
        let min_step = self.adaptive.min_step.min(h_max);
        let mut report = StepReport::default();
        let mut t_cur = t;
        let mut h = h_max.min(span);

        loop {
            let remaining = t_end - t_cur;
            if remaining <= f64::EPSILON * t_end.abs().max(1.0) {
                break;
            }
            h = h.min(remaining);

            let err = self.rkf45_trial(system, t_cur, h, phases);
            let forced = h <= min_step;
            // NaN error: accept and let the non-finite phases propagate.
            if err <= 1.0 || forced || err.is_nan() {
                phases.copy_from_slice(&self.candidate);
                t_cur += h;
                report.sub_steps += 1;
                // Never shrink below min_step, or forced steps stop covering the span.
                h = (h * step_factor(err)).clamp(min_step, h_max);
            } else {
                report.rejected += 1;
                h = (h * step_factor(err)).max(min_step);
            }
        }

        log::trace!(
            "rkf45: span={span} accepted={} rejected={}",
            report.sub_steps,
            report.rejected
        );
        report
    }

    /// Compute one Fehlberg step of size `h` into `self.candidate` and
    /// return the scaled error norm (≤ 1 means acceptable).
    fn rkf45_trial<L: PhaseLaw + ?Sized>(
        &mut self,
        system: &PhaseSystem<'_, L>,
        t: f64,
        h: f64,
        phases: &[f64],
    ) -> f64 {
        let n = self.n;
        let stage = &mut self.stage;
        let k = &mut self.k;

        system.derivatives(t, phases, &mut k[0]);
        let rows: [&[f64]; 5] = [&A2, &A3, &A4, &A5, &A6];
        for (s, row) in rows.iter().enumerate() {
            let (done, rest) = k.split_at_mut(s + 1);
            for i in 0..n {
                let incr: f64 = row.iter().zip(done.iter()).map(|(a, kj)| a * kj[i]).sum();
                stage[i] = phases[i] + h * incr;
            }
            system.derivatives(t + C[s + 1] * h, stage.as_slice(), &mut rest[0]);
        }

        let abs_tol = self.adaptive.absolute_tolerance;
        let rel_tol = self.adaptive.relative_tolerance;
        let mut err_norm: f64 = 0.0;
        for i in 0..n {
            let (mut incr, mut err) = (0.0, 0.0);
            for s in 0..6 {
                incr += B5[s] * k[s][i];
                err += E[s] * k[s][i];
            }
            let next = phases[i] + h * incr;
            self.candidate[i] = next;
            let scale = abs_tol + rel_tol * phases[i].abs().max(next.abs());
            let e = (h * err).abs() / scale;
            // Keep NaN sticky: f64::max would drop it.
            if e.is_nan() || err_norm.is_nan() {
                err_norm = f64::NAN;
            } else {
                err_norm = err_norm.max(e);
            }
        }
        err_norm
    }
}

fn step_factor(err: f64) -> f64 {
    if err.is_nan() {
        return 1.0;
    }
    if err == 0.0 {
        return MAX_GROWTH;
    }
    (SAFETY * err.powf(-0.2)).clamp(MIN_SHRINK, MAX_GROWTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::law::{CouplingInput, Kuramoto};
    use crate::topology::Connections;
    use syncnet_types::ConnectionType;

    /// dθ/dt = θ, exact solution θ0·e^t; exercises solver accuracy.
    struct Growth;

    impl PhaseLaw for Growth {
        fn phase_derivative(&self, _t: f64, theta: f64, _input: &CouplingInput<'_>) -> f64 {
            theta
        }
    }

    fn run(solver: SolveType, micro: f64) -> (f64, StepReport) {
        let c = Connections::build(ConnectionType::None, 1).unwrap();
        let omega = [0.0];
        let sys = PhaseSystem {
            law: &Growth,
            frequencies: &omega,
            connections: &c,
            weight: 0.0,
            cluster: 1,
        };
        let mut integrator = Integrator::new(1, AdaptiveSettings::default());
        let mut theta = [1.0];
        let report = integrator
            .advance(&sys, solver, 0.0, 1.0, micro, &mut theta)
            .unwrap();
        (theta[0], report)
    }

    #[test]
    fn test_euler_single_evaluation() {
        let (theta, report) = run(SolveType::Fast, 0.1);
        assert_eq!(theta, 2.0);
        assert_eq!(report.sub_steps, 1);
    }

    #[test]
    fn test_rk4_accuracy() {
        let (theta, report) = run(SolveType::Rk4, 0.01);
        assert_eq!(report.sub_steps, 100);
        assert!((theta - std::f64::consts::E).abs() < 1e-9, "θ={theta}");
    }

    #[test]
    fn test_rkf45_accuracy_and_bound() {
        let (theta, report) = run(SolveType::Rkf45, 0.05);
        // Sub-steps never exceed the micro bound.
        assert!(report.sub_steps >= 20);
        assert!((theta - std::f64::consts::E).abs() < 1e-6, "θ={theta}");
    }

    #[test]
    fn test_rkf45_rejects_oversized_steps() {
        let (theta, report) = run(SolveType::Rkf45, 1.0);
        assert!(report.rejected > 0, "{report:?}");
        assert!((theta - std::f64::consts::E).abs() < 1e-5, "θ={theta}");
    }

    #[test]
    fn test_rkf45_forced_acceptance_covers_span() {
        // Tolerance unreachable at min_step: every step there is forced.
        let c = Connections::build(ConnectionType::None, 1).unwrap();
        let omega = [0.0];
        let sys = PhaseSystem {
            law: &Growth,
            frequencies: &omega,
            connections: &c,
            weight: 0.0,
            cluster: 1,
        };
        let adaptive = AdaptiveSettings {
            absolute_tolerance: 1e-30,
            relative_tolerance: 0.0,
            min_step: 0.25,
        };
        let mut integrator = Integrator::new(1, adaptive);
        let mut theta = [1.0];
        let report = integrator
            .advance(&sys, SolveType::Rkf45, 0.0, 1.0, 1.0, &mut theta)
            .unwrap();
        assert_eq!(
            report,
            StepReport {
                sub_steps: 4,
                rejected: 1
            }
        );
        assert!((theta[0] - std::f64::consts::E).abs() < 1e-4, "θ={}", theta[0]);
    }

    #[test]
    fn test_rk4_sub_step_limit() {
        let c = Connections::build(ConnectionType::None, 1).unwrap();
        let omega = [1.0];
        let sys = PhaseSystem {
            law: &Kuramoto,
            frequencies: &omega,
            connections: &c,
            weight: 0.0,
            cluster: 1,
        };
        let mut integrator = Integrator::new(1, AdaptiveSettings::default());
        let mut theta = [0.0];
        assert!(matches!(
            integrator.advance(&sys, SolveType::Rk4, 0.0, 1.0, 1e-300, &mut theta),
            Err(SyncError::Validation(_))
        ));
        assert_eq!(theta[0], 0.0);
    }

    #[test]
    fn test_synchronous_update_uses_pre_step_phases() {
        // Oscillator 0 much faster than oscillator 1.
        let c = Connections::build(ConnectionType::AllToAll, 2).unwrap();
        let omega = [50.0, 0.0];
        let weight = 1.0;
        let sys = PhaseSystem {
            law: &Kuramoto,
            frequencies: &omega,
            connections: &c,
            weight,
            cluster: 1,
        };
        let mut integrator = Integrator::new(2, AdaptiveSettings::default());
        let before = [0.2, 1.0];
        let mut theta = before;
        let h = 0.01;
        integrator
            .advance(&sys, SolveType::Fast, 0.0, h, h, &mut theta)
            .unwrap();

        let expected_0 = before[0] + h * (omega[0] + weight / 2.0 * (before[1] - before[0]).sin());
        let expected_1 = before[1] + h * (omega[1] + weight / 2.0 * (before[0] - before[1]).sin());
        assert!((theta[0] - expected_0).abs() < 1e-15);
        assert!((theta[1] - expected_1).abs() < 1e-15);

        // A sequential in-place update would have used the advanced θ_0.
        let biased_1 = before[1] + h * (weight / 2.0 * (expected_0 - before[1]).sin());
        assert!((theta[1] - biased_1).abs() > 1e-5);
    }

    #[test]
    fn test_rk4_matches_manual_stages() {
        let c = Connections::build(ConnectionType::AllToAll, 2).unwrap();
        let omega = [3.0, 1.0];
        let sys = PhaseSystem {
            law: &Kuramoto,
            frequencies: &omega,
            connections: &c,
            weight: 2.0,
            cluster: 1,
        };
        let f = |th: [f64; 2]| {
            [
                omega[0] + (th[1] - th[0]).sin(),
                omega[1] + (th[0] - th[1]).sin(),
            ]
        };
        let y = [0.0, 1.0];
        let h = 0.1;
        let k1 = f(y);
        let k2 = f([y[0] + 0.5 * h * k1[0], y[1] + 0.5 * h * k1[1]]);
        let k3 = f([y[0] + 0.5 * h * k2[0], y[1] + 0.5 * h * k2[1]]);
        let k4 = f([y[0] + h * k3[0], y[1] + h * k3[1]]);
        let expected: Vec<f64> = (0..2)
            .map(|i| y[i] + h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]))
            .collect();

        let mut integrator = Integrator::new(2, AdaptiveSettings::default());
        let mut theta = y;
        integrator
            .advance(&sys, SolveType::Rk4, 0.0, h, h, &mut theta)
            .unwrap();
        assert!((theta[0] - expected[0]).abs() < 1e-14);
        assert!((theta[1] - expected[1]).abs() < 1e-14);
    }

    #[test]
    fn test_nan_propagates_without_hanging() {
        let c = Connections::build(ConnectionType::AllToAll, 2).unwrap();
        let omega = [1.0, 1.0];
        let sys = PhaseSystem {
            law: &Kuramoto,
            frequencies: &omega,
            connections: &c,
            weight: 1.0,
            cluster: 1,
        };
        let mut integrator = Integrator::new(2, AdaptiveSettings::default());
        let mut theta = [f64::NAN, 0.0];
        integrator
            .advance(&sys, SolveType::Rkf45, 0.0, 0.1, 0.01, &mut theta)
            .unwrap();
        assert!(theta[0].is_nan());
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let c = Connections::build(ConnectionType::AllToAll, 2).unwrap();
        let omega = [1.0, 1.0];
        let sys = PhaseSystem {
            law: &Kuramoto,
            frequencies: &omega,
            connections: &c,
            weight: 1.0,
            cluster: 1,
        };
        let mut integrator = Integrator::new(2, AdaptiveSettings::default());
        let mut short = [0.0];
        assert!(matches!(
            integrator.advance(&sys, SolveType::Fast, 0.0, 0.1, 0.1, &mut short),
            Err(SyncError::Dimension { expected: 2, actual: 1 })
        ));
        let mut theta = [0.0, 0.0];
        assert!(integrator
            .advance(&sys, SolveType::Rk4, 0.0, 0.0, 0.1, &mut theta)
            .is_err());
        assert!(integrator
            .advance(&sys, SolveType::Rk4, 0.0, 0.1, -1.0, &mut theta)
            .is_err());
    }
}
