// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — ODE Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Initial value solver over [`ivp::solve_ivp`].
//!
//! `solve_ivp` integrates `dy/dt = f(t, y)` forward over `[t0, tf]` and
//! returns the state at each requested evaluation time. Systems implement
//! [`ODE`]. The step budget goes straight to the solver; the wall-clock
//! budget and the abort flag are polled from a terminal event after every
//! accepted step.
//!
//! Failure modes are reported as errors, never as sentinel values:
//!
//! - non-finite derivative at the start, or one that stalls the step
//!   controller → [`KleoError::SingularTrajectory`]
//! - step budget, step-size underflow, stiffness, timeout →
//!   [`KleoError::IntegrationFailure`]
//! - abort flag raised → [`KleoError::Cancelled`]

use ivp::prelude::{solve_ivp as ivp_solve, EventConfig, Method, Options, Status};
use kleo_types::config::{IntegrationMethod, SolverConfig};
use kleo_types::error::{KleoError, KleoResult};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use ivp::prelude::ODE;

/// Solver options.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    pub method: IntegrationMethod,
    pub rtol: f64,
    pub atol: f64,
    /// Attempted steps allowed per solve.
    pub max_steps: usize,
    pub first_step: Option<f64>,
    /// Wall-clock budget per solve.
    pub timeout: Option<Duration>,
    /// Times at which the state is returned; `tf` alone when empty.
    pub t_eval: Vec<f64>,
    /// Cooperative abort flag checked once per accepted step.
    pub abort: Option<Arc<AtomicBool>>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions::from(&SolverConfig::default())
    }
}

impl From<&SolverConfig> for SolverOptions {
    fn from(cfg: &SolverConfig) -> Self {
        SolverOptions {
            method: cfg.method,
            rtol: cfg.rtol,
            atol: cfg.atol,
            max_steps: cfg.max_steps,
            first_step: cfg.first_step,
            timeout: cfg.timeout_ms.map(Duration::from_millis),
            t_eval: Vec::new(),
            abort: None,
        }
    }
}

impl SolverOptions {
    pub fn with_method(mut self, method: IntegrationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    pub fn with_t_eval(mut self, t_eval: Vec<f64>) -> Self {
        self.t_eval = t_eval;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_abort(mut self, abort: Arc<AtomicBool>) -> Self {
        self.abort = Some(abort);
        self
    }
}

/// Solver scheme for a configured method.
pub fn ivp_method(method: IntegrationMethod) -> Method {
    match method {
        IntegrationMethod::Dop853 => Method::DOP853,
        IntegrationMethod::Dopri5 => Method::DOPRI5,
        IntegrationMethod::Rk23 => Method::RK23,
        IntegrationMethod::Radau => Method::RADAU,
        IntegrationMethod::Bdf => Method::BDF,
    }
}

/// Work counters of one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    /// Right-hand side evaluations.
    pub nfev: usize,
    /// Attempted steps.
    pub steps: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// States at the requested evaluation times.
#[derive(Debug, Clone)]
pub struct OdeSolution<const N: usize> {
    pub t: Vec<f64>,
    pub y: Vec<[f64; N]>,
    pub stats: SolverStats,
}

impl<const N: usize> OdeSolution<N> {
    /// Last returned `(t, y)` pair.
    pub fn last(&self) -> Option<(f64, &[f64; N])> {
        Some((*self.t.last()?, self.y.last()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &[f64; N])> {
        self.t.iter().copied().zip(self.y.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Aborted,
    TimedOut,
}

/// Wraps a system with the per-solve limits and records what the solver
/// itself does not report: the first non-finite derivative and the last
/// accepted time.
struct Monitored<'a, S: ?Sized> {
    system: &'a S,
    abort: Option<&'a AtomicBool>,
    deadline: Option<(Instant, Duration)>,
    non_finite_at: Cell<Option<f64>>,
    last_t: Cell<f64>,
    stop: Cell<Option<StopReason>>,
}

impl<'a, S: ODE + ?Sized> Monitored<'a, S> {
    fn new(system: &'a S, t0: f64, options: &'a SolverOptions) -> Self {
        Monitored {
            system,
            abort: options.abort.as_deref(),
            deadline: options.timeout.map(|limit| (Instant::now(), limit)),
            non_finite_at: Cell::new(None),
            last_t: Cell::new(t0),
            stop: Cell::new(None),
        }
    }

    fn stop_requested(&self) -> Option<StopReason> {
        if self.abort.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Some(StopReason::Aborted);
        }
        match self.deadline {
            Some((started, limit)) if started.elapsed() >= limit => Some(StopReason::TimedOut),
            _ => None,
        }
    }

    fn stop_error(&self, reason: StopReason, steps: usize) -> KleoError {
        match reason {
            StopReason::Aborted => KleoError::Cancelled,
            StopReason::TimedOut => KleoError::IntegrationFailure {
                t: self.last_t.get(),
                steps,
                message: format!(
                    "timeout after {:?}",
                    self.deadline.map(|(_, limit)| limit).unwrap_or_default()
                ),
            },
        }
    }
}

impl<S: ODE + ?Sized> ODE for Monitored<'_, S> {
    fn ode(&self, t: f64, y: &[f64], dydt: &mut [f64]) {
        self.system.ode(t, y, dydt);
        if self.non_finite_at.get().is_none() && dydt.iter().any(|v| !v.is_finite()) {
            self.non_finite_at.set(Some(t));
        }
    }

    /// Positive while the solve may continue; flips negative once a stop is
    /// requested so the terminal event fires on the next accepted step.
    fn event(&self, t: f64, _y: &[f64], event: &mut EventConfig) -> f64 {
        event.terminal();
        self.last_t.set(self.last_t.get().max(t));
        match self.stop_requested() {
            Some(reason) => {
                self.stop.set(Some(reason));
                -1.0
            }
            None => 1.0,
        }
    }
}

/// Integrate `system` from `t_span.0` to `t_span.1` starting at `y0`.
pub fn solve_ivp<S, const N: usize>(
    system: &S,
    t_span: (f64, f64),
    y0: &[f64; N],
    options: &SolverOptions,
) -> KleoResult<OdeSolution<N>>
where
    S: ODE + ?Sized,
{
    let (t0, tf) = t_span;
    validate(t_span, y0, options)?;

    let monitored = Monitored::new(system, t0, options);
    if let Some(reason) = monitored.stop_requested() {
        return Err(monitored.stop_error(reason, 0));
    }
    let mut dydt = [0.0; N];
    system.ode(t0, y0, &mut dydt);
    if dydt.iter().any(|v| !v.is_finite()) {
        return Err(KleoError::SingularTrajectory {
            t: t0,
            message: "non-finite derivative at the initial state".to_string(),
        });
    }

    let targets = if options.t_eval.is_empty() {
        vec![tf]
    } else {
        options.t_eval.clone()
    };
    let ivp_options = Options::builder()
        .method(ivp_method(options.method))
        .rtol(options.rtol)
        .atol(options.atol)
        .max_steps(options.max_steps)
        .maybe_first_step(options.first_step)
        .t_eval(targets.clone())
        .build();

    let sol = ivp_solve(&monitored, t0, tf, y0, ivp_options).map_err(|errors| {
        let reasons: Vec<String> = errors.iter().map(ToString::to_string).collect();
        KleoError::ConfigError(format!("solver rejected options: {}", reasons.join("; ")))
    })?;
    let stats = SolverStats {
        nfev: sol.nfev,
        steps: sol.nstep,
        accepted: sol.naccpt,
        rejected: sol.nrejct,
    };

    match sol.status {
        Status::Success => {}
        Status::UserInterrupt => {
            let reason = monitored.stop.get().unwrap_or(StopReason::Aborted);
            return Err(monitored.stop_error(reason, stats.steps));
        }
        status => {
            if let Some(t) = monitored.non_finite_at.get() {
                return Err(KleoError::SingularTrajectory {
                    t,
                    message: format!("non-finite derivative, solver stopped with {status:?}"),
                });
            }
            let message = match status {
                Status::NeedLargerNMax => {
                    format!("step budget of {} exhausted", options.max_steps)
                }
                other => format!("solver stopped with {other:?}"),
            };
            return Err(KleoError::IntegrationFailure {
                t: monitored.last_t.get(),
                steps: stats.steps,
                message,
            });
        }
    }

    if sol.t.len() != targets.len() {
        return Err(KleoError::IntegrationFailure {
            t: monitored.last_t.get(),
            steps: stats.steps,
            message: format!(
                "{} of {} evaluation times reached",
                sol.t.len(),
                targets.len()
            ),
        });
    }
    let mut out_y = Vec::with_capacity(sol.y.len());
    for (t, y) in sol.iter() {
        let state: [f64; N] = y.try_into().map_err(|_| KleoError::ShapeMismatch {
            expected: vec![N],
            actual: vec![y.len()],
        })?;
        if state.iter().any(|v| !v.is_finite()) {
            return Err(KleoError::SingularTrajectory {
                t,
                message: "non-finite state at evaluation time".to_string(),
            });
        }
        out_y.push(state);
    }

    Ok(OdeSolution {
        t: sol.t,
        y: out_y,
        stats,
    })
}

fn validate<const N: usize>(
    t_span: (f64, f64),
    y0: &[f64; N],
    options: &SolverOptions,
) -> KleoResult<()> {
    let (t0, tf) = t_span;
    if !t0.is_finite() || !tf.is_finite() || tf <= t0 {
        return Err(KleoError::ConfigError(format!(
            "time span must be finite and increasing, got ({t0}, {tf})"
        )));
    }
    if !options.rtol.is_finite() || options.rtol <= 0.0 || options.atol < 0.0 {
        return Err(KleoError::ConfigError(format!(
            "invalid tolerances rtol={}, atol={}",
            options.rtol, options.atol
        )));
    }
    if options.max_steps == 0 {
        return Err(KleoError::ConfigError(
            "max_steps must be >= 1".to_string(),
        ));
    }
    if let Some(h) = options.first_step {
        if !h.is_finite() || h <= 0.0 {
            return Err(KleoError::ConfigError(format!(
                "first_step must be finite and > 0, got {h}"
            )));
        }
    }
    if let Some(bad) = options
        .t_eval
        .iter()
        .find(|te| !te.is_finite() || **te < t0 || **te > tf)
    {
        return Err(KleoError::ConfigError(format!(
            "evaluation time {bad} outside span ({t0}, {tf})"
        )));
    }
    if options.t_eval.windows(2).any(|w| w[1] < w[0]) {
        return Err(KleoError::ConfigError(
            "evaluation times must be non-decreasing".to_string(),
        ));
    }
    if y0.iter().any(|v| !v.is_finite()) {
        return Err(KleoError::ConfigError(
            "initial state contains non-finite values".to_string(),
        ));
    }
    Ok(())
}
