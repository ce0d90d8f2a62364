// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Propagator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Half-period propagation of a symmetric start state.
//!
//! A trajectory starts on the x-axis, `Y0 = (x0, 0, 0, 0, dy0, 0)`, and is
//! integrated to `t = π`, half of the normalized rotation period. A
//! symmetric periodic orbit must cross the axis perpendicularly again, so
//! `ẋ(π) = 0` is necessary. It is not sufficient: `y(π) = 0` is not checked
//! here.
//!
//! The half period is π only in normalized units, so both entry points
//! reject a model that fails [`DumbbellModel::check_dynamics`].

use crate::potential::DumbbellModel;
use kleo_math::ode::{solve_ivp, SolverOptions, SolverStats};
use kleo_types::error::{KleoError, KleoResult};
use kleo_types::state::{StateVector, IDX_VX, IDX_VY};
use std::f64::consts::PI;

/// Half of the normalized rotation period.
pub const HALF_PERIOD: f64 = PI;

/// Start state on the x-axis with purely transverse velocity.
pub fn initial_state(x0: f64, dy0: f64) -> StateVector {
    let mut state = [0.0; 6];
    state[0] = x0;
    state[IDX_VY] = dy0;
    state
}

/// Terminal state of one propagation.
#[derive(Debug, Clone, Copy)]
pub struct Propagation {
    pub state: StateVector,
    pub stats: SolverStats,
}

impl Propagation {
    /// x-velocity at the half period.
    pub fn dxt(&self) -> f64 {
        self.state[IDX_VX]
    }
}

/// Integrate from `(x0, dy0)` to the half period and return the full state.
pub fn propagate_state(
    model: &DumbbellModel,
    x0: f64,
    dy0: f64,
    options: &SolverOptions,
) -> KleoResult<Propagation> {
    model.check_dynamics()?;
    if !x0.is_finite() || !dy0.is_finite() || dy0 < 0.0 {
        return Err(KleoError::DomainInvalid { x0, dy0 });
    }
    let mut opts = options.clone();
    opts.t_eval = vec![HALF_PERIOD];

    let sol = solve_ivp(model, (0.0, HALF_PERIOD), &initial_state(x0, dy0), &opts)?;
    let (_, state) = sol.last().ok_or_else(|| KleoError::IntegrationFailure {
        t: 0.0,
        steps: sol.stats.steps,
        message: "solver returned no samples".to_string(),
    })?;
    Ok(Propagation {
        state: *state,
        stats: sol.stats,
    })
}

/// x-velocity at `t = π` of the trajectory starting at `(x0, dy0)`.
pub fn propagate(
    model: &DumbbellModel,
    x0: f64,
    dy0: f64,
    options: &SolverOptions,
) -> KleoResult<f64> {
    propagate_state(model, x0, dy0, options).map(|p| p.dxt())
}
