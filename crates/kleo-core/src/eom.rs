// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Equations of Motion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rotating-frame equations of motion around the dipole-segment body.
//!
//! With `r1`, `r2` the distances to the point masses, `s = r1 + r2` and
//! `p = r1·r2`:
//!
//! ```text
//! ẍ =  2ẏ + κ(1-μs)/2 · [(x+l1)/r1³ + (x-l2)/r2³ - (1 - 2κμs/(s·p))·x]
//! ÿ = -2ẋ + [κ(1-μs)/2 · (1/r1³ + 1/r2³) - (1 - 2κμs·s/((s²-1)·p))]·y
//! z̈ =  κ·[(1-μs)/2 · (1/r1³ + 1/r2³) + 2κμs·s/((s²-1)·p)]·z
//! ```
//!
//! The system is written in normalized units (l = 1, unit angular rate);
//! callers check [`DumbbellModel::check_dynamics`] first. It is singular at the
//! point masses (`r1 = 0` or `r2 = 0`) and on the segment surface, where
//! `s² - 1 = 0`. These are physical singularities of the model and are not
//! regularized: the derivative becomes non-finite and the solver reports a
//! singular trajectory.

use crate::potential::DumbbellModel;
use kleo_math::ode::ODE;
use kleo_types::state::StateVector;

impl DumbbellModel {
    /// Time derivative of `state`. The system is autonomous.
    pub fn derivative(&self, state: &StateVector) -> StateVector {
        let p = self.params();
        let [x, y, z, vx, vy, vz] = *state;
        let d = self.distances(x, y, z);
        let s = d.r1 + d.r2;
        let prod = d.r1 * d.r2;
        let r1_3 = d.r1.powi(3);
        let r2_3 = d.r2.powi(3);
        let inv_cubes = 1.0 / r1_3 + 1.0 / r2_3;

        let k = p.kappa;
        let lobe = k * (1.0 - p.mu_s) / 2.0;
        let seg_yz = 2.0 * k * p.mu_s * s / ((s * s - 1.0) * prod);

        let ax = 2.0 * vy
            + lobe
                * ((x + p.l1) / r1_3 + (x - p.l2) / r2_3
                    - (1.0 - 2.0 * k * p.mu_s / (s * prod)) * x);
        let ay = -2.0 * vx + (lobe * inv_cubes - (1.0 - seg_yz)) * y;
        let az = k * ((1.0 - p.mu_s) / 2.0 * inv_cubes + seg_yz) * z;

        [vx, vy, vz, ax, ay, az]
    }
}

impl ODE for DumbbellModel {
    fn ode(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let state: StateVector = [y[0], y[1], y[2], y[3], y[4], y[5]];
        dydt.copy_from_slice(&self.derivative(&state));
    }
}
