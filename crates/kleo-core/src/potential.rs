// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Potential
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gravitational and effective potential of the dipole-segment model.
//!
//! The body is two point masses at `x = -l1` and `x = +l2` joined by a
//! uniform segment of length `l`. The segment contributes
//! `μs/l · ln((r1 + r2 + l) / (r1 + r2 - l))`, the 3-D analogue of the
//! potential of a finite charged rod.
//!
//! Points with `r1 + r2 <= l` lie on the segment; there the logarithm
//! diverges or is undefined and the functions return a non-finite value
//! instead of failing.

use kleo_types::error::KleoResult;
use kleo_types::params::ParameterSet;
use kleo_types::state::StateVector;
use ndarray::{Array, ArrayView, Dimension, Zip};

/// Dipole-segment body in the rotating frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DumbbellModel {
    params: ParameterSet,
}

/// Distances from a field point to the two point masses.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Distances {
    pub r1: f64,
    pub r2: f64,
}

impl DumbbellModel {
    /// Build a model from a checked parameter set.
    pub fn new(params: ParameterSet) -> KleoResult<Self> {
        params.validate()?;
        Ok(DumbbellModel { params })
    }

    /// Model with the normalized 216-Kleopatra parameters.
    pub fn normalized() -> Self {
        DumbbellModel {
            params: ParameterSet::normalized(),
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Fails with `ConfigError` unless the model is in normalized units.
    /// Potentials evaluate under either profile; the equations of motion,
    /// initial velocities and propagation do not.
    pub fn check_dynamics(&self) -> KleoResult<()> {
        self.params.check_normalized()
    }

    pub(crate) fn distances(&self, x: f64, y: f64, z: f64) -> Distances {
        let p = &self.params;
        let yz2 = y * y + z * z;
        Distances {
            r1: ((x + p.l1).powi(2) + yz2).sqrt(),
            r2: ((x - p.l2).powi(2) + yz2).sqrt(),
        }
    }

    /// Dimensionless mass-distribution bracket shared by both potentials.
    fn bracket(&self, d: Distances) -> f64 {
        let p = &self.params;
        let s = d.r1 + d.r2;
        (1.0 - p.mu) * (1.0 - p.mu_s) / d.r1
            + p.mu * (1.0 - p.mu_s) / d.r2
            + p.mu_s / p.l * ((s + p.l) / (s - p.l)).ln()
    }

    /// Gravitational potential `U(x, y, z)`.
    pub fn potential(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = &self.params;
        -p.g * p.total_mass() * self.bracket(self.distances(x, y, z))
    }

    /// Effective potential `Ω = ½(x² + y²) + κ·bracket` of the rotating frame.
    pub fn potential_eff(&self, x: f64, y: f64, z: f64) -> f64 {
        0.5 * (x * x + y * y) + self.params.kappa * self.bracket(self.distances(x, y, z))
    }

    /// Jacobi-like energy `2Ω - |v|²` of a state.
    pub fn jacobi_constant(&self, state: &StateVector) -> f64 {
        let [x, y, z, vx, vy, vz] = *state;
        2.0 * self.potential_eff(x, y, z) - (vx * vx + vy * vy + vz * vz)
    }

    /// Elementwise [`Self::potential`] over same-shaped coordinate arrays.
    pub fn potential_array<D: Dimension>(
        &self,
        x: &ArrayView<f64, D>,
        y: &ArrayView<f64, D>,
        z: &ArrayView<f64, D>,
    ) -> KleoResult<Array<f64, D>> {
        check_same_shape(x, y)?;
        check_same_shape(x, z)?;
        Ok(Zip::from(x)
            .and(y)
            .and(z)
            .map_collect(|&x, &y, &z| self.potential(x, y, z)))
    }

    /// Elementwise [`Self::potential_eff`] over same-shaped coordinate arrays.
    pub fn potential_eff_array<D: Dimension>(
        &self,
        x: &ArrayView<f64, D>,
        y: &ArrayView<f64, D>,
        z: &ArrayView<f64, D>,
    ) -> KleoResult<Array<f64, D>> {
        check_same_shape(x, y)?;
        check_same_shape(x, z)?;
        Ok(Zip::from(x)
            .and(y)
            .and(z)
            .map_collect(|&x, &y, &z| self.potential_eff(x, y, z)))
    }
}

impl Default for DumbbellModel {
    fn default() -> Self {
        Self::normalized()
    }
}

pub(crate) fn check_same_shape<D: Dimension>(
    a: &ArrayView<f64, D>,
    b: &ArrayView<f64, D>,
) -> KleoResult<()> {
    if a.shape() != b.shape() {
        return Err(kleo_types::error::KleoError::ShapeMismatch {
            expected: a.shape().to_vec(),
            actual: b.shape().to_vec(),
        });
    }
    Ok(())
}
