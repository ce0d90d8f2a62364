// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Initial Conditions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Energy-consistent initial transverse velocity.
//!
//! A symmetric orbit starts on the x-axis with velocity along y, so the
//! energy constant fixes `dy0 = sqrt(2·Ω(x0, 0, 0) - C)`. Where the radicand
//! is negative or non-finite the start point is energetically forbidden (or
//! on the body) and the result is NaN. The masking is an explicit per-element
//! check; no floating point environment state is involved.

use crate::potential::DumbbellModel;
use kleo_types::error::{KleoError, KleoResult};
use ndarray::{Array, ArrayView, Dimension, Zip};

impl DumbbellModel {
    /// Initial transverse velocity for start position `x0` and energy
    /// constant `c`. NaN outside the allowed region; `ConfigError` when the
    /// model is not in normalized units.
    pub fn find_dy0(&self, x0: f64, c: f64) -> KleoResult<f64> {
        self.check_dynamics()?;
        Ok(self.dy0_at(x0, c))
    }

    fn dy0_at(&self, x0: f64, c: f64) -> f64 {
        let radicand = 2.0 * self.potential_eff(x0, 0.0, 0.0) - c;
        if radicand.is_finite() && radicand >= 0.0 {
            radicand.sqrt()
        } else {
            f64::NAN
        }
    }

    /// Elementwise [`Self::find_dy0`].
    ///
    /// `x0` and `c` must have the same shape, or one of them must broadcast
    /// to the shape of the other.
    pub fn find_dy0_array<D: Dimension>(
        &self,
        x0: &ArrayView<f64, D>,
        c: &ArrayView<f64, D>,
    ) -> KleoResult<Array<f64, D>> {
        self.check_dynamics()?;
        if x0.shape() == c.shape() {
            return Ok(Zip::from(x0)
                .and(c)
                .map_collect(|&x, &c| self.dy0_at(x, c)));
        }
        if let Some(c_b) = c.broadcast(x0.raw_dim()) {
            return Ok(Zip::from(x0)
                .and(&c_b)
                .map_collect(|&x, &c| self.dy0_at(x, c)));
        }
        if let Some(x_b) = x0.broadcast(c.raw_dim()) {
            return Ok(Zip::from(&x_b)
                .and(c)
                .map_collect(|&x, &c| self.dy0_at(x, c)));
        }
        Err(KleoError::ShapeMismatch {
            expected: x0.shape().to_vec(),
            actual: c.shape().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kleo_types::params::ParameterSet;
    use ndarray::{array, Array2};

    #[test]
    fn test_formula_inside_allowed_region() {
        let model = DumbbellModel::normalized();
        let omega = model.potential_eff(1.5, 0.0, 0.0);
        let c = 3.0;
        let dy0 = model.find_dy0(1.5, c).unwrap();
        assert_eq!(dy0, (2.0 * omega - c).sqrt());
        assert!(dy0 > 0.0);
    }

    #[test]
    fn test_zero_velocity_on_boundary() {
        let model = DumbbellModel::normalized();
        let c = 2.0 * model.potential_eff(1.5, 0.0, 0.0);
        assert_eq!(model.find_dy0(1.5, c).unwrap(), 0.0);
    }

    #[test]
    fn test_forbidden_region_is_nan() {
        let model = DumbbellModel::normalized();
        let c = 2.0 * model.potential_eff(1.5, 0.0, 0.0) + 1e-9;
        assert!(model.find_dy0(1.5, c).unwrap().is_nan());
    }

    #[test]
    fn test_on_segment_is_nan() {
        let model = DumbbellModel::normalized();
        assert!(model.find_dy0(0.0, 0.0).unwrap().is_nan());
        assert!(model.find_dy0(0.25, -100.0).unwrap().is_nan());
    }

    #[test]
    fn test_array_same_shape() {
        let model = DumbbellModel::normalized();
        let x0: Array2<f64> = array![[1.5, 1.5], [-2.0, 0.0]];
        let c: Array2<f64> = array![[3.0, 10.0], [0.0, 0.0]];
        let out = model.find_dy0_array(&x0.view(), &c.view()).unwrap();
        assert_eq!(out.dim(), (2, 2));
        assert_eq!(out[[0, 0]], model.find_dy0(1.5, 3.0).unwrap());
        assert!(out[[0, 1]].is_nan());
        assert_eq!(out[[1, 0]], model.find_dy0(-2.0, 0.0).unwrap());
        assert!(out[[1, 1]].is_nan());
    }

    #[test]
    fn test_array_broadcast_column_and_row() {
        let model = DumbbellModel::normalized();
        let x0: Array2<f64> = array![[1.5], [2.0]];
        let c: Array2<f64> = array![[0.0, 1.0, 2.0]];
        let x_full = x0.broadcast((2, 3)).unwrap().to_owned();
        let out = model.find_dy0_array(&x_full.view(), &c.view()).unwrap();
        assert_eq!(out.dim(), (2, 3));
        for i in 0..2 {
            for j in 0..3 {
                let expected = model.find_dy0(x0[[i, 0]], c[[0, j]]).unwrap();
                assert_eq!(out[[i, j]].to_bits(), expected.to_bits());
            }
        }
    }

    #[test]
    fn test_dimensional_model_rejected() {
        let model = DumbbellModel::new(ParameterSet::dimensional()).unwrap();
        assert!(matches!(
            model.find_dy0(2.0e5, 0.0),
            Err(KleoError::ConfigError(_))
        ));
        let x0 = array![[2.0e5]];
        let c = array![[0.0]];
        assert!(matches!(
            model.find_dy0_array(&x0.view(), &c.view()),
            Err(KleoError::ConfigError(_))
        ));
    }

    #[test]
    fn test_array_incompatible_shapes() {
        let model = DumbbellModel::normalized();
        let x0 = Array2::<f64>::zeros((2, 3));
        let c = Array2::<f64>::zeros((3, 2));
        let err = model.find_dy0_array(&x0.view(), &c.view()).unwrap_err();
        assert!(matches!(err, KleoError::ShapeMismatch { .. }));
    }
}
