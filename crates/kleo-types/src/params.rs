// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Parameter Sets
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical parameter sets for the dipole-segment model of 216-Kleopatra.
//!
//! Two unit profiles are supported:
//!
//! - [`Profile::Dimensional`]: SI lengths and masses, period in hours.
//! - [`Profile::Normalized`]: segment length 1, angular rate 1, period 2π.
//!   The gravitational parameter `g·M` equals `kappa`, so the effective
//!   potential reduces to `½(x² + y²) - U`.

use crate::constants::*;
use crate::error::{KleoError, KleoResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Relative tolerance for `l1 + l2 == l`.
const OFFSET_SUM_RTOL: f64 = 1e-9;
/// Relative tolerance for the unit checks of [`ParameterSet::check_normalized`].
const UNIT_RTOL: f64 = 1e-9;

/// Unit profile selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Dimensional,
    #[default]
    Normalized,
}

/// Immutable physical constants of the dumbbell-segment body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Gravitational constant.
    pub g: f64,
    /// Mass of the first point mass (at x = -l1).
    pub m1: f64,
    /// Mass of the second point mass (at x = +l2).
    pub m2: f64,
    /// Mass of the connecting segment.
    pub ms: f64,
    /// Segment length.
    pub l: f64,
    pub l1: f64,
    pub l2: f64,
    pub kappa: f64,
    /// Rotation period (hours when dimensional, 2π when normalized).
    pub period: f64,
    pub mu: f64,
    pub mu_s: f64,
}

impl ParameterSet {
    /// Single factory for both unit profiles.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Dimensional => Self::dimensional(),
            Profile::Normalized => Self::normalized(),
        }
    }

    /// SI parameter set of 216-Kleopatra.
    pub fn dimensional() -> Self {
        ParameterSet {
            g: G_SI,
            m1: KLEO_M1,
            m2: KLEO_M2,
            ms: KLEO_MS,
            l: KLEO_L,
            l1: KLEO_L1,
            l2: KLEO_L2,
            kappa: KLEO_KAPPA,
            period: KLEO_PERIOD_H,
            mu: KLEO_MU,
            mu_s: KLEO_MU_S,
        }
    }

    /// Normalized parameter set: unit length, unit angular rate, unit total mass.
    pub fn normalized() -> Self {
        ParameterSet {
            g: KLEO_KAPPA,
            m1: (1.0 - KLEO_MU) * (1.0 - KLEO_MU_S),
            m2: KLEO_MU * (1.0 - KLEO_MU_S),
            ms: KLEO_MU_S,
            l: 1.0,
            l1: KLEO_L1_NORM,
            l2: KLEO_L2_NORM,
            kappa: KLEO_KAPPA,
            period: 2.0 * PI,
            mu: KLEO_MU,
            mu_s: KLEO_MU_S,
        }
    }

    /// Total mass `m1 + m2 + ms`.
    pub fn total_mass(&self) -> f64 {
        self.m1 + self.m2 + self.ms
    }

    /// Check internal consistency of the parameter set.
    pub fn validate(&self) -> KleoResult<()> {
        let fields = [
            ("g", self.g),
            ("m1", self.m1),
            ("m2", self.m2),
            ("ms", self.ms),
            ("l", self.l),
            ("l1", self.l1),
            ("l2", self.l2),
            ("kappa", self.kappa),
            ("period", self.period),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(KleoError::ConfigError(format!(
                    "parameter '{name}' must be finite and > 0, got {value}"
                )));
            }
        }
        for (name, value) in [("mu", self.mu), ("mu_s", self.mu_s)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(KleoError::ConfigError(format!(
                    "ratio '{name}' must lie in [0, 1], got {value}"
                )));
            }
        }
        let offset_sum = self.l1 + self.l2;
        if (offset_sum - self.l).abs() > OFFSET_SUM_RTOL * self.l {
            return Err(KleoError::ConfigError(format!(
                "component offsets l1 + l2 = {offset_sum} do not match segment length l = {}",
                self.l
            )));
        }
        Ok(())
    }

    /// Check that the set is in normalized units: `l = 1`, period `2π`
    /// (unit angular rate) and `g·M = κ`. The equations of motion, the
    /// half-period propagation and the initial-velocity formula are written
    /// in these units only.
    pub fn check_normalized(&self) -> KleoResult<()> {
        let close = |a: f64, b: f64| (a - b).abs() <= UNIT_RTOL * b.abs();
        if close(self.l, 1.0)
            && close(self.period, 2.0 * PI)
            && close(self.g * self.total_mass(), self.kappa)
        {
            return Ok(());
        }
        Err(KleoError::ConfigError(format!(
            "orbit dynamics need the normalized profile (l = 1, period = 2π, g·M = κ), \
             got l = {}, period = {}, g·M = {}",
            self.l,
            self.period,
            self.g * self.total_mass()
        )))
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::normalized()
    }
}
