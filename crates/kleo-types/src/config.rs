// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{KleoError, KleoResult};
use crate::params::{ParameterSet, Profile};
use serde::{Deserialize, Serialize};

/// Top-level search run configuration.
/// Every section except `name` may be omitted and falls back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub name: String,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub grid: GridSpec,
    #[serde(default)]
    pub solver: SolverConfig,
    /// Worker threads for grid processing. `None` uses all cores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

/// Inclusive ranges and step sizes of the (x0, C) search grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    #[serde(default = "default_x0_min")]
    pub x0_min: f64,
    #[serde(default = "default_x0_max")]
    pub x0_max: f64,
    #[serde(rename = "C_min", default = "default_c_min")]
    pub c_min: f64,
    #[serde(rename = "C_max", default = "default_c_max")]
    pub c_max: f64,
    #[serde(default = "default_step")]
    pub dif_x0: f64,
    #[serde(rename = "dif_C", default = "default_step")]
    pub dif_c: f64,
}

fn default_x0_min() -> f64 {
    -3.0
}
fn default_x0_max() -> f64 {
    2.0
}
fn default_c_min() -> f64 {
    -3.0
}
fn default_c_max() -> f64 {
    5.0
}
fn default_step() -> f64 {
    0.001
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec {
            x0_min: default_x0_min(),
            x0_max: default_x0_max(),
            c_min: default_c_min(),
            c_max: default_c_max(),
            dif_x0: default_step(),
            dif_c: default_step(),
        }
    }
}

impl GridSpec {
    pub fn new(x0_min: f64, x0_max: f64, c_min: f64, c_max: f64, dif_x0: f64, dif_c: f64) -> Self {
        GridSpec {
            x0_min,
            x0_max,
            c_min,
            c_max,
            dif_x0,
            dif_c,
        }
    }

    pub fn validate(&self) -> KleoResult<()> {
        self.shape().map(|_| ())
    }

    /// `(n_x0, n_c)` sample counts, checked against the grid size limits.
    pub fn shape(&self) -> KleoResult<(usize, usize)> {
        let nx = check_range("x0", self.x0_min, self.x0_max, self.dif_x0)?;
        let nc = check_range("C", self.c_min, self.c_max, self.dif_c)?;
        match nx.checked_mul(nc) {
            Some(cells) if cells <= MAX_GRID_CELLS => Ok((nx, nc)),
            _ => Err(KleoError::ConfigError(format!(
                "grid of {nx} x {nc} cells exceeds the limit of {MAX_GRID_CELLS} cells"
            ))),
        }
    }
}

/// Largest number of samples along one grid axis.
pub const MAX_AXIS_SAMPLES: usize = 10_000_000;
/// Largest number of cells in one grid.
pub const MAX_GRID_CELLS: usize = 100_000_000;

/// `floor((max - min) / step) + 1`, or `None` when the count is not finite
/// or exceeds [`MAX_AXIS_SAMPLES`].
pub fn axis_samples(min: f64, max: f64, step: f64) -> Option<usize> {
    let intervals = ((max - min) / step).floor();
    if !intervals.is_finite() || intervals < 0.0 || intervals >= MAX_AXIS_SAMPLES as f64 {
        return None;
    }
    (intervals as usize).checked_add(1)
}

fn check_range(axis: &str, min: f64, max: f64, step: f64) -> KleoResult<usize> {
    if !min.is_finite() || !max.is_finite() {
        return Err(KleoError::ConfigError(format!(
            "{axis} range must be finite, got [{min}, {max}]"
        )));
    }
    if max < min {
        return Err(KleoError::ConfigError(format!(
            "{axis} range is empty: max {max} < min {min}"
        )));
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(KleoError::ConfigError(format!(
            "{axis} step must be finite and > 0, got {step}"
        )));
    }
    axis_samples(min, max, step).ok_or_else(|| {
        KleoError::ConfigError(format!(
            "{axis} step {step} over [{min}, {max}] needs more than {MAX_AXIS_SAMPLES} samples"
        ))
    })
}

/// Integration scheme handed to the IVP solver. Names follow SciPy's
/// `solve_ivp` method strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationMethod {
    /// Dormand-Prince 8(5,3), 12 stages.
    #[default]
    #[serde(rename = "DOP853")]
    Dop853,
    /// Dormand-Prince 5(4).
    #[serde(rename = "DOPRI5", alias = "RK45")]
    Dopri5,
    /// Bogacki-Shampine 3(2).
    #[serde(rename = "RK23")]
    Rk23,
    /// Implicit Radau IIA, order 5.
    #[serde(rename = "Radau", alias = "RADAU")]
    Radau,
    /// Variable-order backward differentiation.
    #[serde(rename = "BDF")]
    Bdf,
}

/// Integrator tolerances and per-trajectory limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub method: IntegrationMethod,
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    #[serde(default = "default_atol")]
    pub atol: f64,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Initial trial step. `None` lets the solver pick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_step: Option<f64>,
    /// Wall-clock limit per trajectory in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

fn default_rtol() -> f64 {
    1e-10
}
fn default_atol() -> f64 {
    1e-12
}
fn default_max_steps() -> usize {
    100_000
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            method: IntegrationMethod::default(),
            rtol: default_rtol(),
            atol: default_atol(),
            max_steps: default_max_steps(),
            first_step: None,
            timeout_ms: None,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> KleoResult<()> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(KleoError::ConfigError(format!(
                "rtol must be finite and > 0, got {}",
                self.rtol
            )));
        }
        if !self.atol.is_finite() || self.atol < 0.0 {
            return Err(KleoError::ConfigError(format!(
                "atol must be finite and >= 0, got {}",
                self.atol
            )));
        }
        if self.max_steps == 0 {
            return Err(KleoError::ConfigError(
                "max_steps must be >= 1".to_string(),
            ));
        }
        if let Some(h) = self.first_step {
            if !h.is_finite() || h <= 0.0 {
                return Err(KleoError::ConfigError(format!(
                    "first_step must be finite and > 0, got {h}"
                )));
            }
        }
        Ok(())
    }
}

impl SearchConfig {
    /// Load from JSON file.
    pub fn from_file(path: &str) -> KleoResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> KleoResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KleoResult<()> {
        self.grid.validate()?;
        self.solver.validate()?;
        if self.workers == Some(0) {
            return Err(KleoError::ConfigError(
                "workers must be >= 1 when given".to_string(),
            ));
        }
        let params = self.parameters();
        params.validate()?;
        params.check_normalized()
    }

    /// Parameter set selected by `profile`.
    pub fn parameters(&self) -> ParameterSet {
        ParameterSet::for_profile(self.profile)
    }
}
