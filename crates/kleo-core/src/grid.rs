// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Search Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! (x0, C) parameter grid of the periodic-orbit search.
//!
//! Axes follow linspace semantics: `floor((max - min) / step) + 1` samples
//! with both endpoints exact, so the realized spacing may differ slightly
//! from the requested step. Sample counts are checked against
//! [`MAX_AXIS_SAMPLES`] and the grid size limit of [`GridSpec::shape`]. All
//! 2-D arrays use ij indexing: `[i, j] = (x0_axis[i], c_axis[j])`.

use crate::potential::DumbbellModel;
use crate::progress::ProgressObserver;
use kleo_types::config::{axis_samples, GridSpec, MAX_AXIS_SAMPLES};
use kleo_types::error::{KleoError, KleoResult};
use ndarray::{Array1, Array2};
use std::time::Instant;

const STAGE: &str = "Initializing grid";

/// Number of samples of an inclusive axis.
pub fn axis_len(min: f64, max: f64, step: f64) -> KleoResult<usize> {
    axis_samples(min, max, step).ok_or_else(|| {
        KleoError::ConfigError(format!(
            "step {step} over [{min}, {max}] does not give 1..={MAX_AXIS_SAMPLES} samples"
        ))
    })
}

/// Evenly spaced axis over `[min, max]` with exact endpoints.
pub fn build_axis(min: f64, max: f64, step: f64) -> KleoResult<Array1<f64>> {
    Ok(linspace_axis(min, max, axis_len(min, max, step)?))
}

fn linspace_axis(min: f64, max: f64, n: usize) -> Array1<f64> {
    let mut axis = Array1::linspace(min, max, n);
    if n > 1 {
        axis[n - 1] = max;
    }
    axis
}

/// Position, energy and initial-velocity grids of one search.
#[derive(Debug, Clone)]
pub struct SearchGrid {
    pub x0_axis: Array1<f64>,
    pub c_axis: Array1<f64>,
    /// `x0[[i, j]] = x0_axis[i]`
    pub x0: Array2<f64>,
    /// `c[[i, j]] = c_axis[j]`
    pub c: Array2<f64>,
    /// Initial transverse velocity; NaN where the start is forbidden.
    pub dy0: Array2<f64>,
}

/// Flattened `(x0, C)` pairs, one row per cell.
///
/// Row `k` corresponds to cell `(k / n_c, k % n_c)`, the row-major order of
/// the ij grids, so `pairs.row(k)` lines up with `grid.dy0.iter().nth(k)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPairs(pub Array2<f64>);

impl GridPairs {
    pub fn len(&self) -> usize {
        self.0.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.0.nrows() == 0
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.0
    }
}

impl SearchGrid {
    /// `(n_x0, n_c)`
    pub fn dim(&self) -> (usize, usize) {
        self.x0.dim()
    }

    pub fn len(&self) -> usize {
        self.x0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x0.is_empty()
    }

    /// Cells with a finite initial velocity.
    pub fn live_cells(&self) -> usize {
        self.dy0.iter().filter(|v| !v.is_nan()).count()
    }

    /// Flattened `(x0, C)` pairs in ij row-major order.
    pub fn pairs(&self) -> GridPairs {
        let (nx, nc) = self.dim();
        let mut pairs = Array2::zeros((nx * nc, 2));
        for i in 0..nx {
            for j in 0..nc {
                let k = i * nc + j;
                pairs[[k, 0]] = self.x0_axis[i];
                pairs[[k, 1]] = self.c_axis[j];
            }
        }
        GridPairs(pairs)
    }
}

/// Build the ij grids for `spec` and derive the initial velocities.
pub fn init_grid(
    model: &DumbbellModel,
    spec: &GridSpec,
    observer: &dyn ProgressObserver,
) -> KleoResult<SearchGrid> {
    let (nx, nc) = spec.shape()?;
    model.check_dynamics()?;
    let started = Instant::now();

    let x0_axis = linspace_axis(spec.x0_min, spec.x0_max, nx);
    let c_axis = linspace_axis(spec.c_min, spec.c_max, nc);
    observer.on_start(STAGE, nx * nc);

    let x0 = Array2::from_shape_fn((nx, nc), |(i, _)| x0_axis[i]);
    let c = Array2::from_shape_fn((nx, nc), |(_, j)| c_axis[j]);
    let dy0 = model.find_dy0_array(&x0.view(), &c.view())?;

    observer.on_finish(STAGE, started.elapsed());
    log::debug!(
        "grid {nx}x{nc} built, {} live cells",
        dy0.iter().filter(|v| !v.is_nan()).count()
    );

    Ok(SearchGrid {
        x0_axis,
        c_axis,
        x0,
        c,
        dy0,
    })
}
