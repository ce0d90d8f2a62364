// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Grid Processor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parallel half-period propagation over a whole (x0, dy0) grid.
//!
//! Cells are independent. They are flattened in row-major order, handed to a
//! rayon pool and written back by index, so the result does not depend on
//! the worker count or on scheduling.
//!
//! Cell rules:
//! - NaN `dy0` is never integrated: `DomainInvalid`, output NaN.
//! - Once the [`CancelToken`] is raised, unstarted cells report `Cancelled`
//!   and running integrations stop at their next step.
//! - A failed integration yields NaN plus its failure status.

use crate::potential::DumbbellModel;
use crate::progress::{NoProgress, ProgressObserver};
use crate::propagator::propagate;
use kleo_math::ode::SolverOptions;
use kleo_types::error::{KleoError, KleoResult};
use kleo_types::state::{CellStatus, SearchSummary};
use ndarray::Array2;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

const STAGE: &str = "Processing grid";

/// Shared cooperative cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Underlying flag, as polled by the ODE solver.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

/// Terminal x-velocity grid with per-cell outcome.
#[derive(Debug, Clone)]
pub struct ProcessedGrid {
    /// ẋ(π); NaN wherever `status` is not `Converged`.
    pub dxt: Array2<f64>,
    pub status: Array2<CellStatus>,
}

impl ProcessedGrid {
    pub fn dim(&self) -> (usize, usize) {
        self.dxt.dim()
    }

    pub fn summary(&self) -> SearchSummary {
        let mut summary = SearchSummary::default();
        for &status in self.status.iter() {
            summary.record(status);
        }
        summary
    }
}

/// Grid driver with a bounded worker pool.
pub struct GridProcessor {
    options: SolverOptions,
    workers: Option<usize>,
    cancel: CancelToken,
    observer: Arc<dyn ProgressObserver>,
}

impl GridProcessor {
    pub fn new(options: SolverOptions) -> Self {
        GridProcessor {
            options,
            workers: None,
            cancel: CancelToken::new(),
            observer: Arc::new(NoProgress),
        }
    }

    /// Pool size; `None` uses one thread per available core.
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Propagate every cell of `(x0, dy0)` to the half period.
    pub fn process(
        &self,
        model: &DumbbellModel,
        x0: &Array2<f64>,
        dy0: &Array2<f64>,
    ) -> KleoResult<ProcessedGrid> {
        model.check_dynamics()?;
        if x0.dim() != dy0.dim() {
            return Err(KleoError::ShapeMismatch {
                expected: x0.shape().to_vec(),
                actual: dy0.shape().to_vec(),
            });
        }
        if self.workers == Some(0) {
            return Err(KleoError::ConfigError(
                "worker count must be >= 1".to_string(),
            ));
        }

        let (nx, nc) = x0.dim();
        let total = nx * nc;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers.unwrap_or(0))
            .build()
            .map_err(|e| KleoError::ConfigError(format!("failed to build worker pool: {e}")))?;

        let mut options = self.options.clone();
        options.abort = Some(self.cancel.flag());

        let started = Instant::now();
        let done = AtomicUsize::new(0);
        self.observer.on_start(STAGE, total);

        let cells: Vec<(f64, CellStatus)> = pool.install(|| {
            (0..total)
                .into_par_iter()
                .map(|k| {
                    let (i, j) = (k / nc, k % nc);
                    let cell = self.process_cell(model, x0[[i, j]], dy0[[i, j]], &options);
                    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                    self.observer.on_progress(finished, total);
                    cell
                })
                .collect()
        });

        let dxt = Array2::from_shape_fn((nx, nc), |(i, j)| cells[i * nc + j].0);
        let status = Array2::from_shape_fn((nx, nc), |(i, j)| cells[i * nc + j].1);
        let processed = ProcessedGrid { dxt, status };

        let elapsed = started.elapsed();
        self.observer.on_finish(STAGE, elapsed);

        let summary = processed.summary();
        log::info!(
            "processed {nx}x{nc} grid in {:.3} s: {} converged, {} outside domain, {} cancelled",
            elapsed.as_secs_f64(),
            summary.converged,
            summary.domain_invalid,
            summary.cancelled
        );
        if summary.failures() > 0 {
            log::warn!(
                "{} cells failed ({} singular, {} integration failures)",
                summary.failures(),
                summary.singular,
                summary.failed
            );
        }
        Ok(processed)
    }

    fn process_cell(
        &self,
        model: &DumbbellModel,
        x0: f64,
        dy0: f64,
        options: &SolverOptions,
    ) -> (f64, CellStatus) {
        if dy0.is_nan() {
            return (f64::NAN, CellStatus::DomainInvalid);
        }
        if self.cancel.is_cancelled() {
            return (f64::NAN, CellStatus::Cancelled);
        }
        match propagate(model, x0, dy0, options) {
            Ok(dxt) => (dxt, CellStatus::Converged),
            Err(err) => {
                let status = CellStatus::from(&err);
                if status.is_failure() {
                    log::debug!("cell x0={x0}, dy0={dy0}: {err}");
                } else {
                    log::trace!("cell x0={x0}, dy0={dy0}: {err}");
                }
                (f64::NAN, status)
            }
        }
    }
}

/// Terminal ẋ grid of `model` with default solver options on all cores.
pub fn process_grid(
    model: &DumbbellModel,
    x0: &Array2<f64>,
    dy0: &Array2<f64>,
) -> KleoResult<Array2<f64>> {
    GridProcessor::new(SolverOptions::default())
        .process(model, x0, dy0)
        .map(|processed| processed.dxt)
}
