// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Search Run
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! End-to-end search run: config → grids → processed ẋ(π) field.
//!
//! The outcome lists adjacent converged cells along the energy axis whose
//! ẋ(π) changes sign. These brackets are candidates for an external root
//! finder; no refinement is done here.

use crate::grid::{init_grid, SearchGrid};
use crate::potential::DumbbellModel;
use crate::processor::{CancelToken, GridProcessor, ProcessedGrid};
use crate::progress::ProgressObserver;
use kleo_math::ode::SolverOptions;
use kleo_types::config::SearchConfig;
use kleo_types::error::KleoResult;
use kleo_types::state::{CellStatus, OrbitSample, SearchSummary};
use std::sync::Arc;

/// Energy interval at fixed `x0` across which ẋ(π) changes sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignChangeBracket {
    pub x0: f64,
    pub c_lo: f64,
    pub c_hi: f64,
    pub dxt_lo: f64,
    pub dxt_hi: f64,
}

/// Grids and processed field of one run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub name: String,
    pub grid: SearchGrid,
    pub processed: ProcessedGrid,
}

impl SearchOutcome {
    pub fn summary(&self) -> SearchSummary {
        self.processed.summary()
    }

    /// One sample per cell in ij row-major order.
    pub fn samples(&self) -> Vec<OrbitSample> {
        self.grid
            .x0
            .indexed_iter()
            .map(|((i, j), &x0)| OrbitSample {
                x0,
                c: self.grid.c[[i, j]],
                dy0: self.grid.dy0[[i, j]],
                dxt: self.processed.dxt[[i, j]],
                status: self.processed.status[[i, j]],
            })
            .collect()
    }

    /// Adjacent converged energy samples where ẋ(π) changes sign.
    /// Zero counts as positive.
    pub fn sign_change_brackets(&self) -> Vec<SignChangeBracket> {
        let (nx, nc) = self.processed.dim();
        let status = &self.processed.status;
        let dxt = &self.processed.dxt;
        let mut brackets = Vec::new();
        for i in 0..nx {
            for j in 1..nc {
                if status[[i, j - 1]] != CellStatus::Converged
                    || status[[i, j]] != CellStatus::Converged
                {
                    continue;
                }
                let (lo, hi) = (dxt[[i, j - 1]], dxt[[i, j]]);
                if (lo < 0.0) != (hi < 0.0) {
                    brackets.push(SignChangeBracket {
                        x0: self.grid.x0_axis[i],
                        c_lo: self.grid.c_axis[j - 1],
                        c_hi: self.grid.c_axis[j],
                        dxt_lo: lo,
                        dxt_hi: hi,
                    });
                }
            }
        }
        brackets
    }
}

/// Run a full search for `config`.
pub fn run_search(
    config: &SearchConfig,
    observer: Arc<dyn ProgressObserver>,
) -> KleoResult<SearchOutcome> {
    run_search_with_cancel(config, observer, CancelToken::new())
}

/// [`run_search`] that stops early once `cancel` is raised.
pub fn run_search_with_cancel(
    config: &SearchConfig,
    observer: Arc<dyn ProgressObserver>,
    cancel: CancelToken,
) -> KleoResult<SearchOutcome> {
    config.validate()?;
    let model = DumbbellModel::new(config.parameters())?;
    log::info!(
        "search '{}': profile {:?}, method {:?}",
        config.name,
        config.profile,
        config.solver.method
    );

    let grid = init_grid(&model, &config.grid, observer.as_ref())?;
    let processed = GridProcessor::new(SolverOptions::from(&config.solver))
        .with_workers(config.workers)
        .with_cancel_token(cancel)
        .with_observer(observer)
        .process(&model, &grid.x0, &grid.dy0)?;

    let outcome = SearchOutcome {
        name: config.name.clone(),
        grid,
        processed,
    };
    log::info!(
        "search '{}' found {} sign-change brackets",
        outcome.name,
        outcome.sign_change_brackets().len()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use kleo_types::config::GridSpec;
    use kleo_types::error::KleoError;
    use kleo_types::params::Profile;

    fn config(grid: GridSpec) -> SearchConfig {
        SearchConfig {
            name: "unit".to_string(),
            profile: Default::default(),
            grid,
            solver: Default::default(),
            workers: Some(2),
        }
    }

    #[test]
    fn test_bracket_found_along_energy_axis() {
        let cfg = config(GridSpec::new(2.0, 2.0, 4.5, 4.75, 0.1, 0.25));
        let outcome = run_search(&cfg, Arc::new(NoProgress)).unwrap();
        assert_eq!(outcome.processed.dim(), (1, 2));
        let brackets = outcome.sign_change_brackets();
        assert_eq!(brackets.len(), 1);
        let b = brackets[0];
        assert_eq!((b.x0, b.c_lo, b.c_hi), (2.0, 4.5, 4.75));
        assert!(b.dxt_lo > 0.0 && b.dxt_hi < 0.0);
        // Known crossing at C ≈ 4.7157.
        assert!(b.c_lo < 4.715676109407711 && 4.715676109407711 < b.c_hi);
    }

    #[test]
    fn test_no_bracket_across_invalid_cells() {
        // x0 = 1.5 turns forbidden above C ≈ 3.72 with ẋ(π) still positive.
        let cfg = config(GridSpec::new(1.5, 1.5, 3.0, 5.0, 0.1, 0.5));
        let outcome = run_search(&cfg, Arc::new(NoProgress)).unwrap();
        assert!(outcome.sign_change_brackets().is_empty());
        assert_eq!(outcome.summary().converged, 2);
        assert_eq!(outcome.summary().domain_invalid, 3);
    }

    #[test]
    fn test_samples_in_row_major_order() {
        let cfg = config(GridSpec::new(1.5, 2.0, 3.0, 5.0, 0.25, 0.5));
        let outcome = run_search(&cfg, Arc::new(NoProgress)).unwrap();
        let samples = outcome.samples();
        assert_eq!(samples.len(), 15);
        assert_eq!((samples[0].x0, samples[0].c), (1.5, 3.0));
        assert_eq!((samples[1].x0, samples[1].c), (1.5, 3.5));
        assert_eq!((samples[5].x0, samples[5].c), (1.75, 3.0));
        for s in &samples {
            assert_eq!(s.dxt.is_nan(), s.status != CellStatus::Converged);
            assert_eq!(s.dy0.is_nan(), s.status == CellStatus::DomainInvalid);
        }
    }

    #[test]
    fn test_cancelled_search_returns_partial_outcome() {
        let cfg = config(GridSpec::new(1.5, 2.0, 3.0, 5.0, 0.25, 0.5));
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = run_search_with_cancel(&cfg, Arc::new(NoProgress), cancel).unwrap();
        assert_eq!(outcome.summary().cancelled, 10);
        assert!(outcome.sign_change_brackets().is_empty());
    }

    #[test]
    fn test_dimensional_profile_rejected() {
        let mut cfg = config(GridSpec::new(1.5, 2.0, 3.0, 5.0, 0.25, 0.5));
        cfg.profile = Profile::Dimensional;
        let err = run_search(&cfg, Arc::new(NoProgress)).unwrap_err();
        assert!(matches!(err, KleoError::ConfigError(_)), "unexpected {err:?}");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut cfg = config(GridSpec::default());
        cfg.workers = Some(0);
        assert!(run_search(&cfg, Arc::new(NoProgress)).is_err());
    }
}
