// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Search Pipeline Integration Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Config → grid → processed field, through the public API only.

use kleo_core::grid::init_grid;
use kleo_core::potential::DumbbellModel;
use kleo_core::processor::{process_grid, CancelToken};
use kleo_core::progress::NoProgress;
use kleo_core::search::{run_search, run_search_with_cancel};
use kleo_types::config::{GridSpec, SearchConfig};
use kleo_types::state::CellStatus;
use std::path::PathBuf;
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_config() -> SearchConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("configs")
        .join("kleopatra_search.json");
    SearchConfig::from_file(&path.to_string_lossy()).unwrap()
}

fn small_config(grid: GridSpec) -> SearchConfig {
    let mut cfg = sample_config();
    cfg.grid = grid;
    cfg
}

#[test]
fn test_five_by_three_grid_end_to_end() {
    init_logging();
    let cfg = small_config(GridSpec::new(-1.0, 1.0, 0.0, 1.0, 0.5, 0.5));
    let outcome = run_search(&cfg, Arc::new(NoProgress)).unwrap();
    let model = DumbbellModel::normalized();

    assert_eq!(outcome.grid.dim(), (5, 3));
    for ((i, j), &dy0) in outcome.grid.dy0.indexed_iter() {
        let expected = model
            .find_dy0(outcome.grid.x0_axis[i], outcome.grid.c_axis[j])
            .unwrap();
        assert_eq!(dy0.to_bits(), expected.to_bits(), "cell ({i}, {j})");
    }

    let summary = outcome.summary();
    assert_eq!(summary.total(), 15);
    assert_eq!(summary.domain_invalid, 6);
    assert_eq!(summary.failures(), 0);
    for (dy0, dxt) in outcome.grid.dy0.iter().zip(outcome.processed.dxt.iter()) {
        assert_eq!(dy0.is_nan(), dxt.is_nan());
    }
    // ẋ(π) at x0 = -1, C = 0.
    assert!((outcome.processed.dxt[[0, 0]] + 0.7955224814157893).abs() < 1e-7);
}

#[test]
fn test_nan_mask_preserved_across_processing() {
    init_logging();
    let model = DumbbellModel::normalized();
    let grid = init_grid(
        &model,
        &GridSpec::new(1.5, 2.0, 3.0, 5.0, 0.25, 0.5),
        &NoProgress,
    )
    .unwrap();
    let dxt = process_grid(&model, &grid.x0, &grid.dy0).unwrap();
    assert_eq!(dxt.dim(), grid.dim());
    for (din, dout) in grid.dy0.iter().zip(dxt.iter()) {
        assert_eq!(din.is_nan(), dout.is_nan());
    }
    assert_eq!(grid.live_cells(), 10);
}

#[test]
fn test_known_crossing_bracketed() {
    init_logging();
    let cfg = small_config(GridSpec::new(2.0, 2.0, 4.0, 5.0, 0.1, 0.25));
    let outcome = run_search(&cfg, Arc::new(NoProgress)).unwrap();
    let brackets = outcome.sign_change_brackets();
    assert_eq!(brackets.len(), 1);
    assert_eq!((brackets[0].c_lo, brackets[0].c_hi), (4.5, 4.75));
}

#[test]
fn test_cancel_before_processing() {
    init_logging();
    let cfg = small_config(GridSpec::new(1.5, 2.0, 3.0, 5.0, 0.25, 0.5));
    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = run_search_with_cancel(&cfg, Arc::new(NoProgress), cancel).unwrap();
    for (status, dy0) in outcome.processed.status.iter().zip(outcome.grid.dy0.iter()) {
        let expected = if dy0.is_nan() {
            CellStatus::DomainInvalid
        } else {
            CellStatus::Cancelled
        };
        assert_eq!(*status, expected);
    }
}

#[test]
fn test_zero_timeout_reports_integration_failures() {
    init_logging();
    let mut cfg = small_config(GridSpec::new(1.5, 2.0, 3.0, 5.0, 0.25, 0.5));
    cfg.solver.timeout_ms = Some(0);
    let outcome = run_search(&cfg, Arc::new(NoProgress)).unwrap();
    let summary = outcome.summary();
    assert_eq!(summary.failed, 10);
    assert_eq!(summary.domain_invalid, 5);
    assert!(outcome.processed.dxt.iter().all(|v| v.is_nan()));
    assert!(outcome.sign_change_brackets().is_empty());
}

#[test]
fn test_dopri5_run_agrees_with_default() {
    init_logging();
    let spec = GridSpec::new(1.75, 2.0, 3.0, 3.5, 0.25, 0.5);
    let rkf = run_search(&small_config(spec), Arc::new(NoProgress)).unwrap();
    let json = r#"{"name": "dopri", "grid": {"x0_min": 1.75, "x0_max": 2.0,
        "C_min": 3.0, "C_max": 3.5, "dif_x0": 0.25, "dif_C": 0.5},
        "solver": {"method": "DOPRI5"}}"#;
    let dp = run_search(&SearchConfig::from_json_str(json).unwrap(), Arc::new(NoProgress)).unwrap();
    for (a, b) in rkf.processed.dxt.iter().zip(dp.processed.dxt.iter()) {
        assert!((a - b).abs() < 1e-7, "rkf78={a}, dopri5={b}");
    }
}
