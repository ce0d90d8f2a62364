// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Property-Based Tests (proptest) for kleo-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for kleo-types using proptest.
//!
//! Covers: parameter validation, grid spec validation, config JSON defaults,
//! status bookkeeping.

use kleo_types::config::{GridSpec, SearchConfig};
use kleo_types::params::ParameterSet;
use kleo_types::state::{CellStatus, SearchSummary};
use proptest::prelude::*;

// ── ParameterSet ─────────────────────────────────────────────────────

proptest! {
    /// Any positive split of the segment length validates.
    #[test]
    fn offsets_summing_to_length_validate(l in 0.1f64..1e6, frac in 0.01f64..0.99) {
        let mut p = ParameterSet::normalized();
        p.l = l;
        p.l1 = frac * l;
        p.l2 = l - p.l1;
        prop_assert!(p.validate().is_ok());
    }

    /// Offsets off by more than the tolerance are rejected.
    #[test]
    fn offsets_not_summing_to_length_rejected(shift in 1e-6f64..0.5) {
        let mut p = ParameterSet::normalized();
        p.l2 += shift;
        prop_assert!(p.validate().is_err());
    }

    /// Mass ratios outside [0, 1] are rejected.
    #[test]
    fn mass_ratio_out_of_range_rejected(mu in 1.0001f64..10.0) {
        let mut p = ParameterSet::normalized();
        p.mu = mu;
        prop_assert!(p.validate().is_err());
        p.mu = -mu;
        prop_assert!(p.validate().is_err());
    }
}

// ── GridSpec / SearchConfig ──────────────────────────────────────────

proptest! {
    /// Finite increasing ranges with positive steps validate.
    #[test]
    fn finite_grid_spec_validates(
        x0_min in -10.0f64..10.0,
        x0_span in 0.0f64..5.0,
        c_min in -10.0f64..10.0,
        c_span in 0.0f64..5.0,
        dx in 1e-4f64..1.0,
        dc in 1e-4f64..1.0,
    ) {
        let spec = GridSpec::new(x0_min, x0_min + x0_span, c_min, c_min + c_span, dx, dc);
        prop_assert!(spec.validate().is_ok());
    }

    /// Non-positive steps are rejected on either axis.
    #[test]
    fn non_positive_step_rejected(step in -1.0f64..=0.0) {
        prop_assert!(GridSpec::new(0.0, 1.0, 0.0, 1.0, step, 0.1).validate().is_err());
        prop_assert!(GridSpec::new(0.0, 1.0, 0.0, 1.0, 0.1, step).validate().is_err());
    }

    /// Reversed ranges are rejected.
    #[test]
    fn reversed_range_rejected(lo in -5.0f64..5.0, gap in 1e-3f64..5.0) {
        prop_assert!(GridSpec::new(lo, lo - gap, 0.0, 1.0, 0.1, 0.1).validate().is_err());
    }

    /// A config naming only the grid keeps solver defaults.
    #[test]
    fn config_json_fills_defaults(x0_min in -3.0f64..0.0, c_max in 0.0f64..5.0) {
        let json = format!(
            r#"{{"name": "p", "grid": {{"x0_min": {x0_min}, "x0_max": 2.0,
                "C_min": -3.0, "C_max": {c_max}, "dif_x0": 0.1, "dif_C": 0.1}}}}"#
        );
        let cfg = SearchConfig::from_json_str(&json).unwrap();
        prop_assert!((cfg.grid.x0_min - x0_min).abs() < 1e-12);
        prop_assert!((cfg.grid.c_max - c_max).abs() < 1e-12);
        prop_assert_eq!(cfg.solver.rtol, 1e-10);
        prop_assert_eq!(cfg.solver.atol, 1e-12);
        prop_assert!(cfg.workers.is_none());
    }
}

// ── Status Bookkeeping ───────────────────────────────────────────────

proptest! {
    /// Summary counts add up to the number of recorded cells.
    #[test]
    fn summary_total_matches_records(codes in prop::collection::vec(0i32..5, 0..200)) {
        let mut summary = SearchSummary::default();
        let mut failures = 0;
        for &code in &codes {
            let status = CellStatus::from_code(code).unwrap();
            if status.is_failure() {
                failures += 1;
            }
            summary.record(status);
        }
        prop_assert_eq!(summary.total(), codes.len());
        prop_assert_eq!(summary.failures(), failures);
    }

    /// Codes outside 0..5 do not map to a status.
    #[test]
    fn unknown_codes_rejected(code in prop_oneof![i32::MIN..0, 5i32..i32::MAX]) {
        prop_assert!(CellStatus::from_code(code).is_none());
    }
}
