// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Kleo Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Symmetric periodic-orbit grid search around 216-Kleopatra.
//!
//! Potential and equations of motion of the dipole-segment model, the
//! (x0, C) search grid, half-period propagation and the parallel grid
//! processor.

pub mod eom;
pub mod grid;
pub mod initial;
pub mod io;
pub mod potential;
pub mod processor;
pub mod progress;
pub mod propagator;
pub mod search;
