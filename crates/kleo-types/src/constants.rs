// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Gravitational constant (m^3 kg^-1 s^-2)
pub const G_SI: f64 = 6.67430e-11;

/// Mass of the first lobe of 216-Kleopatra (kg)
pub const KLEO_M1: f64 = 1.1014e18;

/// Mass of the second lobe (kg)
pub const KLEO_M2: f64 = 1.0350e18;

/// Mass of the connecting segment (kg)
pub const KLEO_MS: f64 = 4.1547e17;

/// Segment length (m)
pub const KLEO_L: f64 = 117_800.0;

/// Distance of the first lobe from the center of mass (m)
pub const KLEO_L1: f64 = 57_322.422_399_999_996;

/// Distance of the second lobe from the center of mass (m)
pub const KLEO_L2: f64 = 60_477.577_6;

/// Force-to-centrifugal ratio kappa (dimensionless)
pub const KLEO_KAPPA: f64 = 0.991;

/// Rotation period (hours)
pub const KLEO_PERIOD_H: f64 = 5.385;

/// Mass imbalance towards the second lobe (dimensionless)
pub const KLEO_MU: f64 = 0.484;

/// Segment share of the total mass (dimensionless)
pub const KLEO_MU_S: f64 = 0.163;

/// Normalized offset of the first lobe (literature value, l = 1)
pub const KLEO_L1_NORM: f64 = 0.486608;

/// Normalized offset of the second lobe (literature value, l = 1)
pub const KLEO_L2_NORM: f64 = 0.513392;
