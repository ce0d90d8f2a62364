// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::KleoError;

/// Rotating-frame state `[x, y, z, dx/dt, dy/dt, dz/dt]`.
pub type StateVector = [f64; 6];

/// Index of the x-velocity component in a [`StateVector`].
pub const IDX_VX: usize = 3;
/// Index of the y-velocity component in a [`StateVector`].
pub const IDX_VY: usize = 4;

/// Outcome of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellStatus {
    /// Integrated to the half period.
    Converged,
    /// Energy constant not reachable at this position. Routine.
    #[default]
    DomainInvalid,
    /// Non-finite derivative reached mid-integration.
    SingularTrajectory,
    /// Step limit, step-size underflow or timeout.
    IntegrationFailure,
    /// Skipped or aborted by a cancellation request.
    Cancelled,
}

impl CellStatus {
    /// Stable integer code used when persisting status grids.
    pub fn code(self) -> i32 {
        match self {
            CellStatus::Converged => 0,
            CellStatus::DomainInvalid => 1,
            CellStatus::SingularTrajectory => 2,
            CellStatus::IntegrationFailure => 3,
            CellStatus::Cancelled => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(CellStatus::Converged),
            1 => Some(CellStatus::DomainInvalid),
            2 => Some(CellStatus::SingularTrajectory),
            3 => Some(CellStatus::IntegrationFailure),
            4 => Some(CellStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            CellStatus::SingularTrajectory | CellStatus::IntegrationFailure
        )
    }
}

impl From<&KleoError> for CellStatus {
    fn from(err: &KleoError) -> Self {
        match err {
            KleoError::SingularTrajectory { .. } => CellStatus::SingularTrajectory,
            KleoError::DomainInvalid { .. } => CellStatus::DomainInvalid,
            KleoError::Cancelled => CellStatus::Cancelled,
            _ => CellStatus::IntegrationFailure,
        }
    }
}

/// One evaluated grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSample {
    pub x0: f64,
    /// Energy constant C.
    pub c: f64,
    /// Initial transverse velocity; NaN outside the allowed region.
    pub dy0: f64,
    /// x-velocity at t = π; NaN unless `status` is `Converged`.
    pub dxt: f64,
    pub status: CellStatus,
}

/// Per-status cell counts of a processed grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSummary {
    pub converged: usize,
    pub domain_invalid: usize,
    pub singular: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl SearchSummary {
    pub fn record(&mut self, status: CellStatus) {
        match status {
            CellStatus::Converged => self.converged += 1,
            CellStatus::DomainInvalid => self.domain_invalid += 1,
            CellStatus::SingularTrajectory => self.singular += 1,
            CellStatus::IntegrationFailure => self.failed += 1,
            CellStatus::Cancelled => self.cancelled += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.converged + self.domain_invalid + self.singular + self.failed + self.cancelled
    }

    pub fn failures(&self) -> usize {
        self.singular + self.failed
    }
}
