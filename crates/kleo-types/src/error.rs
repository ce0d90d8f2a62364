// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KleoError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Initial condition lies outside the energetically allowed region.
    /// Routine during a grid search; not a failure.
    #[error("Initial condition outside allowed region: x0={x0}, dy0={dy0}")]
    DomainInvalid { x0: f64, dy0: f64 },

    #[error("Singular trajectory at t={t}: {message}")]
    SingularTrajectory { t: f64, message: String },

    #[error("Integration failed at t={t} after {steps} steps: {message}")]
    IntegrationFailure {
        t: f64,
        steps: usize,
        message: String,
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Search cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("NPZ error: {0}")]
    Npz(String),
}

impl KleoError {
    /// Failures worth surfacing per cell. Domain rejections and
    /// cancellations are expected outcomes of a search run.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            KleoError::SingularTrajectory { .. } | KleoError::IntegrationFailure { .. }
        )
    }
}

pub type KleoResult<T> = Result<T, KleoError>;
