//! Errors produced by the filtering and prediction routines.

use ndarray_linalg::error::LinalgError;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, KalmanError>;

/// Failure of a filtering, simulation or prediction call.
///
/// Errors abort the whole trajectory computation. No partial trajectory is ever returned.
#[derive(Debug, Error)]
pub enum KalmanError {
    /// Operand shapes are incompatible with the system dimensions.
    #[error("dimension mismatch for {operand}: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        operand: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A matrix which has to be inverted is singular.
    #[error("{matrix} is singular")]
    Singular {
        matrix: &'static str,
        #[source]
        source: LinalgError,
    },

    /// A trajectory of zero time steps was requested.
    #[error("at least one time step is required")]
    EmptyHorizon,

    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

impl KalmanError {
    pub(crate) fn mismatch(operand: &'static str, expected: &[usize], found: &[usize]) -> Self {
        KalmanError::DimensionMismatch {
            operand,
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}
