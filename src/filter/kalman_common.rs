use cauchy::Scalar;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix1, Ix2};
use ndarray_linalg::{Eigh, Inverse, Lapack, UPLO};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{KalmanError, Result};

pub(in crate) fn check_vector<A, S>(
    operand: &'static str,
    vector: &ArrayBase<S, Ix1>,
    len: usize,
) -> Result<()>
where
    A: Scalar + Lapack,
    S: Data<Elem = A>,
{
    if vector.len() != len {
        return Err(KalmanError::mismatch(operand, &[len], &[vector.len()]));
    }
    Ok(())
}

pub(in crate) fn check_matrix<A, S>(
    operand: &'static str,
    matrix: &ArrayBase<S, Ix2>,
    rows: usize,
    cols: usize,
) -> Result<()>
where
    A: Scalar + Lapack,
    S: Data<Elem = A>,
{
    let (matrix_rows, matrix_cols) = matrix.dim();
    if (matrix_rows, matrix_cols) != (rows, cols) {
        return Err(KalmanError::mismatch(
            operand,
            &[rows, cols],
            &[matrix_rows, matrix_cols],
        ));
    }
    Ok(())
}

/// Returns the side length of a square matrix.
pub(in crate) fn check_square<A, S>(operand: &'static str, matrix: &ArrayBase<S, Ix2>) -> Result<usize>
where
    A: Scalar + Lapack,
    S: Data<Elem = A>,
{
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(KalmanError::mismatch(operand, &[rows, rows], &[rows, cols]));
    }
    Ok(rows)
}

/// Plain matrix inverse. A singular input is reported under the given name.
pub(in crate) fn invert<A, S>(name: &'static str, matrix: &ArrayBase<S, Ix2>) -> Result<Array2<A>>
where
    A: Scalar + Lapack,
    S: Data<Elem = A>,
{
    matrix.inv().map_err(|source| {
        log::warn!("failed to invert {}: {}", name, source);
        KalmanError::Singular {
            matrix: name,
            source,
        }
    })
}

/// Affine transition `F x + u`.
#[inline(always)]
pub(in crate) fn transition_step<A, S>(
    transition_matrix: &Array2<A>,
    state: &ArrayBase<S, Ix1>,
    control: &Array1<A>,
) -> Array1<A>
where
    A: Scalar + Lapack,
    S: Data<Elem = A>,
{
    transition_matrix.dot(state) + control
}

/// Builds a trajectory of `horizon` columns, where column 0 is `start` and every further column
/// is `step` applied to its predecessor. `horizon` must be positive.
pub(in crate) fn rollout<A, S, F>(start: &ArrayBase<S, Ix1>, horizon: usize, mut step: F) -> Array2<A>
where
    A: Scalar + Lapack,
    S: Data<Elem = A>,
    F: FnMut(&ArrayView1<A>) -> Array1<A>,
{
    let mut trajectory = Array2::zeros([start.len(), horizon]);
    trajectory.column_mut(0).assign(start);
    for i in 1..horizon {
        let next = step(&trajectory.column(i - 1));
        trajectory.column_mut(i).assign(&next);
    }
    trajectory
}

/// Square root factor `V diag(sqrt(l))` of a symmetric positive semi-definite covariance.
///
/// The factor is computed from the symmetric eigendecomposition rather than a Cholesky
/// decomposition, so that singular covariances (including the zero matrix) are accepted.
/// Eigenvalues which come out slightly negative due to rounding are treated as zero.
pub(in crate) fn gaussian_factor<A, S>(covariance: &ArrayBase<S, Ix2>) -> Result<Array2<A>>
where
    A: Scalar + Lapack,
    S: Data<Elem = A>,
{
    let (eigenvalues, mut eigenvectors) = covariance.eigh(UPLO::Lower)?;
    for (mut column, eigenvalue) in eigenvectors.axis_iter_mut(Axis(1)).zip(eigenvalues.iter()) {
        let scale = if *eigenvalue > A::real(0.0) {
            A::from_real(*eigenvalue).sqrt()
        } else {
            A::zero()
        };
        column.map_inplace(|elem| *elem = *elem * scale);
    }
    Ok(eigenvectors)
}

/// Draws one sample of `N(0, L L^T)` given the factor `L` from `gaussian_factor`.
pub(in crate) fn draw_gaussian<A, R>(factor: &Array2<A>, rng: &mut R) -> Array1<A>
where
    A: Scalar + Lapack,
    R: Rng + ?Sized,
    StandardNormal: Distribution<A>,
{
    let standard: Array1<A> =
        Array1::from_shape_fn(factor.len_of(Axis(1)), |_| StandardNormal.sample(rng));
    factor.dot(&standard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn non_square_matrix_is_rejected() {
        let result = check_square("transition matrix", &Array2::<f64>::ones([3, 4]));
        match result {
            Err(KalmanError::DimensionMismatch { expected, found, .. }) => {
                assert_eq!(expected, vec![3, 3]);
                assert_eq!(found, vec![3, 4]);
            }
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn singular_matrix_is_reported_by_name() {
        let singular = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        match invert("transition matrix", &singular) {
            Err(KalmanError::Singular { matrix, .. }) => assert_eq!(matrix, "transition matrix"),
            other => panic!("expected singular matrix error, got {:?}", other),
        }
    }

    #[test]
    fn rollout_of_single_step_is_the_start() {
        let start = arr1(&[1.0, -2.0, 3.0]);
        let trajectory = rollout(&start, 1, |_| panic!("no step expected"));
        assert_eq!(trajectory, arr2(&[[1.0], [-2.0], [3.0]]));
    }

    #[test]
    fn zero_covariance_produces_zero_noise() -> Result<()> {
        let factor = gaussian_factor(&Array2::<f64>::zeros([4, 4]))?;
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(draw_gaussian(&factor, &mut rng), Array1::zeros(4));
        }
        Ok(())
    }

    #[test]
    fn factor_reproduces_covariance() -> Result<()> {
        let covariance = arr2(&[[4.0, 1.0], [1.0, 2.0]]);
        let factor = gaussian_factor(&covariance)?;
        assert!(factor.dot(&factor.t()).all_close(&covariance, 1e-10));
        Ok(())
    }

    #[test]
    fn sample_covariance_approaches_target() -> Result<()> {
        let covariance = arr2(&[[2.0, 0.5], [0.5, 1.0]]);
        let factor = gaussian_factor(&covariance)?;
        let mut rng = StdRng::seed_from_u64(42);
        let samples = 20_000;
        let mut accumulated = Array2::<f64>::zeros([2, 2]);
        for _ in 0..samples {
            let draw = draw_gaussian(&factor, &mut rng);
            let column = draw.view().insert_axis(Axis(1));
            accumulated = accumulated + column.dot(&column.t());
        }
        let estimated = accumulated.mapv(|elem| elem / samples as f64);
        assert!(estimated.all_close(&covariance, 0.1));
        Ok(())
    }
}
