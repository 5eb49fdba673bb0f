use cauchy::Scalar;
use ndarray::{ArrayBase, Data, Ix1, Ix2};
use ndarray_linalg::Lapack;

use crate::error::Result;

/// Filtering algorithm trait
///
/// This trait indicates that implementor is a representation of a recursive filtering algorithm,
/// which performs filtering operations on inputs of numeric type `T: Scalar + Lapack`.
/// The recursion is split into a prediction step, which propagates a state estimate and its
/// covariance through the motion model, and an update step, which corrects the prediction with
/// a single observation.
///
/// Driving these two steps alternately gives the same result as running the whole recursion over
/// an observation sequence at once, so callers which receive observations one by one can use
/// the trait directly.
pub trait Filter<T: Scalar + Lapack> {
    /// Result of prediction step, usually predicted state and predicted covariance
    type Prediction;
    /// Result of update step, usually updated state and updated covariance
    type Update;

    /// Prediction step executed by filtering algorithm.
    ///
    /// Parameters:
    /// * state - the current state estimate
    /// * covariance - error covariance matrix of the current state estimate
    fn predict_step<A: Data<Elem = T>, B: Data<Elem = T>>(
        &self,
        state: &ArrayBase<A, Ix1>,
        covariance: &ArrayBase<B, Ix2>,
    ) -> Result<Self::Prediction>;

    /// Update step executed by filtering algorithm.
    ///
    /// Parameters:
    /// * state - predicted state, as returned by the prediction step
    /// * covariance - predicted error covariance, as returned by the prediction step
    /// * observation - observation of the state at the predicted time step
    fn update_step<A: Data<Elem = T>, B: Data<Elem = T>, C: Data<Elem = T>>(
        &self,
        state: &ArrayBase<A, Ix1>,
        covariance: &ArrayBase<B, Ix2>,
        observation: &ArrayBase<C, Ix1>,
    ) -> Result<Self::Update>;
}
