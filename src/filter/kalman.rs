//! This module contains the implementation of the linear Kalman system, a linear-Gaussian motion
//! model paired with a linear observation model, together with the filtering and prediction
//! algorithms operating on it.
use super::filter_traits::Filter;
use super::kalman_common::*;
use crate::error::{KalmanError, Result};
use cauchy::Scalar;
use log::{debug, trace};
use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_linalg::lapack::Lapack;
use ndarray_linalg::Norm;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Linear Kalman system
///
/// This type encapsulates a discrete linear-Gaussian dynamical system
///
/// ```text
/// x[i] = F x[i-1] + u + w,    w ~ N(0, Q)
/// z[i] = H x + v,             v ~ N(0, R)
/// ```
///
/// and the algorithms built on it: stochastic simulation (`evolve`), Kalman filtering over an
/// observation sequence (`estimate`), and deterministic forward (`predict`) and backward
/// (`rewind`) rollouts of the motion model. The parameters are fixed at construction and never
/// mutated, so one instance can be shared between any number of callers.
///
/// All trajectories are returned as two-dimensional arrays whose i-th column holds the vector
/// belonging to time step i.
///
/// Type parameter `T: Scalar + Lapack` is used to indicate that the system can contain any
/// matrices, which are considered to contain numbers ( i.e real or complex numbers ). Simulation
/// additionally needs a real scalar type, since it draws Gaussian noise.
#[derive(Clone, Debug)]
pub struct LinearKalmanSystem<T: Scalar + Lapack> {
    transition_matrix: Array2<T>,
    process_covariance: Array2<T>,
    observation_matrix: Array2<T>,
    observation_covariance: Array2<T>,
    control: Array1<T>,
}

impl<T: Scalar + Lapack> LinearKalmanSystem<T> {
    /// Creates new linear Kalman system with given matrices
    ///
    /// This constructor expects following conditions to hold:
    /// * transition matrix `F` is square, say n×n
    /// * process covariance `Q` has the same shape as `F`
    /// * observation matrix `H` has n columns, say it is m×n
    /// * observation covariance `R` is m×m
    /// * control vector `u` has length n
    ///
    /// If any of the conditions is not upheld, then the return value is the
    /// `KalmanError::DimensionMismatch` variant, otherwise a well-formed system is returned.
    /// Symmetry and definiteness of the covariances are not checked.
    pub fn new<A: Data<Elem = T>, B: Data<Elem = T>>(
        transition_matrix: &ArrayBase<A, Ix2>,
        process_covariance: &ArrayBase<A, Ix2>,
        observation_matrix: &ArrayBase<A, Ix2>,
        observation_covariance: &ArrayBase<A, Ix2>,
        control: &ArrayBase<B, Ix1>,
    ) -> Result<LinearKalmanSystem<T>> {
        let state_dim = check_square("transition matrix", transition_matrix)?;
        check_matrix("process covariance", process_covariance, state_dim, state_dim)?;
        let observation_dim = observation_matrix.dim().0;
        check_matrix("observation matrix", observation_matrix, observation_dim, state_dim)?;
        check_matrix(
            "observation covariance",
            observation_covariance,
            observation_dim,
            observation_dim,
        )?;
        check_vector("control vector", control, state_dim)?;

        debug!(
            "created linear Kalman system with state dimension {} and observation dimension {}",
            state_dim, observation_dim
        );

        Ok(LinearKalmanSystem {
            transition_matrix: transition_matrix.to_owned(),
            process_covariance: process_covariance.to_owned(),
            observation_matrix: observation_matrix.to_owned(),
            observation_covariance: observation_covariance.to_owned(),
            control: control.to_owned(),
        })
    }

    pub fn transition_matrix(&self) -> &Array2<T> {
        &self.transition_matrix
    }

    pub fn process_covariance(&self) -> &Array2<T> {
        &self.process_covariance
    }

    pub fn observation_matrix(&self) -> &Array2<T> {
        &self.observation_matrix
    }

    pub fn observation_covariance(&self) -> &Array2<T> {
        &self.observation_covariance
    }

    pub fn control(&self) -> &Array1<T> {
        &self.control
    }

    /// Dimension n of the state vectors
    pub fn state_dim(&self) -> usize {
        self.transition_matrix.dim().0
    }

    /// Dimension m of the observation vectors
    pub fn observation_dim(&self) -> usize {
        self.observation_matrix.dim().0
    }

    /// Runs the Kalman filter over a sequence of observations.
    ///
    /// Parameters:
    /// * initial_state - the initial state estimate x0 of length n
    /// * initial_covariance - the n×n error covariance P0 of the initial estimate
    /// * observations - m×N array, whose i-th column is the observation at time step i
    ///
    /// Returns the n×N array of state estimates, whose column 0 is `initial_state`, together
    /// with N covariance norms. Element 0 of the norms is the Frobenius norm of
    /// `initial_covariance`, element i is the norm of the *predicted* covariance of step i,
    /// taken before the observation of step i is incorporated. The observation in column 0 is
    /// never used, the initial estimate takes its place.
    ///
    /// Fails with `KalmanError::Singular` if an innovation covariance can not be inverted.
    pub fn estimate<A, B, C>(
        &self,
        initial_state: &ArrayBase<A, Ix1>,
        initial_covariance: &ArrayBase<B, Ix2>,
        observations: &ArrayBase<C, Ix2>,
    ) -> Result<(Array2<T>, Array1<T::Real>)>
    where
        A: Data<Elem = T>,
        B: Data<Elem = T>,
        C: Data<Elem = T>,
    {
        let state_dim = self.state_dim();
        check_vector("initial state", initial_state, state_dim)?;
        check_matrix("initial covariance", initial_covariance, state_dim, state_dim)?;
        let (observation_rows, steps) = observations.dim();
        if observation_rows != self.observation_dim() {
            return Err(KalmanError::mismatch(
                "observations",
                &[self.observation_dim(), steps],
                &[observation_rows, steps],
            ));
        }
        if steps == 0 {
            return Err(KalmanError::EmptyHorizon);
        }
        debug!("estimating {} states from observations", steps);

        let mut estimates = Array2::zeros([state_dim, steps]);
        estimates.column_mut(0).assign(initial_state);
        let mut norms = Vec::with_capacity(steps);
        norms.push(initial_covariance.norm_l2());

        let mut covariance = initial_covariance.to_owned();
        for i in 1..steps {
            let (predicted_state, predicted_covariance) =
                self.predict_step(&estimates.column(i - 1), &covariance)?;
            let predicted_norm = predicted_covariance.norm_l2();
            trace!("step {}: predicted covariance norm {}", i, predicted_norm);
            norms.push(predicted_norm);

            let (state, updated_covariance) = self.update_step(
                &predicted_state,
                &predicted_covariance,
                &observations.column(i),
            )?;
            estimates.column_mut(i).assign(&state);
            covariance = updated_covariance;
        }

        Ok((estimates, Array1::from(norms)))
    }

    /// Predicts states forward in time in the absence of observations.
    ///
    /// Returns n×`horizon` array, whose column 0 is `state` and whose column i is
    /// `F * column(i-1) + u`. No noise is added.
    pub fn predict<A: Data<Elem = T>>(
        &self,
        state: &ArrayBase<A, Ix1>,
        horizon: usize,
    ) -> Result<Array2<T>> {
        check_vector("state", state, self.state_dim())?;
        if horizon == 0 {
            return Err(KalmanError::EmptyHorizon);
        }
        debug!("predicting {} states forward", horizon);
        Ok(rollout(state, horizon, |previous| {
            transition_step(&self.transition_matrix, previous, &self.control)
        }))
    }

    /// Predicts states backward in time by inverting the motion model.
    ///
    /// Returns n×`horizon` array, whose column 0 is `state` and whose column i is
    /// `F^-1 * (column(i-1) - u)`. If `state` belongs to time step t, column i therefore belongs
    /// to time step t - i: the columns run backward in time and are not reordered.
    ///
    /// Fails with `KalmanError::Singular` if the transition matrix is not invertible.
    pub fn rewind<A: Data<Elem = T>>(
        &self,
        state: &ArrayBase<A, Ix1>,
        horizon: usize,
    ) -> Result<Array2<T>> {
        check_vector("state", state, self.state_dim())?;
        if horizon == 0 {
            return Err(KalmanError::EmptyHorizon);
        }
        debug!("rewinding {} states backward", horizon);
        let inverse_transition = invert("transition matrix", &self.transition_matrix)?;
        Ok(rollout(state, horizon, |previous| {
            inverse_transition.dot(&(previous - &self.control))
        }))
    }
}

impl<T> LinearKalmanSystem<T>
where
    T: Scalar + Lapack,
    StandardNormal: Distribution<T>,
{
    /// Simulates the system for `steps` time steps, starting at `initial_state`.
    ///
    /// Returns n×`steps` array of states and m×`steps` array of observations. Column 0 of the
    /// states is `initial_state` and column 0 of the observations holds the first m components of
    /// `initial_state`. For i >= 1
    ///
    /// ```text
    /// states[i]       = F states[i-1] + u + w[i]
    /// observations[i] = H states[i-1] + v[i]
    /// ```
    ///
    /// Note that observation i is generated from state i-1, so observations trail the states by
    /// one step. Existing trajectories and callers are built around this indexing.
    ///
    /// All randomness is drawn from `rng`, so seeding it makes the simulation reproducible.
    pub fn evolve<A, R>(
        &self,
        initial_state: &ArrayBase<A, Ix1>,
        steps: usize,
        rng: &mut R,
    ) -> Result<(Array2<T>, Array2<T>)>
    where
        A: Data<Elem = T>,
        R: Rng + ?Sized,
    {
        let state_dim = self.state_dim();
        let observation_dim = self.observation_dim();
        check_vector("initial state", initial_state, state_dim)?;
        if observation_dim > state_dim {
            return Err(KalmanError::mismatch(
                "initial state",
                &[observation_dim],
                &[state_dim],
            ));
        }
        if steps == 0 {
            return Err(KalmanError::EmptyHorizon);
        }
        debug!("simulating {} steps", steps);

        let process_noise = gaussian_factor(&self.process_covariance)?;
        let observation_noise = gaussian_factor(&self.observation_covariance)?;

        let mut states = Array2::zeros([state_dim, steps]);
        let mut observations = Array2::zeros([observation_dim, steps]);
        states.column_mut(0).assign(initial_state);
        observations
            .column_mut(0)
            .assign(&initial_state.slice(s![..observation_dim]));

        for i in 1..steps {
            let previous = states.column(i - 1).to_owned();
            let state = transition_step(&self.transition_matrix, &previous, &self.control)
                + &draw_gaussian(&process_noise, rng);
            let observation =
                self.observation_matrix.dot(&previous) + &draw_gaussian(&observation_noise, rng);
            states.column_mut(i).assign(&state);
            observations.column_mut(i).assign(&observation);
        }

        Ok((states, observations))
    }
}

/// Implementation of the single-step Kalman recursion
impl<T: Scalar + Lapack> Filter<T> for LinearKalmanSystem<T> {
    /// Predicted state `F x + u` and predicted covariance `F P F^T + Q`.
    type Prediction = (Array1<T>, Array2<T>);

    /// Updated state `x + K y` and updated covariance `(I - K H) P`, where `y` is the innovation
    /// and `K` the Kalman gain.
    type Update = (Array1<T>, Array2<T>);

    fn predict_step<A: Data<Elem = T>, B: Data<Elem = T>>(
        &self,
        state: &ArrayBase<A, Ix1>,
        covariance: &ArrayBase<B, Ix2>,
    ) -> Result<Self::Prediction> {
        let state_dim = self.state_dim();
        check_vector("state", state, state_dim)?;
        check_matrix("covariance", covariance, state_dim, state_dim)?;

        let predicted_state = transition_step(&self.transition_matrix, state, &self.control);
        let predicted_covariance = self
            .transition_matrix
            .dot(covariance)
            .dot(&self.transition_matrix.t())
            + &self.process_covariance;
        Ok((predicted_state, predicted_covariance))
    }

    fn update_step<A: Data<Elem = T>, B: Data<Elem = T>, C: Data<Elem = T>>(
        &self,
        state: &ArrayBase<A, Ix1>,
        covariance: &ArrayBase<B, Ix2>,
        observation: &ArrayBase<C, Ix1>,
    ) -> Result<Self::Update> {
        let state_dim = self.state_dim();
        check_vector("state", state, state_dim)?;
        check_matrix("covariance", covariance, state_dim, state_dim)?;
        check_vector("observation", observation, self.observation_dim())?;

        let innovation = observation - &self.observation_matrix.dot(state);
        trace!("innovation {}", innovation);
        let l_matrix = covariance.dot(&self.observation_matrix.t());
        let innovation_covariance =
            self.observation_matrix.dot(&l_matrix) + &self.observation_covariance;
        let innovation_covariance_inv = invert("innovation covariance", &innovation_covariance)?;
        let kalman_gain = l_matrix.dot(&innovation_covariance_inv);

        let updated_state = state + &kalman_gain.dot(&innovation);
        let updated_covariance = (Array2::eye(state_dim)
            - &kalman_gain.dot(&self.observation_matrix))
            .dot(covariance);
        Ok((updated_state, updated_covariance))
    }
}
