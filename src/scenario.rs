//! Constant-acceleration projectile tracked by a position-only radar.
//!
//! The state is `[x, y, vx, vy]`, the observations are the positions `[x, y]`, and gravity
//! enters the model through the control vector.

use cauchy::Scalar;
use ndarray::{array, s, Array1, Array2, ArrayBase, Axis, Data, Ix2};
use ndarray_linalg::Lapack;

use crate::error::{KalmanError, Result};
use crate::filter::LinearKalmanSystem;

/// Parameters of the projectile scenario.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileConfig {
    /// Length of one time step.
    pub time_step: f64,
    /// Gravitational acceleration, pulling along the negative y axis.
    pub gravity: f64,
    /// Process noise variance, the same for every state component.
    pub process_noise: f64,
    /// Observation noise variance, the same for both position components.
    pub observation_noise: f64,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        ProjectileConfig {
            time_step: 0.1,
            gravity: 9.8,
            process_noise: 0.1,
            observation_noise: 5000.0,
        }
    }
}

fn lift<T: Scalar>(value: f64) -> T {
    T::from_real(T::real(value))
}

fn scaled_identity<T: Scalar>(dim: usize, value: f64) -> Array2<T> {
    Array2::from_diag(&Array1::from_elem(dim, lift::<T>(value)))
}

impl ProjectileConfig {
    /// Builds the linear Kalman system of the scenario.
    pub fn build<T: Scalar + Lapack>(&self) -> Result<LinearKalmanSystem<T>> {
        let (zero, one, dt) = (T::zero(), T::one(), lift::<T>(self.time_step));
        let transition = array![
            [one, zero, dt, zero],
            [zero, one, zero, dt],
            [zero, zero, one, zero],
            [zero, zero, zero, one]
        ];
        let observation = array![[one, zero, zero, zero], [zero, one, zero, zero]];
        let control = array![zero, zero, zero, lift::<T>(-self.gravity * self.time_step)];
        LinearKalmanSystem::new(
            &transition,
            &scaled_identity(4, self.process_noise),
            &observation,
            &scaled_identity(2, self.observation_noise),
            &control,
        )
    }

    /// Deliberately loose initial error covariance, `10^7 Q`.
    pub fn initial_covariance<T: Scalar>(&self) -> Array2<T> {
        scaled_identity(4, 1e7 * self.process_noise)
    }
}

/// Projectile system with the default configuration.
pub fn projectile<T: Scalar + Lapack>() -> Result<LinearKalmanSystem<T>> {
    ProjectileConfig::default().build()
}

/// Bootstraps a filter estimate at time step `at`.
///
/// The position is taken from observation `at`. The velocity components are the absolute
/// values of the mean step-to-step change of the true velocities over the `window` states
/// starting at `at`.
///
/// Only `f64` trajectories are accepted: the heuristic takes absolute values and means of
/// physical velocities, which are real quantities, while the generic system also admits
/// complex scalars.
pub fn initial_estimate<S1, S2>(
    states: &ArrayBase<S1, Ix2>,
    observations: &ArrayBase<S2, Ix2>,
    at: usize,
    window: usize,
) -> Result<Array1<f64>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    let (state_rows, state_cols) = states.dim();
    let (observation_rows, observation_cols) = observations.dim();
    if state_rows != 4 {
        return Err(KalmanError::mismatch("states", &[4, state_cols], &[state_rows, state_cols]));
    }
    if observation_rows != 2 || observation_cols <= at {
        return Err(KalmanError::mismatch(
            "observations",
            &[2, at + 1],
            &[observation_rows, observation_cols],
        ));
    }
    if window < 2 || at + window > state_cols {
        return Err(KalmanError::mismatch(
            "states",
            &[4, at + window.max(2)],
            &[state_rows, state_cols],
        ));
    }

    let velocities = states.slice(s![2.., at..at + window]);
    let changes = &velocities.slice(s![.., 1..]) - &velocities.slice(s![.., ..-1]);
    let mean_change = changes
        .mean_axis(Axis(1))
        .ok_or(KalmanError::EmptyHorizon)?;

    let position = observations.column(at);
    Ok(array![
        position[0],
        position[1],
        mean_change[0].abs(),
        mean_change[1].abs()
    ])
}

/// Index of the first state whose altitude is below ground, if there is one.
///
/// Returns `None` for arrays without an altitude row.
pub fn impact_index<S: Data<Elem = f64>>(trajectory: &ArrayBase<S, Ix2>) -> Option<usize> {
    if trajectory.dim().0 < 2 {
        return None;
    }
    trajectory.row(1).iter().position(|&altitude| altitude < 0.0)
}
