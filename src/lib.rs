
#![crate_name = "kalman_rudolf"]
//! The `kalman-rudolf` crate contains an implementation of the linear Kalman filter together
//! with the state propagation utilities which share its motion model. A single
//! [`LinearKalmanSystem`](filter::LinearKalmanSystem) holds the transition model, the process
//! noise covariance, the observation model, the observation noise covariance and a constant
//! control vector, and exposes four operations on them:
//!
//! - `evolve` simulates the system, drawing noise from a caller supplied random number generator
//! - `estimate` runs the Kalman filter over a sequence of observations
//! - `predict` rolls the motion model forward without observations
//! - `rewind` rolls the motion model backward by inverting it
//!
//! The predict/update recursion of the filter is also available step by step through the
//! [`Filter`](filter::Filter) trait.
//!
//! ## Scenarios
//! The [`scenario`] module provides the constant-acceleration projectile model tracked by a
//! position-only radar, along with helpers to bootstrap the filter from simulated data.
extern crate blas_src;

pub mod error;
pub mod filter;
pub mod scenario;

pub use error::{KalmanError, Result};
pub use filter::{Filter, LinearKalmanSystem};
pub use scenario::ProjectileConfig;
