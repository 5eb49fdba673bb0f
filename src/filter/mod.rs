pub mod filter_traits;
pub mod kalman;
mod kalman_common;

pub use filter_traits::*;
pub use kalman::LinearKalmanSystem;
