//! Tracks a simulated projectile with a position-only radar.
//!
//! Observations 200 to 799 are filtered, the final estimate is rolled forward to find the point
//! of impact, and the estimates at steps 250 and 600 are rolled backward to find the point of
//! origin. Run with `RUST_LOG=debug` to see the library's logging.
use kalman_rudolf::scenario::{impact_index, initial_estimate};
use kalman_rudolf::{ProjectileConfig, Result};
use log::info;
use ndarray::{arr1, s};
use rand::rngs::StdRng;
use rand::SeedableRng;

const STEPS: usize = 1250;
const FILTER_START: usize = 200;
const FILTER_END: usize = 800;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ProjectileConfig::default();
    let system = config.build::<f64>()?;
    let mut rng = StdRng::seed_from_u64(2020);
    let (states, observations) = system.evolve(&arr1(&[0.0, 0.0, 300.0, 600.0]), STEPS, &mut rng)?;

    let start = initial_estimate(&states, &observations, FILTER_START, 9)?;
    let (estimates, norms) = system.estimate(
        &start,
        &config.initial_covariance(),
        &observations.slice(s![.., FILTER_START..FILTER_END]),
    )?;
    let last = estimates.len_of(ndarray::Axis(1)) - 1;
    info!(
        "estimate at step {}: {} (true state {}), covariance norm {:.3}",
        FILTER_END - 1,
        estimates.column(last),
        states.column(FILTER_END - 1),
        norms[last]
    );

    let forecast = system.predict(&estimates.column(last), STEPS - FILTER_END + 1)?;
    match (impact_index(&forecast), impact_index(&states)) {
        (Some(predicted), Some(actual)) => info!(
            "predicted impact at step {} near x = {:.1}, actual impact at step {} near x = {:.1}",
            FILTER_END - 1 + predicted,
            forecast[[0, predicted]],
            actual,
            states[[0, actual]]
        ),
        (predicted, actual) => info!(
            "impact not reached within the horizon (predicted {:?}, actual {:?})",
            predicted, actual
        ),
    }

    for &reference in &[250, 600] {
        let history = system.rewind(&estimates.column(reference - FILTER_START), reference + 50)?;
        match impact_index(&history) {
            Some(i) => info!(
                "rewinding from step {} puts the origin near x = {:.1} at step {}",
                reference,
                history[[0, i]],
                reference as isize - i as isize
            ),
            None => info!("rewinding from step {} never reaches the ground", reference),
        }
    }

    Ok(())
}
