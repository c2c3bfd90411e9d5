//! Cancellable waits shared by the generator and the processors.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// A blocking wait was cut short by a stop request. Not a failure: the caller winds down.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("wait interrupted by stop request")]
pub struct Interrupted;

/// Build the rng for one task, reproducible when a seed is given.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// A random delay in `[0, max)`. Zero when `max` is zero.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, max: Duration) -> Duration {
    let nanos = u64::try_from(max.as_nanos()).unwrap_or(u64::MAX);
    if nanos == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(rng.random_range(0..nanos))
}

/// Sleep for `delay` unless `stop` fires first.
pub async fn sleep(delay: Duration, stop: &CancellationToken) -> Result<(), Interrupted> {
    if delay.is_zero() {
        return if stop.is_cancelled() {
            Err(Interrupted)
        } else {
            Ok(())
        };
    }
    tokio::select! {
        biased;
        _ = stop.cancelled() => Err(Interrupted),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}
