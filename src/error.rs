//! Configuration-boundary errors.
//!
//! A [`Duration`] is finite and non-negative by construction, so the only
//! place an invalid quiescence interval can enter the system is the
//! float-seconds constructor. It is rejected here, before any operator is
//! built and before anything subscribes to the source.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IntervalError {
  #[error("interval must be a finite number of seconds, got {0}")]
  NonFinite(f64),
  #[error("interval must be non-negative, got {0}")]
  Negative(f64),
}

/// Validates a quiescence interval given in seconds.
pub fn interval_from_secs(secs: f64) -> Result<Duration, IntervalError> {
  if !secs.is_finite() {
    return Err(IntervalError::NonFinite(secs));
  }
  if secs < 0.0 {
    return Err(IntervalError::Negative(secs));
  }
  Duration::try_from_secs_f64(secs).map_err(|_| IntervalError::NonFinite(secs))
}
