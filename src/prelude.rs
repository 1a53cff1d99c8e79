//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::error::{interval_from_secs, IntervalError};
// Creation/Factories
pub use crate::observable;
// Core traits and subscribe sugar
pub use crate::observable::{
  Observable, ObservableExt, ObservableItem, SubscribeAll,
};
// Observer trait
pub use crate::observer::Observer;
// Operators
pub use crate::ops::buffer_throttle::{BufferThrottleOp, BufferThrottleThreadsOp};
// Default Schedulers
#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::{LocalScheduler, SharedScheduler};
// Scheduler core types
pub use crate::scheduler::{
  Duration, Instant, ManualScheduler, OnceTask, Scheduler, TaskHandle,
};
// Subject
pub use crate::subject::*;
// Subscription
pub use crate::subscription::*;
