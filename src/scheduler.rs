//! Where and when delayed work runs.
//!
//! A [`Scheduler`] accepts a [`OnceTask`] plus an optional delay and returns a
//! [`TaskHandle`] that can cancel the task before it fires. Operators never
//! block: all timing goes through the injected scheduler, which is backed by
//! a real executor in production and by [`ManualScheduler`]'s virtual clock in
//! tests.

use std::sync::{
  atomic::{AtomicU8, Ordering},
  Arc,
};

pub use std::time::{Duration, Instant};

#[cfg(feature = "futures-scheduler")]
use futures::task::LocalSpawnExt;

use crate::subscription::Subscription;

mod manual;
pub use manual::ManualScheduler;

/// A unit of schedulable work: a plain function pointer plus the state it
/// consumes. Keeping the callback a `fn` keeps tasks cheap to build on every
/// rearm.
pub struct OnceTask<S> {
  callback: fn(S),
  state: S,
}

impl<S> OnceTask<S> {
  #[inline]
  pub fn new(callback: fn(S), state: S) -> Self { OnceTask { callback, state } }

  #[inline]
  pub fn call(self) { (self.callback)(self.state) }
}

const PENDING: u8 = 0;
const CANCELLED: u8 = 1;
const DONE: u8 = 2;

/// Cancellation token for one scheduled task.
///
/// The handle is a tiny state machine (pending → cancelled | done) advanced
/// by compare-and-swap, so cancelling an already-fired task and firing an
/// already-cancelled task are both no-ops. This is what makes a stale timer
/// callback inert: every scheduler checks the handle before running the task.
#[derive(Clone, Default, Debug)]
pub struct TaskHandle {
  state: Arc<AtomicU8>,
}

impl TaskHandle {
  pub(crate) fn new() -> Self { Self::default() }

  /// `true` if the task was cancelled before it could run.
  pub fn is_cancelled(&self) -> bool { self.state.load(Ordering::Acquire) == CANCELLED }

  /// Marks the task as having run. Loses the race against `unsubscribe` by
  /// design: a cancel that lands first wins.
  pub(crate) fn finish(&self) {
    let _ = self
      .state
      .compare_exchange(PENDING, DONE, Ordering::AcqRel, Ordering::Acquire);
  }
}

impl Subscription for TaskHandle {
  fn unsubscribe(self) {
    let _ = self
      .state
      .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire);
  }

  fn is_closed(&self) -> bool { self.state.load(Ordering::Acquire) != PENDING }
}

/// Schedules tasks for (possibly delayed) execution.
pub trait Scheduler<T> {
  /// Schedule `task` to run after `delay` (immediately if `None`). The task
  /// never runs synchronously inside this call.
  fn schedule(&self, task: T, delay: Option<Duration>) -> TaskHandle;
}

/// Single-threaded scheduler backed by `futures::executor::LocalPool`.
#[cfg(feature = "futures-scheduler")]
pub type LocalScheduler = futures::executor::LocalSpawner;

/// Thread-pool scheduler for the `Send` variants of the operators.
#[cfg(feature = "futures-scheduler")]
pub type SharedScheduler = futures::executor::ThreadPool;

#[cfg(feature = "futures-scheduler")]
impl<S: 'static> Scheduler<OnceTask<S>> for LocalScheduler {
  fn schedule(&self, task: OnceTask<S>, delay: Option<Duration>) -> TaskHandle {
    let handle = TaskHandle::new();
    let task_handle = handle.clone();
    self
      .spawn_local(async move {
        if let Some(delay) = delay {
          futures_time::task::sleep(delay.into()).await;
        }
        if !task_handle.is_closed() {
          task.call();
          task_handle.finish();
        }
      })
      .expect("schedule on a local executor that has shut down");
    handle
  }
}

#[cfg(feature = "futures-scheduler")]
impl<S: Send + 'static> Scheduler<OnceTask<S>> for SharedScheduler {
  fn schedule(&self, task: OnceTask<S>, delay: Option<Duration>) -> TaskHandle {
    let handle = TaskHandle::new();
    let task_handle = handle.clone();
    self.spawn_ok(async move {
      if let Some(delay) = delay {
        futures_time::task::sleep(delay.into()).await;
      }
      if !task_handle.is_closed() {
        task.call();
        task_handle.finish();
      }
    });
    handle
  }
}

#[cfg(feature = "tokio-scheduler")]
impl<S: Send + 'static> Scheduler<OnceTask<S>> for tokio::runtime::Handle {
  fn schedule(&self, task: OnceTask<S>, delay: Option<Duration>) -> TaskHandle {
    let handle = TaskHandle::new();
    let task_handle = handle.clone();
    self.spawn(async move {
      if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
      }
      if !task_handle.is_closed() {
        task.call();
        task_handle.finish();
      }
    });
    handle
  }
}
