//! The producer side of a stream, and the operator entry points.
//!
//! An [`Observable`] is cold: nothing happens until `actual_subscribe` hands
//! it an observer. [`ObservableExt`] carries the operator constructors, which
//! are equally lazy — building `source.buffer_throttle(interval, scheduler)`
//! neither subscribes to the source nor arms a timer.

use crate::{
  error::IntervalError,
  observer::Observer,
  ops::buffer_throttle::{BufferThrottleOp, BufferThrottleThreadsOp},
  scheduler::Duration,
  subscription::Subscription,
};

mod from_iter;
pub use from_iter::{from_iter, ObservableIter};
mod of;
pub use of::{of, OfObservable};
mod subscribe_item;
pub use subscribe_item::{ObservableItem, ObserverItem};
mod subscribe_all;
pub use subscribe_all::{ObserverAll, SubscribeAll};

pub trait Observable<Item, Err, O: Observer<Item, Err>> {
  type Unsub: Subscription;

  /// Attach `observer` and start the stream. Consumes the observable; clone
  /// it (sources here are cheap to clone) to subscribe more than once.
  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

pub trait ObservableExt<Item, Err>: Sized {
  /// Batch values by quiescence: every value is appended to a pending batch
  /// and (re)arms a timer for `interval`; the batch is emitted once the
  /// source stays silent for a full `interval`.
  ///
  /// Completion flushes a non-empty pending batch before it is forwarded; an
  /// error discards the pending batch. The pending batch is unbounded — a
  /// source that never goes quiet accumulates without limit.
  ///
  /// With `interval` zero every value becomes its own batch, still delivered
  /// asynchronously on `scheduler`.
  fn buffer_throttle<SD>(self, interval: Duration, scheduler: SD) -> BufferThrottleOp<Self, SD> {
    BufferThrottleOp { source: self, interval, scheduler }
  }

  /// [`buffer_throttle`](ObservableExt::buffer_throttle) for `Send` streams:
  /// state is mutex-guarded so the timer may fire on another thread.
  fn buffer_throttle_threads<SD>(
    self,
    interval: Duration,
    scheduler: SD,
  ) -> BufferThrottleThreadsOp<Self, SD> {
    BufferThrottleThreadsOp { source: self, interval, scheduler }
  }

  /// [`buffer_throttle`](ObservableExt::buffer_throttle) with the interval
  /// given in seconds; rejects negative or non-finite values before the
  /// operator is built.
  fn buffer_throttle_secs<SD>(
    self,
    secs: f64,
    scheduler: SD,
  ) -> Result<BufferThrottleOp<Self, SD>, IntervalError> {
    let interval = crate::error::interval_from_secs(secs)?;
    Ok(self.buffer_throttle(interval, scheduler))
  }
}
