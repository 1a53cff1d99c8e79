//! The buffer-and-throttle operator.
//!
//! Values are appended to a pending batch; every arrival cancels the previous
//! flush timer and arms a fresh one for the configured interval, so the batch
//! is emitted only after the source has been quiet for a full interval.
//! Completion flushes the pending batch before it is forwarded; an error
//! discards it.
//!
//! Buffer and timer slot live behind one shared-mutability wrapper each, and
//! the flush task detaches the batch in a single exclusive access, so the two
//! asynchronous triggers (value arrival, timer firing) never interleave
//! mid-mutation. A timer that lost the cancellation race finds an empty
//! buffer and emits nothing.

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::{MutArc, MutRc, RcDeref, RcDerefMut},
  scheduler::{Duration, OnceTask, Scheduler, TaskHandle},
  subscription::{Subscription, ZipSubscription},
};

#[derive(Clone)]
pub struct BufferThrottleOp<S, SD> {
  pub(crate) source: S,
  pub(crate) interval: Duration,
  pub(crate) scheduler: SD,
}

#[derive(Clone)]
pub struct BufferThrottleThreadsOp<S, SD> {
  pub(crate) source: S,
  pub(crate) interval: Duration,
  pub(crate) scheduler: SD,
}

pub struct BufferThrottleObserver<O, SD, Item> {
  observer: MutRc<Option<O>>,
  buffer: MutRc<Vec<Item>>,
  interval: Duration,
  scheduler: SD,
  task_handle: MutRc<Option<TaskHandle>>,
}

pub struct BufferThrottleObserverThreads<O, SD, Item> {
  observer: MutArc<Option<O>>,
  buffer: MutArc<Vec<Item>>,
  interval: Duration,
  scheduler: SD,
  task_handle: MutArc<Option<TaskHandle>>,
}

macro_rules! impl_buffer_throttle_op {
  ($op: ty, $rc: ident, $observer: ident) => {
    impl<Item, Err, O, S, SD> Observable<Vec<Item>, Err, O> for $op
    where
      O: Observer<Vec<Item>, Err>,
      S: Observable<Item, Err, $observer<O, SD, Item>>,
      SD: Scheduler<OnceTask<($rc<Option<O>>, $rc<Vec<Item>>)>>,
    {
      type Unsub = ZipSubscription<S::Unsub, $rc<Option<TaskHandle>>>;

      fn actual_subscribe(self, observer: O) -> Self::Unsub {
        let Self { source, interval, scheduler } = self;
        let task_handle = $rc::own(None);
        let observer = $observer {
          observer: $rc::own(Some(observer)),
          buffer: $rc::own(Vec::new()),
          interval,
          scheduler,
          task_handle: task_handle.clone(),
        };
        let unsub = source.actual_subscribe(observer);
        ZipSubscription::new(unsub, task_handle)
      }
    }

    impl<Item, Err, O, SD> Observer<Item, Err> for $observer<O, SD, Item>
    where
      O: Observer<Vec<Item>, Err>,
      SD: Scheduler<OnceTask<($rc<Option<O>>, $rc<Vec<Item>>)>>,
    {
      fn next(&mut self, value: Item) {
        fn flush_batch<Item, Err>(
          (mut observer, buffer): (impl Observer<Vec<Item>, Err>, $rc<Vec<Item>>),
        ) {
          let batch = std::mem::take(&mut *buffer.rc_deref_mut());
          // empty only when a stale timer slipped past cancellation
          if !batch.is_empty() {
            observer.next(batch);
          }
        }

        self.buffer.rc_deref_mut().push(value);
        if let Some(handle) = self.task_handle.rc_deref_mut().take() {
          handle.unsubscribe();
        }
        let task =
          OnceTask::new(flush_batch, (self.observer.clone(), self.buffer.clone()));
        let handle = self.scheduler.schedule(task, Some(self.interval));
        *self.task_handle.rc_deref_mut() = Some(handle);
      }

      fn error(self, err: Err) {
        if let Some(handle) = self.task_handle.rc_deref_mut().take() {
          handle.unsubscribe();
        }
        // an interrupted batch is not presented as a coherent final batch
        self.buffer.rc_deref_mut().clear();
        self.observer.error(err);
      }

      fn complete(self) {
        if let Some(handle) = self.task_handle.rc_deref_mut().take() {
          handle.unsubscribe();
        }
        let batch = std::mem::take(&mut *self.buffer.rc_deref_mut());
        let mut observer = self.observer;
        if !batch.is_empty() {
          observer.next(batch);
        }
        observer.complete();
      }

      #[inline]
      fn is_finished(&self) -> bool { self.observer.rc_deref().is_none() }
    }

    impl<Item, Err, S, SD> ObservableExt<Vec<Item>, Err> for $op where
      S: ObservableExt<Item, Err>
    {
    }
  };
}

impl_buffer_throttle_op!(BufferThrottleOp<S, SD>, MutRc, BufferThrottleObserver);
impl_buffer_throttle_op!(
  BufferThrottleThreadsOp<S, SD>,
  MutArc,
  BufferThrottleObserverThreads
);
