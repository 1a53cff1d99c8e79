//! A virtual-clock scheduler for deterministic, clock-free tests.
//!
//! Time only moves when [`ManualScheduler::advance`] is called. Due tasks run
//! synchronously during `advance`, in due-time order (insertion order for
//! ties), with the clock set to each task's due instant while it runs — so a
//! task that schedules follow-up work sees a consistent "now".

use std::{cmp::Ordering, collections::BinaryHeap};

use super::{Duration, Instant, OnceTask, Scheduler, TaskHandle};
use crate::{
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::Subscription,
};

#[derive(Clone)]
pub struct ManualScheduler(MutRc<Inner>);

struct Inner {
  current: Instant,
  next_seq: usize,
  queue: BinaryHeap<QueuedTask>,
}

struct QueuedTask {
  at: Instant,
  seq: usize,
  handle: TaskHandle,
  run: Box<dyn FnOnce()>,
}

impl PartialEq for QueuedTask {
  fn eq(&self, other: &Self) -> bool { self.at == other.at && self.seq == other.seq }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for QueuedTask {
  // Reversed so the BinaryHeap pops the earliest (and, for equal instants,
  // the first-scheduled) task.
  fn cmp(&self, other: &Self) -> Ordering {
    other
      .at
      .cmp(&self.at)
      .then_with(|| other.seq.cmp(&self.seq))
  }
}

impl Default for ManualScheduler {
  fn default() -> Self {
    ManualScheduler(MutRc::own(Inner {
      current: Instant::now(),
      next_seq: 0,
      queue: BinaryHeap::new(),
    }))
  }
}

impl ManualScheduler {
  pub fn new() -> Self { Self::default() }

  /// The current virtual time.
  pub fn now(&self) -> Instant { self.0.rc_deref().current }

  /// Move the clock forward by `duration`, running every task that falls due
  /// on the way. A task scheduled with zero delay is due immediately, so
  /// `advance(Duration::ZERO)` drains it.
  pub fn advance(&self, duration: Duration) { self.advance_to(self.now() + duration) }

  /// Move the clock forward to `target`.
  pub fn advance_to(&self, target: Instant) {
    loop {
      let due = {
        let mut inner = self.0.rc_deref_mut();
        let expired = inner.queue.peek().is_some_and(|task| task.at <= target);
        if expired {
          let task = inner.queue.pop();
          if let Some(task) = &task {
            inner.current = task.at;
          }
          task
        } else {
          None
        }
        // borrow dropped here: the task may re-enter the scheduler
      };
      match due {
        Some(task) => {
          if !task.handle.is_closed() {
            (task.run)();
            task.handle.finish();
          }
        }
        None => break,
      }
    }

    let mut inner = self.0.rc_deref_mut();
    if target > inner.current {
      inner.current = target;
    }
  }

  /// Number of queued tasks that are still live (not cancelled, not run).
  pub fn pending(&self) -> usize {
    self
      .0
      .rc_deref()
      .queue
      .iter()
      .filter(|task| !task.handle.is_closed())
      .count()
  }
}

impl<S: 'static> Scheduler<OnceTask<S>> for ManualScheduler {
  fn schedule(&self, task: OnceTask<S>, delay: Option<Duration>) -> TaskHandle {
    let handle = TaskHandle::new();
    let mut inner = self.0.rc_deref_mut();
    let at = inner.current + delay.unwrap_or_default();
    let seq = inner.next_seq;
    inner.next_seq += 1;
    inner.queue.push(QueuedTask {
      at,
      seq,
      handle: handle.clone(),
      run: Box::new(move || task.call()),
    });
    handle
  }
}
