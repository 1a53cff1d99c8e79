//! End-to-end behavior of `buffer_throttle` on the virtual clock.

use std::convert::Infallible;

use quiesce::{
  prelude::*,
  rc::{MutRc, RcDeref, RcDerefMut},
};

#[derive(Debug, PartialEq)]
enum Event {
  Batch(Vec<i32>),
  Error(&'static str),
  Completed,
}

/// Subject piped through `buffer_throttle`, with every downstream event
/// recorded in order.
fn record(
  interval: Duration,
  scheduler: &ManualScheduler,
) -> (Subject<i32, &'static str>, MutRc<Vec<Event>>) {
  let subject = Subject::default();
  let log = MutRc::own(vec![]);

  let c_log = log.clone();
  let e_log = log.clone();
  let f_log = log.clone();
  subject
    .clone()
    .buffer_throttle(interval, scheduler.clone())
    .subscribe_all(
      move |batch| c_log.rc_deref_mut().push(Event::Batch(batch)),
      move |err| e_log.rc_deref_mut().push(Event::Error(err)),
      move || f_log.rc_deref_mut().push(Event::Completed),
    );

  (subject, log)
}

#[test]
fn nothing_is_emitted_before_the_quiet_interval_elapses() {
  let scheduler = ManualScheduler::new();
  let (mut subject, log) = record(Duration::from_secs(1), &scheduler);

  subject.next(1);
  subject.next(2);
  scheduler.advance(Duration::from_millis(999));
  assert!(log.rc_deref().is_empty());

  scheduler.advance(Duration::from_millis(1));
  assert_eq!(*log.rc_deref(), vec![Event::Batch(vec![1, 2])]);
}

#[test]
fn every_value_arrives_once_in_arrival_order() {
  let scheduler = ManualScheduler::new();
  let (mut subject, log) = record(Duration::from_millis(100), &scheduler);

  for v in 1..=5 {
    subject.next(v);
    scheduler.advance(Duration::from_millis(10));
  }
  scheduler.advance(Duration::from_millis(100));

  assert_eq!(*log.rc_deref(), vec![Event::Batch(vec![1, 2, 3, 4, 5])]);
}

#[test]
fn each_arrival_restarts_the_quiet_interval() {
  let scheduler = ManualScheduler::new();
  let (mut subject, log) = record(Duration::from_secs(1), &scheduler);

  subject.next(1);
  scheduler.advance(Duration::from_millis(900));
  subject.next(2);
  // one full interval after the first value, but not after the second
  scheduler.advance(Duration::from_millis(100));
  assert!(log.rc_deref().is_empty());

  scheduler.advance(Duration::from_millis(900));
  assert_eq!(*log.rc_deref(), vec![Event::Batch(vec![1, 2])]);
}

#[test]
fn bursts_separated_by_quiet_become_separate_batches() {
  let scheduler = ManualScheduler::new();
  let start = scheduler.now();
  let (mut subject, log) = record(Duration::from_secs(1), &scheduler);

  subject.next(1);
  scheduler.advance_to(start + Duration::from_millis(500));
  subject.next(2);

  scheduler.advance_to(start + Duration::from_millis(1500));
  assert_eq!(*log.rc_deref(), vec![Event::Batch(vec![1, 2])]);

  scheduler.advance_to(start + Duration::from_millis(2000));
  subject.next(3);
  scheduler.advance_to(start + Duration::from_millis(2999));
  assert_eq!(log.rc_deref().len(), 1);

  scheduler.advance_to(start + Duration::from_millis(3000));
  assert_eq!(
    *log.rc_deref(),
    vec![Event::Batch(vec![1, 2]), Event::Batch(vec![3])]
  );
}

#[test]
fn completion_flushes_the_pending_batch_first() {
  let scheduler = ManualScheduler::new();
  let (mut subject, log) = record(Duration::from_secs(1), &scheduler);

  subject.next(1);
  subject.next(2);
  subject.clone().complete();

  assert_eq!(
    *log.rc_deref(),
    vec![Event::Batch(vec![1, 2]), Event::Completed]
  );
  // the armed flush timer was released, not left to fire on a gone stream
  assert_eq!(scheduler.pending(), 0);
  scheduler.advance(Duration::from_secs(2));
  assert_eq!(log.rc_deref().len(), 2);
}

#[test]
fn completion_with_empty_buffer_emits_no_batch() {
  let scheduler = ManualScheduler::new();
  let (subject, log) = record(Duration::from_secs(1), &scheduler);

  subject.clone().complete();
  assert_eq!(*log.rc_deref(), vec![Event::Completed]);
}

#[test]
fn error_discards_the_pending_batch() {
  let scheduler = ManualScheduler::new();
  let (mut subject, log) = record(Duration::from_secs(1), &scheduler);

  subject.next(1);
  subject.next(2);
  subject.clone().error("source failed");

  assert_eq!(*log.rc_deref(), vec![Event::Error("source failed")]);
  assert_eq!(scheduler.pending(), 0);
  scheduler.advance(Duration::from_secs(2));
  assert_eq!(log.rc_deref().len(), 1);
}

#[test]
fn zero_interval_yields_singleton_batches_asynchronously() {
  let scheduler = ManualScheduler::new();
  let (mut subject, log) = record(Duration::ZERO, &scheduler);

  subject.next(1);
  // still asynchronous: delivery waits for the scheduler, even at zero delay
  assert!(log.rc_deref().is_empty());
  scheduler.advance(Duration::ZERO);
  assert_eq!(*log.rc_deref(), vec![Event::Batch(vec![1])]);

  subject.next(2);
  subject.next(3);
  scheduler.advance(Duration::ZERO);
  assert_eq!(
    *log.rc_deref(),
    vec![Event::Batch(vec![1]), Event::Batch(vec![2, 3])]
  );
}

#[test]
fn quiet_after_a_flush_leaves_the_stream_silent() {
  let scheduler = ManualScheduler::new();
  let (mut subject, log) = record(Duration::from_secs(1), &scheduler);

  subject.next(1);
  scheduler.advance(Duration::from_secs(1));
  assert_eq!(log.rc_deref().len(), 1);

  // a long quiet stretch after a flush produces nothing new
  scheduler.advance(Duration::from_secs(10));
  assert_eq!(log.rc_deref().len(), 1);

  subject.next(2);
  scheduler.advance(Duration::from_secs(1));
  assert_eq!(
    *log.rc_deref(),
    vec![Event::Batch(vec![1]), Event::Batch(vec![2])]
  );
}

#[test]
fn unsubscribe_releases_source_and_timer() {
  let scheduler = ManualScheduler::new();
  let values = MutRc::own(vec![]);
  let mut subject = Subject::<i32, Infallible>::default();

  let c_values = values.clone();
  let subscription = subject
    .clone()
    .buffer_throttle(Duration::from_secs(1), scheduler.clone())
    .subscribe(move |batch: Vec<i32>| c_values.rc_deref_mut().push(batch));

  subject.next(1);
  assert_eq!(subject.len(), 1);
  assert_eq!(scheduler.pending(), 1);

  subscription.unsubscribe();
  assert!(subject.is_empty());
  assert_eq!(scheduler.pending(), 0);

  subject.next(2);
  scheduler.advance(Duration::from_secs(5));
  assert!(values.rc_deref().is_empty());
}

/// Source that records how often its subscription is torn down.
struct CountingSource {
  cancels: MutRc<usize>,
}

struct CancelProbe {
  cancels: MutRc<usize>,
}

impl Subscription for CancelProbe {
  fn unsubscribe(self) { *self.cancels.rc_deref_mut() += 1; }

  fn is_closed(&self) -> bool { *self.cancels.rc_deref() > 0 }
}

impl<O> Observable<i32, Infallible, O> for CountingSource
where
  O: Observer<i32, Infallible>,
{
  type Unsub = CancelProbe;

  fn actual_subscribe(self, _observer: O) -> Self::Unsub {
    CancelProbe { cancels: self.cancels }
  }
}

impl ObservableExt<i32, Infallible> for CountingSource {}

#[test]
fn unsubscribe_cancels_upstream_exactly_once() {
  let scheduler = ManualScheduler::new();
  let cancels = MutRc::own(0);

  let subscription = CountingSource { cancels: cancels.clone() }
    .buffer_throttle(Duration::from_secs(1), scheduler.clone())
    .subscribe(|_: Vec<i32>| {});

  assert_eq!(*cancels.rc_deref(), 0);
  subscription.unsubscribe();
  assert_eq!(*cancels.rc_deref(), 1);
}

#[test]
fn subscriptions_do_not_share_state() {
  let scheduler = ManualScheduler::new();
  let first = MutRc::own(vec![]);
  let second = MutRc::own(vec![]);
  let mut subject = Subject::<i32, Infallible>::default();

  let c_first = first.clone();
  subject
    .clone()
    .buffer_throttle(Duration::from_secs(1), scheduler.clone())
    .subscribe(move |batch: Vec<i32>| c_first.rc_deref_mut().push(batch));
  let c_second = second.clone();
  subject
    .clone()
    .buffer_throttle(Duration::from_secs(3), scheduler.clone())
    .subscribe(move |batch: Vec<i32>| c_second.rc_deref_mut().push(batch));

  subject.next(1);
  scheduler.advance(Duration::from_secs(1));
  subject.next(2);
  scheduler.advance(Duration::from_secs(1));

  // the short window flushed twice, the long one is still accumulating
  assert_eq!(*first.rc_deref(), vec![vec![1], vec![2]]);
  assert!(second.rc_deref().is_empty());

  scheduler.advance(Duration::from_secs(2));
  assert_eq!(*second.rc_deref(), vec![vec![1, 2]]);
}

#[test]
fn interval_in_seconds_goes_through_validation() {
  let scheduler = ManualScheduler::new();
  let values = MutRc::own(vec![]);
  let mut subject = Subject::<i32, Infallible>::default();

  let c_values = values.clone();
  subject
    .clone()
    .buffer_throttle_secs(0.5, scheduler.clone())
    .unwrap()
    .subscribe(move |batch: Vec<i32>| c_values.rc_deref_mut().push(batch));

  subject.next(1);
  scheduler.advance(Duration::from_millis(500));
  assert_eq!(*values.rc_deref(), vec![vec![1]]);

  let rejected = subject
    .clone()
    .buffer_throttle_secs(-1.0, scheduler.clone());
  match rejected {
    Err(err) => assert_eq!(err, IntervalError::Negative(-1.0)),
    Ok(_) => panic!("negative interval accepted"),
  }
}
