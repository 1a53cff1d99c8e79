//! A multicast push source.
//!
//! `Subject` is both an [`Observer`] (callers push values, errors and
//! completion into it) and an [`Observable`] (any number of downstream
//! observers may subscribe). Every subscription is an independent
//! registration; in particular, each one piped through
//! [`buffer_throttle`](crate::observable::ObservableExt::buffer_throttle)
//! gets its own buffer, timer and state machine.
//!
//! A subject that has terminated completes new subscribers immediately.

use smallvec::SmallVec;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::Subscription,
};

/// Type-erased observer callable behind `&mut`, so terminal events can be
/// dispatched to boxed observers whose `Observer` methods consume `self`.
trait Publisher<Item, Err> {
  fn p_next(&mut self, value: Item);
  fn p_error(&mut self, err: Err);
  fn p_complete(&mut self);
  fn p_is_finished(&self) -> bool;
}

impl<Item, Err, O> Publisher<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn p_next(&mut self, value: Item) {
    if let Some(observer) = self {
      observer.next(value);
    }
  }

  fn p_error(&mut self, err: Err) {
    if let Some(observer) = self.take() {
      observer.error(err);
    }
  }

  fn p_complete(&mut self) {
    if let Some(observer) = self.take() {
      observer.complete();
    }
  }

  fn p_is_finished(&self) -> bool { self.as_ref().is_none_or(Observer::is_finished) }
}

struct Registration<Item, Err> {
  id: usize,
  observer: Box<dyn Publisher<Item, Err>>,
}

struct Inner<Item, Err> {
  observers: SmallVec<[Registration<Item, Err>; 1]>,
  next_id: usize,
  closed: bool,
}

pub struct Subject<Item, Err> {
  inner: MutRc<Inner<Item, Err>>,
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self {
    Subject {
      inner: MutRc::own(Inner {
        observers: SmallVec::new(),
        next_id: 0,
        closed: false,
      }),
    }
  }
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Subject { inner: self.inner.clone() } }
}

impl<Item, Err> Subject<Item, Err> {
  pub fn len(&self) -> usize { self.inner.rc_deref().observers.len() }

  pub fn is_empty(&self) -> bool { self.inner.rc_deref().observers.is_empty() }
}

impl<Item, Err> Observer<Item, Err> for Subject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  fn next(&mut self, value: Item) {
    let mut inner = self.inner.rc_deref_mut();
    if inner.closed {
      return;
    }
    inner.observers.retain(|registration| {
      registration.observer.p_next(value.clone());
      !registration.observer.p_is_finished()
    });
  }

  fn error(self, err: Err) {
    let mut observers = {
      let mut inner = self.inner.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.observers)
    };
    for registration in observers.iter_mut() {
      registration.observer.p_error(err.clone());
    }
  }

  fn complete(self) {
    let mut observers = {
      let mut inner = self.inner.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.observers)
    };
    for registration in observers.iter_mut() {
      registration.observer.p_complete();
    }
  }

  fn is_finished(&self) -> bool { self.inner.rc_deref().closed }
}

impl<Item, Err, O> Observable<Item, Err, O> for Subject<Item, Err>
where
  Item: 'static,
  Err: 'static,
  O: Observer<Item, Err> + 'static,
{
  type Unsub = SubjectSubscription<Item, Err>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let mut inner = self.inner.rc_deref_mut();
    if inner.closed {
      drop(inner);
      observer.complete();
      return SubjectSubscription { inner: self.inner, id: usize::MAX };
    }
    let id = inner.next_id;
    inner.next_id += 1;
    inner
      .observers
      .push(Registration { id, observer: Box::new(Some(observer)) });
    drop(inner);
    SubjectSubscription { inner: self.inner, id }
  }
}

impl<Item, Err> ObservableExt<Item, Err> for Subject<Item, Err> {}

pub struct SubjectSubscription<Item, Err> {
  inner: MutRc<Inner<Item, Err>>,
  id: usize,
}

impl<Item, Err> Subscription for SubjectSubscription<Item, Err> {
  fn unsubscribe(self) {
    self
      .inner
      .rc_deref_mut()
      .observers
      .retain(|registration| registration.id != self.id);
  }

  fn is_closed(&self) -> bool {
    !self
      .inner
      .rc_deref()
      .observers
      .iter()
      .any(|registration| registration.id == self.id)
  }
}
