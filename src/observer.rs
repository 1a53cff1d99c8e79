//! The consumer side of a stream.
//!
//! An [`Observer`] receives values, at most one terminal event (error or
//! completion), and nothing after that. `error` and `complete` consume the
//! observer so the type system rules out post-terminal emissions.

use crate::rc::{MutArc, MutRc, RcDeref, RcDerefMut};

pub trait Observer<Item, Err> {
  /// Receive the next value from the stream.
  fn next(&mut self, value: Item);

  /// Receive the terminal error. Consumes the observer.
  fn error(self, err: Err);

  /// Receive the completion signal. Consumes the observer.
  fn complete(self);

  /// `true` once the observer can no longer accept values; sources use this
  /// to stop emitting early.
  fn is_finished(&self) -> bool;
}

/// `None` swallows everything; `Some` delegates to the inner observer.
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_finished(&self) -> bool { self.as_ref().is_none_or(Observer::is_finished) }
}

/// Shared-ownership observers: operators clone one of these into both their
/// value path and their scheduled task, and whichever side reaches a terminal
/// event first takes the inner observer out of the slot.
macro_rules! rc_observer_impl {
  ($rc: ident) => {
    impl<O, Item, Err> Observer<Item, Err> for $rc<Option<O>>
    where
      O: Observer<Item, Err>,
    {
      fn next(&mut self, value: Item) { self.rc_deref_mut().next(value); }

      fn error(self, err: Err) {
        if let Some(inner) = self.rc_deref_mut().take() {
          inner.error(err);
        }
      }

      fn complete(self) {
        if let Some(inner) = self.rc_deref_mut().take() {
          inner.complete();
        }
      }

      fn is_finished(&self) -> bool { self.rc_deref().is_none() }
    }
  };
}

rc_observer_impl!(MutRc);
rc_observer_impl!(MutArc);
