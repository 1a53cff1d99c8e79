//! Handles for tearing a subscription down.
//!
//! `unsubscribe` consumes the handle: cancellation is a one-shot, synchronous
//! act that must release upstream registrations and pending timers on every
//! exit path, with no Drop-dependent cleanup in the operator core. The RAII
//! [`SubscriptionGuard`] is opt-in sugar on top of that.

use crate::rc::{MutArc, MutRc, RcDeref, RcDerefMut};

pub trait Subscription {
  /// Cancel the subscription, releasing everything it retains. No events are
  /// delivered afterwards.
  fn unsubscribe(self);

  fn is_closed(&self) -> bool;

  /// Wrap this subscription so `unsubscribe` runs when the guard drops.
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard(Some(self))
  }
}

/// Synchronous sources finish delivering before `actual_subscribe` returns,
/// so there is nothing left to cancel.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

/// Combines an upstream subscription with a second teardown (typically the
/// slot holding an operator's pending task handle); unsubscribing tears both
/// down at once.
pub struct ZipSubscription<A, B> {
  a: A,
  b: B,
}

impl<A, B> ZipSubscription<A, B> {
  #[inline]
  pub fn new(a: A, b: B) -> Self { ZipSubscription { a, b } }
}

impl<A, B> Subscription for ZipSubscription<A, B>
where
  A: Subscription,
  B: Subscription,
{
  fn unsubscribe(self) {
    self.a.unsubscribe();
    self.b.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.a.is_closed() && self.b.is_closed() }
}

/// A shared slot that may hold a subscription; unsubscribing takes whatever
/// is currently in the slot. Operators keep their rearmed timer handle in one
/// of these.
macro_rules! rc_slot_subscription_impl {
  ($rc: ident) => {
    impl<S> Subscription for $rc<Option<S>>
    where
      S: Subscription,
    {
      fn unsubscribe(self) {
        if let Some(inner) = self.rc_deref_mut().take() {
          inner.unsubscribe();
        }
      }

      fn is_closed(&self) -> bool {
        self.rc_deref().as_ref().is_none_or(Subscription::is_closed)
      }
    }
  };
}

rc_slot_subscription_impl!(MutRc);
rc_slot_subscription_impl!(MutArc);

/// RAII wrapper: unsubscribes when dropped.
///
/// If the return value is not bound to a variable the guard drops, and the
/// subscription ends, immediately.
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(Option<T>);

impl<T: Subscription> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> Self { SubscriptionGuard(Some(subscription)) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  fn drop(&mut self) {
    if let Some(subscription) = self.0.take() {
      subscription.unsubscribe();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Clone, Default)]
  struct Probe(MutRc<usize>);

  impl Subscription for Probe {
    fn unsubscribe(self) { *self.0.rc_deref_mut() += 1 }

    fn is_closed(&self) -> bool { *self.0.rc_deref() > 0 }
  }

  #[test]
  fn zip_unsubscribes_both_sides() {
    let a = Probe::default();
    let b = Probe::default();
    let zip = ZipSubscription::new(a.clone(), b.clone());
    assert!(!zip.is_closed());
    zip.unsubscribe();
    assert_eq!(*a.0.rc_deref(), 1);
    assert_eq!(*b.0.rc_deref(), 1);
  }

  #[test]
  fn slot_takes_inner_once() {
    let probe = Probe::default();
    let slot = MutRc::own(Some(probe.clone()));
    slot.clone().unsubscribe();
    slot.unsubscribe();
    assert_eq!(*probe.0.rc_deref(), 1);
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let probe = Probe::default();
    {
      let _guard = probe.clone().unsubscribe_when_dropped();
    }
    assert_eq!(*probe.0.rc_deref(), 1);
  }
}
