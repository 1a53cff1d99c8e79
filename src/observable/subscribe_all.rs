use crate::{
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Observer built from three closures, one per event kind.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(self, err: Err) { (self.error)(err); }

  #[inline]
  fn complete(self) { (self.complete)(); }

  #[inline]
  fn is_finished(&self) -> bool { false }
}

pub trait SubscribeAll<Item, Err, N, E, C> {
  type Unsub: Subscription;

  /// Invokes an execution of the observable with handlers for all three
  /// event kinds.
  fn subscribe_all(self, next: N, error: E, complete: C) -> Self::Unsub;
}

impl<S, Item, Err, N, E, C> SubscribeAll<Item, Err, N, E, C> for S
where
  S: Observable<Item, Err, ObserverAll<N, E, C>>,
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  type Unsub = S::Unsub;

  fn subscribe_all(self, next: N, error: E, complete: C) -> Self::Unsub {
    self.actual_subscribe(ObserverAll { next, error, complete })
  }
}
