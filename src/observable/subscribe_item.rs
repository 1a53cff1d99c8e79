use crate::{
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Observer wrapping a value closure; terminal events are dropped. Use
/// [`subscribe_all`](super::SubscribeAll::subscribe_all) to observe them.
#[derive(Clone)]
pub struct ObserverItem<N> {
  next: N,
}

impl<Item, Err, N> Observer<Item, Err> for ObserverItem<N>
where
  N: FnMut(Item),
{
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(self, _err: Err) {}

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_finished(&self) -> bool { false }
}

pub trait ObservableItem<Item, Err, N> {
  type Unsub: Subscription;

  /// Invokes an execution of the observable, calling `next` for every value
  /// it emits.
  fn subscribe(self, next: N) -> Self::Unsub;
}

impl<S, Item, Err, N> ObservableItem<Item, Err, N> for S
where
  S: Observable<Item, Err, ObserverItem<N>>,
  N: FnMut(Item),
{
  type Unsub = S::Unsub;

  fn subscribe(self, next: N) -> Self::Unsub { self.actual_subscribe(ObserverItem { next }) }
}
