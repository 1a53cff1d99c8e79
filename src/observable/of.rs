use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Creates an observable producing a single value.
///
/// Completes immediately after emitting the value given. Never emits an
/// error.
///
/// # Examples
///
/// ```
/// use quiesce::prelude::*;
///
/// observable::of(123).subscribe(|v| println!("{v}"));
/// ```
pub fn of<Item>(value: Item) -> OfObservable<Item> { OfObservable(value) }

#[derive(Clone)]
pub struct OfObservable<Item>(pub(crate) Item);

impl<Item, O> Observable<Item, Infallible, O> for OfObservable<Item>
where
  O: Observer<Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    observer.next(self.0);
    observer.complete();
  }
}

impl<Item> ObservableExt<Item, Infallible> for OfObservable<Item> {}
