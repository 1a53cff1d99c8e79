use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Creates an observable that produces the values of an iterator.
///
/// Emits synchronously during subscribe and completes when the iterator is
/// exhausted. Never emits an error.
///
/// # Examples
///
/// ```
/// use quiesce::prelude::*;
///
/// observable::from_iter(0..4).subscribe(|v| println!("{v}"));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> ObservableIter<Iter>
where
  Iter: IntoIterator,
{
  ObservableIter(iter)
}

#[derive(Clone)]
pub struct ObservableIter<Iter>(Iter);

impl<Iter, O> Observable<Iter::Item, Infallible, O> for ObservableIter<Iter>
where
  Iter: IntoIterator,
  O: Observer<Iter::Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for value in self.0 {
      if observer.is_finished() {
        return;
      }
      observer.next(value);
    }
    observer.complete();
  }
}

impl<Iter> ObservableExt<Iter::Item, Infallible> for ObservableIter<Iter> where Iter: IntoIterator {}
