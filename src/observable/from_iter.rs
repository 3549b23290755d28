//! Synchronous source backed by an iterator.

use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  scheduler::TaskHandle,
};

/// Emits every item of `iter` synchronously on subscription, then completes.
pub fn from_iter<I>(iter: I) -> FromIterObservable<I>
where
  I: IntoIterator,
{
  FromIterObservable { iter }
}

#[derive(Clone)]
pub struct FromIterObservable<I> {
  iter: I,
}

impl<I, O> Observable<I::Item, Infallible, O> for FromIterObservable<I>
where
  I: IntoIterator,
  O: Observer<I::Item, Infallible>,
{
  type Unsub = TaskHandle;

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    let handle = TaskHandle::default();
    for value in self.iter {
      if observer.is_finished() {
        break;
      }
      observer.next(value);
    }
    observer.complete();
    handle.mark_finished();
    handle
  }
}

impl<I> ObservableExt<I::Item, Infallible> for FromIterObservable<I> where I: IntoIterator {}
