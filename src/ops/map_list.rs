//! Sugar for observables whose values are lists.

use std::marker::PhantomData;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Extra combinators available when the values are `Vec`s.
pub trait ListObservableExt<T, Err>: ObservableExt<Vec<T>, Err> {
  /// Maps every element inside each emitted `Vec`.
  fn map_list<B, F>(self, f: F) -> MapListOp<Self, F, T>
  where
    F: FnMut(T) -> B,
  {
    MapListOp { source: self, func: f, _p: PhantomData }
  }

  /// Emits the first element of the first non-empty `Vec`, then completes.
  ///
  /// Empty lists are skipped; when the source completes without a non-empty
  /// list, the result completes without a value.
  fn first_in_list(self) -> FirstInListOp<Self> { FirstInListOp { source: self } }
}

impl<T, Err, S> ListObservableExt<T, Err> for S where S: ObservableExt<Vec<T>, Err> {}

pub struct MapListOp<S, F, T> {
  source: S,
  func: F,
  _p: PhantomData<T>,
}

impl<T, B, Err, O, S, F> Observable<Vec<B>, Err, O> for MapListOp<S, F, T>
where
  O: Observer<Vec<B>, Err>,
  S: Observable<Vec<T>, Err, MapListObserver<O, F>>,
  F: FnMut(T) -> B,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(MapListObserver { observer, func: self.func })
  }
}

impl<T, B, Err, S, F> ObservableExt<Vec<B>, Err> for MapListOp<S, F, T>
where
  S: ObservableExt<Vec<T>, Err>,
  F: FnMut(T) -> B,
{
}

pub struct MapListObserver<O, F> {
  observer: O,
  func: F,
}

impl<T, B, Err, O, F> Observer<Vec<T>, Err> for MapListObserver<O, F>
where
  O: Observer<Vec<B>, Err>,
  F: FnMut(T) -> B,
{
  fn next(&mut self, list: Vec<T>) {
    let mapped = list.into_iter().map(&mut self.func).collect();
    self.observer.next(mapped)
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

pub struct FirstInListOp<S> {
  source: S,
}

impl<T, Err, O, S> Observable<T, Err, O> for FirstInListOp<S>
where
  O: Observer<T, Err>,
  S: Observable<Vec<T>, Err, FirstInListObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(FirstInListObserver { observer: Some(observer) })
  }
}

impl<T, Err, S> ObservableExt<T, Err> for FirstInListOp<S> where S: ObservableExt<Vec<T>, Err> {}

pub struct FirstInListObserver<O> {
  observer: Option<O>,
}

impl<T, Err, O> Observer<Vec<T>, Err> for FirstInListObserver<O>
where
  O: Observer<T, Err>,
{
  fn next(&mut self, mut list: Vec<T>) {
    if self.observer.is_none() || list.is_empty() {
      return;
    }
    let mut observer = self.observer.take();
    observer.next(list.swap_remove(0));
    observer.complete();
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
