use std::marker::PhantomData;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Applies a closure to every value.
///
/// The third parameter pins the upstream item type, which is otherwise not
/// recoverable from `S` and `F` alone.
pub struct MapOp<S, F, Item> {
  source: S,
  func: F,
  _p: PhantomData<Item>,
}

impl<S, F, Item> MapOp<S, F, Item> {
  pub(crate) fn new(source: S, func: F) -> Self { MapOp { source, func, _p: PhantomData } }
}

impl<Item, B, Err, O, S, F> Observable<B, Err, O> for MapOp<S, F, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, MapObserver<O, F>>,
  F: FnMut(Item) -> B,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(MapObserver { observer, func: self.func })
  }
}

impl<Item, B, Err, S, F> ObservableExt<B, Err> for MapOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Item) -> B,
{
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, B, Err, O, F> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)) }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
