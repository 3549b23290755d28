use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Emits only the first `count` values emitted by the source, then
/// completes, whether or not the source does.
///
/// Timed sources observe the downstream finishing and release their
/// scheduled task.
pub struct TakeOp<S> {
  source: S,
  count: usize,
}

impl<S> TakeOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { TakeOp { source, count } }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for TakeOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TakeObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(TakeObserver {
      observer: Some(observer),
      count: self.count,
      hit: 0,
    })
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for TakeOp<S> where S: ObservableExt<Item, Err> {}

pub struct TakeObserver<O> {
  observer: Option<O>,
  count: usize,
  hit: usize,
}

impl<Item, Err, O> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.hit < self.count {
      self.hit += 1;
      self.observer.next(value);
      if self.hit == self.count {
        self.observer.take().complete();
      }
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.hit >= self.count || self.observer.is_finished() }
}
