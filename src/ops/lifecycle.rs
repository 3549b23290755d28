//! Lifecycle hooks: react to completion and error events without consuming
//! them.

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Runs a callback when the stream completes, then forwards the completion.
pub struct OnCompleteOp<S, F> {
  source: S,
  callback: F,
}

impl<S, F> OnCompleteOp<S, F> {
  pub(crate) fn new(source: S, callback: F) -> Self { OnCompleteOp { source, callback } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for OnCompleteOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, OnCompleteObserver<O, F>>,
  F: FnOnce(),
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(OnCompleteObserver { observer, callback: self.callback })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for OnCompleteOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnOnce(),
{
}

pub struct OnCompleteObserver<O, F> {
  observer: O,
  callback: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for OnCompleteObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnOnce(),
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) {
    (self.callback)();
    self.observer.complete()
  }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

/// Runs a callback when the stream errors, then forwards the error.
pub struct OnErrorOp<S, F> {
  source: S,
  callback: F,
}

impl<S, F> OnErrorOp<S, F> {
  pub(crate) fn new(source: S, callback: F) -> Self { OnErrorOp { source, callback } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for OnErrorOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, OnErrorObserver<O, F>>,
  F: FnOnce(&Err),
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(OnErrorObserver { observer, callback: self.callback })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for OnErrorOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnOnce(&Err),
{
}

pub struct OnErrorObserver<O, F> {
  observer: O,
  callback: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for OnErrorObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnOnce(&Err),
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(self, err: Err) {
    (self.callback)(&err);
    self.observer.error(err)
  }

  fn complete(self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[cfg(test)]
mod tests {
  use crate::{
    observable::{Observable, ObservableExt},
    observer::Observer,
    prelude::*,
  };

  #[test]
  fn on_complete_fires_before_downstream() {
    let mut order = Vec::new();
    from_iter(0..1)
      .on_complete(|| order.push("hook"))
      .auto_subscribe(AutoObserver::new());
    assert_eq!(order, vec!["hook"]);
  }

  /// Source failing with a fixed error right after one value.
  struct Failing;

  impl<O> Observable<i32, &'static str, O> for Failing
  where
    O: Observer<i32, &'static str>,
  {
    type Unsub = TaskHandle;

    fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
      observer.next(1);
      observer.error("boom");
      TaskHandle::default()
    }
  }

  impl ObservableExt<i32, &'static str> for Failing {}

  #[test]
  fn on_error_sees_the_error() {
    let mut seen = None;
    Failing.on_error(|e: &&'static str| seen = Some(*e)).subscribe(|_| {});
    assert_eq!(seen, Some("boom"));
  }
}
