//! Producer side of the reactive contract, plus the combinator surface.

pub mod from_iter;
pub mod interval;

use crate::{
  observer::{AutoObserver, NextObserver, Observer},
  ops::{
    debug::DebugOp,
    filter::FilterOp,
    lifecycle::{OnCompleteOp, OnErrorOp},
    map::MapOp,
    observe_on::ObserveOnOp,
    skip_between::SkipBetweenOp,
    take::TakeOp,
    tap::TapOp,
  },
  scheduler::Duration,
  subscription::Subscription,
};

/// A push-based stream of `Item` values terminated by completion or an
/// `Err`.
///
/// `O` is the concrete downstream observer type; subscribing hands it to the
/// source and returns a cancellation handle.
pub trait Observable<Item, Err, O>
where
  O: Observer<Item, Err>,
{
  type Unsub: Subscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// The combinator methods, available on every observable in this crate.
///
/// Each operator and source implements this trait with its concrete
/// `Item`/`Err` pair, which is what lets chained calls infer their types.
pub trait ObservableExt<Item, Err>: Sized {
  /// Calls a closure on each value and passes its result downstream.
  fn map<B, F>(self, f: F) -> MapOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    MapOp::new(self, f)
  }

  /// Passes only the values satisfying `predicate`.
  fn filter<F>(self, predicate: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    FilterOp::new(self, predicate)
  }

  /// Passes the first `count` values, then completes and stops the upstream.
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp::new(self, count) }

  /// Re-targets every downstream event onto `scheduler`.
  ///
  /// Events keep their order as long as the target scheduler is serial;
  /// cancelling the returned subscription discards events that were already
  /// scheduled but not yet delivered.
  fn observe_on<SD>(self, scheduler: SD) -> ObserveOnOp<Self, SD> {
    ObserveOnOp::new(self, scheduler)
  }

  /// Peeks at each value without changing the stream.
  fn tap<F>(self, f: F) -> TapOp<Self, F>
  where
    F: FnMut(&Item),
  {
    TapOp::new(self, f)
  }

  /// Runs a callback when the stream completes, before the completion is
  /// forwarded.
  fn on_complete<F>(self, f: F) -> OnCompleteOp<Self, F>
  where
    F: FnOnce(),
  {
    OnCompleteOp::new(self, f)
  }

  /// Runs a callback when the stream errors, before the error is forwarded.
  fn on_error<F>(self, f: F) -> OnErrorOp<Self, F>
  where
    F: FnOnce(&Err),
  {
    OnErrorOp::new(self, f)
  }

  /// Logs every event of this stream under `tag`.
  fn debug(self, tag: &str) -> DebugOp<Self> { DebugOp::new(self, tag, false) }

  /// Like [`ObservableExt::debug`], with the current thread name in every
  /// line.
  fn debug_with_thread(self, tag: &str) -> DebugOp<Self> { DebugOp::new(self, tag, true) }

  /// Drops values arriving less than `window` after the last passed value.
  ///
  /// With `default_opened` the first value passes immediately; otherwise the
  /// gate starts closed and opens only after a full quiet `window`.
  fn skip_between(self, window: Duration, default_opened: bool) -> SkipBetweenOp<Self> {
    SkipBetweenOp::new(self, window, default_opened)
  }

  /// Subscribes with a next-only closure; terminal events are swallowed.
  fn subscribe<N>(self, next: N) -> <Self as Observable<Item, Err, NextObserver<N>>>::Unsub
  where
    N: FnMut(Item),
    Self: Observable<Item, Err, NextObserver<N>>,
  {
    self.actual_subscribe(NextObserver(next))
  }

  /// Fires the observer's `on_start`, then subscribes with the callbacks
  /// collected in it.
  fn auto_subscribe(
    self, mut observer: AutoObserver<Item, Err>,
  ) -> <Self as Observable<Item, Err, AutoObserver<Item, Err>>>::Unsub
  where
    Self: Observable<Item, Err, AutoObserver<Item, Err>>,
  {
    observer.start();
    self.actual_subscribe(observer)
  }
}
