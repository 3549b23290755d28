//! Consumer side of the reactive contract.

use crate::rc::{MutArc, RcDeref, RcDerefMut};

/// Receives values and terminal events from an observable.
///
/// Terminal events consume the observer; nothing can be delivered after
/// `error` or `complete`. Sources poll [`Observer::is_finished`] between
/// emissions and stop early once the downstream is done with the stream.
pub trait Observer<Item, Err> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// The stream failed; no more values follow.
  fn error(self, err: Err);

  /// The stream completed; no more values follow.
  fn complete(self);

  /// True once this observer will not accept any more values.
  fn is_finished(&self) -> bool;
}

/// `None` swallows every event; `Some` delegates to the inner observer,
/// which is consumed by terminal events as usual.
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_finished(&self) -> bool { self.as_ref().map_or(true, Observer::is_finished) }
}

/// Shared-ownership observer used when events are marshalled between
/// schedulers. Terminal events take the inner observer out, so every other
/// holder of the same `MutArc` observes a finished downstream.
impl<O, Item, Err> Observer<Item, Err> for MutArc<Option<O>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.rc_deref_mut().next(value); }

  fn error(self, err: Err) {
    if let Some(inner) = self.rc_deref_mut().take() {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self.rc_deref_mut().take() {
      inner.complete();
    }
  }

  fn is_finished(&self) -> bool { self.rc_deref().as_ref().map_or(true, Observer::is_finished) }
}

/// Closure adapter behind [`ObservableExt::subscribe`]: the closure handles
/// `next`, terminal events are dropped. Swallowing the error channel at the
/// subscription boundary is deliberate.
///
/// [`ObservableExt::subscribe`]: crate::observable::ObservableExt::subscribe
pub struct NextObserver<N>(pub(crate) N);

impl<N, Item, Err> Observer<Item, Err> for NextObserver<N>
where
  N: FnMut(Item),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.0)(value) }

  fn error(self, _err: Err) {}

  fn complete(self) {}

  fn is_finished(&self) -> bool { false }
}

type StartFn = Box<dyn FnOnce() + Send>;
type NextFn<Item> = Box<dyn FnMut(Item) + Send>;
type ErrorFn<Err> = Box<dyn FnOnce(Err) + Send>;
type CompleteFn = Box<dyn FnOnce() + Send>;

/// Observer assembled from optional callbacks, for
/// [`ObservableExt::auto_subscribe`].
///
/// Every callback may be omitted. A terminal event consumes the observer, so
/// the upstream sees a finished downstream and releases its resources: the
/// "subscribe and let it clean up after itself" path.
///
/// ```rust
/// use rxtick::prelude::*;
///
/// from_iter(0..3).auto_subscribe(
///   AutoObserver::new()
///     .on_next(|v: i32| println!("got {v}"))
///     .on_complete(|| println!("done")),
/// );
/// ```
///
/// [`ObservableExt::auto_subscribe`]: crate::observable::ObservableExt::auto_subscribe
pub struct AutoObserver<Item, Err> {
  on_start: Option<StartFn>,
  on_next: Option<NextFn<Item>>,
  on_error: Option<ErrorFn<Err>>,
  on_complete: Option<CompleteFn>,
}

impl<Item, Err> Default for AutoObserver<Item, Err> {
  fn default() -> Self {
    AutoObserver { on_start: None, on_next: None, on_error: None, on_complete: None }
  }
}

impl<Item, Err> AutoObserver<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// Runs once, right before the subscription is set up.
  pub fn on_start(mut self, f: impl FnOnce() + Send + 'static) -> Self {
    self.on_start = Some(Box::new(f));
    self
  }

  pub fn on_next(mut self, f: impl FnMut(Item) + Send + 'static) -> Self {
    self.on_next = Some(Box::new(f));
    self
  }

  pub fn on_error(mut self, f: impl FnOnce(Err) + Send + 'static) -> Self {
    self.on_error = Some(Box::new(f));
    self
  }

  pub fn on_complete(mut self, f: impl FnOnce() + Send + 'static) -> Self {
    self.on_complete = Some(Box::new(f));
    self
  }

  pub(crate) fn start(&mut self) {
    if let Some(f) = self.on_start.take() {
      f();
    }
  }
}

impl<Item, Err> Observer<Item, Err> for AutoObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if let Some(f) = self.on_next.as_mut() {
      f(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(f) = self.on_error {
      f(err);
    }
  }

  fn complete(self) {
    if let Some(f) = self.on_complete {
      f();
    }
  }

  fn is_finished(&self) -> bool { false }
}
