use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  scheduler::{Duration, Instant},
};

/// Time-gated filter: passes a value only when at least `window` has elapsed
/// since the last passed one.
///
/// With `default_opened` the gate starts open and the first value passes
/// immediately; otherwise the gate opens only after a full quiet `window`
/// from subscription.
pub struct SkipBetweenOp<S> {
  source: S,
  window: Duration,
  default_opened: bool,
}

impl<S> SkipBetweenOp<S> {
  pub(crate) fn new(source: S, window: Duration, default_opened: bool) -> Self {
    SkipBetweenOp { source, window, default_opened }
  }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for SkipBetweenOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, SkipBetweenObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let last = if self.default_opened { None } else { Some(Instant::now()) };
    self.source.actual_subscribe(SkipBetweenObserver {
      observer,
      window: self.window,
      last,
    })
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for SkipBetweenOp<S> where S: ObservableExt<Item, Err>
{}

pub struct SkipBetweenObserver<O> {
  observer: O,
  window: Duration,
  last: Option<Instant>,
}

impl<Item, Err, O> Observer<Item, Err> for SkipBetweenObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let now = Instant::now();
    let opened = self.last.map_or(true, |last| now.duration_since(last) > self.window);
    if opened {
      self.last = Some(now);
      self.observer.next(value)
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
