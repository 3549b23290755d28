//! Tag-based event logging for observable chains.
//!
//! `debug("tag")` reports `on_subscribe`, `on_next`, `on_error`,
//! `on_complete` and explicit unsubscription through the [`log`] facade;
//! `debug_with_thread("tag")` adds the current thread name to every line.

use log::{error, trace, warn};

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscription::Subscription,
};

pub struct DebugOp<S> {
  source: S,
  ctx: DebugCtx,
}

impl<S> DebugOp<S> {
  pub(crate) fn new(source: S, tag: &str, with_thread: bool) -> Self {
    DebugOp { source, ctx: DebugCtx { tag: tag.to_owned(), with_thread } }
  }
}

#[derive(Clone)]
struct DebugCtx {
  tag: String,
  with_thread: bool,
}

impl DebugCtx {
  fn prefix(&self) -> String {
    if self.with_thread {
      let thread = std::thread::current();
      format!("[{}] [{}]", self.tag, thread.name().unwrap_or("unnamed"))
    } else {
      format!("[{}]", self.tag)
    }
  }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for DebugOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, DebugObserver<O>>,
  Item: std::fmt::Debug,
  Err: std::fmt::Debug,
{
  type Unsub = DebugSubscription<S::Unsub>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let DebugOp { source, ctx } = self;
    trace!("{} on_subscribe()", ctx.prefix());
    let inner = source.actual_subscribe(DebugObserver { observer, ctx: ctx.clone() });
    DebugSubscription { inner, ctx }
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for DebugOp<S> where S: ObservableExt<Item, Err> {}

pub struct DebugObserver<O> {
  observer: O,
  ctx: DebugCtx,
}

impl<Item, Err, O> Observer<Item, Err> for DebugObserver<O>
where
  O: Observer<Item, Err>,
  Item: std::fmt::Debug,
  Err: std::fmt::Debug,
{
  fn next(&mut self, value: Item) {
    trace!("{} on_next({:?})", self.ctx.prefix(), value);
    self.observer.next(value)
  }

  fn error(self, err: Err) {
    error!("{} on_error({:?})", self.ctx.prefix(), err);
    self.observer.error(err)
  }

  fn complete(self) {
    trace!("{} on_complete()", self.ctx.prefix());
    self.observer.complete()
  }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

/// Wraps the upstream handle so explicit cancellation shows up in the log
/// too.
pub struct DebugSubscription<U> {
  inner: U,
  ctx: DebugCtx,
}

impl<U: Subscription> Subscription for DebugSubscription<U> {
  fn unsubscribe(&mut self) {
    if !self.inner.is_closed() {
      warn!("{} unsubscribe()", self.ctx.prefix());
    }
    self.inner.unsubscribe()
  }

  fn is_closed(&self) -> bool { self.inner.is_closed() }
}
