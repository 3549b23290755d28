//! Cancellation handles for running subscriptions.

use smallvec::SmallVec;
use std::{
  fmt::{Debug, Formatter},
  sync::{Arc, Mutex},
};

/// Handle returned from subscribing, used to stop a stream before it has
/// finished delivering all of its events.
pub trait Subscription {
  /// Stops the stream. Idempotent. Events already handed to another
  /// scheduler but not yet delivered are discarded, not delivered.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

impl<T: ?Sized> Subscription for Box<T>
where
  T: Subscription,
{
  #[inline]
  fn unsubscribe(&mut self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// Aggregated teardown of a subscription chain: the upstream handle plus any
/// per-event delivery tasks still in flight.
///
/// Closes either by explicit [`Subscription::unsubscribe`] or naturally, once
/// every registered handle has finished on its own.
#[derive(Clone, Default)]
pub struct MultiSubscription(Arc<Mutex<Inner>>);

struct Inner {
  closed: bool,
  teardown: SmallVec<[Box<dyn Subscription + Send>; 1]>,
}

impl Default for Inner {
  fn default() -> Self { Inner { closed: false, teardown: SmallVec::new() } }
}

impl MultiSubscription {
  pub fn add<S: Subscription + Send + 'static>(&self, subscription: S) {
    self.0.lock().unwrap().add(Box::new(subscription));
  }

  /// True only after an explicit [`Subscription::unsubscribe`], not after
  /// natural completion.
  pub fn is_cancelled(&self) -> bool { self.0.lock().unwrap().closed }
}

impl Inner {
  fn add(&mut self, mut subscription: Box<dyn Subscription + Send>) {
    if self.closed {
      subscription.unsubscribe();
    } else {
      self.teardown.retain(|s| !s.is_closed());
      self.teardown.push(subscription);
    }
  }
}

impl Subscription for MultiSubscription {
  fn unsubscribe(&mut self) {
    let mut inner = self.0.lock().unwrap();
    if !inner.closed {
      inner.closed = true;
      for s in &mut inner.teardown {
        s.unsubscribe();
      }
      inner.teardown.clear();
    }
  }

  fn is_closed(&self) -> bool {
    let inner = self.0.lock().unwrap();
    inner.closed
      || (!inner.teardown.is_empty() && inner.teardown.iter().all(|s| s.is_closed()))
  }
}

impl Debug for MultiSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.lock().unwrap();
    f.debug_struct("MultiSubscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

/// An RAII "scoped subscription": unsubscribes when dropped.
///
/// If you don't assign the guard to a variable it is dropped immediately and
/// the subscription is cancelled on the spot, which is probably not what you
/// want.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(T);

impl<T: Subscription> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

/// Null-safe teardown for optionally held subscriptions.
pub trait SubscriptionExt {
  /// Unsubscribes when a live subscription is present; no-op otherwise.
  fn unsubscribe_safe(&mut self);

  /// True when there is no subscription or it is already closed.
  fn is_none_or_closed(&self) -> bool;
}

impl<S: Subscription> SubscriptionExt for Option<S> {
  fn unsubscribe_safe(&mut self) {
    if let Some(s) = self {
      if !s.is_closed() {
        s.unsubscribe();
      }
    }
  }

  fn is_none_or_closed(&self) -> bool { self.as_ref().map_or(true, |s| s.is_closed()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Flag(Arc<Mutex<bool>>);

  impl Subscription for Flag {
    fn unsubscribe(&mut self) { *self.0.lock().unwrap() = true; }

    fn is_closed(&self) -> bool { *self.0.lock().unwrap() }
  }

  #[test]
  fn unsubscribe_tears_down_every_member() {
    let flags: Vec<_> = (0..3).map(|_| Arc::new(Mutex::new(false))).collect();
    let mut multi = MultiSubscription::default();
    for f in &flags {
      multi.add(Flag(f.clone()));
    }

    multi.unsubscribe();
    assert!(multi.is_closed());
    assert!(flags.iter().all(|f| *f.lock().unwrap()));
  }

  #[test]
  fn add_after_close_unsubscribes_immediately() {
    let mut multi = MultiSubscription::default();
    multi.unsubscribe();

    let flag = Arc::new(Mutex::new(false));
    multi.add(Flag(flag.clone()));
    assert!(*flag.lock().unwrap());
  }

  #[test]
  fn closes_naturally_when_all_members_finish() {
    let flag = Arc::new(Mutex::new(false));
    let multi = MultiSubscription::default();
    multi.add(Flag(flag.clone()));
    assert!(!multi.is_closed());

    *flag.lock().unwrap() = true;
    assert!(multi.is_closed());
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let flag = Arc::new(Mutex::new(false));
    {
      let _guard = SubscriptionGuard::new(Flag(flag.clone()));
    }
    assert!(*flag.lock().unwrap());
  }

  #[test]
  fn option_helpers() {
    let mut none: Option<Flag> = None;
    assert!(none.is_none_or_closed());
    none.unsubscribe_safe();

    let flag = Arc::new(Mutex::new(false));
    let mut some = Some(Flag(flag.clone()));
    assert!(!some.is_none_or_closed());
    some.unsubscribe_safe();
    assert!(*flag.lock().unwrap());
    assert!(some.is_none_or_closed());
  }
}
