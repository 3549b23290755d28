//! Shared-ownership wrapper used when one observer is handed to several
//! scheduled tasks.

use std::sync::{Arc, Mutex, MutexGuard};

pub trait RcDeref {
  type Target<'a>
  where
    Self: 'a;
  fn rc_deref(&self) -> Self::Target<'_>;
}

pub trait RcDerefMut {
  type Target<'a>
  where
    Self: 'a;
  fn rc_deref_mut(&self) -> Self::Target<'_>;
}

#[derive(Default)]
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }
}

impl<T> RcDeref for MutArc<T> {
  type Target<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Target<'_> { self.0.lock().unwrap() }
}

impl<T> RcDerefMut for MutArc<T> {
  type Target<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::Target<'_> { self.0.lock().unwrap() }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_state() {
    let a = MutArc::own(0);
    let b = a.clone();
    *a.rc_deref_mut() = 42;
    assert_eq!(*b.rc_deref(), 42);
  }
}
