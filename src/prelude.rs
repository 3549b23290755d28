//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Core traits
pub use crate::observable::{Observable, ObservableExt};
pub use crate::observer::{AutoObserver, Observer};
// Sources
pub use crate::observable::from_iter::from_iter;
pub use crate::observable::interval::{interval, interval_range};
// List sugar
pub use crate::ops::map_list::ListObservableExt;
// Scheduling
pub use crate::scheduler::{Duration, Instant, Scheduler, Task, TaskHandle, TaskState};
pub use crate::scheduler::TestScheduler;
// Subscription
pub use crate::subscription::{
  MultiSubscription, Subscription, SubscriptionExt, SubscriptionGuard,
};
// Tickers
pub use crate::error::TickerError;
pub use crate::ticker::{
  count_down, run_after, timer, CountdownEvents, CountdownSpec, TickHandle, TimerEvents,
  TimerSpec,
};
