//! # rxtick: ranged tickers for reactive streams
//!
//! Step timers and countdown tickers built as thin compositions over a small
//! Reactive Extensions core, together with the convenience pieces that
//! usually accompany them: auto-disposing subscription helpers, tag-based
//! debug logging operators, and list mapping sugar.
//!
//! ## Quick Start
//!
//! ```rust
//! use futures::executor::LocalPool;
//! use rxtick::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let mut pool = LocalPool::new();
//! let ticks = Arc::new(Mutex::new(Vec::new()));
//! let sink = ticks.clone();
//!
//! let spec = CountdownSpec::new(0, 3, 1, Duration::from_millis(1)).unwrap();
//! count_down(
//!   spec,
//!   pool.spawner(),
//!   pool.spawner(),
//!   CountdownEvents::new().on_tick(move |v| sink.lock().unwrap().push(v)),
//! );
//! pool.run();
//!
//! assert_eq!(*ticks.lock().unwrap(), vec![0, 1, 2, 3]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`timer`] / [`count_down`] | The ranged tickers: step timer and countdown |
//! | [`Observable`] | The core trait defining stream subscription |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel a running ticker or stream |
//! | [`Scheduler`] | Drives timed tasks; executors and a virtual-time [`TestScheduler`] |
//!
//! Tick and completion callbacks are always marshalled onto an explicit
//! delivery scheduler, so a serial delivery executor gives in-order,
//! non-overlapping callbacks.
//!
//! [`timer`]: ticker::timer
//! [`count_down`]: ticker::count_down
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Scheduler`]: scheduler::Scheduler
//! [`TestScheduler`]: scheduler::TestScheduler

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subscription;
pub mod ticker;

// Re-export the prelude module
pub use prelude::*;

pub use crate::scheduler::{Duration, Instant};
