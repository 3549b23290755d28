//! Virtual-time scheduler for deterministic tests of time-based code.
//!
//! Time only advances when a test explicitly asks for it, so interval
//! sources and tickers can be driven without real sleeps:
//!
//! ```rust
//! use rxtick::prelude::*;
//! use std::{cell::RefCell, rc::Rc};
//!
//! TestScheduler::init();
//!
//! let seen = Rc::new(RefCell::new(0));
//! let sink = seen.clone();
//! interval(Duration::from_secs(1), TestScheduler)
//!   .take(3)
//!   .subscribe(move |_| *sink.borrow_mut() += 1);
//!
//! TestScheduler::advance_by(Duration::from_secs(10));
//! assert_eq!(*seen.borrow(), 3);
//! ```
//!
//! The state is thread-local: each test thread has its own clock and queue,
//! which keeps parallel test runs isolated. Call [`TestScheduler::init`] at
//! the start of every test.

use std::{cell::RefCell, cmp::Ordering, collections::BinaryHeap};

use super::{Duration, Scheduler, Task, TaskHandle, TaskState};

struct State {
  virtual_time: Duration,
  queue: BinaryHeap<Scheduled>,
  next_id: usize,
  initialized: bool,
}

impl Default for State {
  fn default() -> Self {
    State {
      virtual_time: Duration::ZERO,
      queue: BinaryHeap::new(),
      next_id: 0,
      initialized: false,
    }
  }
}

struct Scheduled {
  due: Duration,
  id: usize,
  step: Box<dyn FnMut() -> TaskState>,
}

impl PartialEq for Scheduled {
  fn eq(&self, other: &Self) -> bool { self.due == other.due && self.id == other.id }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Scheduled {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier due times first, FIFO by id for equal times
    other.due.cmp(&self.due).then_with(|| other.id.cmp(&self.id))
  }
}

thread_local! {
  static STATE: RefCell<State> = RefCell::new(State::default());
}

/// A virtual-time scheduler.
///
/// Zero-sized; all instances on one thread share the same clock and task
/// queue.
#[derive(Clone, Copy, Default)]
pub struct TestScheduler;

impl TestScheduler {
  /// Resets the clock to zero and clears the queue. Must be called at the
  /// start of each test; the other methods panic otherwise.
  pub fn init() {
    STATE.with(|state| {
      let mut state = state.borrow_mut();
      state.virtual_time = Duration::ZERO;
      state.queue.clear();
      state.next_id = 0;
      state.initialized = true;
    });
  }

  fn ensure_initialized() {
    STATE.with(|state| {
      assert!(
        state.borrow().initialized,
        "TestScheduler::init() must be called before using the scheduler"
      );
    });
  }

  /// The current virtual time.
  pub fn now() -> Duration {
    Self::ensure_initialized();
    STATE.with(|state| state.borrow().virtual_time)
  }

  /// Number of tasks waiting in the queue.
  pub fn pending_count() -> usize {
    Self::ensure_initialized();
    STATE.with(|state| state.borrow().queue.len())
  }

  pub fn is_empty() -> bool {
    Self::ensure_initialized();
    STATE.with(|state| state.borrow().queue.is_empty())
  }

  /// Advances virtual time by `duration`, running every task that falls due,
  /// in due-time order (FIFO for equal times).
  pub fn advance_by(duration: Duration) {
    Self::ensure_initialized();
    let target = STATE.with(|state| state.borrow().virtual_time + duration);

    Self::execute_until(Some(target));

    STATE.with(|state| state.borrow_mut().virtual_time = target);
  }

  /// Runs every pending task until the queue drains.
  ///
  /// A task that keeps rescheduling itself forever (e.g. an un-taken
  /// [`interval`](crate::observable::interval::interval)) never drains; use
  /// [`TestScheduler::advance_by`] for those.
  pub fn flush() {
    Self::ensure_initialized();
    Self::execute_until(None);
  }

  fn execute_until(target: Option<Duration>) {
    loop {
      let next = STATE.with(|state| {
        let mut state = state.borrow_mut();
        let past_target = state
          .queue
          .peek()
          .is_none_or(|peek| target.is_some_and(|limit| peek.due > limit));
        if past_target {
          return None;
        }
        let scheduled = state.queue.pop().unwrap();
        state.virtual_time = scheduled.due;
        Some(scheduled)
      });

      let Some(mut scheduled) = next else {
        break;
      };

      let result = (scheduled.step)();

      if let TaskState::Sleeping(delay) = result {
        STATE.with(|state| {
          let mut state = state.borrow_mut();
          let due = state.virtual_time + delay;
          let id = state.next_id;
          state.next_id += 1;
          state.queue.push(Scheduled { due, id, step: scheduled.step });
        });
      }
    }
  }
}

impl<S: 'static> Scheduler<S> for TestScheduler {
  fn schedule(&self, mut task: Task<S>, delay: Option<Duration>) -> TaskHandle {
    let handle = task.handle();
    STATE.with(|state| {
      let mut state = state.borrow_mut();
      assert!(
        state.initialized,
        "TestScheduler::init() must be called before scheduling"
      );
      let due = state.virtual_time + delay.unwrap_or_default();
      let id = state.next_id;
      state.next_id += 1;
      state.queue.push(Scheduled { due, id, step: Box::new(move || task.step()) });
    });
    handle
  }
}
