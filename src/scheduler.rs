//! Task scheduling on top of futures executors.
//!
//! A [`Task`] is a stepwise unit of timed work: every call to [`Task::step`]
//! performs one slice and reports when the scheduler should run the next one.
//! The executor impls drive tasks with fixed-rate sleeps: each deadline is
//! derived from the previous *nominal* deadline, so a slow step does not
//! shift the ones after it. The virtual-time [`TestScheduler`] drives the
//! same tasks deterministically.

pub mod test_scheduler;

use crate::subscription::Subscription;
use futures::{
  executor::{LocalSpawner, ThreadPool},
  task::LocalSpawnExt,
};
use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

pub use std::time::{Duration, Instant};
pub use test_scheduler::TestScheduler;

/// Tells the scheduler what to do with a task after a step.
pub enum TaskState {
  /// Run the next step one `Duration` after the nominal time of this one.
  Sleeping(Duration),
  /// The task is done and its scheduled slot is released.
  Finished,
}

type StepFn<S> = fn(&mut S, usize) -> TaskState;

/// A stepwise scheduled unit of work over a state `S`.
///
/// The step function receives the state and the zero-based step sequence
/// number. Steps of one task never run concurrently.
pub struct Task<S> {
  state: S,
  step_fn: StepFn<S>,
  seq: usize,
  handle: TaskHandle,
}

impl<S> Task<S> {
  pub fn new(state: S, step_fn: StepFn<S>) -> Self {
    Task { state, step_fn, seq: 0, handle: TaskHandle::default() }
  }

  /// The cancellation handle shared with whoever owns the subscription.
  pub fn handle(&self) -> TaskHandle { self.handle.clone() }

  /// Runs one step, unless the handle was cancelled in the meantime.
  pub fn step(&mut self) -> TaskState {
    if self.handle.is_closed() {
      return TaskState::Finished;
    }
    let state = (self.step_fn)(&mut self.state, self.seq);
    self.seq += 1;
    if let TaskState::Finished = state {
      self.handle.mark_finished();
    }
    state
  }
}

/// Cancellable handle to a scheduled [`Task`].
///
/// Clones share the same flags; cancelling any clone stops the task before
/// its next step.
#[derive(Clone, Default)]
pub struct TaskHandle {
  flags: Arc<Flags>,
}

#[derive(Default)]
struct Flags {
  cancelled: AtomicBool,
  finished: AtomicBool,
}

impl TaskHandle {
  pub(crate) fn mark_finished(&self) { self.flags.finished.store(true, Ordering::Relaxed); }

  pub fn is_cancelled(&self) -> bool { self.flags.cancelled.load(Ordering::Relaxed) }

  pub fn is_finished(&self) -> bool { self.flags.finished.load(Ordering::Relaxed) }
}

impl Subscription for TaskHandle {
  fn unsubscribe(&mut self) { self.flags.cancelled.store(true, Ordering::Relaxed); }

  fn is_closed(&self) -> bool { self.is_cancelled() || self.is_finished() }
}

/// Schedules tasks whose state is `S`.
pub trait Scheduler<S> {
  /// Schedules `task`; its first step runs after `delay`, or on the next
  /// scheduler turn when `delay` is `None`.
  fn schedule(&self, task: Task<S>, delay: Option<Duration>) -> TaskHandle;
}

async fn drive<S>(mut task: Task<S>, delay: Option<Duration>) {
  let mut deadline = Instant::now() + delay.unwrap_or_default();
  loop {
    let wait = deadline.saturating_duration_since(Instant::now());
    futures_time::task::sleep(wait.into()).await;
    match task.step() {
      TaskState::Finished => break,
      TaskState::Sleeping(dur) => deadline += dur,
    }
  }
}

impl<S: 'static> Scheduler<S> for LocalSpawner {
  fn schedule(&self, task: Task<S>, delay: Option<Duration>) -> TaskHandle {
    let handle = task.handle();
    self
      .spawn_local(drive(task, delay))
      .expect("spawn task on local pool failed");
    handle
  }
}

impl<S: Send + 'static> Scheduler<S> for ThreadPool {
  fn schedule(&self, task: Task<S>, delay: Option<Duration>) -> TaskHandle {
    let handle = task.handle();
    self.spawn_ok(drive(task, delay));
    handle
  }
}
