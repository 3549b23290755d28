//! Periodic, time-driven sources.

use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  scheduler::{Duration, Scheduler, Task, TaskHandle, TaskState},
};

/// Infinite fixed-rate source: fires `dur` after subscription and every
/// `dur` after that, emitting the tick sequence number.
pub fn interval<SD>(dur: Duration, scheduler: SD) -> IntervalObservable<SD> {
  IntervalObservable { dur, scheduler }
}

/// Bounded fixed-rate source: emits exactly `count` sequential values
/// starting at `start`, the first one `initial_delay` after subscription and
/// the rest every `dur`, then completes.
pub fn interval_range<SD>(
  start: i64, count: i64, initial_delay: Duration, dur: Duration, scheduler: SD,
) -> IntervalRangeObservable<SD> {
  IntervalRangeObservable { start, count, initial_delay, dur, scheduler }
}

#[derive(Clone)]
pub struct IntervalObservable<SD> {
  dur: Duration,
  scheduler: SD,
}

pub struct IntervalState<O> {
  dur: Duration,
  observer: O,
}

impl<SD, O> Observable<usize, Infallible, O> for IntervalObservable<SD>
where
  O: Observer<usize, Infallible>,
  SD: Scheduler<IntervalState<O>>,
{
  type Unsub = TaskHandle;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Self { dur, scheduler } = self;
    scheduler.schedule(Task::new(IntervalState { dur, observer }, interval_step), Some(dur))
  }
}

impl<SD> ObservableExt<usize, Infallible> for IntervalObservable<SD> {}

fn interval_step<O>(state: &mut IntervalState<O>, seq: usize) -> TaskState
where
  O: Observer<usize, Infallible>,
{
  if state.observer.is_finished() {
    return TaskState::Finished;
  }
  state.observer.next(seq);
  TaskState::Sleeping(state.dur)
}

#[derive(Clone)]
pub struct IntervalRangeObservable<SD> {
  start: i64,
  count: i64,
  initial_delay: Duration,
  dur: Duration,
  scheduler: SD,
}

pub struct IntervalRangeState<O> {
  start: i64,
  count: i64,
  dur: Duration,
  observer: Option<O>,
}

impl<SD, O> Observable<i64, Infallible, O> for IntervalRangeObservable<SD>
where
  O: Observer<i64, Infallible>,
  SD: Scheduler<IntervalRangeState<O>>,
{
  type Unsub = TaskHandle;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Self { start, count, initial_delay, dur, scheduler } = self;
    let state = IntervalRangeState { start, count, dur, observer: Some(observer) };
    scheduler.schedule(Task::new(state, interval_range_step), Some(initial_delay))
  }
}

impl<SD> ObservableExt<i64, Infallible> for IntervalRangeObservable<SD> {}

fn interval_range_step<O>(state: &mut IntervalRangeState<O>, seq: usize) -> TaskState
where
  O: Observer<i64, Infallible>,
{
  if state.observer.is_finished() {
    state.observer = None;
    return TaskState::Finished;
  }
  if (seq as i64) >= state.count - 1 {
    // last value and completion happen on the same tick
    let mut observer = state.observer.take();
    if (seq as i64) < state.count {
      observer.next(state.start + seq as i64);
    }
    observer.complete();
    return TaskState::Finished;
  }
  state.observer.next(state.start + seq as i64);
  TaskState::Sleeping(state.dur)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prelude::*;
  use futures::executor::LocalPool;
  use std::sync::{Arc, Mutex};

  #[test]
  fn local() {
    let mut local = LocalPool::new();
    let stamp = Instant::now();
    let ticks = Arc::new(Mutex::new(0));
    let ticks_c = Arc::clone(&ticks);
    interval(Duration::from_millis(1), local.spawner())
      .take(5)
      .subscribe(move |_| (*ticks_c.lock().unwrap()) += 1);
    local.run();
    assert_eq!(*ticks.lock().unwrap(), 5);
    assert!(stamp.elapsed() >= Duration::from_millis(5));
  }

  #[test]
  fn interval_sequence_in_virtual_time() {
    TestScheduler::init();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    interval(Duration::from_secs(1), TestScheduler)
      .take(4)
      .subscribe(move |seq| sink.lock().unwrap().push(seq));

    TestScheduler::advance_by(Duration::from_millis(2500));
    assert_eq!(*seen.lock().unwrap(), vec![0, 1]);

    TestScheduler::advance_by(Duration::from_secs(10));
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
    assert!(TestScheduler::is_empty());
  }

  #[test]
  fn range_emits_count_values_then_completes() {
    TestScheduler::init();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(0));
    let sink = seen.clone();
    let done = completed.clone();
    interval_range(5, 4, Duration::ZERO, Duration::from_secs(1), TestScheduler).auto_subscribe(
      AutoObserver::new()
        .on_next(move |v| sink.lock().unwrap().push(v))
        .on_complete(move || *done.lock().unwrap() += 1),
    );

    TestScheduler::flush();
    assert_eq!(*seen.lock().unwrap(), vec![5, 6, 7, 8]);
    assert_eq!(*completed.lock().unwrap(), 1);
  }

  #[test]
  fn cancelled_interval_stops_ticking() {
    TestScheduler::init();
    let ticks = Arc::new(Mutex::new(0));
    let sink = ticks.clone();
    let mut unsub = interval(Duration::from_secs(1), TestScheduler)
      .subscribe(move |_| *sink.lock().unwrap() += 1);

    TestScheduler::advance_by(Duration::from_secs(3));
    unsub.unsubscribe();
    TestScheduler::advance_by(Duration::from_secs(10));

    assert_eq!(*ticks.lock().unwrap(), 3);
    assert!(TestScheduler::is_empty());
  }
}
