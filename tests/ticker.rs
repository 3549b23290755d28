//! End-to-end ticker behavior, driven in virtual time and on real executors.

use futures::executor::{LocalPool, ThreadPool};
use rxtick::prelude::*;
use std::sync::{
  mpsc::{channel, RecvTimeoutError},
  Arc, Mutex,
};

fn secs(s: u64) -> Duration { Duration::from_secs(s) }

fn millis(ms: u64) -> Duration { Duration::from_millis(ms) }

#[test]
fn countdown_counts_up_inclusive_once_per_unit() {
  TestScheduler::init();
  let ticks = Arc::new(Mutex::new(Vec::new()));
  let completions = Arc::new(Mutex::new(0));
  let sink = ticks.clone();
  let done = completions.clone();

  let spec = CountdownSpec::new(0, 10, 1, secs(1)).unwrap();
  count_down(
    spec,
    TestScheduler,
    TestScheduler,
    CountdownEvents::new()
      .on_tick(move |v| sink.lock().unwrap().push(v))
      .on_complete(move || *done.lock().unwrap() += 1),
  );

  // first tick right away, then one value per second
  TestScheduler::advance_by(millis(1));
  assert_eq!(*ticks.lock().unwrap(), vec![0]);

  TestScheduler::advance_by(secs(4));
  assert_eq!(*ticks.lock().unwrap(), vec![0, 1, 2, 3, 4]);
  assert_eq!(*completions.lock().unwrap(), 0);

  TestScheduler::advance_by(secs(60));
  assert_eq!(*ticks.lock().unwrap(), (0..=10).collect::<Vec<i64>>());
  assert_eq!(*completions.lock().unwrap(), 1);
  assert!(TestScheduler::is_empty());
}

#[test]
fn countdown_counts_down_with_forced_boundary_tick() {
  TestScheduler::init();
  let ticks = Arc::new(Mutex::new(Vec::new()));
  let completions = Arc::new(Mutex::new(0));
  let sink = ticks.clone();
  let done = completions.clone();

  let spec = CountdownSpec::new(10, 0, 3, secs(1)).unwrap();
  count_down(
    spec,
    TestScheduler,
    TestScheduler,
    CountdownEvents::new()
      .on_tick(move |v| sink.lock().unwrap().push(v))
      .on_complete(move || *done.lock().unwrap() += 1),
  );

  TestScheduler::advance_by(secs(60));
  // aligned positions give 10, 7, 4, 1; position 10 is the forced boundary 0
  assert_eq!(*ticks.lock().unwrap(), vec![10, 7, 4, 1, 0]);
  assert_eq!(*completions.lock().unwrap(), 1);
}

#[test]
fn countdown_ascending_from_nonzero_start_stays_in_range() {
  TestScheduler::init();
  let ticks = Arc::new(Mutex::new(Vec::new()));
  let sink = ticks.clone();

  let spec = CountdownSpec::new(5, 10, 2, secs(1)).unwrap();
  count_down(
    spec,
    TestScheduler,
    TestScheduler,
    CountdownEvents::new().on_tick(move |v| sink.lock().unwrap().push(v)),
  );

  TestScheduler::advance_by(secs(60));
  // positions 0, 2, 4 are aligned, position 5 is the boundary: 5, 7, 9, 10
  assert_eq!(*ticks.lock().unwrap(), vec![5, 7, 9, 10]);
}

#[test]
fn countdown_cancellation_stops_ticks_and_completion() {
  TestScheduler::init();
  let ticks = Arc::new(Mutex::new(Vec::new()));
  let completions = Arc::new(Mutex::new(0));
  let sink = ticks.clone();
  let done = completions.clone();

  let spec = CountdownSpec::new(0, 10, 1, secs(1)).unwrap();
  let mut handle = count_down(
    spec,
    TestScheduler,
    TestScheduler,
    CountdownEvents::new()
      .on_tick(move |v| sink.lock().unwrap().push(v))
      .on_complete(move || *done.lock().unwrap() += 1),
  );

  TestScheduler::advance_by(secs(3));
  assert_eq!(*ticks.lock().unwrap(), vec![0, 1, 2, 3]);

  handle.unsubscribe();
  assert!(handle.is_closed());

  TestScheduler::advance_by(secs(60));
  assert_eq!(*ticks.lock().unwrap(), vec![0, 1, 2, 3]);
  assert_eq!(*completions.lock().unwrap(), 0);
  assert!(TestScheduler::is_empty());
}

#[test]
fn timer_delivers_ceil_end_over_step_ticks() {
  TestScheduler::init();
  let ticks = Arc::new(Mutex::new(Vec::new()));
  let completions = Arc::new(Mutex::new(0));
  let sink = ticks.clone();
  let done = completions.clone();

  // 95ms / 10ms rounds up to 10 steps
  let spec = TimerSpec::new(millis(95), millis(10)).unwrap();
  timer(
    spec,
    TestScheduler,
    TestScheduler,
    TimerEvents::new()
      .on_tick(move |step, elapsed| sink.lock().unwrap().push((step, elapsed)))
      .on_complete(move || *done.lock().unwrap() += 1),
  );

  TestScheduler::advance_by(secs(10));
  let ticks = ticks.lock().unwrap();
  assert_eq!(ticks.len(), 10);
  assert_eq!(ticks.first(), Some(&(1, millis(10))));
  assert_eq!(ticks.last(), Some(&(10, millis(100))));
  assert!(ticks.windows(2).all(|w| w[0].0 + 1 == w[1].0));
  assert_eq!(*completions.lock().unwrap(), 1);
  assert!(TestScheduler::is_empty());
}

#[test]
fn timer_first_tick_waits_a_full_step() {
  TestScheduler::init();
  let ticks = Arc::new(Mutex::new(Vec::new()));
  let sink = ticks.clone();

  let spec = TimerSpec::new(secs(3), secs(1)).unwrap();
  timer(
    spec,
    TestScheduler,
    TestScheduler,
    TimerEvents::new().on_tick(move |step, _| sink.lock().unwrap().push(step)),
  );

  TestScheduler::advance_by(millis(999));
  assert!(ticks.lock().unwrap().is_empty());

  TestScheduler::advance_by(millis(1));
  assert_eq!(*ticks.lock().unwrap(), vec![1]);
}

#[test]
fn timer_cancellation_skips_completion() {
  TestScheduler::init();
  let completions = Arc::new(Mutex::new(0));
  let done = completions.clone();

  let spec = TimerSpec::new(secs(10), secs(1)).unwrap();
  let mut handle = timer(
    spec,
    TestScheduler,
    TestScheduler,
    TimerEvents::new().on_complete(move || *done.lock().unwrap() += 1),
  );

  TestScheduler::advance_by(secs(5));
  handle.unsubscribe();
  TestScheduler::advance_by(secs(60));

  assert_eq!(*completions.lock().unwrap(), 0);
  assert!(TestScheduler::is_empty());
}

#[test]
fn run_after_fires_once_after_the_delay() {
  TestScheduler::init();
  let fired = Arc::new(Mutex::new(0));
  let sink = fired.clone();

  run_after(secs(5), TestScheduler, TestScheduler, move || {
    *sink.lock().unwrap() += 1
  });

  TestScheduler::advance_by(secs(4));
  assert_eq!(*fired.lock().unwrap(), 0);

  TestScheduler::advance_by(secs(60));
  assert_eq!(*fired.lock().unwrap(), 1);
  assert!(TestScheduler::is_empty());
}

#[test]
fn countdown_on_a_local_pool() {
  let mut pool = LocalPool::new();
  let ticks = Arc::new(Mutex::new(Vec::new()));
  let completions = Arc::new(Mutex::new(0));
  let sink = ticks.clone();
  let done = completions.clone();

  let spec = CountdownSpec::new(3, 0, 1, millis(1)).unwrap();
  count_down(
    spec,
    pool.spawner(),
    pool.spawner(),
    CountdownEvents::new()
      .on_tick(move |v| sink.lock().unwrap().push(v))
      .on_complete(move || *done.lock().unwrap() += 1),
  );
  pool.run();

  assert_eq!(*ticks.lock().unwrap(), vec![3, 2, 1, 0]);
  assert_eq!(*completions.lock().unwrap(), 1);
}

#[test]
fn timer_on_a_thread_pool() {
  let pool = ThreadPool::new().unwrap();
  let ticks = Arc::new(Mutex::new(0u64));
  let sink = ticks.clone();
  let (tx, rx) = channel();

  let spec = TimerSpec::new(millis(50), millis(5)).unwrap();
  timer(
    spec,
    pool.clone(),
    pool,
    TimerEvents::new()
      .on_tick(move |step, _| *sink.lock().unwrap() = step)
      .on_complete(move || tx.send(()).unwrap()),
  );

  match rx.recv_timeout(secs(10)) {
    Ok(()) => assert_eq!(*ticks.lock().unwrap(), 10),
    Err(RecvTimeoutError::Timeout) => panic!("timer did not complete in time"),
    Err(e) => panic!("completion channel failed: {e}"),
  }
}
