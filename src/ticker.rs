//! Ranged tick timers: a step timer counting up, a countdown between two
//! values, and a one-shot deferred action.
//!
//! Both tickers are thin compositions over the periodic sources: a
//! fixed-rate sequence drives raw positions, a selection/mapping stage turns
//! positions into visible ticks, and an observe-on stage marshals every
//! callback onto the delivery scheduler. With a serial delivery executor the
//! callbacks arrive in order and never overlap.
//!
//! Scheduling faults never reach the callbacks: the periodic sources are
//! infallible by type, so a ticker consumer observes ticks, one completion,
//! or silence (after cancellation), and nothing else.

use std::convert::Infallible;

use crate::{
  error::TickerError,
  observable::{
    interval::{interval, interval_range, IntervalRangeState, IntervalState},
    Observable, ObservableExt,
  },
  observer::{AutoObserver, Observer},
  ops::observe_on::{EventState, ObserveOnObserver},
  scheduler::{Duration, Scheduler},
  subscription::MultiSubscription,
};

/// Cancellation handle owned by the ticker caller.
///
/// Cancelling stops the periodic task and discards ticks that were scheduled
/// for delivery but not yet handed to a callback; the completion callback
/// does not fire after a cancellation.
pub type TickHandle = MultiSubscription;

/// Validated configuration for [`timer`]: run for `end`, reporting a tick
/// every `step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerSpec {
  end: Duration,
  step: Duration,
}

impl TimerSpec {
  /// Requires a non-zero `step` strictly shorter than `end`.
  pub fn new(end: Duration, step: Duration) -> Result<Self, TickerError> {
    if step.is_zero() {
      return Err(TickerError::ZeroStep);
    }
    if end <= step {
      return Err(TickerError::StepExceedsEnd { end, step });
    }
    Ok(TimerSpec { end, step })
  }

  pub fn end(&self) -> Duration { self.end }

  pub fn step(&self) -> Duration { self.step }

  /// Number of ticks the timer delivers: `ceil(end / step)`.
  pub fn total_steps(&self) -> usize {
    self.end.as_nanos().div_ceil(self.step.as_nanos()) as usize
  }
}

/// Validated configuration for [`count_down`]: count from `start` to `end`
/// inclusive (in either direction), advancing one raw position per `unit`
/// and reporting every `step`th position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownSpec {
  start: i64,
  end: i64,
  step: i64,
  unit: Duration,
}

impl CountdownSpec {
  /// Requires `start != end` and a positive `step` no larger than the
  /// counted span.
  pub fn new(start: i64, end: i64, step: i64, unit: Duration) -> Result<Self, TickerError> {
    if step < 1 {
      return Err(TickerError::NonPositiveStep(step));
    }
    if start == end {
      return Err(TickerError::EmptyRange(start));
    }
    let span = (end - start).abs();
    if step > span {
      return Err(TickerError::StepExceedsSpan { step, span });
    }
    Ok(CountdownSpec { start, end, step, unit })
  }

  pub fn start(&self) -> i64 { self.start }

  pub fn end(&self) -> i64 { self.end }

  pub fn step(&self) -> i64 { self.step }

  pub fn unit(&self) -> Duration { self.unit }

  fn reversed(&self) -> bool { self.start > self.end }

  /// Raw positions enumerated by the underlying range source.
  fn total(&self) -> i64 { (self.end - self.start).abs() + 1 }
}

type TimerTickFn = Box<dyn FnMut(u64, Duration) + Send>;
type ValueTickFn = Box<dyn FnMut(i64) + Send>;
type CompleteFn = Box<dyn FnOnce() + Send>;

/// Callbacks for [`timer`]; both are optional.
#[derive(Default)]
pub struct TimerEvents {
  on_tick: Option<TimerTickFn>,
  on_complete: Option<CompleteFn>,
}

impl TimerEvents {
  pub fn new() -> Self { Self::default() }

  /// Called once per step with the 1-based step index and the elapsed time
  /// (`index × step`).
  pub fn on_tick(mut self, f: impl FnMut(u64, Duration) + Send + 'static) -> Self {
    self.on_tick = Some(Box::new(f));
    self
  }

  /// Called exactly once, right after the last tick.
  pub fn on_complete(mut self, f: impl FnOnce() + Send + 'static) -> Self {
    self.on_complete = Some(Box::new(f));
    self
  }
}

/// Callbacks for [`count_down`]; both are optional.
#[derive(Default)]
pub struct CountdownEvents {
  on_tick: Option<ValueTickFn>,
  on_complete: Option<CompleteFn>,
}

impl CountdownEvents {
  pub fn new() -> Self { Self::default() }

  /// Called with each reported value, `end` included.
  pub fn on_tick(mut self, f: impl FnMut(i64) + Send + 'static) -> Self {
    self.on_tick = Some(Box::new(f));
    self
  }

  /// Called exactly once, right after the tick whose value is `end`.
  pub fn on_complete(mut self, f: impl FnOnce() + Send + 'static) -> Self {
    self.on_complete = Some(Box::new(f));
    self
  }
}

/// Starts a timer that counts up to `spec.end()`, ticking every
/// `spec.step()`.
///
/// Delivers `spec.total_steps()` ticks, one per step, each carrying the
/// 1-based step index and the elapsed time; afterwards the completion
/// callback fires once and the scheduled task is released. The call returns
/// immediately; everything is delivered asynchronously on `delivery`.
///
/// `timer(TimerSpec::new(secs(1), millis(10))?, ..)` ticks 100 times, every
/// 10 milliseconds.
pub fn timer<SD, DD>(
  spec: TimerSpec, scheduler: SD, delivery: DD, events: TimerEvents,
) -> TickHandle
where
  SD: Scheduler<IntervalState<ObserveOnObserver<TimerObserver, DD>>>,
  DD: Scheduler<EventState<TimerObserver, usize, Infallible>>,
{
  let observer = TimerObserver {
    step: spec.step,
    total: spec.total_steps(),
    hit: 0,
    events,
  };
  interval(spec.step, scheduler)
    .observe_on(delivery)
    .actual_subscribe(observer)
}

/// Starts a countdown from `spec.start()` to `spec.end()`, in either
/// direction, reporting every `spec.step()`th value and always the final
/// boundary value, one raw position per `spec.unit()`.
///
/// `count_down(CountdownSpec::new(0, 10, 1, secs(1))?, ..)` ticks
/// `0, 1, .., 10` once per second and completes after the `10`;
/// `CountdownSpec::new(10, 0, 3, ..)` ticks `10, 7, 4, 1, 0`.
pub fn count_down<SD, DD>(
  spec: CountdownSpec, scheduler: SD, delivery: DD, events: CountdownEvents,
) -> TickHandle
where
  SD: Scheduler<IntervalRangeState<ObserveOnObserver<CountdownObserver, DD>>>,
  DD: Scheduler<EventState<CountdownObserver, i64, Infallible>>,
{
  let observer = CountdownObserver {
    start: spec.start,
    end: spec.end,
    step: spec.step,
    total: spec.total(),
    reversed: spec.reversed(),
    events,
    done: false,
  };
  interval_range(0, spec.total(), Duration::ZERO, spec.unit, scheduler)
    .observe_on(delivery)
    .actual_subscribe(observer)
}

/// One-shot deferred action: runs `action` on the `delivery` scheduler once
/// `delay` has elapsed.
pub fn run_after<SD, DD>(
  delay: Duration, scheduler: SD, delivery: DD, action: impl FnOnce() + Send + 'static,
) -> TickHandle
where
  SD: Scheduler<IntervalRangeState<ObserveOnObserver<AutoObserver<i64, Infallible>, DD>>>,
  DD: Scheduler<EventState<AutoObserver<i64, Infallible>, i64, Infallible>>,
{
  interval_range(0, 1, delay, delay, scheduler)
    .observe_on(delivery)
    .auto_subscribe(AutoObserver::new().on_complete(action))
}

/// Selection/mapping stage of [`timer`]: turns raw interval positions into
/// `(step, elapsed)` ticks and finishes after the last one.
pub struct TimerObserver {
  step: Duration,
  total: usize,
  hit: usize,
  events: TimerEvents,
}

impl Observer<usize, Infallible> for TimerObserver {
  fn next(&mut self, _seq: usize) {
    if self.hit >= self.total {
      return;
    }
    self.hit += 1;
    let current = self.hit as u64;
    if let Some(f) = self.events.on_tick.as_mut() {
      f(current, self.step * current as u32);
    }
    if self.hit == self.total {
      if let Some(f) = self.events.on_complete.take() {
        f();
      }
    }
  }

  fn error(self, err: Infallible) { match err {} }

  // the interval source never completes on its own; partial delivery must
  // not report completion
  fn complete(self) {}

  fn is_finished(&self) -> bool { self.hit >= self.total }
}

/// Selection/mapping stage of [`count_down`]: applies the step/boundary
/// selection rule, maps raw positions onto reported values, and completes on
/// the `end` value.
pub struct CountdownObserver {
  start: i64,
  end: i64,
  step: i64,
  total: i64,
  reversed: bool,
  events: CountdownEvents,
  done: bool,
}

impl Observer<i64, Infallible> for CountdownObserver {
  fn next(&mut self, position: i64) {
    if self.done {
      return;
    }
    // every `step`th position ticks; the final boundary position always
    // ticks, aligned or not
    if position % self.step != 0 && position != self.total - 1 {
      return;
    }
    let value = if self.reversed { self.start - position } else { self.start + position };
    if let Some(f) = self.events.on_tick.as_mut() {
      f(value);
    }
    if value == self.end {
      self.done = true;
      if let Some(f) = self.events.on_complete.take() {
        f();
      }
    }
  }

  fn error(self, err: Infallible) { match err {} }

  // range exhaustion; the `end` tick has already completed the countdown
  fn complete(self) {}

  fn is_finished(&self) -> bool { self.done }
}
