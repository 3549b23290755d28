use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::MutArc,
  scheduler::{Scheduler, Task, TaskState},
  subscription::{MultiSubscription, Subscription},
};

/// Marshals every downstream event onto another scheduler.
///
/// Each event becomes a one-shot task on the target scheduler, so delivery
/// order follows scheduling order whenever the target is serial. The
/// returned [`MultiSubscription`] owns both the upstream handle and the
/// still-pending event tasks: cancelling it discards events that were
/// scheduled but not yet delivered.
pub struct ObserveOnOp<S, SD> {
  source: S,
  scheduler: SD,
}

impl<S, SD> ObserveOnOp<S, SD> {
  pub(crate) fn new(source: S, scheduler: SD) -> Self { ObserveOnOp { source, scheduler } }
}

impl<Item, Err, O, S, SD> Observable<Item, Err, O> for ObserveOnOp<S, SD>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, ObserveOnObserver<O, SD>>,
  SD: Scheduler<EventState<O, Item, Err>>,
  S::Unsub: Send + 'static,
{
  type Unsub = MultiSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subscription = MultiSubscription::default();
    let observer = ObserveOnObserver {
      observer: MutArc::own(Some(observer)),
      scheduler: self.scheduler,
      subscription: subscription.clone(),
    };
    let upstream = self.source.actual_subscribe(observer);
    subscription.add(upstream);
    subscription
  }
}

impl<Item, Err, S, SD> ObservableExt<Item, Err> for ObserveOnOp<S, SD> where
  S: ObservableExt<Item, Err>
{
}

pub struct ObserveOnObserver<O, SD> {
  observer: MutArc<Option<O>>,
  scheduler: SD,
  subscription: MultiSubscription,
}

enum Event<Item, Err> {
  Next(Item),
  Err(Err),
  Complete,
}

/// One marshalled event waiting on the delivery scheduler.
pub struct EventState<O, Item, Err> {
  observer: MutArc<Option<O>>,
  event: Option<Event<Item, Err>>,
}

fn deliver<O, Item, Err>(state: &mut EventState<O, Item, Err>, _seq: usize) -> TaskState
where
  O: Observer<Item, Err>,
{
  let mut observer = state.observer.clone();
  match state.event.take() {
    Some(Event::Next(value)) => observer.next(value),
    Some(Event::Err(err)) => observer.error(err),
    Some(Event::Complete) => observer.complete(),
    None => {}
  }
  TaskState::Finished
}

impl<O, SD> ObserveOnObserver<O, SD> {
  fn marshal<Item, Err>(&self, event: Event<Item, Err>)
  where
    O: Observer<Item, Err>,
    SD: Scheduler<EventState<O, Item, Err>>,
  {
    if self.subscription.is_cancelled() {
      return;
    }
    let state = EventState { observer: self.observer.clone(), event: Some(event) };
    let handle = self.scheduler.schedule(Task::new(state, deliver), None);
    self.subscription.add(handle);
  }
}

impl<Item, Err, O, SD> Observer<Item, Err> for ObserveOnObserver<O, SD>
where
  O: Observer<Item, Err>,
  SD: Scheduler<EventState<O, Item, Err>>,
{
  fn next(&mut self, value: Item) { self.marshal(Event::Next(value)) }

  fn error(self, err: Err) { self.marshal(Event::Err(err)) }

  fn complete(self) { self.marshal(Event::Complete) }

  fn is_finished(&self) -> bool {
    self.subscription.is_cancelled() || self.observer.is_finished()
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use futures::executor::LocalPool;
  use std::sync::{Arc, Mutex};

  #[test]
  fn smoke() {
    let mut local = LocalPool::new();
    let v = Arc::new(Mutex::new(0));
    let v_c = v.clone();
    from_iter(1..2)
      .observe_on(local.spawner())
      .subscribe(move |i| *v_c.lock().unwrap() = i);
    local.run();

    assert_eq!(*v.lock().unwrap(), 1);
  }

  #[test]
  fn keeps_order_on_serial_scheduler() {
    TestScheduler::init();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    from_iter(0..5)
      .observe_on(TestScheduler)
      .subscribe(move |v| sink.lock().unwrap().push(v));

    assert!(seen.lock().unwrap().is_empty());
    TestScheduler::flush();
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
  }

  #[test]
  fn unsubscribe_discards_pending_events() {
    TestScheduler::init();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut unsub = from_iter(0..5)
      .observe_on(TestScheduler)
      .subscribe(move |v| sink.lock().unwrap().push(v));

    // everything is queued on the delivery scheduler, nothing delivered yet
    unsub.unsubscribe();
    TestScheduler::flush();
    assert!(seen.lock().unwrap().is_empty());
  }

  #[test]
  fn completion_is_marshalled_too() {
    TestScheduler::init();
    let completed = Arc::new(Mutex::new(false));
    let done = completed.clone();
    from_iter(0..3).observe_on(TestScheduler).auto_subscribe(
      AutoObserver::new().on_complete(move || *done.lock().unwrap() = true),
    );

    assert!(!*completed.lock().unwrap());
    TestScheduler::flush();
    assert!(*completed.lock().unwrap());
  }
}
