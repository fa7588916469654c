use futures::future::{ready, FutureExt};

use super::operate::{operate, OperatorState, StateFuture};
use crate::observable::Observable;

/// Descriptor behind [`take`]: done once `remaining` reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TakeState {
  remaining: usize,
}

impl TakeState {
  pub fn new(count: usize) -> Self { Self { remaining: count } }
}

impl<Item: 'static, Err: 'static> OperatorState<Item, Err> for TakeState {
  type Output = Item;

  fn done(&mut self) -> StateFuture<bool, Err> { ready(Ok(self.remaining < 1)).boxed_local() }

  fn update(&mut self, value: Item) -> StateFuture<Option<Item>, Err> {
    self.remaining = self.remaining.saturating_sub(1);
    ready(Ok(Some(value))).boxed_local()
  }
}

/// Emits only the first `count` values emitted by the source Observable.
///
/// `take` returns an Observable that emits only the first `count` values
/// emitted by the source Observable. If the source emits fewer than `count`
/// values then all of its values are emitted. After that, it completes,
/// regardless if the source completes. `take(0)` completes immediately and
/// never subscribes to the source.
///
/// ```
/// use rxlite::prelude::*;
///
/// let sink = MemorySink::new();
/// from_iter::<_, &str>(0..10)
///   .take(3)
///   .subscribe(LogObserver::new(sink.clone()));
///
/// assert_eq!(
///   sink.lines(),
///   vec!["{ value: 0 }", "{ value: 1 }", "{ value: 2 }", "complete"]
/// );
/// ```
pub fn take<Item, Err>(count: usize) -> impl FnOnce(Observable<Item, Err>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  operate(TakeState::new(count))
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, convert::Infallible, rc::Rc};

  use super::*;
  use crate::{
    observable::{from_iter, interval},
    scheduler::Duration,
    subscription::Subscription,
    test_util::{run_local, Notification, Recorder},
  };

  #[test]
  fn base_function() {
    let recorder = Recorder::<i32, ()>::new();
    from_iter(0..100).take(5).subscribe(recorder.clone());
    assert_eq!(recorder.values(), vec![0, 1, 2, 3, 4]);
    assert!(recorder.is_completed());
  }

  #[test]
  fn fewer_values_than_count() {
    let recorder = Recorder::<i32, ()>::new();
    from_iter(0..2).take(5).subscribe(recorder.clone());
    assert_eq!(
      recorder.notifications(),
      vec![Notification::Next(0), Notification::Next(1), Notification::Complete]
    );
  }

  #[test]
  fn take_zero_never_subscribes() {
    let subscribed = Rc::new(Cell::new(false));
    let c_subscribed = subscribed.clone();
    let recorder = Recorder::<i32, ()>::new();
    Observable::new(move |subscriber| {
      c_subscribed.set(true);
      subscriber.next(1);
    })
    .take(0)
    .subscribe(recorder.clone());

    assert!(!subscribed.get());
    assert_eq!(recorder.notifications(), vec![Notification::Complete]);
  }

  #[test]
  fn stops_a_synchronous_source_early() {
    let emitted = Rc::new(Cell::new(0));
    let c_emitted = emitted.clone();
    let recorder = Recorder::<usize, ()>::new();
    from_iter((0..).map(move |v| {
      c_emitted.set(c_emitted.get() + 1);
      v
    }))
    .take(3)
    .subscribe(recorder.clone());

    assert_eq!(recorder.values(), vec![0, 1, 2]);
    assert_eq!(emitted.get(), 3);
  }

  #[tokio::test(start_paused = true)]
  async fn over_an_interval() {
    run_local(async {
      let recorder = Recorder::<usize, Infallible>::new();
      let teardown = interval(Duration::from_millis(100))
        .pipe(take(4))
        .subscribe(recorder.clone());

      tokio::time::sleep(Duration::from_millis(1000)).await;
      assert_eq!(
        recorder.notifications(),
        vec![
          Notification::Next(0),
          Notification::Next(1),
          Notification::Next(2),
          Notification::Next(3),
          Notification::Complete
        ]
      );
      teardown.unsubscribe();
    })
    .await;
  }
}
