use std::{convert::Infallible, rc::Rc};

use futures::FutureExt;

use crate::{
  observable::Observable,
  scheduler::{Duration, LocalScheduler, Scheduler, SchedulerRef, TaskHandle},
};

/// Creates an observable that emits `0` as soon as it is subscribed, then
/// `1, 2, 3, …` every `period`.
///
/// Never completes; limit it with an operator such as `take`. The teardown
/// cancels the timer. Runs on the default [`LocalScheduler`].
pub fn interval(period: Duration) -> Observable<usize, Infallible> {
  interval_on(period, LocalScheduler)
}

/// Like [`interval`], ticking on `scheduler`.
pub fn interval_on<S>(period: Duration, scheduler: S) -> Observable<usize, Infallible>
where
  S: Scheduler + 'static,
{
  let scheduler: SchedulerRef = Rc::new(scheduler);
  Observable::from_parts(scheduler.clone(), move |subscriber| {
    subscriber.next(0);
    if subscriber.is_closed() {
      return TaskHandle::finished();
    }

    let ticker = scheduler.clone();
    let task = async move {
      let mut seq = 1;
      loop {
        ticker.sleep(period).await;
        if subscriber.is_closed() {
          break;
        }
        subscriber.next(seq);
        seq += 1;
      }
    };
    scheduler.spawn(task.boxed_local())
  })
}
