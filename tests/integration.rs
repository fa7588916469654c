//! End-to-end scenarios over the public API.

use std::{cell::RefCell, convert::Infallible, rc::Rc};

use futures::{StreamExt, TryStreamExt};
use rxlite::prelude::*;
use tokio::task::LocalSet;

async fn collect_ticks(pipeline: impl FnOnce(Observable<usize, Infallible>) -> Observable<usize, Infallible>) -> Vec<usize> {
  let ticks = pipeline(interval(Duration::from_millis(100)));
  match as_iterator(ticks).try_collect::<Vec<_>>().await {
    Ok(values) => values,
    Err(never) => match never {},
  }
}

#[tokio::test(start_paused = true)]
async fn interval_take() {
  let values = LocalSet::new()
    .run_until(collect_ticks(|o| o.pipe(take(4))))
    .await;
  assert_eq!(values, vec![0, 1, 2, 3]);
}

#[tokio::test(start_paused = true)]
async fn interval_map_take() {
  let values = LocalSet::new()
    .run_until(collect_ticks(|o| o.pipe((map(|d: usize| d + 1), take(4)))))
    .await;
  assert_eq!(values, vec![1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn interval_filter_take() {
  let values = LocalSet::new()
    .run_until(collect_ticks(|o| o.pipe((filter(|d: &usize| d % 2 == 0), take(4)))))
    .await;
  assert_eq!(values, vec![0, 2, 4, 6]);
}

#[tokio::test(start_paused = true)]
async fn interval_reduce_take() {
  let values = LocalSet::new()
    .run_until(collect_ticks(|o| o.pipe((reduce(|acc: usize, d: usize| acc + d, 0), take(4)))))
    .await;
  assert_eq!(values, vec![0, 1, 3, 6]);
}

#[tokio::test(start_paused = true)]
async fn teardown_before_the_next_tick() {
  LocalSet::new()
    .run_until(async {
      let seen = Rc::new(RefCell::new(vec![]));
      let c_seen = seen.clone();
      let teardown = interval(Duration::from_millis(100))
        .subscribe(FnMutObserver(move |v: usize| c_seen.borrow_mut().push(v)));

      tokio::time::sleep(Duration::from_millis(150)).await;
      teardown.unsubscribe();
      tokio::time::sleep(Duration::from_millis(500)).await;
      teardown.unsubscribe();

      assert_eq!(*seen.borrow(), vec![0, 1]);
    })
    .await;
}

#[test]
fn bridge_drains_then_ends() {
  let source = Observable::<i32, &str>::new(|subscriber| {
    subscriber.next(2);
    subscriber.next(3);
    subscriber.next(4);
    subscriber.complete();
  });
  let items: Vec<_> = futures::executor::block_on(source.as_iterator().collect());
  assert_eq!(items, vec![Ok(2), Ok(3), Ok(4)]);
}

#[test]
fn bridge_raises_error_after_backlog() {
  let source = Observable::<i32, &str>::new(|subscriber| {
    subscriber.next(2);
    subscriber.error("boom");
  });
  let mut pull = as_iterator(source);
  futures::executor::block_on(async {
    assert_eq!(pull.next().await, Some(Ok(2)));
    assert_eq!(pull.next().await, Some(Err("boom")));
    assert_eq!(pull.next().await, None);
  });
}

#[test]
fn event_clicks_through_a_pipeline() {
  let button = EventEmitter::<(i32, i32)>::new();
  let sink = MemorySink::new();
  let teardown = from_event(button.clone(), "click")
    .pipe((map(|(x, _y): (i32, i32)| x), filter(|x: &i32| *x >= 0), take(2)))
    .subscribe(LogObserver::new(sink.clone()));

  button.dispatch("click", &(-1, 0));
  button.dispatch("click", &(10, 5));
  button.dispatch("click", &(20, 5));
  button.dispatch("click", &(30, 5));

  assert_eq!(sink.lines(), vec!["{ value: 10 }", "{ value: 20 }", "complete"]);
  assert_eq!(button.listener_count("click"), 0);
  teardown.unsubscribe();
}

#[test]
fn scoped_subscription() {
  let button = EventEmitter::<u8>::new();
  let seen = Rc::new(RefCell::new(vec![]));
  {
    let c_seen = seen.clone();
    let _guard = from_event(button.clone(), "key")
      .subscribe(FnMutObserver(move |k: u8| c_seen.borrow_mut().push(k)))
      .unsubscribe_when_dropped();
    button.dispatch("key", &1);
  }
  button.dispatch("key", &2);
  assert_eq!(*seen.borrow(), vec![1]);
}
