use std::{
  collections::VecDeque,
  pin::Pin,
  task::{Context, Poll, Waker},
};

use futures::Stream;

use crate::{
  observable::Observable,
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::Teardown,
};

/// Buffer shared between the subscription and the consumer.
struct PullState<T, E> {
  queue: VecDeque<T>,
  waker: Option<Waker>,
  running: bool,
  error: Option<E>,
}

/// A `Stream` that yields values pushed by an `Observable`.
///
/// Yields `Ok(value)` for each buffered `next`, in push order. Once the
/// source stops, the backlog is drained first; then a recorded error is
/// yielded as `Err` and the stream ends.
///
/// Dropping an `ObservablePull` does **not** unsubscribe from its source. A
/// source that never terminates keeps running (and buffering) until
/// [`ObservablePull::teardown`] is called.
pub struct ObservablePull<T, E> {
  state: MutRc<PullState<T, E>>,
  teardown: Teardown,
}

impl<T, E> ObservablePull<T, E> {
  /// The teardown of the underlying subscription.
  pub fn teardown(&self) -> Teardown { self.teardown.clone() }

  /// Values pushed but not consumed yet.
  pub fn backlog_len(&self) -> usize { self.state.rc_deref().queue.len() }
}

/// Subscribe to `source` right away and expose its pushes as a pull stream.
///
/// ```
/// use futures::{executor::block_on, TryStreamExt};
/// use rxlite::prelude::*;
///
/// let values = block_on(
///   observable_as_iterator(&from_iter::<_, &str>(vec![2, 3, 4])).try_collect::<Vec<_>>(),
/// );
/// assert_eq!(values, Ok(vec![2, 3, 4]));
/// ```
pub fn observable_as_iterator<T: 'static, E: 'static>(source: &Observable<T, E>) -> ObservablePull<T, E> {
  let state = MutRc::own(PullState { queue: VecDeque::new(), waker: None, running: true, error: None });
  let teardown = source.subscribe(PullObserver { state: state.clone() });
  ObservablePull { state, teardown }
}

impl<T, E> Stream for ObservablePull<T, E> {
  type Item = Result<T, E>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let mut state = self.state.rc_deref_mut();
    if let Some(value) = state.queue.pop_front() {
      return Poll::Ready(Some(Ok(value)));
    }
    if state.running {
      state.waker = Some(cx.waker().clone());
      return Poll::Pending;
    }
    Poll::Ready(state.error.take().map(Err))
  }
}

struct PullObserver<T, E> {
  state: MutRc<PullState<T, E>>,
}

impl<T, E> PullObserver<T, E> {
  fn update(&self, f: impl FnOnce(&mut PullState<T, E>)) {
    let waker = {
      let mut state = self.state.rc_deref_mut();
      f(&mut state);
      state.waker.take()
    };
    if let Some(waker) = waker {
      waker.wake();
    }
  }
}

impl<T, E> Observer<T, E> for PullObserver<T, E> {
  fn next(&mut self, value: T) { self.update(|state| state.queue.push_back(value)) }

  fn error(self, err: E) {
    self.update(|state| {
      state.error = Some(err);
      state.running = false;
    })
  }

  fn complete(self) { self.update(|state| state.running = false) }

  fn is_closed(&self) -> bool { !self.state.rc_deref().running }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, convert::Infallible, rc::Rc};

  use futures::{executor::block_on, StreamExt, TryStreamExt};

  use super::*;
  use crate::{
    observable::{from_iter, interval},
    scheduler::Duration,
    subscription::Subscription,
    test_util::run_local,
  };

  #[test]
  fn drains_then_ends() {
    let source = Observable::<i32, &str>::new(|subscriber| {
      subscriber.next(2);
      subscriber.next(3);
      subscriber.next(4);
      subscriber.complete();
    });
    let pull = observable_as_iterator(&source);
    assert_eq!(pull.backlog_len(), 3);
    let items: Vec<_> = block_on(pull.collect());
    assert_eq!(items, vec![Ok(2), Ok(3), Ok(4)]);
  }

  #[test]
  fn error_comes_after_the_backlog() {
    let source = Observable::<i32, &str>::new(|subscriber| {
      subscriber.next(2);
      subscriber.error("boom");
    });
    let mut pull = observable_as_iterator(&source);
    block_on(async {
      assert_eq!(pull.next().await, Some(Ok(2)));
      assert_eq!(pull.next().await, Some(Err("boom")));
      assert_eq!(pull.next().await, None);
    });
  }

  #[test]
  fn try_collect_raises_the_error() {
    let source = Observable::<i32, &str>::new(|subscriber| {
      subscriber.next(2);
      subscriber.error("boom");
    });
    let result = block_on(source.as_iterator().try_collect::<Vec<_>>());
    assert_eq!(result, Err("boom"));
  }

  #[tokio::test(start_paused = true)]
  async fn waits_for_pushes() {
    run_local(async {
      let source = interval(Duration::from_millis(100)).take(3);
      let mut pull = source.as_iterator();
      assert_eq!(pull.next().await, Some(Ok(0)));
      assert_eq!(pull.next().await, Some(Ok(1)));
      assert_eq!(pull.next().await, Some(Ok(2)));
      assert_eq!(pull.next().await, None);
    })
    .await;
  }

  #[tokio::test(start_paused = true)]
  async fn abandoning_the_stream_keeps_the_source_running() {
    run_local(async {
      let ticks = Rc::new(Cell::new(0));
      let c_ticks = ticks.clone();
      let counted = interval(Duration::from_millis(100)).map(move |v| {
        c_ticks.set(c_ticks.get() + 1);
        v
      });

      let mut pull = counted.as_iterator();
      assert_eq!(pull.next().await, Some(Ok::<_, Infallible>(0)));
      let teardown = pull.teardown();
      drop(pull);

      tokio::time::sleep(Duration::from_millis(350)).await;
      assert_eq!(ticks.get(), 4);

      teardown.unsubscribe();
      tokio::time::sleep(Duration::from_millis(500)).await;
      assert_eq!(ticks.get(), 4);
    })
    .await;
  }

  #[test]
  fn empty_source() {
    let pull = observable_as_iterator(&from_iter::<_, ()>(Vec::<u8>::new()));
    assert_eq!(block_on(pull.collect::<Vec<_>>()), vec![]);
  }
}
