//! Task scheduling for time-based sources and suspended operator work.
//!
//! A [`Scheduler`] spawns `'static` local futures and provides sleeping. Every
//! spawned task is wrapped in an abortable future so the returned
//! [`TaskHandle`] can cancel it; dropping the handle leaves the task running.

use std::rc::Rc;

pub use std::time::Duration;

use futures::future::{abortable, AbortHandle, FutureExt, LocalBoxFuture};

use crate::subscription::Subscription;

/// A Scheduler is an object to order task and schedule their execution.
pub trait Scheduler {
  /// Start running `task`. The task makes progress only while the underlying
  /// executor is driven.
  fn spawn(&self, task: LocalBoxFuture<'static, ()>) -> TaskHandle;

  /// A future that resolves once `duration` has elapsed.
  fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Shared handle to a scheduler, as carried by every `Observable`.
pub type SchedulerRef = Rc<dyn Scheduler>;

/// Cancellation handle for a spawned task.
#[derive(Clone, Debug)]
pub struct TaskHandle(Option<AbortHandle>);

impl TaskHandle {
  pub fn new(handle: AbortHandle) -> Self { Self(Some(handle)) }

  /// A handle for work that never got spawned.
  pub fn finished() -> Self { Self(None) }
}

impl Subscription for TaskHandle {
  fn unsubscribe(&self) {
    if let Some(handle) = &self.0 {
      handle.abort();
    }
  }

  fn is_closed(&self) -> bool { self.0.as_ref().map_or(true, AbortHandle::is_aborted) }
}

/// The default scheduler: tasks run on the current tokio `LocalSet` and
/// sleep on tokio's timer.
///
/// Spawning outside of a `LocalSet` panics, the same way
/// `tokio::task::spawn_local` does.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalScheduler;

impl Scheduler for LocalScheduler {
  fn spawn(&self, task: LocalBoxFuture<'static, ()>) -> TaskHandle {
    let (task, handle) = abortable(task);
    drop(tokio::task::spawn_local(task));
    TaskHandle::new(handle)
  }

  fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
    tokio::time::sleep(duration).boxed_local()
  }
}

#[cfg(all(feature = "timer", not(target_arch = "wasm32")))]
mod local_pool {
  use futures::{
    executor::LocalSpawner,
    future::{abortable, FutureExt, LocalBoxFuture},
    task::LocalSpawnExt,
  };

  use super::{Duration, Scheduler, TaskHandle};

  /// A `futures` local pool can drive observables directly:
  /// `interval_on(period, pool.spawner())`.
  impl Scheduler for LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) -> TaskHandle {
      let (task, handle) = abortable(task);
      if let Err(err) = self.spawn_local(task.map(|_| ())) {
        tracing::warn!(%err, "local pool refused a task");
        handle.abort();
      }
      TaskHandle::new(handle)
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
      futures_time::task::sleep(duration.into()).map(|_| ()).boxed_local()
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use futures::future::pending;

  use super::*;
  use crate::test_util::run_local;

  #[tokio::test(start_paused = true)]
  async fn spawned_task_runs_and_can_be_aborted() {
    run_local(async {
      let ticks = Rc::new(Cell::new(0));
      let c_ticks = ticks.clone();
      let handle = LocalScheduler.spawn(
        async move {
          loop {
            LocalScheduler.sleep(Duration::from_millis(10)).await;
            c_ticks.set(c_ticks.get() + 1);
          }
        }
        .boxed_local(),
      );
      tokio::time::sleep(Duration::from_millis(35)).await;
      assert_eq!(ticks.get(), 3);
      assert!(!handle.is_closed());

      handle.unsubscribe();
      tokio::time::sleep(Duration::from_millis(50)).await;
      assert_eq!(ticks.get(), 3);
      assert!(handle.is_closed());
    })
    .await;
  }

  #[tokio::test]
  async fn dropping_the_handle_detaches() {
    run_local(async {
      let done = Rc::new(Cell::new(false));
      let c_done = done.clone();
      drop(LocalScheduler.spawn(async move { c_done.set(true) }.boxed_local()));
      tokio::task::yield_now().await;
      assert!(done.get());
    })
    .await;
  }

  #[test]
  fn finished_handle_is_closed() {
    let handle = TaskHandle::finished();
    assert!(handle.is_closed());
    handle.unsubscribe();
  }

  #[cfg(all(feature = "timer", not(target_arch = "wasm32")))]
  #[test]
  fn local_pool_spawner() {
    let mut pool = futures::executor::LocalPool::new();
    let spawner = pool.spawner();
    let stopped = spawner.spawn(pending::<()>().boxed_local());
    let hit = Rc::new(Cell::new(false));
    let c_hit = hit.clone();
    let sleeper = spawner.clone();
    spawner.spawn(
      async move {
        sleeper.sleep(Duration::from_millis(1)).await;
        c_hit.set(true);
      }
      .boxed_local(),
    );
    stopped.unsubscribe();
    pool.run();
    assert!(hit.get());
  }
}
