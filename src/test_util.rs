//! Helpers shared by the unit tests.

use std::future::Future;

use crate::{
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
};

/// Drive `fut` inside a fresh `LocalSet`, which `LocalScheduler` requires.
pub async fn run_local<F: Future>(fut: F) -> F::Output {
  tokio::task::LocalSet::new().run_until(fut).await
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<T, E> {
  Next(T),
  Error(E),
  Complete,
}

/// Observer that records every notification it sees.
pub struct Recorder<T, E>(MutRc<Vec<Notification<T, E>>>);

impl<T, E> Clone for Recorder<T, E> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: Clone, E: Clone> Recorder<T, E> {
  pub fn new() -> Self { Self(MutRc::own(vec![])) }

  pub fn notifications(&self) -> Vec<Notification<T, E>> { self.0.rc_deref().clone() }

  pub fn values(&self) -> Vec<T> {
    self
      .0
      .rc_deref()
      .iter()
      .filter_map(|n| match n {
        Notification::Next(v) => Some(v.clone()),
        _ => None,
      })
      .collect()
  }

  pub fn is_completed(&self) -> bool {
    self
      .0
      .rc_deref()
      .iter()
      .any(|n| matches!(n, Notification::Complete))
  }
}

impl<T, E> Observer<T, E> for Recorder<T, E> {
  fn next(&mut self, value: T) { self.0.rc_deref_mut().push(Notification::Next(value)); }

  fn error(self, err: E) { self.0.rc_deref_mut().push(Notification::Error(err)); }

  fn complete(self) { self.0.rc_deref_mut().push(Notification::Complete); }
}
