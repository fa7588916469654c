//! Push-to-pull bridge.
//!
//! [`as_iterator`] turns anything [`IntoPull`] into a [`PullSequence`]: a
//! local `Stream` of `Result<Item, Err>`. Ordered collections are iterated, a
//! [`producer`] is invoked and its result iterated, an `Observable` goes
//! through [`observable_as_iterator`], and [`just`] yields a single value.

use std::{
  collections::BTreeMap,
  convert::Infallible,
  future::Future,
  pin::Pin,
  task::{Context, Poll},
};

use futures::{
  future::ready,
  stream::{self, LocalBoxStream},
  Stream, StreamExt,
};

use crate::{observable::Observable, subscription::Teardown};

mod observable_pull;
pub use observable_pull::*;

/// A pull sequence produced by [`as_iterator`].
pub struct PullSequence<Item, Err> {
  inner: LocalBoxStream<'static, Result<Item, Err>>,
  teardown: Option<Teardown>,
}

impl<Item, Err> PullSequence<Item, Err> {
  fn new(inner: LocalBoxStream<'static, Result<Item, Err>>) -> Self { Self { inner, teardown: None } }

  /// The teardown of the source subscription when the sequence bridges an
  /// `Observable`. Dropping the sequence never calls it.
  pub fn teardown(&self) -> Option<Teardown> { self.teardown.clone() }
}

impl<Item, Err> Stream for PullSequence<Item, Err> {
  type Item = Result<Item, Err>;

  fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    self.inner.poll_next_unpin(cx)
  }
}

/// Something [`as_iterator`] can consume.
pub trait IntoPull {
  type Item;
  type Err;

  fn into_pull(self) -> PullSequence<Self::Item, Self::Err>;
}

/// Adapt `source` into a pull sequence, dispatching on its shape.
///
/// ```
/// use futures::{executor::block_on, TryStreamExt};
/// use rxlite::prelude::*;
///
/// let from_vec = block_on(as_iterator(vec![1, 2]).try_collect::<Vec<_>>());
/// let from_value = block_on(as_iterator(just("one")).try_collect::<Vec<_>>());
/// assert_eq!(from_vec, Ok(vec![1, 2]));
/// assert_eq!(from_value, Ok(vec!["one"]));
/// ```
pub fn as_iterator<S: IntoPull>(source: S) -> PullSequence<S::Item, S::Err> { source.into_pull() }

impl<T: 'static> IntoPull for Vec<T> {
  type Item = T;
  type Err = Infallible;

  fn into_pull(self) -> PullSequence<T, Infallible> {
    PullSequence::new(stream::iter(self.into_iter().map(Ok)).boxed_local())
  }
}

impl<T: 'static, const N: usize> IntoPull for [T; N] {
  type Item = T;
  type Err = Infallible;

  fn into_pull(self) -> PullSequence<T, Infallible> {
    PullSequence::new(stream::iter(self.into_iter().map(Ok)).boxed_local())
  }
}

/// Yields the values in key order; keys are dropped.
impl<K: 'static, V: 'static> IntoPull for BTreeMap<K, V> {
  type Item = V;
  type Err = Infallible;

  fn into_pull(self) -> PullSequence<V, Infallible> {
    PullSequence::new(stream::iter(self.into_values().map(Ok)).boxed_local())
  }
}

impl<T: 'static, E: 'static> IntoPull for Observable<T, E> {
  type Item = T;
  type Err = E;

  fn into_pull(self) -> PullSequence<T, E> {
    let pull = observable_as_iterator(&self);
    let teardown = pull.teardown();
    PullSequence { inner: pull.boxed_local(), teardown: Some(teardown) }
  }
}

/// A zero-argument async function whose result is iterated. See [`producer`].
pub struct Producer<F>(F);

/// Wrap `f` so [`as_iterator`] invokes it on first poll and iterates the
/// collection it resolves to. A failure is yielded as the only `Err`.
pub fn producer<F>(f: F) -> Producer<F> { Producer(f) }

impl<F, Fut, I, E> IntoPull for Producer<F>
where
  F: FnOnce() -> Fut + 'static,
  Fut: Future<Output = Result<I, E>> + 'static,
  I: IntoIterator + 'static,
  I::IntoIter: 'static,
  I::Item: 'static,
  E: 'static,
{
  type Item = I::Item;
  type Err = E;

  fn into_pull(self) -> PullSequence<I::Item, E> {
    let Producer(f) = self;
    let items = stream::once(async move { f().await }).flat_map(|result| match result {
      Ok(items) => stream::iter(items.into_iter().map(Ok)).left_stream(),
      Err(err) => stream::once(ready(Err(err))).right_stream(),
    });
    PullSequence::new(items.boxed_local())
  }
}

/// A single value. See [`just`].
pub struct Just<T>(T);

/// A source that yields `value` once.
pub fn just<T>(value: T) -> Just<T> { Just(value) }

impl<T: 'static> IntoPull for Just<T> {
  type Item = T;
  type Err = Infallible;

  fn into_pull(self) -> PullSequence<T, Infallible> {
    PullSequence::new(stream::once(ready(Ok(self.0))).boxed_local())
  }
}
