use futures::future::{ready, FutureExt};

use super::operate::{operate, OperatorState, StateFuture};
use crate::observable::Observable;

/// Descriptor behind [`map`].
#[derive(Clone)]
pub struct MapState<F> {
  func: F,
}

impl<F> MapState<F> {
  pub fn new(func: F) -> Self { Self { func } }
}

impl<In, Out, Err, F> OperatorState<In, Err> for MapState<F>
where
  F: FnMut(In) -> Out,
  Out: 'static,
  Err: 'static,
{
  type Output = Out;

  fn update(&mut self, value: In) -> StateFuture<Option<Out>, Err> {
    ready(Ok(Some((self.func)(value)))).boxed_local()
  }
}

/// Creates a new stream which calls a closure on each element and uses
/// its return as the value.
pub fn map<In, Out, Err, F>(func: F) -> impl FnOnce(Observable<In, Err>) -> Observable<Out, Err>
where
  In: 'static,
  Out: 'static,
  Err: 'static,
  F: FnMut(In) -> Out + Clone + 'static,
{
  operate(MapState::new(func))
}
