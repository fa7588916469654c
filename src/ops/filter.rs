use futures::future::{ready, FutureExt};

use super::operate::{operate, OperatorState, StateFuture};
use crate::observable::Observable;

/// Descriptor behind [`filter`].
#[derive(Clone)]
pub struct FilterState<F> {
  predicate: F,
}

impl<F> FilterState<F> {
  pub fn new(predicate: F) -> Self { Self { predicate } }
}

impl<Item, Err, F> OperatorState<Item, Err> for FilterState<F>
where
  F: FnMut(&Item) -> bool,
  Item: 'static,
  Err: 'static,
{
  type Output = Item;

  fn update(&mut self, value: Item) -> StateFuture<Option<Item>, Err> {
    let keep = (self.predicate)(&value);
    ready(Ok(keep.then_some(value))).boxed_local()
  }
}

/// Emit only those items from an Observable that pass a predicate.
pub fn filter<Item, Err, F>(predicate: F) -> impl FnOnce(Observable<Item, Err>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
  F: FnMut(&Item) -> bool + Clone + 'static,
{
  operate(FilterState::new(predicate))
}
