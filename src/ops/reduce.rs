use futures::future::{ready, FutureExt};

use super::operate::{operate, OperatorState, StateFuture};
use crate::observable::Observable;

/// Descriptor behind [`reduce`]; owns the running accumulation.
#[derive(Clone)]
pub struct ReduceState<F, Memo> {
  func: F,
  memo: Memo,
}

impl<F, Memo> ReduceState<F, Memo> {
  pub fn new(func: F, seed: Memo) -> Self { Self { func, memo: seed } }
}

impl<Item, Memo, Err, F> OperatorState<Item, Err> for ReduceState<F, Memo>
where
  F: FnMut(Memo, Item) -> Memo,
  Memo: Clone + 'static,
  Err: 'static,
{
  type Output = Memo;

  fn update(&mut self, value: Item) -> StateFuture<Option<Memo>, Err> {
    self.memo = (self.func)(self.memo.clone(), value);
    ready(Ok(Some(self.memo.clone()))).boxed_local()
  }
}

/// Apply a function to each item emitted by an observable, sequentially,
/// and emit every intermediate accumulation, starting from `seed`.
///
/// Unlike a "final value only" reduction, each source item produces one
/// output: the accumulation so far.
pub fn reduce<Item, Memo, Err, F>(
  func: F, seed: Memo,
) -> impl FnOnce(Observable<Item, Err>) -> Observable<Memo, Err>
where
  Item: 'static,
  Memo: Clone + 'static,
  Err: 'static,
  F: FnMut(Memo, Item) -> Memo + Clone + 'static,
{
  operate(ReduceState::new(func, seed))
}
