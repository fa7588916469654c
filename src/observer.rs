//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use std::convert::Infallible;

mod log_observer;
pub use log_observer::*;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable.
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable
  ///
  /// This consumes the observer, as no more values can be emitted after an
  /// error
  fn error(self, err: Err);

  /// Handle completion of the observable
  ///
  /// This consumes the observer, as no more values can be emitted after
  /// completion
  fn complete(self);

  /// Checks if the observer is closed.
  ///
  /// Sources (like `from_iter` or `interval`) use this to stop emitting early,
  /// e.g. once a downstream `take` has reached its quota.
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Helper trait to enable object-safe Observers (Box<dyn Observer>)
///
/// Standard Observer trait is not object-safe because terminal methods take
/// `self` by value. DynObserver mirrors the interface but adapts it for
/// vtables.
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { self.error(err); }
  fn box_complete(self: Box<Self>) { self.complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// Boxed value observer (single-threaded, no Send bound)
pub type BoxedObserver<Item, Err> = Box<dyn DynObserver<Item, Err>>;

// ============================================================================
// FnMutObserver - Closure adapter
// ============================================================================

/// Closure adapter for infallible streams.
///
/// The closure becomes the `next` handler; completion is ignored. Only
/// implemented for `Infallible` errors so that an error can never be dropped
/// on the floor.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item> Observer<Item, Infallible> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, v: Item) { (self.0)(v); }

  #[inline]
  fn error(self, err: Infallible) { match err {} }

  #[inline]
  fn complete(self) {}
}

#[cfg(test)]
mod tests {
  use super::*;

  struct TestObserver {
    values: Vec<i32>,
  }

  impl Observer<i32, ()> for TestObserver {
    fn next(&mut self, value: i32) { self.values.push(value); }

    fn error(self, _: ()) {}

    fn complete(self) {}
  }

  #[test]
  fn observer_trait() {
    let mut obs = TestObserver { values: vec![] };
    obs.next(1);
    obs.next(2);
    assert_eq!(obs.values, vec![1, 2]);
    assert!(!obs.is_closed());
  }

  #[test]
  fn boxed_observer_dispatch() {
    let mut boxed: BoxedObserver<i32, ()> = Box::new(TestObserver { values: vec![] });
    boxed.box_next(7);
    assert!(!boxed.box_is_closed());
    boxed.box_complete();
  }

  #[test]
  fn closure_as_observer() {
    let mut count = 0;
    let mut closure_obs = FnMutObserver(|v: i32| {
      count += v;
    });

    closure_obs.next(10);
    closure_obs.next(20);
    assert_eq!(count, 30);
  }
}
