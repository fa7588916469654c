use std::fmt::{Debug, Formatter};

use crate::{
  rc::{MutRc, RcDeref, RcDerefMut},
  scheduler::TaskHandle,
};

/// Handle returned from `Observable::subscribe` to allow unsubscribing.
pub trait Subscription {
  /// Release whatever the subscription acquired. Calling it again after the
  /// first time does nothing.
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;
}

/// The cancellation callback of one subscription.
///
/// A subscriber function that acquires nothing returns `()`, which becomes an
/// inert teardown. Clones share the same callback, so whichever clone runs
/// first releases the resources and every later call is a no-op.
#[derive(Clone, Default)]
pub struct Teardown(MutRc<Option<Box<dyn FnOnce()>>>);

impl Teardown {
  pub fn new(f: impl FnOnce() + 'static) -> Self { Self(MutRc::own(Some(Box::new(f)))) }

  /// A teardown that releases nothing.
  pub fn inert() -> Self { Self::default() }

  /// Wrap any other subscription handle.
  pub fn from_subscription(subscription: impl Subscription + 'static) -> Self {
    Self::new(move || subscription.unsubscribe())
  }

  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self> { SubscriptionGuard(self) }
}

impl Subscription for Teardown {
  fn unsubscribe(&self) {
    // Take the callback out first so it may re-enter this teardown.
    let callback = self.0.rc_deref_mut().take();
    if let Some(callback) = callback {
      callback();
    }
  }

  fn is_closed(&self) -> bool { self.0.rc_deref().is_none() }
}

impl Debug for Teardown {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Teardown")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

impl From<()> for Teardown {
  fn from(_: ()) -> Self { Self::inert() }
}

impl<F> From<F> for Teardown
where
  F: FnOnce() + 'static,
{
  fn from(f: F) -> Self { Self::new(f) }
}

impl From<TaskHandle> for Teardown {
  fn from(handle: TaskHandle) -> Self { Self::from_subscription(handle) }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(T);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
