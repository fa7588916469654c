//! The subscription primitive.
//!
//! An [`Observable`] wraps a *subscriber function*. Every call to
//! [`Observable::subscribe`] runs that function once, synchronously, with a
//! fresh [`Subscriber`] and returns whatever [`Teardown`] it produced. Nothing
//! is shared between two subscriptions of the same observable.
//!
//! ```
//! use rxlite::prelude::*;
//!
//! let sink = MemorySink::new();
//! Observable::<i32, &str>::new(|subscriber| {
//!   subscriber.next(1);
//!   subscriber.next(2);
//!   subscriber.complete();
//! })
//! .pipe((map(|v: i32| v * 10), take(1)))
//! .subscribe(LogObserver::new(sink.clone()));
//!
//! assert_eq!(sink.lines(), vec!["{ value: 10 }", "complete"]);
//! ```

use std::rc::Rc;

use crate::{
  observer::Observer,
  ops::{filter, map, operate, reduce, take, OperatorState},
  pull::{observable_as_iterator, ObservablePull},
  scheduler::{LocalScheduler, Scheduler, SchedulerRef},
  subscriber::Subscriber,
  subscription::Teardown,
};

pub mod from_event;
pub mod from_fetch;
pub mod from_iter;
pub mod interval;
pub use from_event::*;
pub use from_fetch::*;
pub use from_iter::*;
pub use interval::*;

type SubscribeFn<Item, Err> = dyn Fn(Subscriber<Item, Err>) -> Teardown;

/// A representation of any set of values over any amount of time.
pub struct Observable<Item, Err> {
  subscribe: Rc<SubscribeFn<Item, Err>>,
  scheduler: SchedulerRef,
}

impl<Item, Err> Clone for Observable<Item, Err> {
  fn clone(&self) -> Self {
    Self {
      subscribe: self.subscribe.clone(),
      scheduler: self.scheduler.clone(),
    }
  }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// param `subscribe`: the function that is called when the Observable is
  /// subscribed to. It is given a [`Subscriber`], to which new values can be
  /// `next`ed, or an `error` method can be called to raise an error, or
  /// `complete` can be called to notify of a successful completion.
  ///
  /// It may return `()` when it acquires nothing, or a closure (or any other
  /// value convertible into a [`Teardown`]) that releases what it acquired.
  ///
  /// Operators built on top of this observable suspend on the default
  /// [`LocalScheduler`].
  pub fn new<F, U>(subscribe: F) -> Self
  where
    F: Fn(Subscriber<Item, Err>) -> U + 'static,
    U: Into<Teardown>,
  {
    Self::new_on(LocalScheduler, subscribe)
  }

  /// Like [`Observable::new`], with an explicit scheduler for the suspended
  /// work of downstream operators.
  pub fn new_on<S, F, U>(scheduler: S, subscribe: F) -> Self
  where
    S: Scheduler + 'static,
    F: Fn(Subscriber<Item, Err>) -> U + 'static,
    U: Into<Teardown>,
  {
    Self::from_parts(Rc::new(scheduler), subscribe)
  }

  pub(crate) fn from_parts<F, U>(scheduler: SchedulerRef, subscribe: F) -> Self
  where
    F: Fn(Subscriber<Item, Err>) -> U + 'static,
    U: Into<Teardown>,
  {
    Self {
      subscribe: Rc::new(move |subscriber| subscribe(subscriber).into()),
      scheduler,
    }
  }

  /// Attach `observer` and run the subscriber function. The returned teardown
  /// releases whatever that function acquired; it is safe to call repeatedly.
  pub fn subscribe(&self, observer: impl Observer<Item, Err> + 'static) -> Teardown {
    (self.subscribe)(Subscriber::new(observer))
  }

  /// Apply transformers left to right. Accepts a single transformer or a
  /// tuple of them.
  ///
  /// ```
  /// use rxlite::prelude::*;
  ///
  /// let evens = from_iter::<_, ()>(0..10).pipe((filter(|v: &i32| v % 2 == 0), take(2)));
  /// let doubled = evens.pipe(map(|v: i32| v * 2));
  /// # let _ = doubled;
  /// ```
  pub fn pipe<P: Pipe<Self>>(self, transformers: P) -> P::Output { transformers.pipe(self) }

  /// The scheduler operator stages of this observable suspend on.
  pub fn scheduler(&self) -> &SchedulerRef { &self.scheduler }

  pub fn operate<S>(self, state: S) -> Observable<S::Output, Err>
  where
    S: OperatorState<Item, Err> + Clone + 'static,
    S::Output: 'static,
  {
    operate(state)(self)
  }

  pub fn take(self, count: usize) -> Self { take(count)(self) }

  pub fn map<Out, F>(self, f: F) -> Observable<Out, Err>
  where
    F: FnMut(Item) -> Out + Clone + 'static,
    Out: 'static,
  {
    map(f)(self)
  }

  pub fn filter<F>(self, predicate: F) -> Self
  where
    F: FnMut(&Item) -> bool + Clone + 'static,
  {
    filter(predicate)(self)
  }

  pub fn reduce<Memo, F>(self, f: F, seed: Memo) -> Observable<Memo, Err>
  where
    F: FnMut(Memo, Item) -> Memo + Clone + 'static,
    Memo: Clone + 'static,
  {
    reduce(f, seed)(self)
  }

  /// Bridge into a pull sequence. See [`observable_as_iterator`].
  pub fn as_iterator(&self) -> ObservablePull<Item, Err> { observable_as_iterator(self) }
}

/// One pipeline stage, or a tuple of stages applied left to right.
pub trait Pipe<In> {
  type Output;
  fn pipe(self, input: In) -> Self::Output;
}

impl<In, Out, F> Pipe<In> for F
where
  F: FnOnce(In) -> Out,
{
  type Output = Out;
  #[inline]
  fn pipe(self, input: In) -> Out { self(input) }
}

impl<In, A> Pipe<In> for (A,)
where
  A: Pipe<In>,
{
  type Output = A::Output;
  #[inline]
  fn pipe(self, input: In) -> Self::Output { self.0.pipe(input) }
}

macro_rules! impl_pipe_for_tuple {
  ($($init:ident),+ ; $last:ident) => {
    impl<In, $($init,)+ $last> Pipe<In> for ($($init,)+ $last,)
    where
      ($($init,)+): Pipe<In>,
      $last: Pipe<<($($init,)+) as Pipe<In>>::Output>,
    {
      type Output = <$last as Pipe<<($($init,)+) as Pipe<In>>::Output>>::Output;

      #[inline]
      #[allow(non_snake_case)]
      fn pipe(self, input: In) -> Self::Output {
        let ($($init,)+ $last,) = self;
        $last.pipe(($($init,)+).pipe(input))
      }
    }
  };
}

impl_pipe_for_tuple!(A; B);
impl_pipe_for_tuple!(A, B; C);
impl_pipe_for_tuple!(A, B, C; D);
impl_pipe_for_tuple!(A, B, C, D; E);
impl_pipe_for_tuple!(A, B, C, D, E; F);
