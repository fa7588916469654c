//! Building operators from a state descriptor.
//!
//! A descriptor answers two questions for every value a stage receives:
//! whether the stage is already `done`, and what to `update` the value into
//! (possibly nothing, which drops it). Both answers are futures, so a
//! descriptor may suspend. [`operate`] turns a descriptor into an observable
//! transformer that handles auto-completion, error forwarding and teardown
//! chaining.

use std::{
  cell::{Cell, RefCell},
  future::Future,
  marker::PhantomData,
  rc::Rc,
  task::{Context, Poll},
};

use futures::{
  future::{ready, FutureExt, LocalBoxFuture},
  task::noop_waker_ref,
};

use crate::{
  observable::Observable,
  observer::Observer,
  scheduler::SchedulerRef,
  subscriber::Subscriber,
  subscription::{Subscription, Teardown},
};

/// The future type descriptors answer with.
pub type StateFuture<T, Err> = LocalBoxFuture<'static, Result<T, Err>>;

/// Completion predicate plus update function of an operator stage.
///
/// The returned futures must not borrow the descriptor; share whatever they
/// need through `Rc` or compute the answer eagerly. `done` defaults to never
/// done.
///
/// A bare `FnMut(In) -> impl Future<Output = Result<Option<Out>, Err>>` is a
/// descriptor too: it is the update function, and it is never done.
pub trait OperatorState<In, Err: 'static> {
  type Output;

  fn done(&mut self) -> StateFuture<bool, Err> { ready(Ok(false)).boxed_local() }

  /// `Ok(None)` drops the value.
  fn update(&mut self, value: In) -> StateFuture<Option<Self::Output>, Err>;
}

impl<In, Out, Err, F, Fut> OperatorState<In, Err> for F
where
  F: FnMut(In) -> Fut,
  Fut: Future<Output = Result<Option<Out>, Err>> + 'static,
  Err: 'static,
{
  type Output = Out;

  fn update(&mut self, value: In) -> StateFuture<Option<Out>, Err> { self(value).boxed_local() }
}

/// The default update: passes every value through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl<In: 'static, Err: 'static> OperatorState<In, Err> for Identity {
  type Output = In;

  fn update(&mut self, value: In) -> StateFuture<Option<In>, Err> {
    ready(Ok(Some(value))).boxed_local()
  }
}

/// A descriptor assembled from a `done` closure and an update.
#[derive(Clone)]
pub struct FnDescriptor<D, U> {
  done: D,
  update: U,
}

/// Build a descriptor from a completion predicate and an update function
/// (or any other descriptor whose `update` should be used).
pub fn descriptor<D, U>(done: D, update: U) -> FnDescriptor<D, U> { FnDescriptor { done, update } }

/// A descriptor that passes values through until `done` resolves to `true`.
pub fn done_when<D>(done: D) -> FnDescriptor<D, Identity> { descriptor(done, Identity) }

impl<In, Err, D, DFut, U> OperatorState<In, Err> for FnDescriptor<D, U>
where
  D: FnMut() -> DFut,
  DFut: Future<Output = Result<bool, Err>> + 'static,
  U: OperatorState<In, Err>,
  Err: 'static,
{
  type Output = U::Output;

  fn done(&mut self) -> StateFuture<bool, Err> { (self.done)().boxed_local() }

  fn update(&mut self, value: In) -> StateFuture<Option<U::Output>, Err> {
    self.update.update(value)
  }
}

/// Turn a descriptor into an observable transformer.
///
/// Every subscription gets its own clone of `state`. On subscribe, `done` is
/// asked first; a done stage completes without subscribing upstream. Each
/// upstream value then runs through `done`, `update` and `done` again. The
/// first failure of either unsubscribes upstream and errors downstream.
/// Upstream `error` and `complete` are forwarded once every value already
/// accepted has settled.
///
/// Descriptor futures are polled inline first. Only a future that suspends is
/// moved onto the source's scheduler, where it keeps running until it
/// settles. Its result is discarded if the stage was closed meanwhile.
pub fn operate<In, Err, S>(state: S) -> impl FnOnce(Observable<In, Err>) -> Observable<S::Output, Err>
where
  In: 'static,
  Err: 'static,
  S: OperatorState<In, Err> + Clone + 'static,
  S::Output: 'static,
{
  move |source| {
    let scheduler = source.scheduler().clone();
    Observable::from_parts(scheduler.clone(), move |downstream| {
      let stage = Rc::new(Stage {
        state: RefCell::new(state.clone()),
        downstream,
        upstream: RefCell::new(None),
        closed: Cell::new(false),
        in_flight: Cell::new(0),
        pending: RefCell::new(None),
        scheduler: scheduler.clone(),
        _in: PhantomData,
      });
      stage.start(source.clone());
      move || stage.teardown()
    })
  }
}

enum Terminal<Err> {
  Error(Err),
  Complete,
}

struct Stage<In, Err: 'static, S: OperatorState<In, Err>> {
  state: RefCell<S>,
  downstream: Subscriber<S::Output, Err>,
  upstream: RefCell<Option<Teardown>>,
  closed: Cell<bool>,
  in_flight: Cell<usize>,
  pending: RefCell<Option<Terminal<Err>>>,
  scheduler: SchedulerRef,
  _in: PhantomData<fn(In)>,
}

impl<In, Err, S> Stage<In, Err, S>
where
  In: 'static,
  Err: 'static,
  S: OperatorState<In, Err> + 'static,
  S::Output: 'static,
{
  fn start(self: &Rc<Self>, source: Observable<In, Err>) {
    let done = self.state.borrow_mut().done();
    let stage = self.clone();
    self.drive(async move {
      match done.await {
        Ok(true) => stage.close_with(Terminal::Complete),
        Err(err) => stage.close_with(Terminal::Error(err)),
        Ok(false) => {
          if stage.closed.get() {
            return;
          }
          let upstream = source.subscribe(StageObserver(stage.clone()));
          stage.attach_upstream(upstream);
        }
      }
    });
  }

  fn attach_upstream(&self, upstream: Teardown) {
    if self.closed.get() {
      upstream.unsubscribe();
    } else {
      tracing::trace!("operator stage subscribed upstream");
      *self.upstream.borrow_mut() = Some(upstream);
    }
  }

  fn process(self: &Rc<Self>, value: In) {
    if self.closed.get() {
      return;
    }
    self.in_flight.set(self.in_flight.get() + 1);
    let stage = self.clone();
    self.drive(async move {
      stage.step(value).await;
      stage.settle();
    });
  }

  async fn step(&self, value: In) {
    let done = self.state.borrow_mut().done();
    match done.await {
      Ok(false) => {}
      Ok(true) => return self.close_with(Terminal::Complete),
      Err(err) => return self.close_with(Terminal::Error(err)),
    }
    if self.closed.get() {
      return;
    }

    let update = self.state.borrow_mut().update(value);
    match update.await {
      Ok(Some(value)) => {
        if !self.closed.get() {
          self.downstream.next(value);
        }
      }
      Ok(None) => {}
      Err(err) => return self.close_with(Terminal::Error(err)),
    }
    if self.closed.get() {
      return;
    }

    let done = self.state.borrow_mut().done();
    match done.await {
      Ok(false) => {}
      Ok(true) => self.close_with(Terminal::Complete),
      Err(err) => self.close_with(Terminal::Error(err)),
    }
  }

  fn settle(&self) {
    let left = self.in_flight.get() - 1;
    self.in_flight.set(left);
    if left == 0 {
      let pending = self.pending.borrow_mut().take();
      if let Some(terminal) = pending {
        self.close_with(terminal);
      }
    }
  }

  fn on_terminal(&self, terminal: Terminal<Err>) {
    if self.closed.get() {
      return;
    }
    if self.in_flight.get() == 0 {
      self.close_with(terminal);
    } else {
      tracing::debug!(in_flight = self.in_flight.get(), "terminal signal deferred");
      *self.pending.borrow_mut() = Some(terminal);
    }
  }

  fn close_with(&self, terminal: Terminal<Err>) {
    if self.closed.replace(true) {
      return;
    }
    let upstream = self.upstream.borrow_mut().take();
    if let Some(upstream) = upstream {
      upstream.unsubscribe();
    }
    match terminal {
      Terminal::Error(err) => self.downstream.error(err),
      Terminal::Complete => self.downstream.complete(),
    }
  }

  fn teardown(&self) {
    self.closed.set(true);
    self.pending.borrow_mut().take();
    let upstream = self.upstream.borrow_mut().take();
    if let Some(upstream) = upstream {
      tracing::trace!("operator stage released upstream");
      upstream.unsubscribe();
    }
  }

  /// Poll `task` once in place; hand it to the scheduler if it suspends.
  fn drive(&self, task: impl Future<Output = ()> + 'static) {
    let mut task = task.boxed_local();
    let mut cx = Context::from_waker(noop_waker_ref());
    if let Poll::Pending = task.as_mut().poll(&mut cx) {
      drop(self.scheduler.spawn(task));
    }
  }
}

struct StageObserver<In, Err: 'static, S: OperatorState<In, Err>>(Rc<Stage<In, Err, S>>);

impl<In, Err, S> Observer<In, Err> for StageObserver<In, Err, S>
where
  In: 'static,
  Err: 'static,
  S: OperatorState<In, Err> + 'static,
  S::Output: 'static,
{
  fn next(&mut self, value: In) { self.0.process(value) }

  fn error(self, err: Err) { self.0.on_terminal(Terminal::Error(err)) }

  fn complete(self) { self.0.on_terminal(Terminal::Complete) }

  fn is_closed(&self) -> bool { self.0.closed.get() }
}
