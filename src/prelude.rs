//! Prelude module for convenient imports

pub use crate::{
  error::FetchError,
  observable::{
    from_event, from_fetch, from_fetch_on, from_iter, interval, interval_on, AbortSignal,
    ByteStream, EventEmitter, EventTarget, Fetch, FetchOptions, FetchRequest, Listener,
    ListenerId, Observable, Pipe, Utf8Decoder,
  },
  observer::{FnMutObserver, LogObserver, LogSink, MemorySink, Observer, TracingSink},
  ops::{
    descriptor, done_when, filter, map, operate, reduce, take, FilterState, FnDescriptor,
    Identity, MapState, OperatorState, ReduceState, StateFuture, TakeState,
  },
  pull::{
    as_iterator, just, observable_as_iterator, producer, IntoPull, Just, ObservablePull, Producer,
    PullSequence,
  },
  scheduler::{Duration, LocalScheduler, Scheduler, TaskHandle},
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionGuard, Teardown},
};
