//! # rxlite: push-based observables for single-threaded Rust
//!
//! An [`Observable`] wraps a subscriber function. Stateful transformation
//! stages are built from descriptors through [`operate`], and any observable
//! can be consumed as a pull-based `Stream` through [`as_iterator`].
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! let sink = MemorySink::new();
//! from_iter::<_, &str>(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .take(2)
//!   .subscribe(LogObserver::new(sink.clone()));
//!
//! assert_eq!(sink.lines(), vec!["{ value: 0 }", "{ value: 4 }", "complete"]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | Subscriber function plus the scheduler its stages suspend on |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`OperatorState`] | `done` / `update` descriptor driven by [`operate`] |
//! | [`Teardown`] | Idempotent handle that cancels a subscription |
//! | [`Scheduler`] | Spawns suspended work and timers |
//!
//! Everything runs on one thread. Time-based sources use [`LocalScheduler`]
//! by default, which needs a `tokio::task::LocalSet`.
//!
//! ## Feature Flags
//!
//! - **`timer`** (default): `futures::executor::LocalSpawner` as a
//!   [`Scheduler`], sleeping through `futures-time`.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`OperatorState`]: ops::OperatorState
//! [`operate`]: ops::operate
//! [`as_iterator`]: pull::as_iterator
//! [`Teardown`]: subscription::Teardown
//! [`Scheduler`]: scheduler::Scheduler
//! [`LocalScheduler`]: scheduler::LocalScheduler

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod pull;
pub mod rc;
pub mod scheduler;
pub mod subscriber;
pub mod subscription;

#[cfg(test)]
mod test_util;

pub use prelude::*;
