//! Operators: observable transformers built on the [`operate`] protocol.
//!
//! Every function here returns an `FnOnce(Observable) -> Observable`, ready
//! to be handed to [`Observable::pipe`](crate::observable::Observable::pipe)
//! alone or inside a tuple.

pub mod filter;
pub mod map;
pub mod operate;
pub mod reduce;
pub mod take;

pub use filter::{filter, FilterState};
pub use map::{map, MapState};
pub use operate::{descriptor, done_when, operate, FnDescriptor, Identity, OperatorState, StateFuture};
pub use reduce::{reduce, ReduceState};
pub use take::{take, TakeState};
