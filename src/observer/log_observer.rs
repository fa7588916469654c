use std::fmt::Debug;

use crate::{
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
};

/// Destination for the lines written by a [`LogObserver`].
pub trait LogSink {
  fn write(&self, line: String);
}

/// Forwards every line to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
  fn write(&self, line: String) { tracing::info!(target: "rxlite::log", "{line}"); }
}

/// Keeps every line in memory; clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink(MutRc<Vec<String>>);

impl MemorySink {
  pub fn new() -> Self { Self::default() }

  pub fn lines(&self) -> Vec<String> { self.0.rc_deref().clone() }
}

impl LogSink for MemorySink {
  fn write(&self, line: String) { self.0.rc_deref_mut().push(line); }
}

/// Diagnostic observer that describes every notification it receives.
///
/// Values are written as `{ value: .. }`, errors as `{ error: .. }` and
/// completion as `complete`, using the `Debug` representation.
///
/// ```
/// use rxlite::prelude::*;
///
/// let sink = MemorySink::new();
/// from_iter::<_, &str>(vec![1, 2]).subscribe(LogObserver::new(sink.clone()));
/// assert_eq!(sink.lines(), vec!["{ value: 1 }", "{ value: 2 }", "complete"]);
/// ```
#[derive(Clone, Default)]
pub struct LogObserver<S = TracingSink> {
  sink: S,
}

impl<S: LogSink> LogObserver<S> {
  pub fn new(sink: S) -> Self { Self { sink } }
}

impl<Item, Err, S> Observer<Item, Err> for LogObserver<S>
where
  Item: Debug,
  Err: Debug,
  S: LogSink,
{
  fn next(&mut self, value: Item) { self.sink.write(format!("{{ value: {value:?} }}")); }

  fn error(self, err: Err) { self.sink.write(format!("{{ error: {err:?} }}")); }

  fn complete(self) { self.sink.write("complete".to_owned()); }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn describes_each_notification() {
    let sink = MemorySink::new();
    let mut observer = LogObserver::new(sink.clone());
    Observer::<_, &str>::next(&mut observer, 2);
    Observer::<i32, _>::error(observer, "boom");

    let observer = LogObserver::new(sink.clone());
    Observer::<i32, &str>::complete(observer);

    assert_eq!(sink.lines(), vec!["{ value: 2 }", "{ error: \"boom\" }", "complete"]);
  }

  #[test]
  fn default_sink_is_tracing() {
    let mut observer: LogObserver = LogObserver::default();
    Observer::<_, ()>::next(&mut observer, "quiet without a subscriber");
    Observer::<&str, ()>::complete(observer);
  }
}
