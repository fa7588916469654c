use std::{cell::Cell, rc::Rc};

use futures::{
  future::LocalBoxFuture,
  stream::{LocalBoxStream, StreamExt},
  FutureExt,
};

use crate::{
  error::FetchError,
  observable::Observable,
  scheduler::{LocalScheduler, Scheduler, SchedulerRef},
  subscription::Subscription,
};

/// Response body as it arrives.
pub type ByteStream = LocalBoxStream<'static, Result<Vec<u8>, FetchError>>;

/// A fetch-like network client.
///
/// The returned future resolves once the response head is in; the body is
/// read chunk by chunk from the [`ByteStream`]. Implementations should give up
/// as soon as `request.signal` reports an abort.
pub trait Fetch {
  fn fetch(&self, request: FetchRequest) -> LocalBoxFuture<'static, Result<ByteStream, FetchError>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
  pub method: String,
  pub headers: Vec<(String, String)>,
  pub body: Option<Vec<u8>>,
}

impl Default for FetchOptions {
  fn default() -> Self { Self { method: "GET".to_owned(), headers: vec![], body: None } }
}

/// Cancellation flag shared between a subscription and its request.
#[derive(Clone, Debug, Default)]
pub struct AbortSignal(Rc<Cell<bool>>);

impl AbortSignal {
  pub fn is_aborted(&self) -> bool { self.0.get() }

  fn abort(&self) { self.0.set(true) }
}

#[derive(Clone, Debug)]
pub struct FetchRequest {
  pub url: String,
  pub options: FetchOptions,
  pub signal: AbortSignal,
}

/// Incremental UTF-8 decoder.
///
/// A multi-byte sequence split across chunks is held back until the rest of
/// it arrives. Invalid bytes decode to U+FFFD.
#[derive(Clone, Debug, Default)]
pub struct Utf8Decoder {
  pending: Vec<u8>,
}

impl Utf8Decoder {
  pub fn new() -> Self { Self::default() }

  pub fn decode(&mut self, chunk: &[u8]) -> String {
    let mut bytes = std::mem::take(&mut self.pending);
    bytes.extend_from_slice(chunk);

    let mut text = String::with_capacity(bytes.len());
    let mut rest = bytes.as_slice();
    loop {
      match std::str::from_utf8(rest) {
        Ok(valid) => {
          text.push_str(valid);
          break;
        }
        Err(err) => {
          let (valid, tail) = rest.split_at(err.valid_up_to());
          text.push_str(&String::from_utf8_lossy(valid));
          match err.error_len() {
            Some(len) => {
              text.push(char::REPLACEMENT_CHARACTER);
              rest = &tail[len..];
            }
            None => {
              self.pending = tail.to_vec();
              break;
            }
          }
        }
      }
    }
    text
  }

  /// Flush whatever is still held back; an unfinished sequence becomes U+FFFD.
  pub fn finish(&mut self) -> String {
    let rest = std::mem::take(&mut self.pending);
    String::from_utf8_lossy(&rest).into_owned()
  }
}

/// Creates an observable that issues a request on every subscribe and emits
/// the response body as decoded text chunks.
///
/// The end of the body completes the stream; a request or read failure errors
/// it. The teardown aborts the request, and no further body reads are made
/// after it.
pub fn from_fetch<C>(
  client: C, url: impl Into<String>, options: FetchOptions,
) -> Observable<String, FetchError>
where
  C: Fetch + 'static,
{
  from_fetch_on(client, url, options, LocalScheduler)
}

/// Like [`from_fetch`], reading the body on `scheduler`.
pub fn from_fetch_on<C, S>(
  client: C, url: impl Into<String>, options: FetchOptions, scheduler: S,
) -> Observable<String, FetchError>
where
  C: Fetch + 'static,
  S: Scheduler + 'static,
{
  let url = url.into();
  let scheduler: SchedulerRef = Rc::new(scheduler);
  Observable::from_parts(scheduler.clone(), move |subscriber| {
    let signal = AbortSignal::default();
    tracing::debug!(url = %url, method = %options.method, "fetch");
    let response = client.fetch(FetchRequest {
      url: url.clone(),
      options: options.clone(),
      signal: signal.clone(),
    });

    let reader = signal.clone();
    let task = async move {
      let mut body = match response.await {
        Ok(body) => body,
        Err(err) => {
          if !reader.is_aborted() {
            subscriber.error(err);
          }
          return;
        }
      };
      let mut decoder = Utf8Decoder::new();
      loop {
        if reader.is_aborted() || subscriber.is_closed() {
          return;
        }
        match body.next().await {
          Some(Ok(chunk)) => {
            let text = decoder.decode(&chunk);
            if !text.is_empty() {
              subscriber.next(text);
            }
          }
          Some(Err(err)) => {
            subscriber.error(err);
            return;
          }
          None => {
            let text = decoder.finish();
            if !text.is_empty() {
              subscriber.next(text);
            }
            subscriber.complete();
            return;
          }
        }
      }
    };
    let handle = scheduler.spawn(task.boxed_local());

    let url = url.clone();
    move || {
      if !signal.is_aborted() {
        signal.abort();
        handle.unsubscribe();
        tracing::debug!(url = %url, "fetch aborted");
      }
    }
  })
}
