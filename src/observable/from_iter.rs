use crate::observable::Observable;

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error, but
/// the error type is left open so the source can feed fallible pipelines.
/// Stops early once the observer is closed.
///
/// ```
/// use std::convert::Infallible;
///
/// use rxlite::prelude::*;
///
/// from_iter::<_, Infallible>(vec![1, 2, 3]).subscribe(FnMutObserver(|v: i32| println!("{v}")));
/// ```
pub fn from_iter<I, Err>(iter: I) -> Observable<I::Item, Err>
where
  I: IntoIterator + Clone + 'static,
  I::Item: 'static,
  Err: 'static,
{
  Observable::new(move |subscriber| {
    let mut values = iter.clone().into_iter();
    while !subscriber.is_closed() {
      match values.next() {
        Some(v) => subscriber.next(v),
        None => return subscriber.complete(),
      }
    }
  })
}
