use std::{convert::Infallible, rc::Rc};

use smallvec::SmallVec;

use crate::{
  observable::Observable,
  rc::{MutRc, RcDeref, RcDerefMut},
};

/// Callback registered on an [`EventTarget`].
pub type Listener<Event> = Rc<dyn Fn(&Event)>;

/// Identifies one registration so it can be removed again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Anything listeners can be attached to by event name.
pub trait EventTarget<Event> {
  fn add_event_listener(&self, name: &str, listener: Listener<Event>) -> ListenerId;

  /// Removing an unknown id is a no-op.
  fn remove_event_listener(&self, name: &str, id: ListenerId);
}

struct Registration<Event> {
  id: ListenerId,
  name: String,
  listener: Listener<Event>,
}

struct Listeners<Event> {
  next_id: usize,
  items: SmallVec<[Registration<Event>; 2]>,
}

/// A minimal in-process [`EventTarget`].
///
/// Clones share the same listener table.
pub struct EventEmitter<Event>(MutRc<Listeners<Event>>);

impl<Event> Clone for EventEmitter<Event> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Event> Default for EventEmitter<Event> {
  fn default() -> Self { Self(MutRc::own(Listeners { next_id: 0, items: SmallVec::new() })) }
}

impl<Event> EventEmitter<Event> {
  pub fn new() -> Self { Self::default() }

  /// Call every listener registered for `name`, in registration order.
  ///
  /// Listeners may add or remove registrations while being called; the set
  /// of listeners invoked is fixed when `dispatch` starts.
  pub fn dispatch(&self, name: &str, event: &Event) {
    let listeners: SmallVec<[Listener<Event>; 2]> = self
      .0
      .rc_deref()
      .items
      .iter()
      .filter(|r| r.name == name)
      .map(|r| r.listener.clone())
      .collect();
    for listener in listeners {
      listener(event);
    }
  }

  pub fn listener_count(&self, name: &str) -> usize {
    self
      .0
      .rc_deref()
      .items
      .iter()
      .filter(|r| r.name == name)
      .count()
  }
}

impl<Event> EventTarget<Event> for EventEmitter<Event> {
  fn add_event_listener(&self, name: &str, listener: Listener<Event>) -> ListenerId {
    let mut inner = self.0.rc_deref_mut();
    let id = ListenerId(inner.next_id);
    inner.next_id += 1;
    inner
      .items
      .push(Registration { id, name: name.to_owned(), listener });
    id
  }

  fn remove_event_listener(&self, name: &str, id: ListenerId) {
    self
      .0
      .rc_deref_mut()
      .items
      .retain(|r| !(r.id == id && r.name == name));
  }
}

/// Creates an observable that emits every `name` event dispatched on
/// `target`.
///
/// Subscribing registers a listener; the teardown removes it. Never completes
/// or errors.
///
/// ```
/// use rxlite::prelude::*;
///
/// let button = EventEmitter::<u32>::new();
/// let clicks = from_event(button.clone(), "click");
/// let teardown = clicks.subscribe(FnMutObserver(|x: u32| println!("clicked at {x}")));
///
/// button.dispatch("click", &7);
/// teardown.unsubscribe();
/// assert_eq!(button.listener_count("click"), 0);
/// ```
pub fn from_event<T, Event>(target: T, name: impl Into<String>) -> Observable<Event, Infallible>
where
  T: EventTarget<Event> + Clone + 'static,
  Event: Clone + 'static,
{
  let name = name.into();
  Observable::new(move |subscriber| {
    let listener: Listener<Event> = Rc::new(move |event: &Event| subscriber.next(event.clone()));
    let id = target.add_event_listener(&name, listener);
    tracing::trace!(event = %name, ?id, "listener added");

    let target = target.clone();
    let name = name.clone();
    move || {
      target.remove_event_listener(&name, id);
      tracing::trace!(event = %name, ?id, "listener removed");
    }
  })
}
