use std::collections::VecDeque;

use crate::{
  observer::{BoxedObserver, Observer},
  rc::{MutRc, RcDeref, RcDerefMut},
};

/// The emitting side of one subscription, handed to a subscriber function.
///
/// Clones share the same observer, so a subscriber function can move copies
/// into timers or event listeners. The first `error` or `complete` releases
/// the observer; anything emitted afterwards is dropped.
///
/// No borrow is held while the observer runs. A value emitted from inside
/// the observer's own `next` is queued and delivered once the current call
/// returns, and a terminal raised there is delivered after the queue drains.
pub struct Subscriber<Item, Err> {
  slot: MutRc<Slot<Item, Err>>,
}

enum Terminal<Err> {
  Error(Err),
  Complete,
}

impl<Err> Terminal<Err> {
  fn deliver<Item>(self, observer: BoxedObserver<Item, Err>) {
    match self {
      Terminal::Error(err) => observer.box_error(err),
      Terminal::Complete => observer.box_complete(),
    }
  }
}

struct Slot<Item, Err> {
  /// `None` while the observer is out delivering a value, or once stopped.
  observer: Option<BoxedObserver<Item, Err>>,
  emitting: bool,
  backlog: VecDeque<Item>,
  stopped: bool,
  terminal: Option<Terminal<Err>>,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self { Self { slot: self.slot.clone() } }
}

impl<Item, Err> Subscriber<Item, Err> {
  pub fn new(observer: impl Observer<Item, Err> + 'static) -> Self {
    Self {
      slot: MutRc::own(Slot {
        observer: Some(Box::new(observer)),
        emitting: false,
        backlog: VecDeque::new(),
        stopped: false,
        terminal: None,
      }),
    }
  }

  pub fn next(&self, value: Item) {
    let mut observer = {
      let mut slot = self.slot.rc_deref_mut();
      if slot.stopped {
        return;
      }
      if slot.emitting {
        slot.backlog.push_back(value);
        return;
      }
      match slot.observer.take() {
        Some(observer) => {
          slot.emitting = true;
          observer
        }
        None => return,
      }
    };

    let mut value = value;
    loop {
      observer.box_next(value);
      let queued = {
        let mut slot = self.slot.rc_deref_mut();
        let queued = slot.backlog.pop_front();
        if queued.is_none() {
          slot.emitting = false;
        }
        queued
      };
      match queued {
        Some(queued) => value = queued,
        None => break,
      }
    }

    let terminal = self.slot.rc_deref_mut().terminal.take();
    match terminal {
      Some(terminal) => terminal.deliver(observer),
      None => self.slot.rc_deref_mut().observer = Some(observer),
    }
  }

  pub fn error(&self, err: Err) { self.stop(Terminal::Error(err)) }

  pub fn complete(&self) { self.stop(Terminal::Complete) }

  fn stop(&self, terminal: Terminal<Err>) {
    let observer = {
      let mut slot = self.slot.rc_deref_mut();
      if slot.stopped {
        return;
      }
      slot.stopped = true;
      if slot.emitting {
        slot.terminal = Some(terminal);
        return;
      }
      slot.backlog.clear();
      slot.observer.take()
    };
    if let Some(observer) = observer {
      terminal.deliver(observer);
    }
  }

  /// `true` once a terminal notification was raised, or when the observer
  /// itself reports that it no longer accepts values. While the observer is
  /// busy with a value only the first condition is known.
  pub fn is_closed(&self) -> bool {
    let slot = self.slot.rc_deref();
    slot.stopped
      || slot
        .observer
        .as_ref()
        .map_or(!slot.emitting, |o| o.box_is_closed())
  }
}
