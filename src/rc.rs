//! Shared mutable cells used by subscriptions, subscribers and the pull
//! bridge.
//!
//! Everything in this crate runs on one thread, so the only flavour is the
//! `Rc<RefCell<_>>` backed [`MutRc`].

use std::{
  cell::{Ref, RefCell, RefMut},
  rc::Rc,
};

pub trait RcDeref {
  type Target<'a>
  where
    Self: 'a;
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref<'a>(&'a self) -> Self::Target<'a>;
}

pub trait RcDerefMut {
  type Target<'a>
  where
    Self: 'a;
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref_mut<'a>(&'a self) -> Self::Target<'a>;
}

#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }
}

impl<T> RcDeref for MutRc<T> {
  type Target<'a>
    = Ref<'a, T>
  where
    Self: 'a;

  #[inline]
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref<'a>(&'a self) -> Self::Target<'a> { self.0.borrow() }
}

impl<T> RcDerefMut for MutRc<T> {
  type Target<'a>
    = RefMut<'a, T>
  where
    Self: 'a;

  #[inline]
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref_mut<'a>(&'a self) -> Self::Target<'a> { self.0.borrow_mut() }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> From<T> for MutRc<T> {
  #[inline]
  fn from(t: T) -> Self { Self::own(t) }
}
