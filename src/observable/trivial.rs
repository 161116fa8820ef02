use std::marker::PhantomData;

use crate::{
  error::RxError,
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
};

/// Creates an observable that emits no items, just terminates with an error.
pub fn throw_err<Item>(err: RxError) -> ThrowErr<Item> { ThrowErr { err, _hint: PhantomData } }

#[derive(Clone)]
pub struct ThrowErr<Item> {
  err: RxError,
  _hint: PhantomData<fn() -> Item>,
}

impl<Item, O> Observable<Item, O> for ThrowErr<Item>
where
  O: Observer<Item>,
{
  fn actual_subscribe(self, mut subscriber: Subscriber<O>) { subscriber.error(self.err); }
}

impl<Item> ObservableExt<Item> for ThrowErr<Item> {}

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
pub fn empty<Item>() -> Empty<Item> { Empty(PhantomData) }

pub struct Empty<Item>(PhantomData<fn() -> Item>);

impl<Item> Clone for Empty<Item> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

impl<Item, O> Observable<Item, O> for Empty<Item>
where
  O: Observer<Item>,
{
  fn actual_subscribe(self, mut subscriber: Subscriber<O>) { subscriber.complete(); }
}

impl<Item> ObservableExt<Item> for Empty<Item> {}
