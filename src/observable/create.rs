use std::{
  marker::PhantomData,
  panic::{self, AssertUnwindSafe},
};

use crate::{
  error::RxError,
  observable::{Observable, ObservableExt},
  observer::{Emitter, Observer},
  subscriber::Subscriber,
};

/// Creates an observable from a producer function.
///
/// The producer receives an [`Emitter`], emits zero or more values and then
/// exactly one terminal event. Returning `Err(e)` before a terminal event
/// delivers `e` as the error; a panic is caught and delivered as
/// [`RxError::Panicked`]. Anything after the terminal event is dropped.
///
/// ```
/// use rxstream::prelude::*;
///
/// observable::create(|s| {
///   s.next("hello1");
///   s.next("hello2");
///   s.complete();
///   Ok(())
/// })
/// .subscribe(|v| println!("{v}"));
/// ```
pub fn create<F, Item>(producer: F) -> Create<F, Item>
where
  F: FnOnce(&mut dyn Emitter<Item>) -> Result<(), RxError>,
{
  Create { producer, _hint: PhantomData }
}

/// Observable created from a function.
///
/// This struct is created by [`create`]. It is `Clone` when the producer is,
/// and every subscription runs its own copy of the producer.
#[derive(Clone)]
pub struct Create<F, Item> {
  producer: F,
  _hint: PhantomData<fn() -> Item>,
}

struct CreateEmitter<O>(Subscriber<O>);

impl<Item, O> Emitter<Item> for CreateEmitter<O>
where
  O: Observer<Item>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.0.next(value) }

  #[inline]
  fn error(&mut self, err: RxError) { self.0.error(err) }

  #[inline]
  fn complete(&mut self) { self.0.complete() }

  #[inline]
  fn is_cancelled(&self) -> bool { Observer::<Item>::is_finished(&self.0) }
}

impl<F, Item, O> Observable<Item, O> for Create<F, Item>
where
  O: Observer<Item>,
  F: FnOnce(&mut dyn Emitter<Item>) -> Result<(), RxError>,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    if subscriber.is_cancelled() {
      return;
    }
    let mut emitter = CreateEmitter(subscriber);
    let producer = self.producer;
    let result = panic::catch_unwind(AssertUnwindSafe(|| producer(&mut emitter)));
    let err = match result {
      Ok(Ok(())) => return,
      Ok(Err(err)) => err,
      Err(payload) => RxError::from_panic(payload),
    };
    // Dropped by the subscriber when the producer already terminated.
    Observer::<Item>::error(&mut emitter.0, err);
  }
}

impl<F, Item> ObservableExt<Item> for Create<F, Item> where
  F: FnOnce(&mut dyn Emitter<Item>) -> Result<(), RxError>
{
}
