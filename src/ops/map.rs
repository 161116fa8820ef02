use std::{
  marker::PhantomData,
  panic::{self, AssertUnwindSafe},
};

use crate::{
  error::RxError,
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
};

pub struct MapOp<S, F, Item> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _hint: PhantomData<fn(Item)>,
}

impl<S: Clone, F: Clone, Item> Clone for MapOp<S, F, Item> {
  fn clone(&self) -> Self {
    MapOp { source: self.source.clone(), func: self.func.clone(), _hint: PhantomData }
  }
}

impl<Item, B, S, F, O> Observable<B, O> for MapOp<S, F, Item>
where
  O: Observer<B>,
  F: FnMut(Item) -> B,
  S: Observable<Item, MapObserver<Subscriber<O>, F>>,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let subscription = subscriber.subscription().clone();
    let observer = MapObserver { observer: subscriber, func: self.func };
    self.source.actual_subscribe(Subscriber::new(observer, subscription));
  }
}

impl<Item, B, S, F> ObservableExt<B> for MapOp<S, F, Item> where F: FnMut(Item) -> B {}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, B, O, F> Observer<Item> for MapObserver<O, F>
where
  O: Observer<B>,
  F: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) {
    let func = &mut self.func;
    match panic::catch_unwind(AssertUnwindSafe(|| func(value))) {
      Ok(v) => self.observer.next(v),
      Err(payload) => self.observer.error(RxError::from_panic(payload)),
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

pub struct TryMapOp<S, F, Item> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _hint: PhantomData<fn(Item)>,
}

impl<S: Clone, F: Clone, Item> Clone for TryMapOp<S, F, Item> {
  fn clone(&self) -> Self {
    TryMapOp { source: self.source.clone(), func: self.func.clone(), _hint: PhantomData }
  }
}

impl<Item, B, E, S, F, O> Observable<B, O> for TryMapOp<S, F, Item>
where
  O: Observer<B>,
  F: FnMut(Item) -> Result<B, E>,
  E: Into<Box<dyn std::error::Error + Send + Sync>>,
  S: Observable<Item, TryMapObserver<Subscriber<O>, F>>,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let subscription = subscriber.subscription().clone();
    let observer = TryMapObserver { observer: subscriber, func: self.func };
    self.source.actual_subscribe(Subscriber::new(observer, subscription));
  }
}

impl<Item, B, E, S, F> ObservableExt<B> for TryMapOp<S, F, Item> where
  F: FnMut(Item) -> Result<B, E>
{
}

pub struct TryMapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, B, E, O, F> Observer<Item> for TryMapObserver<O, F>
where
  O: Observer<B>,
  F: FnMut(Item) -> Result<B, E>,
  E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
  fn next(&mut self, value: Item) {
    let func = &mut self.func;
    match panic::catch_unwind(AssertUnwindSafe(|| func(value))) {
      Ok(Ok(v)) => self.observer.next(v),
      Ok(Err(err)) => self.observer.error(RxError::producer(err)),
      Err(payload) => self.observer.error(RxError::from_panic(payload)),
    }
  }

  #[inline]
  fn error(&mut self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
