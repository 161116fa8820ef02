//! The core `Observable` traits and the static factories.
//!
//! An observable is a plain value describing a producer and the operators
//! applied to it. Nothing runs until it is subscribed. Subscribing consumes
//! the value, so an observable is re-run by subscribing a clone of it; every
//! run executes the producer again from the start (cold semantics).

use std::marker::PhantomData;

mod create;
mod from_iter;
mod of;
mod trivial;

pub use create::*;
pub use from_iter::*;
pub use of::*;
pub use trivial::*;

use crate::{
  error::RxError,
  observer::{noop_complete, unhandled_error, Observer, ObserverAll},
  ops::{
    complete_status::{CompleteStatus, StatusOp},
    flat_map::FlatMapOp,
    map::{MapOp, TryMapOp},
    observe_on::ObserveOnOp,
    subscribe_on::SubscribeOnOp,
  },
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::Subscription,
};

/// A source of `Item` values that can be subscribed by the observer `O`.
///
/// `actual_subscribe` is the extension point used by operators: it receives
/// the downstream already wrapped in a [`Subscriber`] and starts production.
pub trait Observable<Item, O: Observer<Item>> {
  fn actual_subscribe(self, subscriber: Subscriber<O>);
}

type NextOnly<N> = ObserverAll<N, fn(RxError), fn()>;
type NextErr<N, E> = ObserverAll<N, E, fn()>;

/// Operators and subscription methods available on every observable.
pub trait ObservableExt<Item>: Sized {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  ///
  /// A panic inside `f` terminates the stream with
  /// [`RxError::Panicked`]; nothing from upstream is forwarded afterwards.
  #[inline]
  fn map<B, F>(self, f: F) -> MapOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    MapOp { source: self, func: f, _hint: PhantomData }
  }

  /// Like `map`, but `f` may fail. `Err(e)` terminates the stream with
  /// `RxError::producer(e)`.
  #[inline]
  fn try_map<B, E, F>(self, f: F) -> TryMapOp<Self, F, Item>
  where
    F: FnMut(Item) -> Result<B, E>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
  {
    TryMapOp { source: self, func: f, _hint: PhantomData }
  }

  /// Maps every value to an inner observable and merges their emissions.
  ///
  /// Inner observables are subscribed as soon as their source value arrives.
  /// The result completes once the source and every inner observable
  /// completed; the first error from any of them terminates it immediately.
  /// Values of different inner observables may interleave in any order.
  #[inline]
  fn flat_map<Sub, F>(self, f: F) -> FlatMapOp<Self, F, Item>
  where
    F: FnMut(Item) -> Sub,
  {
    FlatMapOp { source: self, func: f, _hint: PhantomData }
  }

  /// Runs the producer, i.e. the subscription itself, on `scheduler`.
  ///
  /// `subscribe` returns without waiting for the producer; its progress is
  /// only visible through the observer callbacks.
  #[inline]
  fn subscribe_on<SD: Scheduler>(self, scheduler: SD) -> SubscribeOnOp<Self, SD> {
    SubscribeOnOp { source: self, scheduler }
  }

  /// Delivers every downstream notification from `scheduler`.
  ///
  /// Notifications keep their upstream order, whatever scheduler they arrive
  /// from.
  #[inline]
  fn observe_on<SD: Scheduler>(self, scheduler: SD) -> ObserveOnOp<Self, SD> {
    ObserveOnOp { source: self, scheduler }
  }

  /// Pairs this observable with a [`CompleteStatus`] updated after the
  /// downstream received its terminal event.
  #[inline]
  fn complete_status(self) -> (StatusOp<Self>, std::sync::Arc<CompleteStatus>) {
    crate::ops::complete_status::complete_status(self)
  }

  /// Subscribes with a `next` handler. An error is only logged.
  ///
  /// The returned `Subscription` only exists once a synchronous source has
  /// finished running. To stop such a source early from inside a callback,
  /// subscribe an [`Observer`] whose `is_finished` reports it through
  /// [`subscribe_with`](ObservableExt::subscribe_with).
  fn subscribe<N>(self, next: N) -> Subscription
  where
    N: FnMut(Item),
    Self: Observable<Item, NextOnly<N>>,
  {
    let error = unhandled_error as fn(RxError);
    self.subscribe_with(ObserverAll::new(next, error, noop_complete as fn()))
  }

  fn subscribe_err<N, E>(self, next: N, error: E) -> Subscription
  where
    N: FnMut(Item),
    E: FnMut(RxError),
    Self: Observable<Item, NextErr<N, E>>,
  {
    self.subscribe_with(ObserverAll::new(next, error, noop_complete as fn()))
  }

  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> Subscription
  where
    N: FnMut(Item),
    E: FnMut(RxError),
    C: FnMut(),
    Self: Observable<Item, ObserverAll<N, E, C>>,
  {
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  /// Subscribes any [`Observer`] implementation.
  fn subscribe_with<O>(self, observer: O) -> Subscription
  where
    O: Observer<Item>,
    Self: Observable<Item, O>,
  {
    let subscription = Subscription::default();
    self.actual_subscribe(Subscriber::root(observer, subscription.clone()));
    subscription
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn construction_is_lazy() {
    let runs = Arc::new(Mutex::new(0));
    let c_runs = runs.clone();
    let o = observable::create(move |s| {
      *c_runs.lock().unwrap() += 1;
      s.next(1);
      s.complete();
      Ok(())
    })
    .map(|v: i32| v + 1);
    assert_eq!(*runs.lock().unwrap(), 0);

    o.clone().subscribe(|_| {});
    o.subscribe(|_| {});
    assert_eq!(*runs.lock().unwrap(), 2);
  }

  #[test]
  fn subscribe_all_handlers() {
    let mut values = vec![];
    let mut completed = 0;
    let subscription = observable::from_iter(1..=3).subscribe_all(
      |v| values.push(v),
      |_| panic!("no error"),
      || completed += 1,
    );
    assert!(subscription.is_finished());
    assert_eq!(values, vec![1, 2, 3]);
    assert_eq!(completed, 1);
  }

  #[test]
  fn subscribe_err_receives_error() {
    let mut err = None;
    observable::throw_err::<i32>(RxError::producer("bad")).subscribe_err(|_| {}, |e| err = Some(e));
    assert_eq!(err, Some(RxError::producer("bad")));
  }
}
