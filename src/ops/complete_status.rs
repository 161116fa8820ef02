use std::{
  future::Future,
  pin::Pin,
  sync::{
    atomic::{AtomicI8, Ordering},
    Arc,
  },
  task::{Context, Poll},
};

use futures::{executor::block_on, task::AtomicWaker};

use crate::{
  error::RxError,
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
};

/// Terminal state of a subscription, shared with the pipeline it observes.
#[derive(Default)]
pub struct CompleteStatus {
  flag: AtomicI8,
  waker: AtomicWaker,
}

pub struct StatusOp<S> {
  source: S,
  status: Arc<CompleteStatus>,
}

pub fn complete_status<S>(source: S) -> (StatusOp<S>, Arc<CompleteStatus>) {
  let status = Arc::new(CompleteStatus::default());
  (StatusOp { source, status: status.clone() }, status)
}

impl<S, Item, O> Observable<Item, O> for StatusOp<S>
where
  O: Observer<Item>,
  S: Observable<Item, StatusObserver<Subscriber<O>>>,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let Self { source, status } = self;
    let subscription = subscriber.subscription().clone();
    let observer = StatusObserver { observer: subscriber, status };
    source.actual_subscribe(Subscriber::new(observer, subscription));
  }
}

impl<S, Item> ObservableExt<Item> for StatusOp<S> where S: ObservableExt<Item> {}

pub struct StatusObserver<O> {
  observer: O,
  status: Arc<CompleteStatus>,
}

impl<O> StatusObserver<O> {
  fn close(&self, flag: i8) {
    self.status.flag.store(flag, Ordering::Release);
    self.status.waker.wake();
  }
}

impl<Item, O> Observer<Item> for StatusObserver<O>
where
  O: Observer<Item>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(&mut self, err: RxError) {
    self.observer.error(err);
    self.close(-1);
  }

  fn complete(&mut self) {
    self.observer.complete();
    self.close(1);
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

impl CompleteStatus {
  /// return true if the observable completed or emit an error.
  pub fn is_closed(&self) -> bool { self.flag.load(Ordering::Acquire) != 0 }

  /// return true if the observable completed.
  pub fn is_completed(&self) -> bool { self.flag.load(Ordering::Acquire) > 0 }

  /// return true if the observable emit an error.
  pub fn error_occur(&self) -> bool { self.flag.load(Ordering::Acquire) < 0 }

  /// Wait until the observable complete or an error occur.
  ///
  /// Never returns for a subscription that was cancelled before its terminal
  /// event.
  pub fn wait_for_end(this: Arc<Self>) { block_on(StatusFuture(this)); }
}

struct StatusFuture(Arc<CompleteStatus>);

impl Future for StatusFuture {
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    if self.0.is_closed() {
      return Poll::Ready(());
    }
    self.0.waker.register(cx.waker());
    // Re-check, the terminal may have landed before the waker was stored.
    if self.0.is_closed() {
      Poll::Ready(())
    } else {
      Poll::Pending
    }
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn completed() {
    let (o, status) = observable::from_iter(0..3).complete_status();
    assert!(!status.is_closed());
    o.subscribe(|_| {});
    assert!(status.is_closed());
    assert!(status.is_completed());
    assert!(!status.error_occur());
  }

  #[test]
  fn errored() {
    let (o, status) = observable::throw_err::<()>(RxError::producer("x")).complete_status();
    o.subscribe_err(|_| {}, |_| {});
    assert!(status.error_occur());
    assert!(!status.is_completed());
  }

  #[test]
  fn wait_for_threaded_producer() {
    let (o, status) = observable::from_iter(0..100).subscribe_on(new_thread()).complete_status();
    let sum = Arc::new(Mutex::new(0));
    let c_sum = sum.clone();
    o.subscribe(move |v| *c_sum.lock().unwrap() += v);
    CompleteStatus::wait_for_end(status);
    assert_eq!(*sum.lock().unwrap(), 4950);
  }
}
