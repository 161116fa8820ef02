use std::{
  collections::VecDeque,
  panic::{self, AssertUnwindSafe},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
  },
};

use smallvec::SmallVec;

use crate::{
  error::RxError,
  observable::{Observable, ObservableExt},
  observer::{Emission, Observer},
  rc::lock,
  scheduler::Scheduler,
  subscriber::Subscriber,
};

const DRAIN_BATCH: usize = 8;

#[derive(Clone)]
pub struct ObserveOnOp<S, SD> {
  pub(crate) source: S,
  pub(crate) scheduler: SD,
}

impl<Item, S, SD, O> Observable<Item, O> for ObserveOnOp<S, SD>
where
  Item: Send + 'static,
  O: Observer<Item> + Send + 'static,
  SD: Scheduler,
  S: Observable<Item, ObserveOnObserver<Item, O, SD>>,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let subscription = subscriber.subscription().clone();
    let hand_off = Arc::new(HandOff {
      queue: Mutex::new(Queue { items: VecDeque::new(), draining: false, terminated: false }),
      downstream: Mutex::new(subscriber),
      finished: AtomicBool::new(false),
    });
    let observer = ObserveOnObserver { hand_off, scheduler: self.scheduler };
    self.source.actual_subscribe(Subscriber::new(observer, subscription));
  }
}

impl<Item, S, SD> ObservableExt<Item> for ObserveOnOp<S, SD> where S: ObservableExt<Item> {}

/// Upstream half of the hand-off. Emissions are queued and a single drain
/// unit at a time delivers them downstream on the target scheduler.
pub struct ObserveOnObserver<Item, O, SD> {
  hand_off: Arc<HandOff<Item, O>>,
  scheduler: SD,
}

struct HandOff<Item, O> {
  queue: Mutex<Queue<Item>>,
  downstream: Mutex<Subscriber<O>>,
  // Mirrors `downstream.is_finished()` so upstream can poll without waiting
  // for a running drain.
  finished: AtomicBool,
}

struct Queue<Item> {
  items: VecDeque<Emission<Item>>,
  draining: bool,
  terminated: bool,
}

impl<Item, O, SD> ObserveOnObserver<Item, O, SD>
where
  Item: Send + 'static,
  O: Observer<Item> + Send + 'static,
  SD: Scheduler,
{
  fn push(&self, emission: Emission<Item>) {
    let mut queue = lock(&self.hand_off.queue);
    if queue.terminated {
      log::debug!("emission after terminal event dropped");
      return;
    }
    queue.terminated = emission.is_terminal();
    queue.items.push_back(emission);
    if queue.draining {
      return;
    }
    queue.draining = true;
    drop(queue);

    let hand_off = self.hand_off.clone();
    self.scheduler.schedule(move || hand_off.drain());
  }
}

impl<Item, O> HandOff<Item, O>
where
  O: Observer<Item>,
{
  fn drain(&self) {
    loop {
      let batch: SmallVec<[Emission<Item>; DRAIN_BATCH]> = {
        let mut queue = lock(&self.queue);
        if queue.items.is_empty() {
          queue.draining = false;
          return;
        }
        let len = queue.items.len().min(DRAIN_BATCH);
        queue.items.drain(..len).collect()
      };

      let mut downstream = lock(&self.downstream);
      let delivered = panic::catch_unwind(AssertUnwindSafe(|| {
        for emission in batch {
          emission.deliver(&mut *downstream);
        }
      }));
      if delivered.is_err() {
        log::error!("observer panicked while draining, the rest of the stream is dropped");
        self.finished.store(true, Ordering::Release);
        let mut queue = lock(&self.queue);
        queue.items.clear();
        queue.terminated = true;
        queue.draining = false;
        return;
      }
      self.finished.store(Observer::<Item>::is_finished(&*downstream), Ordering::Release);
    }
  }
}

impl<Item, O, SD> Observer<Item> for ObserveOnObserver<Item, O, SD>
where
  Item: Send + 'static,
  O: Observer<Item> + Send + 'static,
  SD: Scheduler,
{
  #[inline]
  fn next(&mut self, value: Item) { self.push(Emission::Next(value)) }

  #[inline]
  fn error(&mut self, err: RxError) { self.push(Emission::Error(err)) }

  #[inline]
  fn complete(&mut self) { self.push(Emission::Completed) }

  #[inline]
  fn is_finished(&self) -> bool { self.hand_off.finished.load(Ordering::Acquire) }
}
