use crate::{error::RxError, observer::Observer, subscription::Subscription};

/// Wraps the observer handed to a producer.
///
/// Every stage of a pipeline receives its downstream as a `Subscriber`, so the
/// terminal-once rule holds at each stage boundary:
///
/// - after `error` or `complete` nothing more is delivered; a second terminal
///   call is dropped and logged at debug level,
/// - after the subscription is cancelled every emission is dropped,
/// - once the wrapped observer reports `is_finished` values are no longer
///   handed to it, so an operator that terminated its downstream stops
///   running its transform.
pub struct Subscriber<O> {
  observer: O,
  subscription: Subscription,
  stopped: bool,
  root: bool,
}

impl<O> Subscriber<O> {
  /// A subscriber for an intermediate stage, sharing `subscription` with the
  /// rest of the chain.
  pub fn new(observer: O, subscription: Subscription) -> Self {
    Subscriber { observer, subscription, stopped: false, root: false }
  }

  /// The subscriber wrapping the observer passed to `subscribe`. Delivering a
  /// terminal event through it marks the subscription finished.
  pub(crate) fn root(observer: O, subscription: Subscription) -> Self {
    Subscriber { observer, subscription, stopped: false, root: true }
  }

  #[inline]
  pub fn subscription(&self) -> &Subscription { &self.subscription }

  #[inline]
  pub fn is_cancelled(&self) -> bool { self.subscription.is_cancelled() }

  fn accept_terminal(&mut self) -> bool {
    if self.stopped {
      log::debug!("second terminal event dropped");
      false
    } else if self.subscription.is_cancelled() {
      log::trace!("terminal event after cancellation dropped");
      false
    } else {
      self.stopped = true;
      true
    }
  }

  fn done(&self) {
    if self.root {
      self.subscription.finish();
    }
  }
}

impl<Item, O> Observer<Item> for Subscriber<O>
where
  O: Observer<Item>,
{
  fn next(&mut self, value: Item) {
    if self.stopped {
      log::debug!("value after terminal event dropped");
    } else if self.subscription.is_cancelled() {
      log::trace!("value after cancellation dropped");
    } else if self.observer.is_finished() {
      log::trace!("value after downstream finished dropped");
    } else {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: RxError) {
    if self.accept_terminal() {
      self.observer.error(err);
      self.done();
    }
  }

  fn complete(&mut self) {
    if self.accept_terminal() {
      self.observer.complete();
      self.done();
    }
  }

  #[inline]
  fn is_finished(&self) -> bool {
    self.stopped || self.subscription.is_cancelled() || self.observer.is_finished()
  }
}
