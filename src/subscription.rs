use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

/// Subscription returns from `Observable.subscribe(..)` to allow
/// unsubscribing.
///
/// It owns the cancellation state of one activation of an observable. The
/// handle is cheap to clone and every clone, including the ones travelling
/// with the subscriber onto scheduler threads, sees the same flags.
#[derive(Clone, Default)]
pub struct Subscription(Arc<SubscriptionState>);

#[derive(Default)]
struct SubscriptionState {
  cancelled: AtomicBool,
  finished: AtomicBool,
}

impl Subscription {
  /// Requests cancellation. Producers notice it the next time they check
  /// `is_cancelled`; emissions arriving after this call are dropped.
  pub fn unsubscribe(&self) {
    if !self.0.cancelled.swap(true, Ordering::AcqRel) {
      log::trace!("subscription cancelled");
    }
  }

  /// True once cancelled or once the subscriber received its terminal event.
  #[inline]
  pub fn is_closed(&self) -> bool { self.is_cancelled() || self.is_finished() }

  #[inline]
  pub fn is_cancelled(&self) -> bool { self.0.cancelled.load(Ordering::Acquire) }

  /// True once the final observer received `error` or `complete`.
  #[inline]
  pub fn is_finished(&self) -> bool { self.0.finished.load(Ordering::Acquire) }

  pub(crate) fn finish(&self) { self.0.finished.store(true, Ordering::Release); }

  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard(self) }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("cancelled", &self.is_cancelled())
      .field("finished", &self.is_finished())
      .finish()
  }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
  pub fn subscription(&self) -> &Subscription { &self.0 }
}

impl Drop for SubscriptionGuard {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn clones_share_state() {
    let sub = Subscription::default();
    let other = sub.clone();
    assert!(!other.is_closed());
    sub.unsubscribe();
    assert!(other.is_cancelled());
    assert!(other.is_closed());
    assert!(!other.is_finished());
  }

  #[test]
  fn finish_closes_without_cancel() {
    let sub = Subscription::default();
    sub.finish();
    assert!(sub.is_closed());
    assert!(!sub.is_cancelled());
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let sub = Subscription::default();
    {
      let guard = sub.clone().unsubscribe_when_dropped();
      assert!(!guard.subscription().is_closed());
    }
    assert!(sub.is_cancelled());
  }
}
