use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared mutable state crossing scheduler threads.
///
/// A panicking observer callback poisons the mutex it was called under; the
/// state itself is still consistent (every mutation happens before the
/// callback), so poisoning is recovered instead of spreading the panic to the
/// next thread that touches the subscription.
pub(crate) struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutArc<T> {
  pub(crate) fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  #[inline]
  pub(crate) fn rc_deref_mut(&self) -> MutexGuard<'_, T> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<T> Clone for MutArc<T> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
