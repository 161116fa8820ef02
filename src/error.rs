use std::{any::Any, error::Error, fmt, sync::Arc};

/// The error delivered through `Observer::error`.
///
/// Every failure inside a producer or an operator transform is converted to an
/// `RxError` at the boundary where it happened, so a subscription observes it
/// as a single terminal event instead of a panic on some scheduler thread.
#[derive(Clone, thiserror::Error)]
pub enum RxError {
  /// The producer or a transform returned an error.
  #[error("{0}")]
  Producer(Arc<dyn Error + Send + Sync>),
  /// The producer or a transform panicked; holds the panic message.
  #[error("panicked: {0}")]
  Panicked(String),
}

impl RxError {
  /// Wraps any error (or a `&str`/`String` message) as a producer error.
  pub fn producer(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
    RxError::Producer(Arc::from(err.into()))
  }

  pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
      (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
      s.clone()
    } else {
      "unknown panic payload".to_owned()
    };
    RxError::Panicked(msg)
  }

  /// Returns true if this error came from a caught panic.
  pub fn is_panic(&self) -> bool { matches!(self, RxError::Panicked(_)) }
}

impl fmt::Debug for RxError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RxError::Producer(e) => f.debug_tuple("Producer").field(&e.to_string()).finish(),
      RxError::Panicked(msg) => f.debug_tuple("Panicked").field(msg).finish(),
    }
  }
}

impl PartialEq for RxError {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (RxError::Producer(a), RxError::Producer(b)) => a.to_string() == b.to_string(),
      (RxError::Panicked(a), RxError::Panicked(b)) => a == b,
      _ => false,
    }
  }
}
