//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use crate::error::RxError;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: the consumer of data in reactive programming.
///
/// An Observer receives values, errors, and completion notifications from an
/// Observable. All three methods take `&mut self`; the terminal-once rule is
/// enforced by [`Subscriber`](crate::subscriber::Subscriber), which wraps every
/// observer handed to a producer.
pub trait Observer<Item> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable. No value follows an error.
  fn error(&mut self, err: RxError);

  /// Handle completion of the observable. No value follows completion.
  fn complete(&mut self);

  /// Returns `true` if the observer will not accept more values.
  ///
  /// Sources poll this between emissions to stop early.
  fn is_finished(&self) -> bool;
}

// ============================================================================
// Emitter Trait
// ============================================================================

/// The sink a `create` producer emits into.
///
/// It is passed as `&mut dyn Emitter` so the producer closure does not depend
/// on the concrete observer chain below it.
pub trait Emitter<Item> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: RxError);
  fn complete(&mut self);
  /// Cooperative cancellation flag. A long running producer should check it
  /// between emissions and return once it is set.
  fn is_cancelled(&self) -> bool;
}

// ============================================================================
// Emission
// ============================================================================

/// One event of a subscription as a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Emission<Item> {
  Next(Item),
  Error(RxError),
  Completed,
}

impl<Item> Emission<Item> {
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Emission::Next(_)) }

  /// Replays this event on `observer`.
  pub fn deliver<O: Observer<Item>>(self, observer: &mut O) {
    match self {
      Emission::Next(v) => observer.next(v),
      Emission::Error(err) => observer.error(err),
      Emission::Completed => observer.complete(),
    }
  }
}

// ============================================================================
// ObserverAll - Closure adapter
// ============================================================================

/// Observer built from three closures, used by the `subscribe*` family.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> ObserverAll<N, E, C> {
  #[inline]
  pub fn new(next: N, error: E, complete: C) -> Self { ObserverAll { next, error, complete } }
}

impl<Item, N, E, C> Observer<Item> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnMut(RxError),
  C: FnMut(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(&mut self, err: RxError) { (self.error)(err); }

  #[inline]
  fn complete(&mut self) { (self.complete)(); }

  #[inline]
  fn is_finished(&self) -> bool { false }
}

/// Error handler used when the subscriber did not pass one.
pub(crate) fn unhandled_error(err: RxError) {
  log::warn!("unhandled observable error: {err}");
}

pub(crate) fn noop_complete() {}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn closure_observer() {
    let mut sum = 0;
    let mut errors = 0;
    let mut completed = false;
    {
      let mut obs = ObserverAll::new(|v: i32| sum += v, |_| errors += 1, || completed = true);
      obs.next(10);
      obs.next(20);
      obs.error(RxError::producer("x"));
      obs.complete();
      assert!(!obs.is_finished());
    }
    assert_eq!(sum, 30);
    assert_eq!(errors, 1);
    assert!(completed);
  }

  #[test]
  fn emission_replay() {
    let mut values = vec![];
    let mut done = false;
    let mut obs = ObserverAll::new(|v| values.push(v), |_| {}, || done = true);
    Emission::Next(1).deliver(&mut obs);
    Emission::Next(2).deliver(&mut obs);
    assert!(Emission::<i32>::Completed.is_terminal());
    assert!(!Emission::Next(3).is_terminal());
    Emission::Completed.deliver(&mut obs);
    drop(obs);
    assert_eq!(values, vec![1, 2]);
    assert!(done);
  }
}
