use std::iter::{Repeat, Take};

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error.
/// Stops early when the subscription is cancelled between two elements.
///
/// # Examples
///
/// ```
/// use rxstream::prelude::*;
///
/// observable::from_iter(vec!["1", "2"])
///   .subscribe(|v| println!("{v}"));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> ObservableIter<Iter>
where
  Iter: IntoIterator,
{
  ObservableIter(iter)
}

#[derive(Clone)]
pub struct ObservableIter<Iter>(Iter);

impl<Iter, O> Observable<Iter::Item, O> for ObservableIter<Iter>
where
  Iter: IntoIterator,
  O: Observer<Iter::Item>,
{
  fn actual_subscribe(self, mut subscriber: Subscriber<O>) {
    for v in self.0 {
      if subscriber.is_finished() {
        return;
      }
      subscriber.next(v);
    }
    subscriber.complete();
  }
}

impl<Iter> ObservableExt<Iter::Item> for ObservableIter<Iter> where Iter: IntoIterator {}

/// Creates an observable producing a multiple values.
///
/// Completes immediately after emitting the values given. Never emits an
/// error.
///
/// ```
/// use rxstream::{just, prelude::*};
///
/// just!("a", "b", "c").subscribe(|v| println!("{v}"));
/// ```
#[macro_export]
macro_rules! just {
  ($($item:expr),* $(,)?) => {
    $crate::observable::from_iter([$($item),*])
  };
}

/// Creates an observable producing same value repeated N times.
///
/// Completes immediately after emitting N values. Never emits an error.
pub fn repeat<Item>(v: Item, n: usize) -> ObservableIter<Take<Repeat<Item>>>
where
  Item: Clone,
{
  from_iter(std::iter::repeat(v).take(n))
}

#[cfg(test)]
mod test {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  };

  use crate::{prelude::*, test_util::recorder};

  #[test]
  fn from_range() {
    let (record, observer) = recorder();
    observable::from_iter(0..100).subscribe_with(observer);
    let events = record.events();
    assert_eq!(events.len(), 101);
    assert_eq!(record.values(), (0..100).collect::<Vec<_>>());
    assert_eq!(events.last(), Some(&Emission::Completed));
  }

  #[test]
  fn from_empty_vec() {
    let (record, observer) = recorder::<i32>();
    observable::from_iter(vec![]).subscribe_with(observer);
    assert_eq!(record.events(), vec![Emission::Completed]);
  }

  #[test]
  fn just_emits_arguments_in_order() {
    let (record, observer) = recorder();
    just!("a", "b", "c").subscribe_with(observer);
    assert_eq!(
      record.events(),
      vec![Emission::Next("a"), Emission::Next("b"), Emission::Next("c"), Emission::Completed]
    );
  }

  #[test]
  fn resubscribe_after_cancel_is_independent() {
    let o = just!(1, 2, 3);

    let first = Arc::new(Mutex::new(vec![]));
    o.clone().subscribe_with(CancelAfterFirst { seen: first.clone() });
    assert_eq!(*first.lock().unwrap(), vec![1]);

    let mut second = vec![];
    o.subscribe(|v| second.push(v));
    assert_eq!(second, vec![1, 2, 3]);
  }

  struct CancelAfterFirst {
    seen: Arc<Mutex<Vec<i32>>>,
  }

  impl Observer<i32> for CancelAfterFirst {
    fn next(&mut self, v: i32) { self.seen.lock().unwrap().push(v); }
    fn error(&mut self, _: RxError) {}
    fn complete(&mut self) {}
    fn is_finished(&self) -> bool { !self.seen.lock().unwrap().is_empty() }
  }

  #[test]
  fn repeat_three_times() {
    let hits = AtomicUsize::new(0);
    observable::repeat(123, 3).subscribe(|v| {
      assert_eq!(v, 123);
      hits.fetch_add(1, Ordering::Relaxed);
    });
    assert_eq!(hits.load(Ordering::Relaxed), 3);
  }
}
