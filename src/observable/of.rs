use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
};

/// Creates an observable producing a single value.
///
/// Completes immediately after emitting the value given. Never emits an error.
///
/// # Examples
///
/// ```
/// use rxstream::prelude::*;
///
/// observable::of(123)
///   .subscribe(|v| {println!("{},", v)});
/// ```
pub fn of<Item>(v: Item) -> ObservableOf<Item> { ObservableOf(v) }

#[derive(Clone)]
pub struct ObservableOf<Item>(Item);

impl<Item, O> Observable<Item, O> for ObservableOf<Item>
where
  O: Observer<Item>,
{
  fn actual_subscribe(self, mut subscriber: Subscriber<O>) {
    if !subscriber.is_finished() {
      subscriber.next(self.0);
      subscriber.complete();
    }
  }
}

impl<Item> ObservableExt<Item> for ObservableOf<Item> {}
