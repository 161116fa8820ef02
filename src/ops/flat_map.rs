use std::{
  marker::PhantomData,
  panic::{self, AssertUnwindSafe},
};

use crate::{
  error::RxError,
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::MutArc,
  subscriber::Subscriber,
  subscription::Subscription,
};

pub struct FlatMapOp<S, F, Item> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _hint: PhantomData<fn(Item)>,
}

impl<S: Clone, F: Clone, Item> Clone for FlatMapOp<S, F, Item> {
  fn clone(&self) -> Self {
    FlatMapOp { source: self.source.clone(), func: self.func.clone(), _hint: PhantomData }
  }
}

impl<Item, B, Sub, S, F, O> Observable<B, O> for FlatMapOp<S, F, Item>
where
  O: Observer<B>,
  F: FnMut(Item) -> Sub,
  Sub: Observable<B, InnerObserver<O>>,
  S: Observable<Item, OuterObserver<O, F, B>>,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let subscription = subscriber.subscription().clone();
    let state = MutArc::own(MergeState {
      downstream: subscriber,
      active: 0,
      outer_completed: false,
      done: false,
    });
    let outer = OuterObserver {
      state,
      func: self.func,
      subscription: subscription.clone(),
      _hint: PhantomData,
    };
    self.source.actual_subscribe(Subscriber::new(outer, subscription));
  }
}

impl<Item, B, Sub, S, F> ObservableExt<B> for FlatMapOp<S, F, Item>
where
  F: FnMut(Item) -> Sub,
  Sub: ObservableExt<B>,
{
}

struct MergeState<O> {
  downstream: Subscriber<O>,
  /// Inner observables subscribed and not yet terminated.
  active: usize,
  outer_completed: bool,
  done: bool,
}

impl<O> MergeState<O> {
  fn fail<B>(&mut self, err: RxError)
  where
    O: Observer<B>,
  {
    if self.done {
      log::debug!("error after merged stream terminated dropped");
      return;
    }
    self.done = true;
    Observer::<B>::error(&mut self.downstream, err);
  }

  fn try_complete<B>(&mut self)
  where
    O: Observer<B>,
  {
    if !self.done && self.active == 0 && self.outer_completed {
      self.done = true;
      Observer::<B>::complete(&mut self.downstream);
    }
  }

  fn is_finished<B>(&self) -> bool
  where
    O: Observer<B>,
  {
    self.done || Observer::<B>::is_finished(&self.downstream)
  }
}

pub struct OuterObserver<O, F, B> {
  state: MutArc<MergeState<O>>,
  func: F,
  subscription: Subscription,
  _hint: PhantomData<fn(B)>,
}

impl<Item, B, Sub, O, F> Observer<Item> for OuterObserver<O, F, B>
where
  O: Observer<B>,
  F: FnMut(Item) -> Sub,
  Sub: Observable<B, InnerObserver<O>>,
{
  fn next(&mut self, value: Item) {
    if self.state.rc_deref_mut().done {
      log::trace!("value after merged stream terminated dropped");
      return;
    }
    let func = &mut self.func;
    let inner = match panic::catch_unwind(AssertUnwindSafe(|| func(value))) {
      Ok(inner) => inner,
      Err(payload) => {
        self.state.rc_deref_mut().fail::<B>(RxError::from_panic(payload));
        return;
      }
    };

    {
      let mut state = self.state.rc_deref_mut();
      if state.done {
        return;
      }
      state.active += 1;
    }
    // Subscribed without the lock held, a synchronous inner observable emits
    // straight into the merge state.
    let inner_observer = InnerObserver(self.state.clone());
    inner.actual_subscribe(Subscriber::new(inner_observer, self.subscription.clone()));
  }

  fn error(&mut self, err: RxError) { self.state.rc_deref_mut().fail::<B>(err) }

  fn complete(&mut self) {
    let mut state = self.state.rc_deref_mut();
    state.outer_completed = true;
    state.try_complete::<B>();
  }

  fn is_finished(&self) -> bool { self.state.rc_deref_mut().is_finished::<B>() }
}

pub struct InnerObserver<O>(MutArc<MergeState<O>>);

impl<B, O> Observer<B> for InnerObserver<O>
where
  O: Observer<B>,
{
  fn next(&mut self, value: B) {
    let mut state = self.0.rc_deref_mut();
    if !state.done {
      Observer::<B>::next(&mut state.downstream, value);
    }
  }

  fn error(&mut self, err: RxError) { self.0.rc_deref_mut().fail::<B>(err) }

  fn complete(&mut self) {
    let mut state = self.0.rc_deref_mut();
    state.active -= 1;
    state.try_complete::<B>();
  }

  fn is_finished(&self) -> bool { self.0.rc_deref_mut().is_finished::<B>() }
}

#[cfg(test)]
mod test {
  use std::{
    collections::BTreeMap,
    sync::{
      atomic::{AtomicUsize, Ordering},
      Arc,
    },
  };

  use crate::{just, prelude::*, test_util::recorder};

  #[test]
  fn synchronous_branches() {
    let (record, observer) = recorder();
    just!("a", "b")
      .flat_map(|x| just!(format!("{x}1"), format!("{x}2")))
      .subscribe_with(observer);

    assert_eq!(
      record.events(),
      vec![
        Emission::Next("a1".to_owned()),
        Emission::Next("a2".to_owned()),
        Emission::Next("b1".to_owned()),
        Emission::Next("b2".to_owned()),
        Emission::Completed,
      ]
    );
  }

  #[test]
  fn threaded_branches_keep_their_own_order() {
    let (record, observer) = recorder();
    let (o, status) = observable::from_iter(0..4)
      .flat_map(|i| observable::from_iter(0..50).map(move |v| (i, v)).subscribe_on(new_thread()))
      .complete_status();
    o.subscribe_with(observer);
    CompleteStatus::wait_for_end(status.clone());

    assert!(status.is_completed());
    let events = record.events();
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    assert_eq!(events.last(), Some(&Emission::Completed));

    let mut branches: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
    for (i, v) in record.values() {
      branches.entry(i).or_default().push(v);
    }
    assert_eq!(branches.len(), 4);
    for values in branches.values() {
      assert_eq!(*values, (0..50).collect::<Vec<_>>());
    }
  }

  #[test]
  fn inner_error_terminates_everything() {
    let mapped = Arc::new(AtomicUsize::new(0));
    let c_mapped = mapped.clone();
    let (record, observer) = recorder();
    observable::from_iter(0..3)
      .flat_map(move |i| {
        c_mapped.fetch_add(1, Ordering::SeqCst);
        observable::create(move |s| {
          if i == 1 {
            return Err(RxError::producer("branch failed"));
          }
          s.next(i);
          s.complete();
          Ok(())
        })
      })
      .subscribe_with(observer);

    assert_eq!(
      record.events(),
      vec![Emission::Next(0), Emission::Error(RxError::producer("branch failed"))]
    );
    assert_eq!(mapped.load(Ordering::SeqCst), 2);
  }

  fn five_values(s: &mut dyn Emitter<i32>) -> Result<(), RxError> {
    for v in 0..5 {
      s.next(v);
    }
    s.complete();
    Ok(())
  }

  #[test]
  fn transform_not_called_after_inner_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c_calls = calls.clone();
    let (record, observer) = recorder::<i32>();
    observable::create(five_values)
      .flat_map(move |_| {
        c_calls.fetch_add(1, Ordering::SeqCst);
        observable::throw_err(RxError::producer("inner"))
      })
      .subscribe_with(observer);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(record.events(), vec![Emission::Error(RxError::producer("inner"))]);
  }

  #[test]
  fn transform_not_called_after_panic() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c_calls = calls.clone();
    let (record, observer) = recorder::<i32>();
    observable::create(five_values)
      .flat_map(move |v| {
        c_calls.fetch_add(1, Ordering::SeqCst);
        if v == 0 {
          panic!("no branch for zero");
        }
        observable::of(v)
      })
      .subscribe_with(observer);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
      record.events(),
      vec![Emission::Error(RxError::Panicked("no branch for zero".into()))]
    );
  }

  #[test]
  fn panicking_transform() {
    let (record, observer) = recorder::<i32>();
    observable::from_iter(0..3)
      .flat_map(|i| if i == 0 { observable::of(i) } else { panic!("no branch") })
      .subscribe_with(observer);

    assert_eq!(
      record.events(),
      vec![Emission::Next(0), Emission::Error(RxError::Panicked("no branch".into()))]
    );
  }

  #[test]
  fn empty_outer_completes() {
    let (record, observer) = recorder::<i32>();
    observable::empty().flat_map(observable::of).subscribe_with(observer);
    assert_eq!(record.events(), vec![Emission::Completed]);
  }

  #[test]
  fn empty_inners_complete() {
    let (record, observer) = recorder::<i32>();
    just!(1, 2).flat_map(|_| observable::empty()).subscribe_with(observer);
    assert_eq!(record.events(), vec![Emission::Completed]);
  }
}
