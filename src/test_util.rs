use std::sync::{Arc, Mutex};

use crate::{
  error::RxError,
  observer::{Emission, Observer},
  scheduler::{current_kind, SchedulerKind},
};

/// Observer recording every event and the scheduler it was delivered on.
pub(crate) struct Recorder<T>(Record<T>);

pub(crate) struct Record<T>(Arc<Mutex<Vec<(Emission<T>, Option<SchedulerKind>)>>>);

impl<T> Clone for Record<T> {
  fn clone(&self) -> Self { Record(self.0.clone()) }
}

pub(crate) fn recorder<T>() -> (Record<T>, Recorder<T>) {
  let record = Record(Arc::new(Mutex::new(vec![])));
  (record.clone(), Recorder(record))
}

impl<T> Record<T> {
  fn push(&self, emission: Emission<T>) { self.0.lock().unwrap().push((emission, current_kind())); }

  pub(crate) fn kinds(&self) -> Vec<Option<SchedulerKind>> {
    self.0.lock().unwrap().iter().map(|(_, kind)| *kind).collect()
  }
}

impl<T: Clone> Record<T> {
  pub(crate) fn events(&self) -> Vec<Emission<T>> {
    self.0.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
  }

  pub(crate) fn values(&self) -> Vec<T> {
    self
      .0
      .lock()
      .unwrap()
      .iter()
      .filter_map(|(e, _)| match e {
        Emission::Next(v) => Some(v.clone()),
        _ => None,
      })
      .collect()
  }
}

impl<T> Observer<T> for Recorder<T> {
  fn next(&mut self, value: T) { self.0.push(Emission::Next(value)); }

  fn error(&mut self, err: RxError) { self.0.push(Emission::Error(err)); }

  fn complete(&mut self) { self.0.push(Emission::Completed); }

  fn is_finished(&self) -> bool { false }
}
