use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  scheduler::Scheduler,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct SubscribeOnOp<S, SD> {
  pub(crate) source: S,
  pub(crate) scheduler: SD,
}

impl<Item, S, SD, O> Observable<Item, O> for SubscribeOnOp<S, SD>
where
  O: Observer<Item> + Send + 'static,
  S: Observable<Item, O> + Send + 'static,
  SD: Scheduler,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    if subscriber.is_cancelled() {
      return;
    }
    let source = self.source;
    log::trace!("subscription scheduled on {:?}", self.scheduler.kind());
    self.scheduler.schedule(move || source.actual_subscribe(subscriber));
  }
}

impl<Item, S, SD> ObservableExt<Item> for SubscribeOnOp<S, SD> where S: ObservableExt<Item> {}
