use std::{
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  },
  thread,
};

use super::{mark_current_thread, run_unit, PoolConfig, Scheduler, SchedulerKind};

static THREAD_INDEX: AtomicUsize = AtomicUsize::new(0);

/// Spawns a dedicated thread for every unit; the thread ends with the unit.
#[derive(Clone, Debug, Default)]
pub struct NewThreadScheduler {
  config: Arc<PoolConfig>,
}

impl NewThreadScheduler {
  pub fn with_config(config: PoolConfig) -> Self { NewThreadScheduler { config: Arc::new(config) } }
}

impl Scheduler for NewThreadScheduler {
  fn schedule<T>(&self, task: T)
  where
    T: FnOnce() + Send + 'static,
  {
    let name = self
      .config
      .thread_name("new-thread", THREAD_INDEX.fetch_add(1, Ordering::Relaxed));
    log::trace!("spawning {name}");
    // `spawn` drops the closure when it fails; keep the unit reachable for the
    // fallback.
    let slot = Arc::new(std::sync::Mutex::new(Some(task)));
    let c_slot = slot.clone();
    let spawned = thread::Builder::new().name(name.clone()).spawn(move || {
      mark_current_thread(SchedulerKind::NewThread);
      if let Some(task) = crate::rc::lock(&c_slot).take() {
        run_unit(SchedulerKind::NewThread, task);
      }
    });
    if let Err(err) = spawned {
      log::error!("failed to spawn {name}: {err}; running unit on the calling thread");
      if let Some(task) = crate::rc::lock(&slot).take() {
        task();
      }
    }
  }

  #[inline]
  fn kind(&self) -> SchedulerKind { SchedulerKind::NewThread }
}
