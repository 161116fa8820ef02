use std::io;

use futures::{executor::ThreadPool, future};
use once_cell::sync::Lazy;

use super::{
  mark_current_thread, run_unit, NewThreadScheduler, PoolConfig, Scheduler, SchedulerKind,
};

static DEFAULT_POOL: Lazy<ComputationScheduler> = Lazy::new(|| {
  ComputationScheduler::with_config(PoolConfig::default()).unwrap_or_else(|err| {
    log::error!("failed to start the computation pool: {err}; falling back to new threads");
    ComputationScheduler { pool: None }
  })
});

/// Fixed size pool for CPU bound units, sized by
/// [`PoolConfig::computation_threads`].
#[derive(Clone, Debug)]
pub struct ComputationScheduler {
  pool: Option<ThreadPool>,
}

impl ComputationScheduler {
  pub(crate) fn shared() -> Self { DEFAULT_POOL.clone() }

  /// Starts a private pool. Its threads stop once every clone of the
  /// returned scheduler is dropped and the queued units finished.
  pub fn with_config(config: PoolConfig) -> io::Result<Self> {
    let pool = ThreadPool::builder()
      .pool_size(config.computation_threads.max(1))
      .name_prefix(format!("{}-computation-", config.thread_name_prefix))
      .after_start(|_| mark_current_thread(SchedulerKind::Computation))
      .create()?;
    log::debug!("computation pool started with {} threads", config.computation_threads);
    Ok(ComputationScheduler { pool: Some(pool) })
  }
}

impl Scheduler for ComputationScheduler {
  fn schedule<T>(&self, task: T)
  where
    T: FnOnce() + Send + 'static,
  {
    match &self.pool {
      Some(pool) => {
        pool.spawn_ok(future::lazy(move |_| run_unit(SchedulerKind::Computation, task)))
      }
      None => NewThreadScheduler::default().schedule(task),
    }
  }

  #[inline]
  fn kind(&self) -> SchedulerKind { SchedulerKind::Computation }
}
