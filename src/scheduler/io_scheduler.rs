use std::{
  io,
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  },
};

use once_cell::sync::Lazy;
use tokio::runtime::{Builder, Runtime};

use super::{
  mark_current_thread, run_unit, NewThreadScheduler, PoolConfig, Scheduler, SchedulerKind,
};

static DEFAULT_POOL: Lazy<IoScheduler> = Lazy::new(|| {
  IoScheduler::with_config(PoolConfig::default()).unwrap_or_else(|err| {
    log::error!("failed to start the io pool: {err}; falling back to new threads");
    IoScheduler { pool: None }
  })
});

/// Unbounded pool for blocking units, backed by the tokio blocking pool.
///
/// Threads are created on demand and kept idle for
/// [`PoolConfig::io_keep_alive`] before they exit.
#[derive(Clone)]
pub struct IoScheduler {
  pool: Option<Arc<IoPool>>,
}

struct IoPool(Option<Runtime>);

impl Drop for IoPool {
  fn drop(&mut self) {
    // The last handle may be dropped on one of the pool's own threads, where a
    // blocking shutdown is not allowed.
    if let Some(runtime) = self.0.take() {
      runtime.shutdown_background();
    }
  }
}

impl IoScheduler {
  pub(crate) fn shared() -> Self { DEFAULT_POOL.clone() }

  /// Starts a private pool, shut down once every clone is dropped.
  pub fn with_config(config: PoolConfig) -> io::Result<Self> {
    let prefix = config.thread_name_prefix.clone();
    let index = AtomicUsize::new(0);
    let runtime = Builder::new_multi_thread()
      .worker_threads(1)
      .max_blocking_threads(config.io_max_threads)
      .thread_keep_alive(config.io_keep_alive)
      .thread_name_fn(move || format!("{prefix}-io-{}", index.fetch_add(1, Ordering::Relaxed)))
      .on_thread_start(|| mark_current_thread(SchedulerKind::Io))
      .build()?;
    log::debug!("io pool started, keep alive {:?}", config.io_keep_alive);
    Ok(IoScheduler { pool: Some(Arc::new(IoPool(Some(runtime)))) })
  }
}

impl Scheduler for IoScheduler {
  fn schedule<T>(&self, task: T)
  where
    T: FnOnce() + Send + 'static,
  {
    match self.pool.as_ref().and_then(|pool| pool.0.as_ref()) {
      Some(runtime) => {
        runtime.spawn_blocking(move || run_unit(SchedulerKind::Io, task));
      }
      None => NewThreadScheduler::default().schedule(task),
    }
  }

  #[inline]
  fn kind(&self) -> SchedulerKind { SchedulerKind::Io }
}

impl std::fmt::Debug for IoScheduler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("IoScheduler").field("running", &self.pool.is_some()).finish()
  }
}
