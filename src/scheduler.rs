//! Execution contexts for `subscribe_on` and `observe_on`.
//!
//! | instance | policy |
//! |---|---|
//! | [`immediate`] | runs the unit synchronously on the calling thread |
//! | [`new_thread`] | spawns one fresh thread per unit |
//! | [`io`] | unbounded pool reusing idle threads, for blocking work |
//! | [`computation`] | fixed pool sized to the available parallelism |
//!
//! Every scheduler thread records which kind of scheduler owns it, see
//! [`current_kind`].

use std::{
  cell::Cell,
  panic::{self, AssertUnwindSafe},
  time::Duration,
};

mod io_scheduler;
mod thread_pool_scheduler;
mod thread_scheduler;

pub use io_scheduler::IoScheduler;
pub use thread_pool_scheduler::ComputationScheduler;
pub use thread_scheduler::NewThreadScheduler;

/// A Scheduler decides where a unit of work runs.
///
/// `schedule` never blocks for the pooled and threaded schedulers; the
/// immediate scheduler runs the unit before returning.
pub trait Scheduler: Send + Sync + 'static {
  fn schedule<T>(&self, task: T)
  where
    T: FnOnce() + Send + 'static;

  fn kind(&self) -> SchedulerKind;
}

/// The closed set of standard schedulers.
///
/// `SchedulerKind` is itself a [`Scheduler`] dispatching to the process-wide
/// instance of that kind, so a pipeline can pick its execution context from
/// configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchedulerKind {
  Immediate,
  NewThread,
  Io,
  Computation,
}

impl Scheduler for SchedulerKind {
  fn schedule<T>(&self, task: T)
  where
    T: FnOnce() + Send + 'static,
  {
    match self {
      SchedulerKind::Immediate => immediate().schedule(task),
      SchedulerKind::NewThread => new_thread().schedule(task),
      SchedulerKind::Io => io().schedule(task),
      SchedulerKind::Computation => computation().schedule(task),
    }
  }

  #[inline]
  fn kind(&self) -> SchedulerKind { *self }
}

/// Runs every unit synchronously on the thread that schedules it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  #[inline]
  fn schedule<T>(&self, task: T)
  where
    T: FnOnce() + Send + 'static,
  {
    task()
  }

  #[inline]
  fn kind(&self) -> SchedulerKind { SchedulerKind::Immediate }
}

/// Returns a Scheduler that executes the unit of work on the current thread.
pub fn immediate() -> ImmediateScheduler { ImmediateScheduler }

/// Returns a Scheduler instance that creates a new thread for each unit of
/// work.
pub fn new_thread() -> NewThreadScheduler { NewThreadScheduler::default() }

/// Returns the process-wide scheduler for blocking, I/O bound work.
pub fn io() -> IoScheduler { IoScheduler::shared() }

/// Returns the process-wide scheduler for CPU bound work. Never block on it.
pub fn computation() -> ComputationScheduler { ComputationScheduler::shared() }

/// Settings of the threads and pools owned by the schedulers.
///
/// The standard instances use `PoolConfig::default()`; private pools can be
/// built with [`IoScheduler::with_config`] and
/// [`ComputationScheduler::with_config`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
  /// Prefix of every thread name, e.g. `rx-io-3`.
  pub thread_name_prefix: String,
  /// Size of the computation pool.
  pub computation_threads: usize,
  /// How long an idle io thread waits for work before it exits.
  pub io_keep_alive: Duration,
  /// Upper limit of io threads alive at once.
  pub io_max_threads: usize,
}

/// Effectively unbounded, but keeps tokio's thread cap arithmetic in range.
const IO_MAX_THREADS: usize = 1 << 14;

impl Default for PoolConfig {
  fn default() -> Self {
    PoolConfig {
      thread_name_prefix: "rx".to_owned(),
      computation_threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
      io_keep_alive: Duration::from_secs(60),
      io_max_threads: IO_MAX_THREADS,
    }
  }
}

impl PoolConfig {
  pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.thread_name_prefix = prefix.into();
    self
  }

  pub fn with_computation_threads(mut self, threads: usize) -> Self {
    self.computation_threads = threads.max(1);
    self
  }

  pub fn with_io_keep_alive(mut self, keep_alive: Duration) -> Self {
    self.io_keep_alive = keep_alive;
    self
  }

  pub fn with_io_max_threads(mut self, threads: usize) -> Self {
    self.io_max_threads = threads.clamp(1, IO_MAX_THREADS);
    self
  }

  pub(crate) fn thread_name(&self, kind: &str, index: usize) -> String {
    format!("{}-{kind}-{index}", self.thread_name_prefix)
  }
}

thread_local! {
  static CURRENT_KIND: Cell<Option<SchedulerKind>> = const { Cell::new(None) };
}

/// The kind of scheduler owning the current thread, `None` for threads not
/// created by a scheduler. The immediate scheduler never changes it.
pub fn current_kind() -> Option<SchedulerKind> { CURRENT_KIND.with(Cell::get) }

pub(crate) fn mark_current_thread(kind: SchedulerKind) {
  CURRENT_KIND.with(|current| current.set(Some(kind)));
}

/// Runs a unit on a scheduler owned thread. A panic is logged and contained
/// here so it never takes the worker thread down with it.
pub(crate) fn run_unit<T: FnOnce()>(kind: SchedulerKind, task: T) {
  if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
    let err = crate::error::RxError::from_panic(payload);
    log::error!("unit of work on {kind:?} scheduler panicked: {err}");
  }
}
