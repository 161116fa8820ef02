//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Core traits
pub use crate::observable::{self, Observable, ObservableExt};
// Observer
pub use crate::observer::{Emission, Emitter, Observer, ObserverAll};
// Errors
pub use crate::error::RxError;
// Operators
pub use crate::ops::complete_status::CompleteStatus;
// Schedulers
pub use crate::scheduler::{
  computation, current_kind, immediate, io, new_thread, ComputationScheduler, ImmediateScheduler,
  IoScheduler, NewThreadScheduler, PoolConfig, Scheduler, SchedulerKind,
};
// Subscription
pub use crate::{
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionGuard},
};
pub use crate::just;
