//! # rxstream: a small reactive stream engine
//!
//! Cold observables, a handful of operators and thread-dispatching schedulers.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxstream::prelude::*;
//!
//! let (pipeline, status) = observable::from_iter(1..=3)
//!   .map(|v| v * 2)
//!   .subscribe_on(io())
//!   .observe_on(computation())
//!   .complete_status();
//!
//! pipeline.subscribe(|v| println!("Value: {v}"));
//! CompleteStatus::wait_for_end(status);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A producer plus the operators applied to it |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Scheduler`] | Runs units of work on an execution context |
//! | [`Subscription`] | Handle to cancel an active subscription |
//!
//! Nothing in the crate installs a logger. Diagnostics go through the `log`
//! facade: scheduler failures at `error`, dropped protocol violations at
//! `debug`, emissions dropped after cancellation at `trace`.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Scheduler`]: scheduler::Scheduler
//! [`Subscription`]: subscription::Subscription

#[cfg(test)]
#[macro_use]
extern crate bencher;

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
mod rc;
pub mod scheduler;
pub mod subscriber;
pub mod subscription;
#[cfg(test)]
mod test_util;

pub use prelude::*;
