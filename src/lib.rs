//! # quiesce: quiescence-driven batching for value streams
//!
//! A stream operator that buffers values while a source is active and emits
//! them as one batch once the source has stayed silent for a configured
//! interval. Burst-shaped inputs (keystrokes, file-system events, change
//! notifications) come out as one batch per burst instead of one event per
//! value.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::convert::Infallible;
//!
//! use quiesce::prelude::*;
//!
//! let scheduler = ManualScheduler::new();
//! let mut subject = Subject::<i32, Infallible>::default();
//!
//! subject
//!   .clone()
//!   .buffer_throttle(Duration::from_secs(1), scheduler.clone())
//!   .subscribe(|batch| assert_eq!(batch, vec![1, 2]));
//!
//! subject.next(1);
//! subject.next(2);
//! scheduler.advance(Duration::from_secs(1));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | The core trait a value source implements |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Scheduler`] | Runs the flush timers; [`ManualScheduler`] is a virtual clock for tests |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): `futures` executor-backed schedulers
//! - **`tokio-scheduler`**: schedule flush timers on a tokio runtime

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscription;

pub use prelude::*;
