//! Core types and the scheduling engine for the vetsched clinic scheduler.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage is reached only through the [`store::ClinicStore`] trait handed to
//! the [`Scheduler`] at construction time.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod appointment;
pub mod error;
pub mod exam;
pub mod hours;
pub mod memory;
pub mod patient;
pub mod scheduler;
pub mod slots;
pub mod store;

pub use error::{Error, Rejection, Result, SchedulingError, STORE_FAILURE_MESSAGE};
pub use hours::BusinessHours;
pub use scheduler::{Outcome, Scheduler};
