//! SQLite backend for the vetsched clinic store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. A partial unique index over
//! `(slot_date, slot_hour)` keeps two live bookings out of the same hour
//! even when requests race.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
