//! Error type for `vetsched-store-sqlite`.

use thiserror::Error;
use vetsched_core::store::StoreError;

/// SQLite names the indexed columns when the live-slot unique index is
/// violated.
const SLOT_CONSTRAINT_COLUMNS: &str = "appointments.slot_date";

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("decode error: {0}")]
  Decode(String),

  /// A non-cancelled appointment already holds the slot.
  #[error("slot already taken")]
  SlotTaken,
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if is_slot_violation(&e) {
      Error::SlotTaken
    } else {
      Error::Database(e)
    }
  }
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self { tokio_rusqlite::Error::Rusqlite(e).into() }
}

impl StoreError for Error {
  fn is_slot_taken(&self) -> bool { matches!(self, Self::SlotTaken) }
}

fn is_slot_violation(e: &tokio_rusqlite::Error) -> bool {
  match e {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, msg)) => {
      code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        && msg
          .as_deref()
          .is_some_and(|m| m.contains(SLOT_CONSTRAINT_COLUMNS))
    }
    _ => false,
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
