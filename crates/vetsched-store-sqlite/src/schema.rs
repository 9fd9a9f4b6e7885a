//! SQL schema for the vetsched SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS clients (
    client_id   TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    phone       TEXT,
    address     TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pets (
    pet_id      TEXT PRIMARY KEY,
    client_id   TEXT NOT NULL REFERENCES clients(client_id),
    name        TEXT NOT NULL,
    species     TEXT NOT NULL,
    breed       TEXT,
    birth_date  TEXT,             -- YYYY-MM-DD
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS appointments (
    appointment_id   TEXT PRIMARY KEY,
    client_id        TEXT NOT NULL REFERENCES clients(client_id),
    pet_id           TEXT NOT NULL REFERENCES pets(pet_id),
    scheduled_at     TEXT NOT NULL,   -- clinic wall-clock, fixed-width ISO 8601
    slot_date        TEXT NOT NULL,   -- YYYY-MM-DD of scheduled_at
    slot_hour        INTEGER NOT NULL,
    duration_minutes INTEGER NOT NULL DEFAULT 60,
    kind             TEXT NOT NULL,   -- 'consultation' | 'vaccination' | 'surgery' | 'exam'
    status           TEXT NOT NULL,   -- 'scheduled' | 'confirmed' | 'cancelled' | 'completed'
    notes            TEXT,
    has_result       INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    updated_at       TEXT NOT NULL
);

-- At most one live booking per hour slot. Cancelled rows do not count.
CREATE UNIQUE INDEX IF NOT EXISTS appointments_live_slot_idx
    ON appointments(slot_date, slot_hour)
    WHERE status != 'cancelled';

CREATE TABLE IF NOT EXISTS exam_results (
    exam_result_id TEXT PRIMARY KEY,
    appointment_id TEXT NOT NULL REFERENCES appointments(appointment_id),
    pet_id         TEXT NOT NULL,
    client_id      TEXT NOT NULL,
    exam_name      TEXT NOT NULL,
    result_date    TEXT NOT NULL,
    summary        TEXT NOT NULL,
    attachment_url TEXT,
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS appointments_scheduled_idx ON appointments(scheduled_at);
CREATE INDEX IF NOT EXISTS pets_name_idx              ON pets(name COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS exam_results_appt_idx      ON exam_results(appointment_id);

PRAGMA user_version = 1;
";
