//! SQL schema for the Scramblelist SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout version; future migrations will be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The live roster. Rows are inserted and deleted, never updated.
CREATE TABLE IF NOT EXISTS participants (
    participant_id TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    name_key       TEXT NOT NULL UNIQUE,   -- lowercased name
    email          TEXT,
    created_at     TEXT NOT NULL,
    seq            INTEGER NOT NULL        -- insertion order
);

-- Exchanges are strictly append-only.
CREATE TABLE IF NOT EXISTS exchanges (
    exchange_id TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL,
    seq         INTEGER NOT NULL
);

-- Copy of each participant as they were when the exchange was drawn.
-- Not a foreign key into `participants`; rows outlive roster changes.
CREATE TABLE IF NOT EXISTS exchange_participants (
    exchange_id    TEXT NOT NULL REFERENCES exchanges(exchange_id),
    position       INTEGER NOT NULL,
    participant_id TEXT NOT NULL,
    name           TEXT NOT NULL,
    email          TEXT,
    created_at     TEXT NOT NULL,
    PRIMARY KEY (exchange_id, participant_id),
    UNIQUE (exchange_id, position)
);

CREATE TABLE IF NOT EXISTS assignments (
    exchange_id TEXT NOT NULL REFERENCES exchanges(exchange_id),
    position    INTEGER NOT NULL,
    giver_id    TEXT NOT NULL,
    receiver_id TEXT NOT NULL,
    PRIMARY KEY (exchange_id, position),
    UNIQUE (exchange_id, giver_id),
    UNIQUE (exchange_id, receiver_id),
    CHECK  (giver_id != receiver_id),
    FOREIGN KEY (exchange_id, giver_id)
      REFERENCES exchange_participants(exchange_id, participant_id),
    FOREIGN KEY (exchange_id, receiver_id)
      REFERENCES exchange_participants(exchange_id, participant_id)
);

CREATE INDEX IF NOT EXISTS participants_seq_idx ON participants(seq);
CREATE INDEX IF NOT EXISTS exchanges_seq_idx    ON exchanges(seq);

PRAGMA user_version = 1;
";
