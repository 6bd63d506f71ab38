//! SQL schema and versioned migrations for the Wordbook SQLite store.
//!
//! `PRAGMA user_version` records how many entries of [`MIGRATIONS`] have been
//! applied. Opening a store applies the missing tail in one transaction.
//! Entries are append-only: never edit a migration that has shipped.

/// Connection-level settings; these cannot run inside a transaction.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

const V1_INITIAL: &str = "
CREATE TABLE words (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    term         TEXT NOT NULL,
    term_key     TEXT NOT NULL,           -- trimmed, lowercased term
    translation  TEXT NOT NULL,
    notes        TEXT NOT NULL DEFAULT '',
    group_title  TEXT,
    is_learned   INTEGER NOT NULL DEFAULT 0 CHECK (is_learned IN (0, 1)),
    learned_at   TEXT,                    -- RFC 3339 UTC
    created_at   TEXT NOT NULL,
    CHECK (is_learned = (learned_at IS NOT NULL))
);

CREATE UNIQUE INDEX words_term_key_idx ON words(term_key);
CREATE INDEX        words_created_idx  ON words(created_at, id);

-- Written once when generated, updated once when scored.
CREATE TABLE exercises (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    word_id            INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
    direction          TEXT NOT NULL CHECK (direction IN ('toward_target', 'toward_source')),
    source_term        TEXT NOT NULL,
    source_translation TEXT NOT NULL,
    sentence           TEXT NOT NULL,
    user_answer        TEXT NOT NULL DEFAULT '',
    score              INTEGER CHECK (score BETWEEN 0 AND 10),
    feedback           TEXT,
    scored_at          TEXT,
    created_at         TEXT NOT NULL,
    CHECK ((score IS NULL) = (scored_at IS NULL))
);

CREATE INDEX exercises_word_idx ON exercises(word_id);

-- Examples are strictly append-only.
CREATE TABLE examples (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    word_id     INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
    text        TEXT NOT NULL,
    origin      TEXT NOT NULL CHECK (origin IN ('AI', 'MANUAL')),
    direction   TEXT CHECK (direction IN ('toward_target', 'toward_source')),
    score       INTEGER CHECK (score BETWEEN 0 AND 10),
    feedback    TEXT NOT NULL DEFAULT '',
    exercise_id INTEGER REFERENCES exercises(id),
    created_at  TEXT NOT NULL,
    CHECK (
        (origin = 'MANUAL' AND score IS NULL AND direction IS NULL AND exercise_id IS NULL)
     OR (origin = 'AI' AND score IS NOT NULL AND direction IS NOT NULL AND exercise_id IS NOT NULL)
    )
);

CREATE INDEX examples_word_idx  ON examples(word_id);
CREATE INDEX examples_score_idx ON examples(word_id, score);
";

/// Ordered migration scripts. Index `i` upgrades version `i` to `i + 1`.
pub const MIGRATIONS: &[&str] = &[V1_INITIAL];

/// The schema version this build writes.
pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

/// Apply every migration at or above `current`, then bump `user_version`.
/// Returns the number of scripts applied.
pub fn migrate(conn: &mut rusqlite::Connection, current: i64) -> rusqlite::Result<usize> {
  let pending = &MIGRATIONS[current.max(0) as usize..];
  if pending.is_empty() {
    return Ok(0);
  }

  let tx = conn.transaction()?;
  for script in pending {
    tx.execute_batch(script)?;
  }
  tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
  tx.commit()?;

  Ok(pending.len())
}
