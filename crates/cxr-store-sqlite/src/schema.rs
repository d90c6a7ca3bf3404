//! SQL schema for the cxr SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Key of the single refresh-metadata row.
pub const METADATA_KEY: &str = "last_refresh";

/// Name of the counter backing country ids.
pub const COUNTRY_ID_COUNTER: &str = "country_id";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are never deleted by a refresh, only by an explicit delete.
-- The implicit rowid records insertion order and breaks sort ties.
CREATE TABLE IF NOT EXISTS countries (
    name_key          TEXT PRIMARY KEY,       -- lowercased name; the natural key
    id                INTEGER NOT NULL UNIQUE, -- surrogate id from id_counters
    name              TEXT NOT NULL,
    capital           TEXT,
    region            TEXT,
    population        INTEGER NOT NULL DEFAULT 0,
    currency_code     TEXT,
    exchange_rate     REAL,
    estimated_gdp     REAL NOT NULL DEFAULT 0,
    flag_url          TEXT,
    last_refreshed_at TEXT NOT NULL           -- ISO 8601 UTC
);

-- Singleton describing the last successful refresh.
CREATE TABLE IF NOT EXISTS refresh_metadata (
    key             TEXT PRIMARY KEY,
    timestamp       TEXT NOT NULL,
    total_countries INTEGER NOT NULL
);

-- Monotonic sequences; incremented with a single UPSERT ... RETURNING.
CREATE TABLE IF NOT EXISTS id_counters (
    name TEXT PRIMARY KEY,
    seq  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS countries_currency_idx   ON countries(currency_code);
CREATE INDEX IF NOT EXISTS countries_gdp_idx        ON countries(estimated_gdp);
CREATE INDEX IF NOT EXISTS countries_population_idx ON countries(population);

PRAGMA user_version = 1;
";
