//! SQL schema for the tenki SQLite cache.
//!
//! There is no schema version; `CREATE TABLE IF NOT EXISTS` makes the batch
//! safe to run on every startup. Foreign keys are declared but not enforced:
//! every connection turns `PRAGMA foreign_keys` off, so an area may be
//! recorded before its prefecture is known.

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS regions (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS prefectures (
    code        TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    region_code TEXT REFERENCES regions(code)
);

CREATE TABLE IF NOT EXISTS areas (
    code            TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    prefecture_code TEXT REFERENCES prefectures(code)
);

-- Append-only. Repeated fetches for the same (area_code, date) add rows;
-- there is deliberately no uniqueness constraint here.
CREATE TABLE IF NOT EXISTS weather (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    area_code TEXT REFERENCES areas(code),
    date      TEXT,
    weather   TEXT,
    wind      TEXT,
    wave      TEXT
);

CREATE INDEX IF NOT EXISTS weather_area_idx ON weather(area_code, date);
";
