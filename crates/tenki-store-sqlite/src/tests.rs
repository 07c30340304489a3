//! Integration tests for `SqliteStore` against a temporary database file.

use tempfile::TempDir;
use tenki_core::{
  area::Municipality,
  forecast::{ForecastEntry, NO_WAVE_DATA},
  store::ForecastStore,
  taxonomy::Taxonomy,
};

use crate::SqliteStore;

/// The directory must outlive the store, so both are returned.
async fn store() -> (TempDir, SqliteStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = SqliteStore::open(dir.path().join("forecast_data.db"))
    .await
    .expect("open store");
  (dir, store)
}

fn kushiro() -> Municipality {
  Municipality {
    code:            "0120300".into(),
    name:            "釧路地方".into(),
    prefecture_code: "014100".into(),
  }
}

fn entry(date: &str, weather: &str) -> ForecastEntry {
  ForecastEntry {
    area_code: "0120300".into(),
    date:      date.into(),
    weather:   weather.into(),
    wind:      "北の風".into(),
    wave:      NO_WAVE_DATA.into(),
  }
}

fn three_days() -> Vec<ForecastEntry> {
  vec![
    entry("2024-06-01T00:00:00Z", "晴れ"),
    entry("2024-06-02T00:00:00Z", "晴れ"),
    entry("2024-06-03T00:00:00Z", "雨"),
  ]
}

const DOC: &str = r#"{
  "centers": {
    "010100": { "name": "北海道地方", "children": ["014100", "016000"] },
    "010300": { "children": ["130000"] }
  },
  "offices": {
    "014100": { "name": "釧路・根室地方", "children": ["0120300"] },
    "130000": { "name": "東京都", "children": ["130010"] }
  }
}"#;

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_schema_is_idempotent() {
  let (_dir, s) = store().await;
  s.ensure_schema().await.unwrap();
  s.ensure_schema().await.unwrap();

  // Reopening an existing file keeps its rows.
  s.record_forecast(&kushiro(), &three_days()).await.unwrap();
  let reopened = SqliteStore::open(s.path()).await.unwrap();
  assert_eq!(reopened.query_forecast("0120300", None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn open_in_missing_directory_fails() {
  let dir = tempfile::tempdir().unwrap();
  let result = SqliteStore::open(dir.path().join("no/such/dir/forecast.db")).await;
  assert!(result.is_err());
}

// ─── Taxonomy seeding ────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_taxonomy_inserts_once() {
  let (_dir, s) = store().await;
  let taxonomy = Taxonomy::from_json(DOC).unwrap();

  s.seed_taxonomy(&taxonomy).await.unwrap();
  s.seed_taxonomy(&taxonomy).await.unwrap();

  let snap = s.snapshot().await.unwrap();
  assert_eq!(snap.regions.len(), 2);
  assert_eq!(snap.regions[1].name, "Unknown");
  assert_eq!(snap.prefectures.len(), 3);

  let unnamed = snap
    .prefectures
    .iter()
    .find(|p| p.code == "016000")
    .unwrap();
  assert_eq!(unnamed.name, "Unnamed Area");
  assert_eq!(unnamed.region_code, "010100");
}

// ─── Forecasts ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_and_query_in_insertion_order() {
  let (_dir, s) = store().await;
  s.record_forecast(&kushiro(), &three_days()).await.unwrap();

  let rows = s.query_forecast("0120300", None).await.unwrap();
  assert_eq!(rows, three_days());

  let snap = s.snapshot().await.unwrap();
  assert_eq!(snap.areas, vec![kushiro()]);
}

#[tokio::test]
async fn recording_twice_doubles_the_rows() {
  let (_dir, s) = store().await;
  s.record_forecast(&kushiro(), &three_days()).await.unwrap();
  let once = s.query_forecast("0120300", None).await.unwrap().len();

  s.record_forecast(&kushiro(), &three_days()).await.unwrap();
  let twice = s.query_forecast("0120300", None).await.unwrap().len();

  assert_eq!(once, 3);
  assert_eq!(twice, 2 * once);

  // Each date now has two rows; the area row is not duplicated.
  let day = s
    .query_forecast("0120300", Some("2024-06-02T00:00:00Z"))
    .await
    .unwrap();
  assert_eq!(day.len(), 2);
  assert_eq!(s.snapshot().await.unwrap().areas.len(), 1);
}

#[tokio::test]
async fn query_filters_by_area_and_date() {
  let (_dir, s) = store().await;
  s.record_forecast(&kushiro(), &three_days()).await.unwrap();

  let other = Municipality {
    code:            "130010".into(),
    name:            "東京地方".into(),
    prefecture_code: "130000".into(),
  };
  let mut tokyo = entry("2024-06-01T00:00:00Z", "くもり");
  tokyo.area_code = other.code.clone();
  s.record_forecast(&other, &[tokyo.clone()]).await.unwrap();

  let day = s
    .query_forecast("0120300", Some("2024-06-03T00:00:00Z"))
    .await
    .unwrap();
  assert_eq!(day, vec![entry("2024-06-03T00:00:00Z", "雨")]);

  assert_eq!(s.query_forecast("130010", None).await.unwrap(), vec![tokyo]);
  assert!(s.query_forecast("0120300", Some("1999-01-01")).await.unwrap().is_empty());
  assert!(s.query_forecast("nowhere", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn known_dates_are_distinct_and_sorted() {
  let (_dir, s) = store().await;
  let mut later = three_days();
  later.reverse();
  s.record_forecast(&kushiro(), &later).await.unwrap();
  s.record_forecast(&kushiro(), &three_days()).await.unwrap();

  let dates = s.known_dates("0120300").await.unwrap();
  assert_eq!(dates, [
    "2024-06-01T00:00:00Z",
    "2024-06-02T00:00:00Z",
    "2024-06-03T00:00:00Z"
  ]);
  assert!(s.known_dates("nowhere").await.unwrap().is_empty());
}

#[tokio::test]
async fn foreign_keys_are_not_enforced() {
  let (_dir, s) = store().await;
  let enforced: i64 = s
    .with_conn(|conn| Ok(conn.pragma_query_value(None, "foreign_keys", |r| r.get(0))?))
    .await
    .unwrap();
  assert_eq!(enforced, 0);

  // Nothing seeded: neither the prefecture nor the region exists.
  let orphan = Municipality {
    code:            "9999999".into(),
    name:            "どこか".into(),
    prefecture_code: "999900".into(),
  };
  let mut row = entry("2024-06-01T00:00:00Z", "晴れ");
  row.area_code = orphan.code.clone();
  s.record_forecast(&orphan, &[row.clone()]).await.unwrap();

  let snap = s.snapshot().await.unwrap();
  assert!(snap.prefectures.is_empty());
  assert_eq!(snap.areas, vec![orphan]);
  assert_eq!(snap.forecasts, vec![row]);
}

#[tokio::test]
async fn empty_forecast_still_records_the_area() {
  let (_dir, s) = store().await;
  s.record_forecast(&kushiro(), &[]).await.unwrap();
  let snap = s.snapshot().await.unwrap();
  assert_eq!(snap.areas.len(), 1);
  assert!(snap.forecasts.is_empty());
}
