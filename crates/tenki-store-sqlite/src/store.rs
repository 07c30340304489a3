//! [`SqliteStore`] — the SQLite implementation of [`ForecastStore`].

use std::path::{Path, PathBuf};

use tenki_core::{
  area::{Municipality, Prefecture, Region},
  forecast::ForecastEntry,
  store::{ForecastStore, StoreSnapshot},
  taxonomy::Taxonomy,
};

use crate::{Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A forecast cache backed by a single SQLite file.
///
/// Holds only the path: every operation opens its own connection and closes
/// it before returning, whether or not the operation succeeded.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  /// Remember `path` and make sure the tables exist.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self { path: path.as_ref().to_path_buf() };
    store.ensure_schema().await?;
    Ok(store)
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Run `f` on a fresh connection, then close it.
  ///
  /// Bundled SQLite enables foreign keys by default; they are switched off
  /// on every connection so areas and forecasts can be recorded before (or
  /// without) the taxonomy rows they reference.
  pub(crate) async fn with_conn<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let conn = tokio_rusqlite::Connection::open(&self.path).await?;
    let result = conn
      .call(move |conn| {
        conn.pragma_update(None, "foreign_keys", false)?;
        f(conn)
      })
      .await;
    let closed = conn.close().await;
    let value = result?;
    closed?;
    Ok(value)
  }
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ForecastEntry> {
  Ok(ForecastEntry {
    area_code: row.get(0)?,
    date:      row.get(1)?,
    weather:   row.get(2)?,
    wind:      row.get(3)?,
    wave:      row.get(4)?,
  })
}

// ─── ForecastStore impl ──────────────────────────────────────────────────────

impl ForecastStore for SqliteStore {
  type Error = crate::Error;

  async fn ensure_schema(&self) -> Result<()> {
    self
      .with_conn(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  async fn seed_taxonomy<'a>(&'a self, taxonomy: &'a Taxonomy) -> Result<()> {
    let regions = taxonomy.regions();
    let prefectures = taxonomy.prefectures();
    tracing::debug!(
      regions = regions.len(),
      prefectures = prefectures.len(),
      "seeding taxonomy"
    );

    self
      .with_conn(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut insert_region =
            tx.prepare("INSERT OR IGNORE INTO regions (code, name) VALUES (?1, ?2)")?;
          for r in &regions {
            insert_region.execute(rusqlite::params![r.code, r.name])?;
          }

          let mut insert_prefecture = tx.prepare(
            "INSERT OR IGNORE INTO prefectures (code, name, region_code) VALUES (?1, ?2, ?3)",
          )?;
          for p in &prefectures {
            insert_prefecture.execute(rusqlite::params![p.code, p.name, p.region_code])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await
  }

  async fn record_forecast<'a>(
    &'a self,
    area: &'a Municipality,
    entries: &'a [ForecastEntry],
  ) -> Result<()> {
    let area = area.clone();
    let entries = entries.to_vec();
    tracing::debug!(area = %area.code, rows = entries.len(), "recording forecast");

    self
      .with_conn(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT OR IGNORE INTO areas (code, name, prefecture_code) VALUES (?1, ?2, ?3)",
          rusqlite::params![area.code, area.name, area.prefecture_code],
        )?;
        {
          let mut insert = tx.prepare(
            "INSERT INTO weather (area_code, date, weather, wind, wave)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for e in &entries {
            insert.execute(rusqlite::params![e.area_code, e.date, e.weather, e.wind, e.wave])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await
  }

  async fn query_forecast<'a>(
    &'a self,
    area_code: &'a str,
    date: Option<&'a str>,
  ) -> Result<Vec<ForecastEntry>> {
    let area_code = area_code.to_owned();
    let date = date.map(str::to_owned);

    self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT area_code, date, weather, wind, wave FROM weather
           WHERE area_code = ?1 AND (?2 IS NULL OR date = ?2)
           ORDER BY id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![area_code, date], entry_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
  }

  async fn known_dates<'a>(&'a self, area_code: &'a str) -> Result<Vec<String>> {
    let area_code = area_code.to_owned();

    self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT date FROM weather WHERE area_code = ?1 ORDER BY date",
        )?;
        let dates = stmt
          .query_map(rusqlite::params![area_code], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(dates)
      })
      .await
  }

  async fn snapshot(&self) -> Result<StoreSnapshot> {
    self
      .with_conn(|conn| {
        let regions = conn
          .prepare("SELECT code, name FROM regions ORDER BY code")?
          .query_map([], |r| Ok(Region { code: r.get(0)?, name: r.get(1)? }))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let prefectures = conn
          .prepare("SELECT code, name, region_code FROM prefectures ORDER BY code")?
          .query_map([], |r| {
            Ok(Prefecture {
              code:        r.get(0)?,
              name:        r.get(1)?,
              region_code: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let areas = conn
          .prepare("SELECT code, name, prefecture_code FROM areas ORDER BY code")?
          .query_map([], |r| {
            Ok(Municipality {
              code:            r.get(0)?,
              name:            r.get(1)?,
              prefecture_code: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let forecasts = conn
          .prepare("SELECT area_code, date, weather, wind, wave FROM weather ORDER BY id")?
          .query_map([], entry_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(StoreSnapshot { regions, prefectures, areas, forecasts })
      })
      .await
  }
}
