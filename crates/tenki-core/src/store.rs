//! The `ForecastStore` trait — the optional local cache of forecasts.
//!
//! Implemented by storage backends (e.g. `tenki-store-sqlite`). Forecast rows
//! are append-only: recording the same forecast twice stores it twice.

use std::future::Future;

use crate::{
  area::{Municipality, Prefecture, Region},
  forecast::ForecastEntry,
  taxonomy::Taxonomy,
};

/// Every row of every table, for inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
  pub regions:     Vec<Region>,
  pub prefectures: Vec<Prefecture>,
  /// Area rows; `prefecture_code` is empty when it was never recorded.
  pub areas:       Vec<Municipality>,
  pub forecasts:   Vec<ForecastEntry>,
}

pub trait ForecastStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the tables if they do not exist. Safe to call repeatedly.
  fn ensure_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert any region and prefecture rows not already present.
  fn seed_taxonomy<'a>(
    &'a self,
    taxonomy: &'a Taxonomy,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Insert the area row if absent, then append every entry.
  fn record_forecast<'a>(
    &'a self,
    area: &'a Municipality,
    entries: &'a [ForecastEntry],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Stored entries for an area in insertion order, optionally restricted to
  /// one exact date.
  fn query_forecast<'a>(
    &'a self,
    area_code: &'a str,
    date: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<ForecastEntry>, Self::Error>> + Send + 'a;

  /// Distinct stored dates for an area, ascending.
  fn known_dates<'a>(
    &'a self,
    area_code: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  fn snapshot(&self) -> impl Future<Output = Result<StoreSnapshot, Self::Error>> + Send + '_;
}
