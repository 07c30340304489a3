//! Forecast payloads and their projection into [`ForecastEntry`] rows.
//!
//! The agency publishes one document per prefecture: a JSON array of
//! reports. The first report's first time series carries the short-range
//! forecast; its `timeDefines` are parallel to each area's `weathers`,
//! `winds` and (for coastal areas) `waves` arrays.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of forecast days projected from each payload.
pub const FORECAST_DAYS: usize = 3;

/// Substituted for every day when an area carries no `waves` array.
pub const NO_WAVE_DATA: &str = "情報なし";

/// One day's forecast for a municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
  pub area_code: String,
  /// ISO-8601 timestamp exactly as published.
  pub date:      String,
  pub weather:   String,
  pub wind:      String,
  pub wave:      String,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Report {
  #[serde(rename = "timeSeries")]
  pub time_series: Vec<TimeSeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeries {
  #[serde(rename = "timeDefines", default)]
  pub time_defines: Vec<String>,
  #[serde(default)]
  pub areas:        Vec<AreaSeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaSeries {
  pub area:     AreaRef,
  #[serde(default)]
  pub weathers: Vec<String>,
  #[serde(default)]
  pub winds:    Vec<String>,
  #[serde(default)]
  pub waves:    Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaRef {
  pub code: String,
  pub name: String,
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse a raw response body into its reports.
pub fn parse_reports(body: &str) -> Result<Vec<Report>> { Ok(serde_json::from_str(body)?) }

/// `reports[0].timeSeries[0]`, the short-range series.
fn short_range(reports: &[Report]) -> Result<&TimeSeries> {
  reports
    .first()
    .ok_or_else(|| Error::Parse("payload contains no reports".into()))?
    .time_series
    .first()
    .ok_or_else(|| Error::Parse("report contains no time series".into()))
}

/// Project the first [`FORECAST_DAYS`] days for `area_code`.
///
/// An area code absent from the payload yields an empty list rather than an
/// error.
pub fn forecast_entries(reports: &[Report], area_code: &str) -> Result<Vec<ForecastEntry>> {
  let series = short_range(reports)?;

  let Some(area) = series.areas.iter().find(|a| a.area.code == area_code) else {
    tracing::debug!(area_code, "area not present in forecast payload");
    return Ok(Vec::new());
  };

  (0..FORECAST_DAYS)
    .map(|day| -> Result<ForecastEntry> {
      let wave = match &area.waves {
        Some(waves) => pick(waves, "waves", day)?.clone(),
        None => NO_WAVE_DATA.to_owned(),
      };
      Ok(ForecastEntry {
        area_code: area_code.to_owned(),
        date: pick(&series.time_defines, "timeDefines", day)?.clone(),
        weather: pick(&area.weathers, "weathers", day)?.clone(),
        wind: pick(&area.winds, "winds", day)?.clone(),
        wave,
      })
    })
    .collect()
}

/// Municipality code → display name for every area in the short-range series.
pub fn area_names(reports: &[Report]) -> Result<BTreeMap<String, String>> {
  Ok(
    short_range(reports)?
      .areas
      .iter()
      .map(|a| (a.area.code.clone(), a.area.name.clone()))
      .collect(),
  )
}

fn pick<'a>(values: &'a [String], key: &str, day: usize) -> Result<&'a String> {
  values
    .get(day)
    .ok_or_else(|| Error::Parse(format!("{key}[{day}] is missing")))
}
