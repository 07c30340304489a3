//! Plain-text rendering of forecast entries.

use chrono::{DateTime, Datelike, Weekday};

use crate::{area::Municipality, forecast::ForecastEntry};

/// Shown when a stored-date query returns no rows.
pub const NO_DATA_FOR_DATE: &str = "選択された日付にデータが見つかりませんでした。";

const RULE: &str = "---------------------------";

/// Render `entries` under a heading naming `area`.
pub fn format_forecast(area: &Municipality, entries: &[ForecastEntry]) -> String {
  let mut out = format!("地域: {}（{}）\n", area.name, area.code);
  for entry in entries {
    out.push('\n');
    out.push_str(&format_entry(entry));
    out.push_str(RULE);
    out.push('\n');
  }
  out
}

/// Render one day as four labelled lines.
pub fn format_entry(entry: &ForecastEntry) -> String {
  format!(
    "日付: {}\n天気: {}\n風: {}\n波: {}\n",
    display_date(&entry.date),
    entry.weather,
    entry.wind,
    entry.wave
  )
}

/// `2024-06-01T00:00:00+09:00` → `2024-06-01 (土)`, keeping the timestamp's
/// own offset. Anything that is not RFC 3339 is returned unchanged.
pub fn display_date(raw: &str) -> String {
  match DateTime::parse_from_rfc3339(raw) {
    Ok(dt) => {
      let day = dt.date_naive();
      format!("{} ({})", day.format("%Y-%m-%d"), weekday_ja(day.weekday()))
    }
    Err(_) => raw.to_owned(),
  }
}

fn weekday_ja(day: Weekday) -> &'static str {
  match day {
    Weekday::Mon => "月",
    Weekday::Tue => "火",
    Weekday::Wed => "水",
    Weekday::Thu => "木",
    Weekday::Fri => "金",
    Weekday::Sat => "土",
    Weekday::Sun => "日",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::forecast::NO_WAVE_DATA;

  fn entry(date: &str) -> ForecastEntry {
    ForecastEntry {
      area_code: "0120300".into(),
      date:      date.into(),
      weather:   "晴れ".into(),
      wind:      "北の風".into(),
      wave:      NO_WAVE_DATA.into(),
    }
  }

  #[test]
  fn dates_keep_their_own_offset() {
    assert_eq!(display_date("2024-06-01T00:00:00Z"), "2024-06-01 (土)");
    assert_eq!(display_date("2024-06-02T05:00:00+09:00"), "2024-06-02 (日)");
    assert_eq!(display_date("tomorrow"), "tomorrow");
  }

  #[test]
  fn forecast_has_heading_and_one_block_per_day() {
    let area = Municipality {
      code:            "0120300".into(),
      name:            "釧路地方".into(),
      prefecture_code: "014100".into(),
    };
    let text = format_forecast(&area, &[entry("2024-06-01T00:00:00Z"), entry("x")]);
    assert!(text.starts_with("地域: 釧路地方（0120300）\n"));
    assert_eq!(text.matches(RULE).count(), 2);
    assert!(text.contains("日付: 2024-06-01 (土)\n天気: 晴れ\n風: 北の風\n波: 情報なし\n"));
    assert!(text.contains("日付: x\n"));
  }
}
