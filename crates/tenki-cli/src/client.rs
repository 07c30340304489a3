//! Async HTTP client for the agency's per-prefecture forecast documents.

use std::{collections::BTreeMap, time::Duration};

use anyhow::Context;
use reqwest::{Client, StatusCode};
use tenki_core::forecast::{self, ForecastEntry, Report};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://www.jma.go.jp/bosai/forecast/data/forecast";

/// Connection settings for the forecast endpoint.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_owned(),
      timeout:  Duration::from_secs(30),
    }
  }
}

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Network(#[from] reqwest::Error),

  #[error("GET {url} → {status}")]
  Status { url: String, status: StatusCode },

  #[error(transparent)]
  Parse(#[from] tenki_core::Error),
}

/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct ForecastClient {
  client: Client,
  config: ClientConfig,
}

impl ForecastClient {
  pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .user_agent(concat!("tenki/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, prefecture_code: &str) -> String {
    format!(
      "{}/{}.json",
      self.config.base_url.trim_end_matches('/'),
      prefecture_code
    )
  }

  /// `GET <base>/<prefecture>.json`, parsed into reports.
  async fn fetch_reports(&self, prefecture_code: &str) -> Result<Vec<Report>, FetchError> {
    let url = self.url(prefecture_code);
    tracing::debug!(%url, "fetching forecast document");

    let resp = self.client.get(&url).send().await?;
    let status = resp.status();
    if !status.is_success() {
      return Err(FetchError::Status { url, status });
    }
    let body = resp.text().await?;
    Ok(forecast::parse_reports(&body)?)
  }

  /// The next three days for `municipality_code`; empty when the prefecture's
  /// document does not mention it.
  pub async fn fetch_forecast(
    &self,
    prefecture_code: &str,
    municipality_code: &str,
  ) -> Result<Vec<ForecastEntry>, FetchError> {
    let reports = self.fetch_reports(prefecture_code).await?;
    Ok(forecast::forecast_entries(&reports, municipality_code)?)
  }

  /// Municipality code → display name, for labelling the third selector.
  pub async fn fetch_municipality_names(
    &self,
    prefecture_code: &str,
  ) -> Result<BTreeMap<String, String>, FetchError> {
    let reports = self.fetch_reports(prefecture_code).await?;
    Ok(forecast::area_names(&reports)?)
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use tenki_core::forecast::NO_WAVE_DATA;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  use super::*;

  /// Prefecture document for 014100 with one inland and one coastal area.
  pub(crate) fn payload() -> serde_json::Value {
    serde_json::json!([
      {
        "publishingOffice": "釧路地方気象台",
        "timeSeries": [
          {
            "timeDefines": [
              "2024-06-01T00:00:00Z",
              "2024-06-02T00:00:00Z",
              "2024-06-03T00:00:00Z"
            ],
            "areas": [
              {
                "area": { "name": "釧路地方", "code": "0120300" },
                "weathers": ["晴れ", "晴れ", "雨"],
                "winds": ["北の風", "北の風", "南の風"]
              },
              {
                "area": { "name": "根室地方", "code": "014020" },
                "weathers": ["くもり", "くもり", "くもり"],
                "winds": ["東の風", "東の風", "東の風"],
                "waves": ["1メートル", "1メートル", "2メートル"]
              }
            ]
          }
        ]
      }
    ])
  }

  pub(crate) async fn mount(server: &MockServer, prefecture: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
      .and(path(format!("/{prefecture}.json")))
      .respond_with(template)
      .mount(server)
      .await;
  }

  pub(crate) fn client(server: &MockServer) -> ForecastClient {
    ForecastClient::new(ClientConfig {
      base_url: server.uri(),
      timeout:  Duration::from_secs(5),
    })
    .unwrap()
  }

  #[tokio::test]
  async fn fetches_three_days_without_waves() {
    let server = MockServer::start().await;
    mount(&server, "014100", ResponseTemplate::new(200).set_body_json(payload())).await;

    let entries = client(&server)
      .fetch_forecast("014100", "0120300")
      .await
      .unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].date, "2024-06-01T00:00:00Z");
    assert_eq!(entries[2].weather, "雨");
    assert_eq!(entries[2].wind, "南の風");
    assert!(entries.iter().all(|e| e.wave == NO_WAVE_DATA));
  }

  #[tokio::test]
  async fn unknown_municipality_is_empty() {
    let server = MockServer::start().await;
    mount(&server, "014100", ResponseTemplate::new(200).set_body_json(payload())).await;

    let entries = client(&server)
      .fetch_forecast("014100", "0000000")
      .await
      .unwrap();
    assert!(entries.is_empty());
  }

  #[tokio::test]
  async fn names_are_resolved_from_the_document() {
    let server = MockServer::start().await;
    mount(&server, "014100", ResponseTemplate::new(200).set_body_json(payload())).await;

    let names = client(&server).fetch_municipality_names("014100").await.unwrap();
    assert_eq!(names.get("014020").map(String::as_str), Some("根室地方"));
    assert_eq!(names.len(), 2);
  }

  #[tokio::test]
  async fn non_success_status_is_a_network_failure() {
    let server = MockServer::start().await;
    mount(&server, "014100", ResponseTemplate::new(404)).await;

    let err = client(&server)
      .fetch_forecast("014100", "0120300")
      .await
      .unwrap_err();
    assert!(matches!(err, FetchError::Status { status, .. } if status == StatusCode::NOT_FOUND));
  }

  #[tokio::test]
  async fn malformed_body_is_a_parse_failure() {
    let server = MockServer::start().await;
    mount(
      &server,
      "014100",
      ResponseTemplate::new(200).set_body_json(serde_json::json!({ "oops": true })),
    )
    .await;

    let err = client(&server)
      .fetch_municipality_names("014100")
      .await
      .unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
  }

  #[test]
  fn url_joins_base_and_code() {
    let client = ForecastClient::new(ClientConfig {
      base_url: "http://example.test/forecast/".into(),
      ..ClientConfig::default()
    })
    .unwrap();
    assert_eq!(client.url("130000"), "http://example.test/forecast/130000.json");
  }
}
