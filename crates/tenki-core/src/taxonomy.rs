//! The area document: regions → prefectures → municipality codes.
//!
//! Loaded once at startup and never mutated afterwards. The document is the
//! agency's `area.json`; only the `centers` and `offices` tables are read.

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use crate::{
  Error, Result,
  area::{Prefecture, Region, UNKNOWN_REGION, UNNAMED_AREA},
};

/// One node of either table: a display name plus child codes.
#[derive(Debug, Clone, Default, Deserialize)]
struct Node {
  #[serde(default)]
  name:     Option<String>,
  #[serde(default)]
  children: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Document {
  #[serde(default)]
  offices: BTreeMap<String, Node>,
  #[serde(default)]
  centers: BTreeMap<String, Node>,
}

/// In-memory lookup tables keyed by code.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
  /// Region code → node whose children are prefecture codes.
  centers: BTreeMap<String, Node>,
  /// Prefecture code → node whose children are municipality codes.
  offices: BTreeMap<String, Node>,
}

impl Taxonomy {
  /// Read and parse the document at `path`.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Configuration {
      path: path.to_path_buf(),
      source,
    })?;
    let taxonomy = Self::from_json(&raw)?;
    tracing::info!(
      path = %path.display(),
      regions = taxonomy.centers.len(),
      prefectures = taxonomy.offices.len(),
      "loaded area document"
    );
    Ok(taxonomy)
  }

  /// Parse an in-memory document.
  pub fn from_json(raw: &str) -> Result<Self> {
    let doc: Document = serde_json::from_str(raw).map_err(Error::MalformedTaxonomy)?;
    Ok(Self { centers: doc.centers, offices: doc.offices })
  }

  /// All regions, in code order.
  pub fn regions(&self) -> Vec<Region> {
    self
      .centers
      .iter()
      .map(|(code, node)| Region {
        code: code.clone(),
        name: node.name.clone().unwrap_or_else(|| UNKNOWN_REGION.to_owned()),
      })
      .collect()
  }

  /// The prefectures listed under `region_code`, in document order.
  ///
  /// Returns an empty list for an unknown region.
  pub fn prefectures_of(&self, region_code: &str) -> Vec<Prefecture> {
    self
      .centers
      .get(region_code)
      .map(|node| {
        node
          .children
          .iter()
          .map(|code| self.prefecture(code, region_code))
          .collect()
      })
      .unwrap_or_default()
  }

  /// Every (region, prefecture) pair in the document.
  pub fn prefectures(&self) -> Vec<Prefecture> {
    self
      .centers
      .keys()
      .flat_map(|region| self.prefectures_of(region))
      .collect()
  }

  /// Municipality codes listed under `prefecture_code`.
  pub fn municipality_codes(&self, prefecture_code: &str) -> &[String] {
    self
      .offices
      .get(prefecture_code)
      .map(|node| node.children.as_slice())
      .unwrap_or_default()
  }

  fn prefecture(&self, code: &str, region_code: &str) -> Prefecture {
    let name = self
      .offices
      .get(code)
      .and_then(|node| node.name.clone())
      .unwrap_or_else(|| UNNAMED_AREA.to_owned());
    Prefecture {
      code: code.to_owned(),
      name,
      region_code: region_code.to_owned(),
    }
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  pub(crate) const DOC: &str = r#"{
    "centers": {
      "010100": { "name": "北海道地方", "enName": "Hokkaido", "children": ["014100", "016000"] },
      "010300": { "name": "関東甲信地方", "children": ["130000", "999999"] },
      "010900": { "children": [] }
    },
    "offices": {
      "014100": { "name": "釧路・根室地方", "parent": "010100", "children": ["0120300", "014020"] },
      "016000": { "name": "石狩・空知・後志地方", "children": ["016010"] },
      "130000": { "name": "東京都", "children": ["130010", "130020"] }
    },
    "class10s": {}
  }"#;

  #[test]
  fn regions_are_code_ordered_with_fallback_name() {
    let t = Taxonomy::from_json(DOC).unwrap();
    let regions = t.regions();
    let codes: Vec<_> = regions.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, ["010100", "010300", "010900"]);
    assert_eq!(regions[0].name, "北海道地方");
    assert_eq!(regions[2].name, UNKNOWN_REGION);
  }

  #[test]
  fn prefectures_keep_document_order_and_label_unknown_offices() {
    let t = Taxonomy::from_json(DOC).unwrap();
    let prefs = t.prefectures_of("010300");
    assert_eq!(prefs.len(), 2);
    assert_eq!(prefs[0].name, "東京都");
    assert_eq!(prefs[1].code, "999999");
    assert_eq!(prefs[1].name, UNNAMED_AREA);
    assert!(prefs.iter().all(|p| p.region_code == "010300"));
  }

  #[test]
  fn unknown_codes_give_empty_lookups() {
    let t = Taxonomy::from_json(DOC).unwrap();
    assert!(t.prefectures_of("nope").is_empty());
    assert!(t.municipality_codes("nope").is_empty());
  }

  #[test]
  fn all_prefectures_span_every_region() {
    let t = Taxonomy::from_json(DOC).unwrap();
    assert_eq!(t.prefectures().len(), 4);
    assert_eq!(t.municipality_codes("014100"), ["0120300", "014020"]);
  }

  #[test]
  fn missing_tables_default_to_empty() {
    let t = Taxonomy::from_json("{}").unwrap();
    assert!(t.regions().is_empty());
  }

  #[test]
  fn malformed_document_is_rejected() {
    let err = Taxonomy::from_json(r#"{"centers": []}"#).unwrap_err();
    assert!(matches!(err, Error::MalformedTaxonomy(_)));
  }

  #[test]
  fn missing_file_is_a_configuration_error() {
    let err = Taxonomy::load("/definitely/not/here/area.json").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
  }
}
