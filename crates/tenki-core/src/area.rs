//! Administrative areas — the three levels of the forecast taxonomy.
//!
//! Codes are the agency's own zero-padded identifiers and are kept as
//! strings; they are never treated numerically.

use serde::{Deserialize, Serialize};

/// Label used when a prefecture or municipality name cannot be resolved.
pub const UNNAMED_AREA: &str = "Unnamed Area";

/// Label used when a region entry carries no name.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Top-level grouping ("center" in the agency's taxonomy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
  pub code: String,
  pub name: String,
}

/// Second-level grouping ("office"); parent of municipalities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefecture {
  pub code:        String,
  pub name:        String,
  pub region_code: String,
}

/// The finest selectable location for which a forecast is issued.
///
/// The name is not part of the area document; it is resolved from the
/// forecast payload when the parent prefecture is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
  pub code:            String,
  pub name:            String,
  pub prefecture_code: String,
}
