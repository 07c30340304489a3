//! Error types for `tenki-core`.

use std::path::PathBuf;

use thiserror::Error;

use crate::selection::Level;

#[derive(Debug, Error)]
pub enum Error {
  /// The area document could not be read. Fatal to startup.
  #[error("cannot read area document {}: {source}", .path.display())]
  Configuration {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The area document was read but is not the expected JSON shape.
  #[error("malformed area document: {0}")]
  MalformedTaxonomy(#[source] serde_json::Error),

  /// The forecast payload did not have the expected structure.
  #[error("malformed forecast payload: {0}")]
  Parse(String),

  #[error("no prefectures listed for region {0}")]
  NoPrefectures(String),

  #[error("no municipalities listed for prefecture {0}")]
  NoMunicipalities(String),

  #[error("{code:?} is not a {level} option")]
  UnknownChoice { level: Level, code: String },

  #[error("cannot choose a {0} before its parent")]
  OutOfOrder(Level),
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self { Error::Parse(e.to_string()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
