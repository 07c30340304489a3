//! The cascading region → prefecture → municipality → date selection.
//!
//! [`Selection`] is a plain state object. Each transition validates its input
//! against the options currently offered and either leaves the state
//! untouched (returning an error) or applies the choice and resets every
//! level below it.

use std::collections::BTreeMap;

use strum::{Display, EnumIter};

use crate::{
  Error, Result,
  area::{Municipality, UNNAMED_AREA},
  taxonomy::Taxonomy,
};

/// One selector in the cascade, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
  Region,
  Prefecture,
  Municipality,
  Date,
}

impl Level {
  pub fn parent(self) -> Option<Level> {
    match self {
      Level::Region => None,
      Level::Prefecture => Some(Level::Region),
      Level::Municipality => Some(Level::Prefecture),
      Level::Date => Some(Level::Municipality),
    }
  }

  pub fn child(self) -> Option<Level> {
    match self {
      Level::Region => Some(Level::Prefecture),
      Level::Prefecture => Some(Level::Municipality),
      Level::Municipality => Some(Level::Date),
      Level::Date => None,
    }
  }

  /// Position from the top, for per-level arrays.
  pub fn index(self) -> usize { self as usize }
}

/// How far down the cascade the user has chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
  Initial,
  RegionChosen,
  PrefectureChosen,
  MunicipalityChosen,
  DateChosen,
}

/// One entry of a selector: the code submitted and the label shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
  pub code:  String,
  pub label: String,
}

#[derive(Debug, Clone, Default)]
struct Slot {
  options: Vec<Choice>,
  chosen:  Option<String>,
}

/// Selector contents and choices for all four levels.
#[derive(Debug, Clone)]
pub struct Selection {
  slots:      [Slot; 4],
  /// Whether the date level exists at all (caching variant).
  with_dates: bool,
}

impl Selection {
  /// A fresh selection offering every region in `taxonomy`.
  pub fn new(taxonomy: &Taxonomy, with_dates: bool) -> Self {
    let mut slots: [Slot; 4] = Default::default();
    slots[Level::Region.index()].options = taxonomy
      .regions()
      .into_iter()
      .map(|r| Choice { code: r.code, label: r.name })
      .collect();
    Self { slots, with_dates }
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  pub fn stage(&self) -> Stage {
    match self.chosen_levels() {
      0 => Stage::Initial,
      1 => Stage::RegionChosen,
      2 => Stage::PrefectureChosen,
      3 => Stage::MunicipalityChosen,
      _ => Stage::DateChosen,
    }
  }

  fn chosen_levels(&self) -> usize {
    self.slots.iter().take_while(|s| s.chosen.is_some()).count()
  }

  pub fn options(&self, level: Level) -> &[Choice] { &self.slots[level.index()].options }

  pub fn chosen(&self, level: Level) -> Option<&str> {
    self.slots[level.index()].chosen.as_deref()
  }

  /// A level is shown once its parent is chosen. The date level also
  /// requires the caching variant.
  pub fn is_visible(&self, level: Level) -> bool {
    if level == Level::Date && !self.with_dates {
      return false;
    }
    match level.parent() {
      None => true,
      Some(parent) => self.chosen(parent).is_some(),
    }
  }

  /// The option labelled for `code` at `level`, if currently offered.
  pub fn option(&self, level: Level, code: &str) -> Option<&Choice> {
    self.options(level).iter().find(|c| c.code == code)
  }

  /// The chosen municipality, labelled, if one is chosen.
  pub fn municipality(&self) -> Option<Municipality> {
    let code = self.chosen(Level::Municipality)?;
    let prefecture_code = self.chosen(Level::Prefecture)?;
    let label = self.option(Level::Municipality, code)?;
    Some(Municipality {
      code:            code.to_owned(),
      name:            label.label.clone(),
      prefecture_code: prefecture_code.to_owned(),
    })
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Choose a region and offer its prefectures.
  pub fn select_region(&mut self, taxonomy: &Taxonomy, code: &str) -> Result<()> {
    self.ensure_offered(Level::Region, code)?;
    let prefectures = taxonomy.prefectures_of(code);
    if prefectures.is_empty() {
      return Err(Error::NoPrefectures(code.to_owned()));
    }
    let options = prefectures
      .into_iter()
      .map(|p| Choice { code: p.code, label: p.name })
      .collect();
    self.apply(Level::Region, code, options);
    Ok(())
  }

  /// Choose a prefecture and offer its municipalities, labelled from `names`.
  pub fn select_prefecture(
    &mut self,
    taxonomy: &Taxonomy,
    code: &str,
    names: &BTreeMap<String, String>,
  ) -> Result<()> {
    self.ensure_offered(Level::Prefecture, code)?;
    let codes = taxonomy.municipality_codes(code);
    if codes.is_empty() {
      return Err(Error::NoMunicipalities(code.to_owned()));
    }
    let options = codes
      .iter()
      .map(|c| Choice {
        code:  c.clone(),
        label: names.get(c).cloned().unwrap_or_else(|| UNNAMED_AREA.to_owned()),
      })
      .collect();
    self.apply(Level::Prefecture, code, options);
    Ok(())
  }

  /// Choose a municipality. The date level is emptied until
  /// [`set_dates`](Self::set_dates) fills it.
  pub fn select_municipality(&mut self, code: &str) -> Result<Municipality> {
    self.ensure_offered(Level::Municipality, code)?;
    self.apply(Level::Municipality, code, Vec::new());
    // `ensure_offered` guarantees both lookups succeed.
    self
      .municipality()
      .ok_or(Error::OutOfOrder(Level::Municipality))
  }

  /// Offer previously stored dates for the chosen municipality.
  pub fn set_dates(&mut self, dates: Vec<String>) {
    if !self.is_visible(Level::Date) {
      return;
    }
    let slot = &mut self.slots[Level::Date.index()];
    slot.chosen = None;
    slot.options = dates
      .into_iter()
      .map(|d| Choice { label: d.clone(), code: d })
      .collect();
  }

  pub fn select_date(&mut self, date: &str) -> Result<()> {
    self.ensure_offered(Level::Date, date)?;
    self.slots[Level::Date.index()].chosen = Some(date.to_owned());
    Ok(())
  }

  fn ensure_offered(&self, level: Level, code: &str) -> Result<()> {
    if !self.is_visible(level) {
      return Err(Error::OutOfOrder(level));
    }
    if self.option(level, code).is_none() {
      return Err(Error::UnknownChoice { level, code: code.to_owned() });
    }
    Ok(())
  }

  /// Record `code` at `level`, hand `child_options` to the next level and
  /// clear everything further down.
  fn apply(&mut self, level: Level, code: &str, child_options: Vec<Choice>) {
    self.slots[level.index()].chosen = Some(code.to_owned());
    for slot in &mut self.slots[level.index() + 1..] {
      *slot = Slot::default();
    }
    if let Some(child) = level.child() {
      self.slots[child.index()].options = child_options;
    }
  }
}
