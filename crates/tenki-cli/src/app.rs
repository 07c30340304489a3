//! Application state and key dispatcher.
//!
//! The cascade itself lives in [`Selection`]; this layer adds cursors and
//! focus, performs the fetches a transition needs, and turns failures into
//! status-bar messages. Every fetch is awaited inside the key handler, so
//! there is never more than one in flight.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tenki_core::{
  area::Municipality,
  forecast::ForecastEntry,
  render,
  selection::{Level, Selection},
  store::ForecastStore,
  taxonomy::Taxonomy,
};
use tenki_store_sqlite::SqliteStore;

use crate::client::ForecastClient;

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub taxonomy:   Taxonomy,
  pub selection:  Selection,

  /// Selector that receives navigation keys.
  pub focus:      Level,

  /// Cursor position within each level's options, indexed by [`Level::index`].
  pub cursors:    [usize; 4],

  /// Rendered forecast text for the right-hand pane.
  pub output:     String,
  pub scroll:     u16,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client:     ForecastClient,

  /// Local cache; `None` when caching is disabled.
  pub store:      Option<SqliteStore>,
}

impl App {
  pub fn new(taxonomy: Taxonomy, client: ForecastClient, store: Option<SqliteStore>) -> Self {
    let selection = Selection::new(&taxonomy, store.is_some());
    Self {
      taxonomy,
      selection,
      focus: Level::Region,
      cursors: [0; 4],
      output: String::new(),
      scroll: 0,
      status_msg: String::new(),
      client,
      store,
    }
  }

  // ── Cache ─────────────────────────────────────────────────────────────────

  /// Copy regions and prefectures into the cache.
  pub async fn seed_store(&self) {
    let Some(store) = &self.store else { return };
    if let Err(e) = store.seed_taxonomy(&self.taxonomy).await {
      tracing::warn!(error = %e, "failed to seed cache with area document");
    }
  }

  async fn record(&self, area: &Municipality, entries: &[ForecastEntry]) {
    let Some(store) = &self.store else { return };
    if let Err(e) = store.record_forecast(area, entries).await {
      tracing::warn!(area = %area.code, error = %e, "failed to cache forecast");
    }
  }

  async fn cached_dates(&self, area_code: &str) -> Vec<String> {
    let Some(store) = &self.store else { return Vec::new() };
    store.known_dates(area_code).await.unwrap_or_else(|e| {
      tracing::warn!(area = %area_code, error = %e, "failed to read cached dates");
      Vec::new()
    })
  }

  async fn cached_forecast(&self, area_code: &str, date: &str) -> Vec<ForecastEntry> {
    let Some(store) = &self.store else { return Vec::new() };
    store
      .query_forecast(area_code, Some(date))
      .await
      .unwrap_or_else(|e| {
        tracing::warn!(area = %area_code, date, error = %e, "failed to read cached forecast");
        Vec::new()
      })
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  fn fail(&mut self, msg: String) {
    tracing::warn!("{msg}");
    self.status_msg = msg;
  }

  /// Reset cursors below `level` and move focus to its child.
  fn advance(&mut self, level: Level) {
    for cursor in &mut self.cursors[level.index() + 1..] {
      *cursor = 0;
    }
    self.scroll = 0;
    self.status_msg.clear();
    if let Some(child) = level.child()
      && self.selection.is_visible(child)
      && !self.selection.options(child).is_empty()
    {
      self.focus = child;
    }
  }

  pub fn choose_region(&mut self, code: &str) {
    match self.selection.select_region(&self.taxonomy, code) {
      Ok(()) => {
        self.output.clear();
        self.advance(Level::Region);
      }
      Err(e) => self.fail(format!("No data for region: {e}")),
    }
  }

  pub async fn choose_prefecture(&mut self, code: &str) {
    if self.taxonomy.municipality_codes(code).is_empty() {
      self.fail(format!("No municipalities listed for prefecture {code}"));
      return;
    }

    let names = match self.client.fetch_municipality_names(code).await {
      Ok(names) => names,
      Err(e) => {
        self.fail(format!("Failed to fetch area names for {code}: {e}"));
        return;
      }
    };

    match self.selection.select_prefecture(&self.taxonomy, code, &names) {
      Ok(()) => {
        self.output.clear();
        self.advance(Level::Prefecture);
      }
      Err(e) => self.fail(e.to_string()),
    }
  }

  pub async fn choose_municipality(&mut self, code: &str) {
    let Some(prefecture) = self.selection.chosen(Level::Prefecture).map(str::to_owned) else {
      self.fail("Choose a prefecture first".into());
      return;
    };

    let entries = match self.client.fetch_forecast(&prefecture, code).await {
      Ok(entries) => entries,
      Err(e) => {
        self.fail(format!("Failed to fetch forecast for {code}: {e}"));
        return;
      }
    };

    let area = match self.selection.select_municipality(code) {
      Ok(area) => area,
      Err(e) => {
        self.fail(e.to_string());
        return;
      }
    };

    tracing::info!(area = %area.code, days = entries.len(), "fetched forecast");
    self.output = render::format_forecast(&area, &entries);

    if self.store.is_some() {
      self.record(&area, &entries).await;
      let dates = self.cached_dates(&area.code).await;
      self.selection.set_dates(dates);
    }

    self.advance(Level::Municipality);
    if entries.is_empty() {
      self.status_msg = format!("No forecast published for {}", area.name);
    }
  }

  pub async fn choose_date(&mut self, date: &str) {
    if let Err(e) = self.selection.select_date(date) {
      self.fail(e.to_string());
      return;
    }
    let Some(area) = self.selection.municipality() else { return };

    let rows = self.cached_forecast(&area.code, date).await;
    self.output = if rows.is_empty() {
      render::NO_DATA_FOR_DATE.to_owned()
    } else {
      render::format_forecast(&area, &rows)
    };
    self.scroll = 0;
    self.status_msg.clear();
  }

  /// Apply the option under the focused level's cursor.
  async fn choose_focused(&mut self) {
    let level = self.focus;
    let Some(code) = self
      .selection
      .options(level)
      .get(self.cursors[level.index()])
      .map(|c| c.code.clone())
    else {
      return;
    };

    match level {
      Level::Region => self.choose_region(&code),
      Level::Prefecture => self.choose_prefecture(&code).await,
      Level::Municipality => self.choose_municipality(&code).await,
      Level::Date => self.choose_date(&code).await,
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),

      // Navigation within the focused selector
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.selection.options(self.focus).len();
        let cursor = &mut self.cursors[self.focus.index()];
        if *cursor + 1 < len {
          *cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        let cursor = &mut self.cursors[self.focus.index()];
        *cursor = cursor.saturating_sub(1);
      }

      KeyCode::Enter => self.choose_focused().await,

      // Move between selectors
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        if let Some(parent) = self.focus.parent() {
          self.focus = parent;
        }
      }
      KeyCode::Right | KeyCode::Char('l') => {
        if let Some(child) = self.focus.child()
          && self.selection.is_visible(child)
          && !self.selection.options(child).is_empty()
        {
          self.focus = child;
        }
      }

      // Scroll the forecast pane
      KeyCode::PageDown => self.scroll = self.scroll.saturating_add(5),
      KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(5),

      _ => {}
    }
    Ok(true)
  }
}
