//! `tenki` — terminal UI for JMA 3-day forecasts.
//!
//! # Usage
//!
//! ```
//! tenki --areas ./areas.json
//! tenki --no-cache --base-url http://localhost:8080/forecast
//! tenki --dump
//! ```

mod app;
mod client;
mod config;
mod ui;

use std::{fs::OpenOptions, io, path::Path, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::ForecastClient;
use config::{Args, Settings};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tenki_core::{store::ForecastStore, taxonomy::Taxonomy};
use tenki_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let settings = Settings::load(Args::parse())?;

  // The TUI owns the terminal, so logs go to a file unless we are dumping.
  init_tracing((!settings.dump).then_some(settings.log_file.as_path()))?;

  if settings.dump {
    return dump(&settings).await;
  }

  // Without the area document there is nothing to show.
  let taxonomy = Taxonomy::load(&settings.areas).context("loading area document")?;

  let store = match &settings.db {
    Some(path) => open_store(path).await,
    None => None,
  };

  let client = ForecastClient::new(settings.client.clone())?;
  let app = App::new(taxonomy, client, store);
  app.seed_store().await;

  run(app).await
}

/// Initialise tracing to `log_file`, or to stderr when `None`.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();
  let builder = tracing_subscriber::fmt().with_env_filter(filter);

  match log_file {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
      builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    }
    None => builder.with_writer(io::stderr).init(),
  }
  Ok(())
}

/// Open the cache, degrading to no cache if it cannot be opened.
async fn open_store(path: &Path) -> Option<SqliteStore> {
  match SqliteStore::open(path).await {
    Ok(store) => {
      tracing::info!(path = %path.display(), "opened forecast cache");
      Some(store)
    }
    Err(e) => {
      tracing::warn!(path = %path.display(), error = %e, "cache unavailable; continuing without it");
      None
    }
  }
}

// ─── Dump ─────────────────────────────────────────────────────────────────────

/// Print every cached row, table by table. Only the cache is read; the area
/// document need not exist.
async fn dump(settings: &Settings) -> Result<()> {
  let path = settings.db.as_deref().context("the local cache is disabled")?;
  let store = SqliteStore::open(path)
    .await
    .with_context(|| format!("opening cache {}", path.display()))?;
  let snap = store.snapshot().await.context("reading cache")?;

  println!("cache: {}", store.path().display());
  println!("regions ({}):", snap.regions.len());
  for r in &snap.regions {
    println!("  {}  {}", r.code, r.name);
  }
  println!("prefectures ({}):", snap.prefectures.len());
  for p in &snap.prefectures {
    println!("  {}  {}  region={}", p.code, p.name, p.region_code);
  }
  println!("areas ({}):", snap.areas.len());
  for a in &snap.areas {
    println!("  {}  {}  prefecture={}", a.code, a.name, a.prefecture_code);
  }
  println!("weather ({}):", snap.forecasts.len());
  for e in &snap.forecasts {
    println!("  {}  {}  {} / {} / {}", e.area_code, e.date, e.weather, e.wind, e.wave);
  }
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run(mut app: App) -> Result<()> {
  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    // Release events (reported on some platforms) are ignored.
    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
