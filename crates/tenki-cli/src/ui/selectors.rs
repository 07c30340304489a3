//! The cascading selectors — left column.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, List, ListItem, ListState},
};
use strum::IntoEnumIterator;
use tenki_core::{render, selection::Level};

use crate::app::App;

fn title(level: Level) -> &'static str {
  match level {
    Level::Region => " 地方を選択 ",
    Level::Prefecture => " 都道府県を選択 ",
    Level::Municipality => " 市区町村を選択 ",
    Level::Date => " 日付を選択 ",
  }
}

/// Render every visible selector, stacked top to bottom.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let visible: Vec<Level> = Level::iter()
    .filter(|l| app.selection.is_visible(*l))
    .collect();

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints(visible.iter().map(|_| Constraint::Fill(1)))
    .split(area);

  for (level, chunk) in visible.into_iter().zip(chunks.iter()) {
    draw_level(f, *chunk, app, level);
  }
}

fn draw_level(f: &mut Frame, area: Rect, app: &App, level: Level) {
  let focused = app.focus == level;
  let chosen = app.selection.chosen(level);

  let block = Block::default()
    .title(title(level))
    .borders(Borders::ALL)
    .border_style(if focused {
      Style::default().fg(Color::Cyan)
    } else {
      Style::default().fg(Color::DarkGray)
    });

  let items: Vec<ListItem> = app
    .selection
    .options(level)
    .iter()
    .map(|choice| {
      let label = if level == Level::Date {
        render::display_date(&choice.label)
      } else {
        choice.label.clone()
      };
      let marker = if chosen == Some(choice.code.as_str()) { "● " } else { "  " };
      ListItem::new(Line::from(format!("{marker}{label}")))
    })
    .collect();

  let mut state = ListState::default();
  if focused && !items.is_empty() {
    state.select(Some(app.cursors[level.index()]));
  }

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    area,
    &mut state,
  );
}
