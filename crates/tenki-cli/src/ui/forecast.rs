//! Forecast pane — right panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

/// Render the forecast text into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" 天気予報 ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if app.output.is_empty() {
    let hint = Paragraph::new("Choose a region, prefecture and area.")
      .style(Style::default().fg(Color::DarkGray))
      .block(block);
    f.render_widget(hint, area);
    return;
  }

  f.render_widget(
    Paragraph::new(app.output.as_str())
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((app.scroll, 0)),
    area,
  );
}
