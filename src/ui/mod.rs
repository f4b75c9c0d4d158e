mod item_detail;
mod items;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  if let Some(item) = app.detail() {
    item_detail::draw_item_detail(frame, chunks[0], item);
  } else {
    items::draw_item_list(
      frame,
      chunks[0],
      app.items(),
      app.selected(),
      app.title(),
      app.is_loading(),
    );
  }

  draw_status_bar(frame, chunks[1], app);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = match app.error() {
    Some(error) => (format!(" {}", error), Style::default().fg(Color::Red)),
    None => {
      let hint = " j/k:nav  Enter:open  r:refresh  R:refetch  q:back/quit  Ctrl-C:quit";
      (hint.to_string(), Style::default().fg(Color::DarkGray))
    }
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
