use crate::catalog::types::CatalogItem;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn draw_item_detail(frame: &mut Frame, area: Rect, item: &CatalogItem) {
  let block = Block::default()
    .title(format!(" #{} ", item.id))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let text = vec![
    Line::from(Span::styled(
      item.title.clone(),
      Style::default().add_modifier(Modifier::BOLD),
    )),
    Line::raw(""),
    Line::raw(item.subtitle.clone()),
  ];

  let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
  frame.render_widget(paragraph, area);
}
