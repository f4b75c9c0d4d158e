use crate::catalog::types::CatalogItem;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn draw_item_list(
  frame: &mut Frame,
  area: Rect,
  items: &[CatalogItem],
  selected: usize,
  title: &str,
  loading: bool,
) {
  let header = if loading {
    format!(" {} (loading...) ", title)
  } else {
    format!(" {} ({}) ", title, items.len())
  };

  let block = Block::default()
    .title(header)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if items.is_empty() && !loading {
    let paragraph = Paragraph::new("No items. Press 'R' to fetch from the catalog.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let rows: Vec<ListItem> = items
    .iter()
    .map(|item| {
      let line = Line::from(vec![
        Span::styled(format!("{:>5}", item.id), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::raw(truncate(&item.title, 70)),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(rows)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected));

  frame.render_stateful_widget(list, area, &mut state);
}

/// Truncate a string to a maximum byte length, adding "..." if truncated.
/// The cut always lands on a char boundary, so multibyte titles are safe.
fn truncate(s: &str, max_len: usize) -> String {
  if s.len() <= max_len {
    return s.to_string();
  }

  let mut cut = max_len.saturating_sub(3).min(s.len());
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }

  format!("{}...", &s[..cut])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_keeps_short_strings() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn truncate_shortens_long_strings() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn truncate_respects_char_boundaries() {
    // The cut point lands inside the two-byte char; back up instead of
    // panicking.
    assert_eq!(truncate("aaaaaa\u{e9}aaaa", 10), "aaaaaa...");
    assert_eq!(truncate("\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}", 4), "...");
  }
}
