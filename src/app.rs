use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{ItemStore, MemoryStore, SqliteStore};
use crate::catalog::cached_client::CachedCatalog;
use crate::catalog::types::CatalogItem;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::loader::Loader;
use crate::ui;

/// Which sourcing path a load should take
#[derive(Debug, Clone, Copy)]
pub enum LoadKind {
  /// Serve from cache when populated, else fetch and repopulate
  CacheFirst,
  /// Fetch from the remote endpoint unconditionally
  Remote,
}

/// Main application state
pub struct App {
  /// Header title (configured name or the endpoint host)
  title: String,

  /// Catalog items with loading/error state, polled from the event loop
  items: Loader<LoadKind, Vec<CatalogItem>>,

  /// Selected row in the list
  selected: usize,

  /// Detail pane for the item opened with Enter, if any
  detail: Option<CatalogItem>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config, ephemeral_cache: bool) -> Result<Self> {
    let store: Arc<dyn ItemStore> = if ephemeral_cache {
      Arc::new(MemoryStore::new())
    } else {
      match &config.cache.path {
        Some(path) => Arc::new(SqliteStore::open_at(path)?),
        None => Arc::new(SqliteStore::open()?),
      }
    };

    let catalog = CachedCatalog::new(config, store)?;
    let mut items = Loader::new(move |kind: LoadKind| {
      let catalog = catalog.clone();
      async move {
        let result = match kind {
          LoadKind::CacheFirst => catalog.retrieve().await,
          LoadKind::Remote => catalog.force_refresh().await,
        };
        result.map_err(|e| format!("Failed to load items: {}", e))
      }
    });

    // Initial data load
    items.load(LoadKind::CacheFirst);

    Ok(Self {
      title: config.display_title(),
      items,
      selected: 0,
      detail: None,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250));

    // Main loop
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      // The loop redraws after every event, so a resize just needs to
      // fall through to the next draw.
      Event::Resize(_, _) => {}
      Event::Tick => {
        if self.items.poll() {
          self.clamp_selection();
        }
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    match key.code {
      // Quit, or close the detail pane first
      KeyCode::Char('q') => {
        if self.detail.is_some() {
          self.detail = None;
        } else {
          self.should_quit = true;
        }
      }
      KeyCode::Esc => {
        self.detail = None;
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Enter => {
        if self.detail.is_none() {
          let item = self.visible_items().get(self.selected).cloned();
          self.detail = item;
        }
      }

      // Refresh: 'r' is cache-first, 'R' forces a remote fetch
      KeyCode::Char('r') => self.items.load(LoadKind::CacheFirst),
      KeyCode::Char('R') => self.items.load(LoadKind::Remote),

      _ => {}
    }
  }

  fn visible_items(&self) -> &[CatalogItem] {
    self.items.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.visible_items().len();
    if len > 0 {
      self.selected = (self.selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  fn clamp_selection(&mut self) {
    let len = self.visible_items().len();
    if len == 0 {
      self.selected = 0;
    } else if self.selected >= len {
      self.selected = len - 1;
    }
  }

  // Accessors for UI rendering
  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn items(&self) -> &[CatalogItem] {
    self.visible_items()
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn detail(&self) -> Option<&CatalogItem> {
    self.detail.as_ref()
  }

  pub fn is_loading(&self) -> bool {
    self.items.is_loading()
  }

  pub fn error(&self) -> Option<&str> {
    self.items.error()
  }
}
