use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Terminal was resized to the given (columns, rows)
  Resize(u16, u16),
  /// Periodic tick for UI refresh and loader polling
  Tick,
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          match event::read() {
            // Release/repeat events would double keystrokes on some
            // platforms
            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
              if tx.send(Event::Key(key)).is_err() {
                break;
              }
            }
            Ok(CrosstermEvent::Resize(cols, rows)) => {
              if tx.send(Event::Resize(cols, rows)).is_err() {
                break;
              }
            }
            Ok(_) => {}
            Err(_) => break,
          }
        } else {
          // Tick
          if tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
