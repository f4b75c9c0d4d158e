//! Item storage trait with SQLite and in-memory backends.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One persisted catalog row.
///
/// Same three fields as the domain record, kept as a separate shape so the
/// schema can evolve without touching presentation code. `id` is the only
/// field ever used for identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
  pub id: i64,
  pub title: String,
  pub subtitle: String,
}

/// Trait for catalog row storage backends.
pub trait ItemStore: Send + Sync {
  /// Read every stored row, ordered by id.
  fn all(&self) -> Result<Vec<ItemRow>>;

  /// Bulk insert, replacing any existing row with the same id.
  fn insert_all(&self, rows: &[ItemRow]) -> Result<()>;

  /// Delete every stored row.
  fn clear(&self) -> Result<()>;
}

/// Ephemeral storage backend.
///
/// Used when caching is disabled (`--no-cache`) and by tests. Rows live for
/// the duration of the process only.
#[derive(Default)]
pub struct MemoryStore {
  rows: Mutex<Vec<ItemRow>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl ItemStore for MemoryStore {
  fn all(&self) -> Result<Vec<ItemRow>> {
    let rows = self.rows.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(rows.clone())
  }

  fn insert_all(&self, new_rows: &[ItemRow]) -> Result<()> {
    let mut rows = self.rows.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    for row in new_rows {
      match rows.iter_mut().find(|r| r.id == row.id) {
        Some(existing) => *existing = row.clone(),
        None => rows.push(row.clone()),
      }
    }
    rows.sort_by_key(|r| r.id);
    Ok(())
  }

  fn clear(&self) -> Result<()> {
    let mut rows = self.rows.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    rows.clear();
    Ok(())
  }
}

/// SQLite-backed storage.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open or create the database at the default location.
  pub fn open() -> Result<Self> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open or create the database at a specific path.
  pub fn open_at(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    Self::from_connection(conn)
  }

  /// Open an in-memory database.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;

    Self::from_connection(conn)
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;

    Ok(store)
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("catview").join("cache.db"))
  }

  /// Run database migrations for the cache table.
  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(())
  }
}

/// Schema for the cache table.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    subtitle TEXT NOT NULL
);
"#;

impl ItemStore for SqliteStore {
  fn all(&self) -> Result<Vec<ItemRow>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let mut stmt = conn
      .prepare("SELECT id, title, subtitle FROM items ORDER BY id")
      .map_err(|e| eyre!("Failed to prepare query: {}", e))?;

    let rows = stmt
      .query_map([], |row| {
        Ok(ItemRow {
          id: row.get(0)?,
          title: row.get(1)?,
          subtitle: row.get(2)?,
        })
      })
      .map_err(|e| eyre!("Failed to query items: {}", e))?
      .collect::<Result<Vec<_>, _>>()
      .map_err(|e| eyre!("Failed to read item row: {}", e))?;

    Ok(rows)
  }

  fn insert_all(&self, rows: &[ItemRow]) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute("BEGIN TRANSACTION", [])
      .map_err(|e| eyre!("Failed to begin transaction: {}", e))?;

    for row in rows {
      conn
        .execute(
          "INSERT OR REPLACE INTO items (id, title, subtitle) VALUES (?, ?, ?)",
          params![row.id, row.title, row.subtitle],
        )
        .map_err(|e| eyre!("Failed to insert item: {}", e))?;
    }

    conn
      .execute("COMMIT", [])
      .map_err(|e| eyre!("Failed to commit transaction: {}", e))?;

    Ok(())
  }

  fn clear(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute("DELETE FROM items", [])
      .map_err(|e| eyre!("Failed to clear items: {}", e))?;

    Ok(())
  }
}
