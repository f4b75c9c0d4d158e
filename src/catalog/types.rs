use crate::cache::ItemRow;

/// A single catalog entry as the rest of the application sees it.
///
/// Decoupled from both the wire shape and the storage row; immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
  pub id: i64,
  pub title: String,
  pub subtitle: String,
}

impl From<ItemRow> for CatalogItem {
  fn from(row: ItemRow) -> Self {
    Self {
      id: row.id,
      title: row.title,
      subtitle: row.subtitle,
    }
  }
}
