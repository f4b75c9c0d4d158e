//! Serde-deserializable types matching the remote catalog payload.
//!
//! These are separate from domain types so the wire format can change
//! without touching storage or presentation code.

use serde::Deserialize;

use crate::cache::ItemRow;

/// One entry of the remote catalog array.
///
/// The remote calls the subtitle field `body`; everything past the wire
/// boundary calls it `subtitle`. Never hand-constructed outside tests.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiItem {
  pub id: i64,
  #[serde(default)]
  pub title: String,
  #[serde(rename = "body", default)]
  pub subtitle: String,
}

impl ApiItem {
  /// Translate a wire record into the persisted row shape.
  pub fn into_row(self) -> ItemRow {
    ItemRow {
      id: self.id,
      title: self.title,
      subtitle: self.subtitle,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserializes_body_as_subtitle() {
    let json = r#"[{"id": 1, "title": "A", "body": "x"}, {"id": 2, "title": "B", "body": "y"}]"#;
    let items: Vec<ApiItem> = serde_json::from_str(json).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].title, "A");
    assert_eq!(items[0].subtitle, "x");
    assert_eq!(items[1].subtitle, "y");
  }

  #[test]
  fn missing_text_fields_default_to_empty() {
    let json = r#"{"id": 7}"#;
    let item: ApiItem = serde_json::from_str(json).unwrap();

    assert_eq!(item.id, 7);
    assert!(item.title.is_empty());
    assert!(item.subtitle.is_empty());
  }

  #[test]
  fn into_row_keeps_all_fields() {
    let item = ApiItem {
      id: 3,
      title: "C".to_string(),
      subtitle: "z".to_string(),
    };

    let row = item.into_row();
    assert_eq!(row.id, 3);
    assert_eq!(row.title, "C");
    assert_eq!(row.subtitle, "z");
  }
}
