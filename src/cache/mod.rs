//! Cache-first data sourcing for catalog items.
//!
//! The store holds either nothing or a complete replacement of the last
//! successful remote fetch; the layer decides when to serve from it and when
//! to go to the network.

mod layer;
mod store;

pub use layer::ItemCache;
pub use store::{ItemRow, ItemStore, MemoryStore, SqliteStore};
