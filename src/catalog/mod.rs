//! Remote catalog access: wire types, the HTTP client, and the cached
//! retrieval operation built on top of them.

pub mod api_types;
pub mod cached_client;
pub mod client;
pub mod types;
