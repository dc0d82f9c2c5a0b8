//! Authoritative controller state: filters and the collection store.

/// Draft/applied filter pair and the query derived from it.
pub mod filter;
/// Cached collection and its visible projection.
pub mod store;
