//! Building blocks driven by the controller loop.

/// Pagination projector.
pub mod pagination;
/// Search planning and supersession.
pub mod search;
/// Collaborator traits: remote source, confirmation, notifications.
pub mod traits;
