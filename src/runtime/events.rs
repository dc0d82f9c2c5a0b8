//! Runtime event stream payloads.

use crate::{engine::search::SearchTicket, notify::Notification};

use super::phase::FilterPhase;

/// Events emitted from the controller loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent<Id> {
    /// The filter lifecycle moved.
    PhaseChanged {
        /// New phase.
        phase: FilterPhase,
    },
    /// The visible collection or the page window changed.
    VisibleChanged {
        /// Visible record count.
        len: usize,
        /// Pages after projection.
        total_pages: usize,
        /// Current page after clamping.
        current_page: usize,
    },
    /// A stale search result arrived and was dropped.
    SearchDiscarded {
        /// Ticket of the dropped search.
        ticket: SearchTicket,
    },
    /// The cache was replaced by a load or refresh.
    Reloaded {
        /// Cached record count.
        len: usize,
    },
    /// A confirmed create was applied.
    Created {
        /// New record id.
        id: Id,
    },
    /// A confirmed update was applied.
    Updated {
        /// Updated record id.
        id: Id,
    },
    /// A confirmed delete was applied.
    Deleted {
        /// Deleted record id.
        id: Id,
    },
    /// A notification was raised.
    Notified {
        /// The notification.
        notification: Notification,
    },
}
