use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::{
    engine::pagination::DEFAULT_PAGE_SIZE,
    notify::DEFAULT_NOTIFICATION_TTL_MS,
    types::{Presentation, ResolveMode},
};

/// Tunables for one controller instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Rows per visible page.
    pub page_size: usize,
    /// Page size requested from the remote source for loads and searches.
    pub fetch_limit: usize,
    /// Minimum time the searching indicator stays up; 0 disables the floor.
    pub minimum_loading_ms: u64,
    /// Whether non-blank filters query the server or the cache.
    pub resolve_mode: ResolveMode,
    /// Bound of the command channel.
    pub command_queue_bound: usize,
    /// Broadcast buffer for [`crate::runtime::events::ViewEvent`]s.
    pub event_capacity: usize,
    /// Auto-dismiss delay for notifications.
    pub notification_ttl_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fetch_limit: 1000,
            minimum_loading_ms: Presentation::Standard.minimum_loading_ms(),
            resolve_mode: ResolveMode::Remote,
            command_queue_bound: 256,
            event_capacity: 1024,
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL_MS,
        }
    }
}

impl ControllerConfig {
    /// Defaults with the loading floor picked by presentation class.
    pub fn for_presentation(presentation: Presentation) -> Self {
        Self {
            minimum_loading_ms: presentation.minimum_loading_ms(),
            ..Self::default()
        }
    }

    /// Reads a config from JSON; missing keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Loading floor as a duration.
    pub fn minimum_loading(&self) -> Duration {
        Duration::from_millis(self.minimum_loading_ms)
    }

    /// Notification TTL as a duration.
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }
}
