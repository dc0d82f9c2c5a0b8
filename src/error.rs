//! Error types shared by the store, the collaborators and the runtime.

use serde::Deserialize;
use thiserror::Error;

/// Fallback shown when a load or search fails without server detail.
pub const FETCH_FALLBACK: &str = "Could not load records. Try again.";
/// Shown when the server rejects a load or search with 401/403.
pub const UNAUTHORIZED_MESSAGE: &str = "You are not authorized to view these records.";
/// Fallback shown when a create fails without server detail.
pub const CREATE_FALLBACK: &str = "Could not create the record.";
/// Fallback shown when an update fails without server detail.
pub const UPDATE_FALLBACK: &str = "Could not save changes.";
/// Fallback shown when a delete fails without server detail.
pub const DELETE_FALLBACK: &str = "Could not delete the record.";

/// Failures raised by [`crate::core::store::CollectionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No cached or visible record carries this id.
    #[error("record {0} not found")]
    MissingRecord(String),
    /// A record with this id is already cached.
    #[error("record {0} already exists")]
    AlreadyExists(String),
}

/// Failure reported by a [`crate::engine::traits::RemoteSource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "remote request failed (status {}): {}",
    status_label(.status),
    .detail.as_deref().unwrap_or("no detail")
)]
pub struct RemoteError {
    /// HTTP-style status code, `None` for transport failures.
    pub status: Option<u16>,
    /// Server-provided detail string meant for the user.
    pub detail: Option<String>,
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<DetailField>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetailField {
    Text(String),
    Items(Vec<DetailItem>),
}

#[derive(Deserialize)]
struct DetailItem {
    msg: String,
}

impl RemoteError {
    /// Builds an error from a status and an optional detail.
    pub fn new(status: Option<u16>, detail: Option<String>) -> Self {
        Self { status, detail }
    }

    /// Builds an error for a request that never got a response.
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(None, Some(detail.into()))
    }

    /// Builds an error from an HTTP status and a response body.
    ///
    /// The body is read as `{"detail": "..."}` or as a validation list
    /// `{"detail": [{"msg": "..."}, ...]}`; anything else leaves the detail empty.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .and_then(|d| match d {
                DetailField::Text(text) => Some(text),
                DetailField::Items(items) => {
                    let joined = items
                        .into_iter()
                        .map(|i| i.msg)
                        .collect::<Vec<_>>()
                        .join("; ");
                    (!joined.is_empty()).then_some(joined)
                }
            })
            .filter(|d| !d.trim().is_empty());
        Self::new(Some(status), detail)
    }

    /// True for 401 and 403 responses.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }

    /// Message to surface to the user: server detail, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match &self.detail {
            Some(detail) => detail.clone(),
            None => fallback.to_string(),
        }
    }

    /// Message for a failed load or search; authorization failures get
    /// their own wording regardless of detail.
    pub fn fetch_message(&self) -> String {
        if self.is_unauthorized() {
            UNAUTHORIZED_MESSAGE.to_string()
        } else {
            self.user_message(FETCH_FALLBACK)
        }
    }
}

/// Errors returned by [`crate::runtime::handle::ControllerHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The field is not part of the entity's filter shape.
    #[error("unknown filter field: {0}")]
    UnknownField(String),
    /// A mutation with the same key is still in flight.
    #[error("an action is already pending for {0}")]
    ActionPending(String),
    /// A newer load replaced this one before it resolved.
    #[error("superseded by a newer request")]
    Superseded,
    /// Local store rejected the change.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The remote source rejected the request.
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// The controller loop has stopped.
    #[error("controller channel closed")]
    ChannelClosed,
}
