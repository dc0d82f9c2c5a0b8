use std::{fmt::Debug, future::Future, sync::Arc};

use crate::{
    error::RemoteError,
    notify::Notification,
    record::{ListRequest, Page, Record},
};

/// Backend reached by the controller for reads and confirmed mutations.
pub trait RemoteSource: Send + Sync + 'static {
    /// Record type served by this source.
    type Record: Record;
    /// Create/update body.
    type Payload: Clone + Debug + Send + 'static;

    /// Lists records matching the request.
    fn list(
        &self,
        req: ListRequest,
    ) -> impl Future<Output = Result<Page<Self::Record>, RemoteError>> + Send;

    /// Creates a record; the reply carries the server-assigned id.
    fn create(
        &self,
        payload: Self::Payload,
    ) -> impl Future<Output = Result<Self::Record, RemoteError>> + Send;

    /// Replaces the record with this id.
    fn update(
        &self,
        id: <Self::Record as Record>::Id,
        payload: Self::Payload,
    ) -> impl Future<Output = Result<Self::Record, RemoteError>> + Send;

    /// Deletes the record with this id.
    fn delete(
        &self,
        id: <Self::Record as Record>::Id,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// Yes/no prompt shown before a destructive action.
pub trait ConfirmPrompt: Send + Sync + 'static {
    /// Shows `message` and resolves to the user's answer.
    fn confirm(&self, message: String) -> impl Future<Output = bool> + Send;
}

/// Receives user-facing notifications.
pub trait NotificationSink: Send + Sync + 'static {
    /// Delivers one notification.
    fn notify(&self, notification: Notification);
}

impl<T: ConfirmPrompt> ConfirmPrompt for Arc<T> {
    fn confirm(&self, message: String) -> impl Future<Output = bool> + Send {
        T::confirm(self, message)
    }
}

impl<T: NotificationSink> NotificationSink for Arc<T> {
    fn notify(&self, notification: Notification) {
        T::notify(self, notification)
    }
}

/// Prompt with a fixed answer, for non-interactive hosts.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmPrompt for FixedAnswer {
    async fn confirm(&self, _message: String) -> bool {
        self.0
    }
}
