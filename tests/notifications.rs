use listsync::{
    engine::traits::NotificationSink,
    notify::{NoticeKind, Notification, ToastQueue},
    runtime::{
        config::ControllerConfig,
        pending::{ActionKey, PendingActions},
    },
};
use tokio::time::Duration;

#[tokio::test(start_paused = true)]
async fn toasts_dismiss_after_ttl() {
    let toasts = ToastQueue::new(Duration::from_millis(4_500));
    toasts.notify(Notification::success("Saved."));
    tokio::time::sleep(Duration::from_millis(2_000)).await;
    toasts.notify(Notification::error("Could not delete the record."));

    assert_eq!(toasts.active().len(), 2);

    tokio::time::sleep(Duration::from_millis(3_000)).await;
    let active = toasts.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, NoticeKind::Error);

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    assert!(toasts.active().is_empty());
}

#[tokio::test(start_paused = true)]
async fn toast_ttl_comes_from_controller_config() {
    let cfg = ControllerConfig::from_json(r#"{"notification_ttl_ms": 1000}"#).expect("config");
    let toasts = ToastQueue::from_config(&cfg);
    toasts.notify(Notification::success("Fuel card created."));

    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(toasts.active().len(), 1);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(toasts.active().is_empty());
}

#[test]
fn notification_serializes_with_type_tag() {
    let json = serde_json::to_string(&Notification::error("boom")).expect("json");
    assert_eq!(json, r#"{"type":"error","message":"boom"}"#);
}

#[test]
fn lease_release_on_drop() {
    let pending: PendingActions<u64> = PendingActions::new();
    assert!(!pending.saving());

    let lease = pending.try_acquire(ActionKey::Record(7)).expect("free");
    assert!(pending.saving());
    assert!(pending.is_pending(&ActionKey::Record(7)));
    assert!(pending.try_acquire(ActionKey::Record(7)).is_none());

    let create = pending.try_acquire(ActionKey::Create).expect("free");
    assert_eq!(pending.keys().len(), 2);

    drop(lease);
    assert!(!pending.is_pending(&ActionKey::Record(7)));
    assert!(pending.saving());
    drop(create);
    assert!(!pending.saving());
}

#[tokio::test]
async fn lease_released_when_task_is_aborted() {
    let pending: PendingActions<u64> = PendingActions::new();
    let lease = pending.try_acquire(ActionKey::Record(1)).expect("free");

    let task = tokio::spawn(async move {
        let _lease = lease;
        std::future::pending::<()>().await;
    });
    tokio::task::yield_now().await;
    assert!(pending.saving());

    task.abort();
    let _ = task.await;
    assert!(!pending.saving());
}
