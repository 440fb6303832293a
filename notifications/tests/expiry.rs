//! Expiry timing tests for the notification queue.
//!
//! All tests run on a paused Tokio clock, so sleeps advance virtual time
//! deterministically.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;
use workdesk_core::NotificationKind;
use workdesk_notifications::{NotificationConfig, NotificationQueue};
use workdesk_testing::test_clock;

const MS: Duration = Duration::from_millis(1);

#[tokio::test(start_paused = true)]
async fn test_notification_expires_after_duration() {
    let queue = NotificationQueue::new(test_clock());
    let id = queue.notify("Saved", NotificationKind::Success);

    tokio::time::sleep(Duration::from_millis(2999)).await;
    assert!(queue.get(id).is_some(), "removed before its duration elapsed");

    tokio::time::sleep(2 * MS).await;
    assert!(queue.get(id).is_none(), "still present after its duration elapsed");
}

#[tokio::test(start_paused = true)]
async fn test_timers_are_independent() {
    let queue = NotificationQueue::new(test_clock());

    let short = queue.notify_for("short", NotificationKind::Info, 100 * MS);
    tokio::time::sleep(50 * MS).await;
    let long = queue.notify_for("long", NotificationKind::Info, 100 * MS);

    // A later notification must not reset the earlier timer
    tokio::time::sleep(51 * MS).await;
    assert!(queue.get(short).is_none());
    assert!(queue.get(long).is_some());

    tokio::time::sleep(50 * MS).await;
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_zero_duration_is_sticky() {
    let queue = NotificationQueue::new(test_clock());
    let id = queue.notify_for("Read me", NotificationKind::Warning, Duration::ZERO);

    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert!(queue.get(id).is_some());
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_before_expiry_then_expiry_is_noop() {
    let queue = NotificationQueue::new(test_clock());
    let dismissed = queue.notify_for("dismissed", NotificationKind::Error, 100 * MS);
    let other = queue.notify_for("other", NotificationKind::Error, 500 * MS);

    assert!(queue.remove(dismissed));

    tokio::time::sleep(200 * MS).await;
    assert!(!queue.remove(dismissed));
    assert!(queue.get(other).is_some());
}

#[tokio::test(start_paused = true)]
async fn test_remove_after_expiry_is_noop() {
    let queue = NotificationQueue::new(test_clock());
    let id = queue.notify_for("gone", NotificationKind::Info, 10 * MS);

    tokio::time::sleep(20 * MS).await;
    assert!(!queue.remove(id));
}

#[tokio::test(start_paused = true)]
async fn test_configured_default_duration() {
    let queue = NotificationQueue::with_config(
        test_clock(),
        NotificationConfig::default().with_default_duration(Duration::from_secs(10)),
    );
    let id = queue.notify("slow", NotificationKind::Info);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(queue.get(id).is_some());

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(queue.get(id).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_queue_does_not_panic_pending_timers() {
    let queue = NotificationQueue::new(test_clock());
    queue.notify("pending", NotificationKind::Info);
    drop(queue);

    tokio::time::sleep(Duration::from_secs(5)).await;
}

#[tokio::test(start_paused = true)]
async fn test_notification_from_non_runtime_thread_expires() {
    let queue = NotificationQueue::new(test_clock());

    let producer = queue.clone();
    let id = std::thread::spawn(move || {
        producer.notify_for("from ui thread", NotificationKind::Warning, 100 * MS)
    })
    .join()
    .unwrap();

    tokio::time::sleep(99 * MS).await;
    assert!(queue.get(id).is_some(), "removed before its duration elapsed");

    tokio::time::sleep(2 * MS).await;
    assert!(queue.get(id).is_none(), "still present after its duration elapsed");
}

#[test]
fn test_queue_built_outside_runtime_expires_on_given_runtime() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();

    let queue = NotificationQueue::with_runtime(
        test_clock(),
        NotificationConfig::default(),
        runtime.handle().clone(),
    );
    let id = queue.notify_for("offline", NotificationKind::Error, 100 * MS);
    assert!(queue.get(id).is_some());

    runtime.block_on(async { tokio::time::sleep(101 * MS).await });
    assert!(queue.get(id).is_none());
}

proptest! {
    #[test]
    fn prop_ids_unique_for_queue_lifetime(count in 1usize..200) {
        let queue = NotificationQueue::with_config(
            test_clock(),
            NotificationConfig::new(Duration::ZERO),
        );

        let mut seen = HashSet::new();
        for i in 0..count {
            let id = queue.notify(format!("n{i}"), NotificationKind::Info);
            prop_assert!(seen.insert(id));
            if i % 3 == 0 {
                queue.remove(id);
            }
        }
    }
}
