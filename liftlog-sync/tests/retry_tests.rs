use liftlog_sync::{retry_with_backoff, RetryPolicy, SyncError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;

fn flaky(calls: &AtomicU32, failures: u32) -> Result<u32, SyncError> {
    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
    if n <= failures {
        Err(SyncError::Remote(format!("timeout #{n}")))
    } else {
        Ok(n)
    }
}

#[test]
fn delays_double_and_cap() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_for(0), Duration::from_millis(500));
    assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
    assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
    assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
    assert_eq!(policy.delay_for(10), Duration::from_millis(4000));
    assert_eq!(policy.delay_for(64), Duration::from_millis(4000));
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_max_attempts() {
    let calls = &AtomicU32::new(0);
    let start = Instant::now();

    let result: Result<u32, _> =
        retry_with_backoff(&RetryPolicy::default(), "fetch_all", || async move {
            flaky(calls, u32::MAX)
        })
        .await;

    match result {
        Err(SyncError::RemoteUnavailable {
            operation,
            attempts,
            message,
        }) => {
            assert_eq!(operation, "fetch_all");
            assert_eq!(attempts, 3);
            assert!(message.contains("timeout #3"));
        }
        other => panic!("expected RemoteUnavailable, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // 500ms + 1000ms between the three attempts, no sleep after the last.
    assert_eq!(start.elapsed(), Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn succeeds_after_transient_failures() {
    let calls = &AtomicU32::new(0);

    let result = retry_with_backoff(&RetryPolicy::default(), "fetch_all", || async move {
        flaky(calls, 2)
    })
    .await;

    assert_eq!(result.unwrap(), 3);
}

#[tokio::test(start_paused = true)]
async fn rejection_is_not_retried() {
    let calls = &AtomicU32::new(0);
    let start = Instant::now();

    let result: Result<(), _> = retry_with_backoff(&RetryPolicy::default(), "append_rows", || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(SyncError::RemoteRejected("read-only".into()))
    })
    .await;

    assert!(matches!(result, Err(SyncError::RemoteRejected(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn zero_attempts_still_tries_once() {
    let calls = &AtomicU32::new(0);
    let policy = RetryPolicy {
        max_attempts: 0,
        ..RetryPolicy::default()
    };

    let result = retry_with_backoff(&policy, "fetch_all", || async move { flaky(calls, 0) }).await;

    assert_eq!(result.unwrap(), 1);
}
