use std::time::Duration;

use angel_tracker::query::{QueryError, QueryOptions, RequestState};
use tokio::sync::oneshot;

use super::{Calls, executor};

const KEY: &str = "status-select/12A";

#[tokio::test]
async fn test_second_submission_is_rejected_while_first_is_live() {
    let (executor, mut queue) = executor();
    let (release, released) = oneshot::channel::<()>();
    let calls = Calls::default();
    let counted = calls.clone();

    let first = executor
        .submit(
            KEY,
            QueryOptions::single_flight(),
            move |_| async move {
                counted.hit();
                let _ = released.await;
                Ok(1)
            },
            |r| r,
        )
        .unwrap();

    let err = executor
        .submit(KEY, QueryOptions::single_flight(), |_| async { Ok(2) }, |r| r)
        .unwrap_err();
    assert_eq!(err, QueryError::AlreadyInFlight(KEY.to_string()));

    // A plain submission cannot supersede a single-flight request either.
    let err = executor
        .submit(KEY, QueryOptions::default(), |_| async { Ok(3) }, |r| r)
        .unwrap_err();
    assert!(matches!(err, QueryError::AlreadyInFlight(_)));
    assert!(first.is_live());

    release.send(()).unwrap();
    assert_eq!(queue.next().await, Some(Ok(1)));
    assert_eq!(first.wait().await, Ok(()));
    assert_eq!(calls.count(), 1);
    assert!(queue.try_next().is_none());
}

#[tokio::test]
async fn test_key_is_free_again_after_delivery() {
    let (executor, mut queue) = executor();

    executor
        .submit(KEY, QueryOptions::single_flight(), |_| async { Ok(1) }, |r| r)
        .unwrap();
    assert_eq!(queue.next().await, Some(Ok(1)));
    assert!(!executor.is_in_flight(KEY));

    executor
        .submit(KEY, QueryOptions::single_flight(), |_| async { Ok(2) }, |r| r)
        .unwrap();
    assert_eq!(queue.next().await, Some(Ok(2)));
}

#[tokio::test(start_paused = true)]
async fn test_key_is_free_again_after_cancel() {
    let (executor, mut queue) = executor();

    let first = executor
        .submit(
            KEY,
            QueryOptions::single_flight(),
            |token| async move {
                token.cancelled().await;
                Ok(1)
            },
            |r| r,
        )
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    first.cancel();
    assert_eq!(first.state(), RequestState::Cancelled);
    assert!(!executor.is_in_flight(KEY));

    executor
        .submit(KEY, QueryOptions::single_flight(), |_| async { Ok(2) }, |r| r)
        .unwrap();
    assert_eq!(queue.next().await, Some(Ok(2)));
}

#[tokio::test]
async fn test_other_keys_are_unaffected() {
    let (executor, mut queue) = executor();
    let (_hold, held) = oneshot::channel::<()>();

    executor
        .submit(
            KEY,
            QueryOptions::single_flight(),
            move |_| async move {
                let _ = held.await;
                Ok(1)
            },
            |r| r,
        )
        .unwrap();
    executor
        .submit(
            "status-select/12B",
            QueryOptions::single_flight(),
            |_| async { Ok(2) },
            |r| r,
        )
        .unwrap();

    assert_eq!(queue.next().await, Some(Ok(2)));
    assert!(executor.is_in_flight(KEY));
}
