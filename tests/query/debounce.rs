use std::time::Duration;

use angel_tracker::query::{QueryError, QueryOptions, RequestState};

use super::{Calls, executor};

const WINDOW: Duration = Duration::from_millis(300);

#[tokio::test(start_paused = true)]
async fn test_burst_within_window_runs_once() {
    let (executor, mut queue) = executor();
    let calls = Calls::default();

    let mut handles = Vec::new();
    for keystroke in 1..=5u32 {
        let calls = calls.clone();
        let handle = executor
            .submit(
                "search/keyword",
                QueryOptions::debounced(WINDOW),
                move |_| async move {
                    calls.hit();
                    Ok(keystroke)
                },
                |r| r,
            )
            .unwrap();
        handles.push(handle);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert_eq!(queue.next().await, Some(Ok(5)));
    assert_eq!(calls.count(), 1);

    let (last, superseded) = handles.split_last().unwrap();
    for handle in superseded {
        assert_eq!(handle.wait().await, Err(QueryError::Cancelled));
        assert_eq!(handle.state(), RequestState::Cancelled);
    }
    assert_eq!(last.wait().await, Ok(()));
    assert!(queue.try_next().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_submissions_spaced_past_window_all_run() {
    let (executor, mut queue) = executor();
    let calls = Calls::default();

    for value in [1u32, 2] {
        let calls = calls.clone();
        executor
            .submit(
                "search/keyword",
                QueryOptions::debounced(WINDOW),
                move |_| async move {
                    calls.hit();
                    Ok(value)
                },
                |r| r,
            )
            .unwrap();
        assert_eq!(queue.next().await, Some(Ok(value)));
    }

    assert_eq!(calls.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_is_per_key() {
    let (executor, mut queue) = executor();

    for (key, value) in [("angel-selection/family", 1u32), ("search/keyword", 2)] {
        executor
            .submit(
                key,
                QueryOptions::debounced(WINDOW),
                move |_| async move { Ok(value) },
                |r| r,
            )
            .unwrap();
    }

    let mut delivered = Vec::new();
    for _ in 0..2 {
        delivered.push(queue.next().await.unwrap().unwrap());
    }
    delivered.sort();
    assert_eq!(delivered, vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_nothing_runs_before_window_closes() {
    let (executor, mut queue) = executor();
    let calls = Calls::default();
    let counted = calls.clone();

    let handle = executor
        .submit(
            "search/keyword",
            QueryOptions::debounced(WINDOW),
            move |_| async move {
                counted.hit();
                Ok(0)
            },
            |r| r,
        )
        .unwrap();

    tokio::time::sleep(WINDOW / 2).await;
    assert_eq!(calls.count(), 0);
    assert_eq!(handle.state(), RequestState::Pending);

    assert_eq!(queue.next().await, Some(Ok(0)));
    assert_eq!(calls.count(), 1);
}
