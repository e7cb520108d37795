//! Concurrency and property tests for the in-memory queue

use std::collections::HashSet;
use std::sync::Arc;

use fifoq_core::{Message, Queue, QueueConfig};
use fifoq_queue::MemoryQueue;
use futures::executor::block_on;
use proptest::prelude::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_never_exceed_limit() {
    let limit = 50;
    let queue = Arc::new(MemoryQueue::new(QueueConfig::bounded(limit)));

    let mut handles = Vec::new();
    for producer in 0..8 {
        let queue = Arc::clone(&queue);
        handles.push(tokio::spawn(async move {
            let mut accepted = 0u64;
            for i in 0..20 {
                match queue.add(Message::new(format!("{producer}-{i}"))).await {
                    Ok(()) => accepted += 1,
                    Err(e) => assert!(e.is_full(), "unexpected error: {e}"),
                }
            }
            accepted
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        accepted += handle.await.unwrap();
    }

    assert_eq!(accepted, limit);
    assert_eq!(queue.len() as u64, limit);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_consumers_see_each_message_once() {
    let queue = Arc::new(MemoryQueue::unbounded());
    for i in 0..200 {
        queue.add(Message::new(i.to_string())).await.unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..4 {
        let queue = Arc::clone(&queue);
        handles.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Ok(msg) = queue.pop().await {
                seen.push(msg.id());
            }
            seen
        }));
    }

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.await.unwrap());
    }
    let distinct: HashSet<_> = all.iter().collect();
    assert_eq!(all.len(), 200);
    assert_eq!(distinct.len(), 200);
}

proptest! {
    #[test]
    fn prop_pop_returns_insertion_order(payloads in proptest::collection::vec(any::<Vec<u8>>(), 0..64)) {
        let queue = MemoryQueue::unbounded();
        block_on(async {
            for payload in &payloads {
                queue.add(Message::new(payload.clone())).await.unwrap();
            }
        });

        let popped: Vec<Vec<u8>> = block_on(async {
            let mut out = Vec::new();
            while let Ok(msg) = queue.pop().await {
                out.push(msg.into_payload());
            }
            out
        });
        prop_assert_eq!(popped, payloads);
    }

    #[test]
    fn prop_add_fails_only_at_limit(limit in 0u64..16, ops in proptest::collection::vec(any::<bool>(), 0..64)) {
        let queue = MemoryQueue::new(QueueConfig::bounded(limit));
        let mut length = 0u64;

        for add in ops {
            if add {
                let result = block_on(queue.add(Message::new("m")));
                if length == limit {
                    prop_assert!(result.unwrap_err().is_full());
                } else {
                    prop_assert!(result.is_ok());
                    length += 1;
                }
            } else {
                let result = block_on(queue.pop());
                if length == 0 {
                    prop_assert!(result.unwrap_err().is_not_found());
                } else {
                    prop_assert!(result.is_ok());
                    length -= 1;
                }
            }
            prop_assert!(queue.len() as u64 <= limit);
            prop_assert_eq!(queue.len() as u64, length);
        }
    }
}
