//! Sequence allocation integration tests
//!
//! Exercise the allocator against the in-memory counter store, including
//! the compare-and-swap retry path under real task concurrency.

use std::collections::HashSet;
use std::sync::Arc;

use domain_numbering::{
    NumberingError, SequenceAllocator, SequenceCounter, SequenceKey, DEFAULT_RANGE_END,
    DEFAULT_RANGE_START,
};
use test_utils::InMemorySequenceStore;

fn allocator() -> SequenceAllocator<InMemorySequenceStore> {
    SequenceAllocator::new(InMemorySequenceStore::new())
}

mod allocation {
    use super::*;

    #[tokio::test]
    async fn first_use_creates_default_counter() {
        let allocator = allocator();

        let number = allocator.allocate(SequenceKey::Invoice).await.unwrap();
        assert_eq!(number, DEFAULT_RANGE_START);

        let counters = allocator.counters().await.unwrap();
        assert_eq!(counters.len(), 1);
        assert_eq!(counters[0].range_start, DEFAULT_RANGE_START);
        assert_eq!(counters[0].range_end, DEFAULT_RANGE_END);
        assert_eq!(counters[0].next, DEFAULT_RANGE_START + 1);
        assert!(!counters[0].allow_outside_range);
    }

    #[tokio::test]
    async fn sequential_allocations_are_dense() {
        let allocator = allocator();

        for expected in 1..=5 {
            let number = allocator.allocate(SequenceKey::LorryReceipt).await.unwrap();
            assert_eq!(number, expected);
        }
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let allocator = allocator();

        assert_eq!(allocator.allocate(SequenceKey::Invoice).await.unwrap(), 1);
        assert_eq!(allocator.allocate(SequenceKey::Invoice).await.unwrap(), 2);
        // A different document type starts its own counter
        assert_eq!(
            allocator.allocate(SequenceKey::TruckHiringNote).await.unwrap(),
            1
        );
    }
}

mod range_enforcement {
    use super::*;

    #[tokio::test]
    async fn closed_range_exhausts_after_ceiling() {
        let allocator = allocator();
        allocator
            .configure(SequenceKey::Invoice, 1, 3, false)
            .await
            .unwrap();

        assert_eq!(allocator.allocate(SequenceKey::Invoice).await.unwrap(), 1);
        assert_eq!(allocator.allocate(SequenceKey::Invoice).await.unwrap(), 2);
        assert_eq!(allocator.allocate(SequenceKey::Invoice).await.unwrap(), 3);

        let err = allocator.allocate(SequenceKey::Invoice).await.unwrap_err();
        assert!(matches!(
            err,
            NumberingError::OutOfRange {
                key: SequenceKey::Invoice,
                ceiling: 3
            }
        ));

        // The failed allocation consumed nothing: exhausting again gives
        // the same error, and the counter is unchanged
        let counters = allocator.counters().await.unwrap();
        assert_eq!(counters[0].next, 4);
    }

    #[tokio::test]
    async fn open_range_continues_past_ceiling() {
        let allocator = allocator();
        allocator
            .configure(SequenceKey::Invoice, 1, 3, true)
            .await
            .unwrap();

        for expected in 1..=4 {
            assert_eq!(allocator.allocate(SequenceKey::Invoice).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn allowing_overflow_rescues_exhausted_counter() {
        let allocator = allocator();
        allocator
            .configure(SequenceKey::Invoice, 1, 3, false)
            .await
            .unwrap();
        for _ in 0..3 {
            allocator.allocate(SequenceKey::Invoice).await.unwrap();
        }
        assert!(allocator.allocate(SequenceKey::Invoice).await.is_err());

        allocator
            .configure(SequenceKey::Invoice, 1, 3, true)
            .await
            .unwrap();
        // next was outside [1, 3], so the reconfigure pulled it back to
        // the floor; overflow is now permitted either way
        assert_eq!(allocator.allocate(SequenceKey::Invoice).await.unwrap(), 1);
    }
}

mod reconfiguration {
    use super::*;

    #[tokio::test]
    async fn configure_creates_counter_at_floor() {
        let allocator = allocator();
        let counter = allocator
            .configure(SequenceKey::TruckHiringNote, 100, 999, false)
            .await
            .unwrap();

        assert_eq!(counter.next, 100);
        assert_eq!(
            allocator.allocate(SequenceKey::TruckHiringNote).await.unwrap(),
            100
        );
    }

    #[tokio::test]
    async fn shrinking_window_pulls_next_back_to_floor() {
        let allocator = allocator();
        allocator
            .configure(SequenceKey::Invoice, 1, 10, false)
            .await
            .unwrap();
        for _ in 0..4 {
            allocator.allocate(SequenceKey::Invoice).await.unwrap();
        }

        // next is now 5; [1, 4] no longer contains it
        let counter = allocator
            .configure(SequenceKey::Invoice, 1, 4, false)
            .await
            .unwrap();
        assert_eq!(counter.next, 1);
    }

    #[tokio::test]
    async fn widening_window_preserves_next() {
        let allocator = allocator();
        allocator
            .configure(SequenceKey::Invoice, 1, 10, false)
            .await
            .unwrap();
        for _ in 0..4 {
            allocator.allocate(SequenceKey::Invoice).await.unwrap();
        }

        let counter = allocator
            .configure(SequenceKey::Invoice, 1, 20, false)
            .await
            .unwrap();
        assert_eq!(counter.next, 5);
        assert_eq!(allocator.allocate(SequenceKey::Invoice).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn inverted_bounds_rejected_without_touching_storage() {
        let allocator = allocator();
        let err = allocator
            .configure(SequenceKey::Invoice, 10, 1, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NumberingError::InvalidConfiguration { start: 10, end: 1 }
        ));
        assert!(allocator.counters().await.unwrap().is_empty());
    }
}

mod concurrency {
    use super::*;

    // Task count stays below the CAS retry budget so every loser can
    // retry to completion: each lost CAS means another task committed.
    const TASKS: usize = 12;

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_allocations_are_unique_and_dense() {
        let allocator = Arc::new(allocator());

        let mut handles = Vec::with_capacity(TASKS);
        for _ in 0..TASKS {
            let allocator = Arc::clone(&allocator);
            handles.push(tokio::spawn(async move {
                allocator.allocate(SequenceKey::LorryReceipt).await
            }));
        }

        let mut numbers = HashSet::new();
        for handle in handles {
            let number = handle.await.unwrap().unwrap();
            assert!(numbers.insert(number), "duplicate number issued: {number}");
        }

        let expected: HashSet<i64> = (1..=TASKS as i64).collect();
        assert_eq!(numbers, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_first_use_creates_one_counter() {
        let allocator = Arc::new(allocator());

        let mut handles = Vec::with_capacity(TASKS);
        for _ in 0..TASKS {
            let allocator = Arc::clone(&allocator);
            handles.push(tokio::spawn(async move {
                allocator.allocate(SequenceKey::Invoice).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let counters = allocator.counters().await.unwrap();
        assert_eq!(counters.len(), 1);
        assert_eq!(counters[0].next, TASKS as i64 + 1);
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use test_utils::number_window_strategy;

    proptest! {
        #[test]
        fn reconfigure_always_lands_next_inside_window(
            (start, end) in number_window_strategy(),
            (new_start, new_end) in number_window_strategy(),
            offset in 0i64..20_000i64,
        ) {
            let mut counter = SequenceCounter::new(SequenceKey::Invoice, start, end, false).unwrap();
            counter.next = start + offset;
            let within_new = counter.next >= new_start && counter.next <= new_end;

            counter.reconfigure(new_start, new_end, false).unwrap();

            prop_assert!(counter.next >= new_start && counter.next <= new_end);
            if within_new {
                prop_assert_eq!(counter.next, start + offset);
            } else {
                prop_assert_eq!(counter.next, new_start);
            }
        }
    }
}
