#![cfg(not(loom))]

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tl_queue::Queue;

// cargo test --package tl-queue --test queue -- test_fifo_then_empty --exact --nocapture
#[test]
fn test_fifo_then_empty() {
    let queue: Queue<usize> = Queue::new();

    queue.push(1);
    queue.push(2);
    queue.push(3);

    assert_eq!(queue.try_pop(), Some(1));
    assert_eq!(queue.try_pop(), Some(2));
    assert_eq!(queue.try_pop(), Some(3));
    assert_eq!(queue.try_pop(), None);
    assert_eq!(queue.try_pop(), None);
}

// cargo test --package tl-queue --test queue -- test_empty_on_construction --exact --nocapture
#[test]
fn test_empty_on_construction() {
    let queue: Queue<String> = Queue::new();
    assert!(queue.is_empty());
    assert!(queue.try_pop().is_none());

    let queue: Queue<String> = Queue::default();
    assert!(queue.try_pop().is_none());
}

// cargo test --package tl-queue --test queue -- test_drained_stays_empty --exact --nocapture
#[test]
fn test_drained_stays_empty() {
    let queue: Queue<usize> = Queue::new();

    for round in 0..3 {
        for i in 0..10 {
            queue.push(round * 10 + i);
        }

        for i in 0..10 {
            assert_eq!(queue.try_pop(), Some(round * 10 + i));
        }

        for _ in 0..5 {
            assert!(queue.is_empty());
            assert!(queue.try_pop().is_none());
        }
    }
}

// cargo test --package tl-queue --test queue -- test_debug_is_opaque --exact --nocapture
#[test]
fn test_debug_is_opaque() {
    let queue: Queue<&str> = Queue::new();
    queue.push("secret");
    assert_eq!(format!("{queue:?}"), "Queue { .. }");
}

// cargo test --package tl-queue --test queue -- test_spsc --exact --nocapture
#[test]
fn test_spsc() {
    const COUNT: usize = 100_000;
    let queue: Arc<Queue<usize>> = Arc::new(Queue::new());

    let q = queue.clone();
    let producer = thread::spawn(move || {
        for i in 0..COUNT {
            q.push(i);
        }
    });

    for i in 0..COUNT {
        let n = loop {
            if let Some(x) = queue.try_pop() {
                break x;
            }
            thread::yield_now();
        };
        assert_eq!(i, n);
    }

    producer.join().unwrap();
    assert!(queue.try_pop().is_none());
}

// cargo test --package tl-queue --test queue -- test_mpsc --exact --nocapture
#[test]
fn test_mpsc() {
    const COUNT: usize = 1_000;
    const CONCURRENCY: usize = 4;
    let queue: Arc<Queue<usize>> = Arc::new(Queue::new());

    let ths: Vec<_> = (0..CONCURRENCY)
        .map(|_| {
            let q = queue.clone();
            thread::spawn(move || {
                for i in 0..COUNT {
                    q.push(i);
                }
            })
        })
        .collect();

    for th in ths {
        th.join().unwrap();
    }

    for _ in 0..COUNT * CONCURRENCY {
        assert!(queue.try_pop().is_some());
    }

    assert!(queue.try_pop().is_none());
}

// cargo test --package tl-queue --test queue -- test_spmc --exact --nocapture
#[test]
fn test_spmc() {
    const COUNT: usize = 1_000;
    const CONCURRENCY: usize = 4;
    let queue: Arc<Queue<usize>> = Arc::new(Queue::new());

    for i in 0..COUNT * CONCURRENCY {
        queue.push(i);
    }

    let ths: Vec<_> = (0..CONCURRENCY)
        .map(|_| {
            let q = queue.clone();
            thread::spawn(move || {
                for _ in 0..COUNT {
                    assert!(q.try_pop().is_some());
                }
            })
        })
        .collect();

    for th in ths {
        th.join().unwrap();
    }

    assert!(queue.try_pop().is_none());
}

// cargo test --package tl-queue --test queue -- test_mpmc --exact --nocapture
#[test]
fn test_mpmc() {
    const COUNT: usize = 1_000;
    const CONCURRENCY: usize = 4;
    let queue: Arc<Queue<usize>> = Arc::new(Queue::new());
    let items = Arc::new((0..COUNT).map(|_| AtomicUsize::new(0)).collect::<Vec<_>>());

    let ths: Vec<_> = (0..CONCURRENCY)
        .map(|_| {
            let q = queue.clone();
            let its = items.clone();
            thread::spawn(move || {
                for _ in 0..COUNT {
                    let n = loop {
                        if let Some(x) = q.try_pop() {
                            break x;
                        } else {
                            thread::yield_now();
                        }
                    };
                    its[n].fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .chain((0..CONCURRENCY).map(|_| {
            let q = queue.clone();
            thread::spawn(move || {
                for i in 0..COUNT {
                    q.push(i);
                }
            })
        }))
        .collect();

    for th in ths {
        th.join().unwrap();
    }

    for c in &*items {
        assert_eq!(c.load(Ordering::SeqCst), CONCURRENCY);
    }

    assert!(queue.try_pop().is_none());
}

// Every pushed value is handed out exactly once, and each consumer sees the
// values of a given producer in the order they were pushed.
//
// cargo test --package tl-queue --test queue -- test_no_loss_no_duplication --exact --nocapture
#[test]
fn test_no_loss_no_duplication() {
    const COUNT: usize = 2_000;
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 3;
    let queue: Queue<(usize, usize)> = Queue::new();
    let remaining = AtomicUsize::new(COUNT * PRODUCERS);
    let popped = Mutex::new(Vec::with_capacity(COUNT * PRODUCERS));

    thread::scope(|s| {
        for producer in 0..PRODUCERS {
            let queue = &queue;
            s.spawn(move || {
                for i in 0..COUNT {
                    queue.push((producer, i));
                }
            });
        }

        for _ in 0..CONSUMERS {
            s.spawn(|| {
                let mut last_seen = [None; PRODUCERS];
                let mut mine = Vec::new();

                while remaining.load(Ordering::SeqCst) > 0 {
                    let Some((producer, i)) = queue.try_pop() else {
                        thread::yield_now();
                        continue;
                    };
                    remaining.fetch_sub(1, Ordering::SeqCst);

                    if let Some(last) = last_seen[producer] {
                        assert!(i > last, "producer {producer}: {i} popped after {last}");
                    }
                    last_seen[producer] = Some(i);
                    mine.push((producer, i));
                }

                popped.lock().unwrap().extend(mine);
            });
        }
    });

    let popped = popped.into_inner().unwrap();
    assert_eq!(popped.len(), COUNT * PRODUCERS);

    let unique: HashSet<_> = popped.iter().copied().collect();
    assert_eq!(unique.len(), COUNT * PRODUCERS);
    for producer in 0..PRODUCERS {
        for i in 0..COUNT {
            assert!(unique.contains(&(producer, i)));
        }
    }

    assert!(queue.is_empty());
    assert!(queue.try_pop().is_none());
}

// cargo test --package tl-queue --test queue -- test_drop_releases_items --exact --nocapture
#[test]
fn test_drop_releases_items() {
    let item = Arc::new(());
    let queue: Queue<Arc<()>> = Queue::new();

    for _ in 0..10 {
        queue.push(item.clone());
    }
    assert_eq!(Arc::strong_count(&item), 11);

    for _ in 0..4 {
        drop(queue.try_pop());
    }
    assert_eq!(Arc::strong_count(&item), 7);

    drop(queue);
    assert_eq!(Arc::strong_count(&item), 1);
}

// cargo test --package tl-queue --test queue -- test_drop_long_queue --exact --nocapture
#[test]
fn test_drop_long_queue() {
    let queue: Queue<usize> = Queue::new();

    for i in 0..1_000_000 {
        queue.push(i);
    }

    drop(queue);
}

// cargo test --package tl-queue --test queue -- test_drop_survives_panicking_item --exact --nocapture
#[test]
fn test_drop_survives_panicking_item() {
    struct Item {
        _count: Arc<()>,
        explode: bool,
    }

    impl Drop for Item {
        fn drop(&mut self) {
            if self.explode {
                panic!("item dropped");
            }
        }
    }

    let count = Arc::new(());
    let queue: Queue<Item> = Queue::new();

    for i in 0..6 {
        queue.push(Item {
            _count: count.clone(),
            explode: i == 2,
        });
    }
    assert_eq!(Arc::strong_count(&count), 7);

    let dropped = panic::catch_unwind(AssertUnwindSafe(|| drop(queue)));
    assert!(dropped.is_err());

    // Items queued after the one that panicked are still released.
    assert_eq!(Arc::strong_count(&count), 1);
}
