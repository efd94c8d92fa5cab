//! Pushes a few values, pops more than were pushed, then shares one queue
//! between producer and consumer threads.
//!
//! cargo run --example demo --features tracing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tl_queue::Queue;

const PRODUCERS: usize = 3;
const CONSUMERS: usize = 2;
const COUNT: usize = 1_000;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_thread_ids(true)
        .init();

    let queue: Queue<usize> = Queue::new();
    queue.push(1);
    queue.push(2);
    queue.push(3);

    for _ in 0..5 {
        match queue.try_pop() {
            Some(value) => println!("{value}"),
            None => println!("no value in queue"),
        }
    }

    let remaining = AtomicUsize::new(PRODUCERS * COUNT);

    thread::scope(|s| {
        for producer in 0..PRODUCERS {
            let queue = &queue;
            s.spawn(move || {
                for i in 0..COUNT {
                    queue.push(producer * COUNT + i);
                }
                tracing::info!(producer, pushed = COUNT, "producer done");
            });
        }

        for consumer in 0..CONSUMERS {
            let queue = &queue;
            let remaining = &remaining;
            s.spawn(move || {
                let mut popped = 0;
                while remaining.load(Ordering::SeqCst) > 0 {
                    match queue.try_pop() {
                        Some(_) => {
                            popped += 1;
                            remaining.fetch_sub(1, Ordering::SeqCst);
                        }
                        None => thread::yield_now(),
                    }
                }
                tracing::info!(consumer, popped, "consumer done");
            });
        }
    });

    println!("drained: {}", queue.is_empty());
}
