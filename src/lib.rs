#![deny(
    warnings,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_op_in_unsafe_fn,
    unused_crate_dependencies,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    rust_2018_idioms
)]

//! A two-lock multi-producer multi-consumer unbounded queue.
//!
//! Producers and consumers synchronize on two independent locks: `push` only takes the tail
//! lock and `try_pop` only takes the head lock, briefly reading the tail to tell whether the
//! queue is empty. A sentinel node always sits at the end of the queue so that the two ends
//! never share mutable state.
//!
//! `try_pop` never waits: it returns `None` when the queue is empty.
//!
//! # Examples
//!
//! Single Producer - Single Consumer:
//!
//! ```
//! use tl_queue::Queue;
//!
//! let queue: Queue<usize> = Queue::new();
//!
//! queue.push(1);
//! queue.push(2);
//! queue.push(3);
//!
//! assert_eq!(queue.try_pop(), Some(1));
//! assert_eq!(queue.try_pop(), Some(2));
//! assert_eq!(queue.try_pop(), Some(3));
//! assert_eq!(queue.try_pop(), None);
//! assert_eq!(queue.try_pop(), None);
//! ```
//!
//! Multi Producer - Single Consumer:
//!
//! ```
//! use tl_queue::Queue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! const COUNT: usize = 1_000;
//! const CONCURRENCY: usize = 4;
//!
//! let queue: Arc<Queue<usize>> = Arc::new(Queue::new());
//!
//! let ths: Vec<_> = (0..CONCURRENCY)
//!     .map(|_| {
//!         let q = queue.clone();
//!         thread::spawn(move || {
//!             for i in 0..COUNT {
//!                 q.push(i);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for th in ths {
//!     th.join().unwrap();
//! }
//!
//! for _ in 0..COUNT * CONCURRENCY {
//!     assert!(queue.try_pop().is_some());
//! }
//!
//! assert!(queue.try_pop().is_none());
//! ```
//!
//! Multi Producer - Multi Consumer, with scoped threads:
//!
//! ```
//! use tl_queue::Queue;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::thread;
//!
//! const COUNT: usize = 1_000;
//! const CONCURRENCY: usize = 4;
//!
//! let queue: Queue<usize> = Queue::new();
//! let items: Vec<_> = (0..COUNT).map(|_| AtomicUsize::new(0)).collect();
//!
//! thread::scope(|s| {
//!     for _ in 0..CONCURRENCY {
//!         s.spawn(|| {
//!             for i in 0..COUNT {
//!                 queue.push(i);
//!             }
//!         });
//!         s.spawn(|| {
//!             for _ in 0..COUNT {
//!                 let n = loop {
//!                     if let Some(x) = queue.try_pop() {
//!                         break x;
//!                     }
//!                     thread::yield_now();
//!                 };
//!                 items[n].fetch_add(1, Ordering::SeqCst);
//!             }
//!         });
//!     }
//! });
//!
//! for c in &items {
//!     assert_eq!(c.load(Ordering::SeqCst), CONCURRENCY);
//! }
//!
//! assert!(queue.try_pop().is_none());
//! ```
//!
//! # Features
//!
//! - `tracing`: emits [`tracing`](https://docs.rs/tracing/) events when nodes are
//!   linked, popped and released.
//! - `no-cache-pad`: disables cache-line alignment of the head and tail locks.

#[macro_use]
mod util;

mod queue;

pub(crate) mod cache_pad;
pub(crate) mod node;
pub(crate) mod variant;

pub use queue::Queue;

// The unit tests exercising these only run without loom.
#[cfg(all(test, loom))]
use {proptest as _, tracing as _, tracing_subscriber as _};
