//! A two-lock multi-producer multi-consumer unbounded queue.
//!
//! The queue is a singly-linked chain of [`Node`] that always ends with a sentinel. Producers
//! only touch the tail lock: they fill the sentinel in place and link a fresh one after it.
//! Consumers only touch the head lock: they take the item out of the head node and advance
//! the head to its successor.
//!
//! The two lock domains meet at a single point, the emptiness check. The queue is empty when
//! the head node *is* the sentinel, which `try_pop` decides by reading the tail pointer through
//! the tail lock while already holding the head lock. The tail lock is released right after the
//! read and is never held while waiting on the head lock, so the two locks cannot deadlock.

use crate::cache_pad::CachePad;
use crate::node::Node;
use crate::variant::sync::{Mutex, MutexGuard, PoisonError};

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

/// A two-lock multi-producer multi-consumer unbounded queue.
///
/// A [`Queue`] is not [`Clone`]. Share it between threads behind an [`Arc`] or
/// through scoped threads.
///
/// [`Arc`]: std::sync::Arc
pub struct Queue<T> {
    /// Points to the oldest [`Node`] of the chain, which the queue owns.
    head: CachePad<Mutex<NonNull<Node<T>>>>,

    /// Points to the sentinel [`Node`], the last one of the chain.
    tail: CachePad<Mutex<NonNull<Node<T>>>>,

    _owns: PhantomData<Box<Node<T>>>,
}

// Safety: items are moved in by `push` and moved out by `try_pop`, they are never
// shared between threads. Every access to the chain goes through the head or tail lock.
unsafe impl<T: Send> Send for Queue<T> {}
unsafe impl<T: Send> Sync for Queue<T> {}

impl<T> Queue<T> {
    /// Creates a new empty [`Queue`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tl_queue::Queue;
    ///
    /// let queue = Queue::<usize>::new();
    /// assert!(queue.try_pop().is_none());
    /// ```
    pub fn new() -> Self {
        let sentinel = Node::alloc();

        Self {
            head: CachePad::new(Mutex::new(sentinel)),
            tail: CachePad::new(Mutex::new(sentinel)),
            _owns: PhantomData,
        }
    }

    /// Push an item into the [`Queue`].
    ///
    /// The item is written into the current sentinel, which becomes the back of the
    /// queue, and a freshly allocated sentinel is linked after it. The new sentinel is
    /// allocated before the tail lock is taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use tl_queue::Queue;
    ///
    /// let queue = Queue::<usize>::new();
    ///
    /// queue.push(1);
    /// queue.push(2);
    /// queue.push(3);
    /// ```
    pub fn push(&self, item: T) {
        let sentinel = Node::alloc();

        let mut tail = lock(&self.tail);
        let node = *tail;

        // Safety: `node` is the current sentinel. Only the holder of the tail lock
        // touches its fields, and consumers never go past it.
        unsafe {
            let node = node.as_ref();
            node.item.with_mut(|p| p.write(Some(item)));
            node.next.with_mut(|p| p.write(Some(sentinel)));
        }

        *tail = sentinel;
        drop(tail);
        trace!(?node, ?sentinel, "Queue::push");
    }

    /// Pop an item from the [`Queue`]. Returns none if the [`Queue`] is empty.
    ///
    /// This never waits for a producer: an empty queue is reported right away.
    ///
    /// # Examples
    ///
    /// ```
    /// use tl_queue::Queue;
    ///
    /// let queue = Queue::<usize>::new();
    /// for i in 0..8 {
    ///   queue.push(i);
    /// }
    ///
    /// for i in 0..8 {
    ///   assert_eq!(Some(i), queue.try_pop());
    /// }
    ///
    /// assert!(queue.try_pop().is_none());
    /// ```
    pub fn try_pop(&self) -> Option<T> {
        let mut head = lock(&self.head);
        let node = *head;

        if node == self.current_tail() {
            drop(head);
            trace!(?node, "Queue::try_pop: empty");
            return None;
        }

        // Safety: `node` is behind the tail. The producer that filled it released the
        // tail lock we just acquired, no producer will touch it again, and the head
        // lock keeps other consumers away.
        let (item, next) = unsafe {
            let node = node.as_ref();
            let item = node.item.with_mut(|p| (*p).take());
            let next = node.next.with(|p| *p);
            (item, next)
        };

        let next = match next {
            Some(next) => next,
            None => unreachable!("a node behind the tail always links to its successor"),
        };

        *head = next;
        drop(head);
        trace!(?node, ?next, "Queue::try_pop");

        // Safety: the node was unlinked while holding the head lock.
        drop(unsafe { Node::free(node) });

        item
    }

    /// Returns `true` if the [`Queue`] holds no items.
    ///
    /// The answer is a snapshot: by the time it is returned, other threads may
    /// already have pushed or popped items.
    ///
    /// # Examples
    ///
    /// ```
    /// use tl_queue::Queue;
    ///
    /// let queue = Queue::<usize>::new();
    /// assert!(queue.is_empty());
    ///
    /// queue.push(1);
    /// assert!(!queue.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        let head = lock(&self.head);
        *head == self.current_tail()
    }

    /// Reads the tail pointer, holding the tail lock only for the read.
    fn current_tail(&self) -> NonNull<Node<T>> {
        *lock(&self.tail)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue").finish_non_exhaustive()
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        // Keeps freeing the rest of the chain if an item's destructor panics.
        struct Release<'a, T>(&'a mut Option<NonNull<Node<T>>>);

        impl<T> Drop for Release<'_, T> {
            fn drop(&mut self) {
                // Safety: same as below, the chain is only reachable from here.
                while let Some(node) = unsafe { unlink(self.0) } {
                    drop(node);
                }
            }
        }

        // Walk the chain instead of letting nodes drop each other, long queues
        // would otherwise overflow the stack.
        let mut cursor = Some(*lock(&self.head));

        // Safety: we own the queue, so no other thread can reach the chain.
        while let Some(node) = unsafe { unlink(&mut cursor) } {
            let guard = Release(&mut cursor);
            drop(node);
            mem::forget(guard);
        }
    }
}

/// Takes back the node under `cursor` and moves `cursor` to its successor.
///
/// # Safety
///
/// `cursor` must point into a chain that no other thread can reach.
unsafe fn unlink<T>(cursor: &mut Option<NonNull<Node<T>>>) -> Option<Box<Node<T>>> {
    let node = unsafe { Node::free((*cursor)?) };
    *cursor = node.next.with(|p| unsafe { *p });
    trace!(next = ?cursor, "Queue::drop: freeing node");
    Some(node)
}

/// Critical sections only update pointers and never panic halfway through, so
/// a poisoned lock still guards a consistent chain.
fn lock<U>(mutex: &Mutex<U>) -> MutexGuard<'_, U> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
