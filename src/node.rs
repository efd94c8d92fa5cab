//! A link of the [`Queue`] chain.
//!
//! A [`Node`] either holds an item, or is the sentinel sitting at the tail of the chain.
//! The sentinel is filled in place by the next `push`, which then links a fresh sentinel
//! after it. Every node is owned by its predecessor through `next`, and the first node of
//! the chain is owned by the [`Queue`] head.
//!
//! Nodes are heap allocated with [`Node::alloc`] and handed around as [`NonNull`] pointers.
//! Ownership is given back to a [`Box`] exactly once, with [`Node::free`], by whoever
//! unlinks the node from the chain.
//!
//! [`Queue`]: crate::queue::Queue

use crate::variant::cell::UnsafeCell;

use std::ptr::NonNull;

/// A link of the [`Queue`] chain.
///
/// [`Queue`]: crate::queue::Queue
pub(crate) struct Node<T> {
    /// The item pushed into this node, `None` while the node is the sentinel or
    /// once the item has been popped.
    ///
    /// Written under the tail lock while the node is the sentinel, then read
    /// under the head lock once the node is behind the tail.
    pub(crate) item: UnsafeCell<Option<T>>,

    /// The next [`Node`] of the chain, owned by this node.
    ///
    /// Unset for the sentinel only.
    pub(crate) next: UnsafeCell<Option<NonNull<Node<T>>>>,
}

impl<T> Node<T> {
    /// Allocates a new sentinel [`Node`] and leaks it into a raw pointer.
    pub(crate) fn alloc() -> NonNull<Self> {
        let node = Box::new(Self {
            item: UnsafeCell::new(None),
            next: UnsafeCell::new(None),
        });

        NonNull::from(Box::leak(node))
    }

    /// Takes back ownership of a [`Node`] allocated with [`Node::alloc`].
    ///
    /// # Safety
    ///
    /// The node must have been unlinked from the chain, no other thread may still
    /// reach it, and it must not be freed twice.
    pub(crate) unsafe fn free(node: NonNull<Self>) -> Box<Self> {
        unsafe { Box::from_raw(node.as_ptr()) }
    }
}
