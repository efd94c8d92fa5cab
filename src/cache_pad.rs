//! Prevents [false sharing](https://en.wikipedia.org/wiki/False_sharing) between the head
//! and tail lock domains of the [`Queue`].
//!
//! Producers only ever touch the tail lock and consumers only ever touch the head lock. If
//! both locks lived on the same cache line, every lock or unlock by a `push` would invalidate
//! the line a concurrent `try_pop` needs to take the head lock (and the other way around),
//! so the two independent locks would still contend on one cache line.
//!
//! # Size and alignment
//!
//! Cache lines are assumed to be N bytes long, depending on the architecture:
//!
//! - On x86_64 and aarch64, N = 128.
//! - On all others, N = 64.
//!
//! The size of `CachePad<T>` is the smallest multiple of N bytes large enough to accommodate
//! a value of type `T`.
//!
//! With the `no-cache-pad` feature enabled, `CachePad<T>` has the same layout as `T`.
//!
//! [`Queue`]: crate::queue::Queue

use std::ops::Deref;

/// Pads and aligns data to the length of a cache line.
#[cfg_attr(
    all(
        not(feature = "no-cache-pad"),
        any(target_arch = "x86_64", target_arch = "aarch64")
    ),
    repr(align(128))
)]
#[cfg_attr(
    all(
        not(feature = "no-cache-pad"),
        not(any(target_arch = "x86_64", target_arch = "aarch64"))
    ),
    repr(align(64))
)]
pub(crate) struct CachePad<T>(T);

impl<T> CachePad<T> {
    /// Creates a padded representation of the data aligned with the
    /// length of a cache line.
    pub(crate) fn new(t: T) -> CachePad<T> {
        CachePad(t)
    }
}

impl<T> Deref for CachePad<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}
