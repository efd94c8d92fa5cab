//! Logging helpers.
//!
//! Events are emitted when the `tracing` feature is enabled, and always in
//! tests. Otherwise the macros expand to nothing and the hot path carries no
//! logging cost.
//!
//! Events are only ever emitted with both queue locks released, so a slow
//! subscriber never stretches a critical section.

#[cfg(any(test, feature = "tracing"))]
macro_rules! trace {
    ($($t:tt)*) => { tracing::trace!($($t)*) }
}

#[cfg(not(any(test, feature = "tracing")))]
macro_rules! trace {
    ($($t:tt)*) => {};
}
