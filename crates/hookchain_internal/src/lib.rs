//! # Hookchain Internal Library
//!
//! Re-exports the core hookchain crates for convenience.

/// Layer 1: hooks, callbacks and events.
pub use hookchain_core;

/// Layer 2: per-entity hook registries.
pub use hookchain_registry;

/// Subscriber setup for hookchain's `tracing` output.
#[cfg(feature = "tracing-subscriber")]
pub use hookchain_tracing;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hookchain_core::prelude::*;
    pub use hookchain_registry::prelude::*;
}
