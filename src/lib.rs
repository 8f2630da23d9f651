//! Ordered, delegating callback dispatch for Rust.
//!

pub use hookchain_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hookchain_internal::prelude::*;
}
