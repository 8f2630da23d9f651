//! Per-entity hook registries for hookchain (Layer 2).
//!
//! `hookchain_registry` builds on [`hookchain_core`] to give entity types a
//! declarative hook surface:
//!
//! - [`HookRegistry`] - the hooks an entity exposes, with declared parameters
//! - [`HookDefinition`] - one hook and its parameter names
//! - [`MethodTable`] - methods available to bound-method callbacks
//! - [`Hookable`] - entities that own a registry and trigger its hooks
//!
//! Class-level registries are defined once and specialized per subclass and
//! per instance, producing the delegation chains `hookchain_core` executes.

/// Entities that expose hooks.
pub mod entity;

/// Method tables.
pub mod method_table;

/// Hook registries and definitions.
pub mod registry;

pub use entity::Hookable;
pub use method_table::MethodTable;
pub use registry::{HookDefinition, HookRegistry};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::entity::*;
    pub use crate::method_table::*;
    pub use crate::registry::*;
}
