//! Entities that expose hooks.

use crate::registry::HookRegistry;
use hookchain_core::{HookError, IntoArguments};

/// An entity with its own [`HookRegistry`].
///
/// Implementors typically hold a registry derived from a shared class-level
/// registry with [`HookRegistry::specialize`], so class callbacks run before
/// the entity's own.
///
/// # Example
///
/// ```
/// use hookchain_core::{Callable, HookError, Value};
/// use hookchain_registry::{HookRegistry, Hookable};
///
/// struct Door {
///     hooks: HookRegistry<Door>,
/// }
///
/// impl Hookable for Door {
///     fn hooks(&self) -> &HookRegistry<Self> {
///         &self.hooks
///     }
/// }
///
/// let mut class = HookRegistry::new();
/// class.define_hook("opened", &["by"])?;
///
/// let door = Door { hooks: class.specialize() };
/// door.hooks().add_callback("opened", Callable::new(1usize, |call| {
///     assert_eq!(call.value(0), Some(&Value::from("alice")));
///     Ok(Value::Null)
/// }))?;
/// door.execute_hook("opened", ("alice",))?;
/// # Ok::<(), HookError>(())
/// ```
pub trait Hookable: Sized + 'static {
    /// Returns this entity's hooks.
    fn hooks(&self) -> &HookRegistry<Self>;

    /// Triggers hook `name` with this entity as the event source.
    ///
    /// # Errors
    ///
    /// See [`HookRegistry::execute_hook`].
    fn execute_hook(&self, name: &str, args: impl IntoArguments) -> Result<(), HookError> {
        self.hooks().execute_hook(self, name, args)
    }
}
