//! Example signal relay built with hookchain.
//!
//! A [`Radio`] exposes two hooks:
//!
//! - `on_signal(color, flavor)` - a signal was received
//! - `we_get_signal!` - no arguments, fired after every signal
//!
//! The class-level registry wires a bound-method callback (`log_signal`) and
//! an `audit` wildcard that fires for every hook. Each radio specializes the
//! class registry, so callbacks added to one radio stay on that radio.
//!
//! ```text
//!  class registry ─── on_signal:        [audit, log_signal]
//!        │           we_get_signal!:   [audit]
//!        ▼ specialize
//!  radio registry ─── on_signal:        [instance callbacks...]
//!                    we_get_signal!:   [instance callbacks...]
//! ```

use hookchain::prelude::*;
use std::sync::Mutex;

/// Hook fired when a signal arrives.
pub const ON_SIGNAL: &str = "on_signal";

/// Hook fired after every signal.
pub const WE_GET_SIGNAL: &str = "we_get_signal!";

/// A radio that relays signals through its hooks.
pub struct Radio {
    name: String,
    log: Mutex<Vec<String>>,
    hooks: HookRegistry<Radio>,
}

impl Radio {
    /// Creates a radio with its own view of `class`.
    #[must_use]
    pub fn new(class: &HookRegistry<Radio>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: Mutex::new(Vec::new()),
            hooks: class.specialize(),
        }
    }

    /// Returns the radio's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every line written to the radio's log, oldest first.
    #[must_use]
    pub fn log(&self) -> Vec<String> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn write(&self, line: String) {
        if let Ok(mut log) = self.log.lock() {
            log.push(line);
        }
    }

    /// Relays one signal: `on_signal(color, flavor)`, then `we_get_signal!`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a callback.
    pub fn receive(&self, color: &str, flavor: &str) -> Result<(), HookError> {
        self.execute_hook(ON_SIGNAL, (color, flavor))?;
        self.execute_hook(WE_GET_SIGNAL, ())
    }
}

impl Hookable for Radio {
    fn hooks(&self) -> &HookRegistry<Self> {
        &self.hooks
    }
}

/// Methods bound-method callbacks can target.
#[must_use]
pub fn radio_methods() -> MethodTable<Radio> {
    MethodTable::<Radio>::new().with_method(
        "log_signal",
        Callable::<Radio>::new(2usize, |call| {
            let radio = call
                .receiver()
                .ok_or_else(|| HookError::failed("log_signal needs a radio"))?;
            let color = call.value(0).and_then(Value::as_str).unwrap_or("?");
            let flavor = call.value(1).and_then(Value::as_str).unwrap_or("?");
            radio.write(format!("{}: {color} {flavor}", radio.name));
            Ok(Value::Null)
        }),
    )
}

/// Builds the class-level registry shared by every radio.
///
/// # Errors
///
/// Returns an error if a hook or callback cannot be registered.
pub fn radio_class() -> Result<HookRegistry<Radio>, HookError> {
    let mut class = HookRegistry::<Radio>::new();
    class.define_hook(ON_SIGNAL, &["color", "flavor"])?;
    class.define_hook(WE_GET_SIGNAL, &[])?;

    class.add_wildcard_callback(
        "audit",
        Callable::variadic(|call| {
            if let Some(event) = call.event() {
                let arguments = Value::from(event.arguments().to_vec());
                tracing::info!(hook = %event.name(), %arguments, "audit");
            }
            Ok(Value::Null)
        }),
    )?;
    class.add_method_callback(ON_SIGNAL, &radio_methods(), "log_signal")?;
    Ok(class)
}
