//! Opaque argument values and conversion into argument lists.

use variadics_please::all_tuples;

/// Opaque value carried by an [`Event`](crate::Event) or returned by a callback.
pub type Value = serde_json::Value;

/// Types that can be converted into the ordered argument list of an event.
///
/// Implemented for `Vec<Value>` and for tuples of up to 16 items that
/// convert into [`Value`], so triggers can be written as
/// `hooks.execute_hook(&source, "on_signal", ("purple", "grape"))`.
pub trait IntoArguments {
    /// Returns the arguments in positional order.
    fn into_arguments(self) -> Vec<Value>;
}

impl IntoArguments for Vec<Value> {
    fn into_arguments(self) -> Vec<Value> {
        self
    }
}

impl<const N: usize> IntoArguments for [Value; N] {
    fn into_arguments(self) -> Vec<Value> {
        self.into()
    }
}

macro_rules! impl_into_arguments_for_tuple {
    ($($T:ident),*) => {
        impl<$($T: Into<Value>),*> IntoArguments for ($($T,)*) {
            #[allow(
                non_snake_case,
                reason = "tuple fields are bound to their type parameter names"
            )]
            fn into_arguments(self) -> Vec<Value> {
                let ($($T,)*) = self;
                vec![$($T.into()),*]
            }
        }
    };
}

// Generate implementations for tuples from 0 to 16 elements
all_tuples!(impl_into_arguments_for_tuple, 0, 16, T);
