// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative helpers shared by the model types.
//!
//! - [`simple_display!`] maps unit-like enum variants to fixed strings
//! - [`setters!`] emits chainable setters inside an `impl` block

/// Implement `Display` for an enum by mapping each variant to a string.
///
/// Variants that carry data use `(..)` to ignore their fields.
///
/// ```ignore
/// hw_core::simple_display! {
///     BlockStatus {
///         Idle => "idle",
///         Executing => "executing",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident $(( $($ignore:tt)* ))? => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant $(( $($ignore)* ))? => $str, )+
                })
            }
        }
    };
}

/// Emit chainable setter methods for config/request structs.
///
/// - `into { field: Type }` takes `impl Into<Type>`
/// - `set { field: Type }` takes `Type`
/// - `option { field: Type }` stores `Some(v.into())` into an `Option<Type>`
///
/// ```ignore
/// impl JobRequest {
///     hw_core::setters! {
///         set { params: serde_json::Value }
///         option { graph: ExecutionGraph }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (
        $(into {
            $( $into_field:ident : $into_ty:ty ),* $(,)?
        })?
        $(set {
            $( $set_field:ident : $set_ty:ty ),* $(,)?
        })?
        $(option {
            $( $opt_field:ident : $opt_ty:ty ),* $(,)?
        })?
    ) => {
        $($(
            pub fn $into_field(mut self, v: impl Into<$into_ty>) -> Self {
                self.$into_field = v.into();
                self
            }
        )*)?

        $($(
            pub fn $set_field(mut self, v: $set_ty) -> Self {
                self.$set_field = v;
                self
            }
        )*)?

        $($(
            pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                self.$opt_field = Some(v.into());
                self
            }
        )*)?
    };
}
