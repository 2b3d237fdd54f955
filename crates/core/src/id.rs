// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes for host-assigned ids.
//!
//! Every id in this system is minted by the execution host (job ids,
//! validation sessions) or by the graph a job runs (block and edge ids), so
//! ids are opaque strings wrapped for type safety, never generated locally.

/// Returns a string slice truncated to at most `n` bytes on a char boundary.
pub fn short(s: &str, n: usize) -> &str {
    if s.len() <= n {
        return s;
    }
    let mut end = n;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Define an opaque string id wrapper backed by `SmolStr`.
///
/// Generates `new()`, `as_str()`, `short()`, `is_empty()`, `Display`,
/// `From<&str>`, `From<String>`, `AsRef<str>`, `PartialEq<str>`,
/// `PartialEq<&str>`, `Borrow<str>` and `Deref<Target = str>`.
///
/// ```ignore
/// define_id! {
///     /// Host-assigned job identifier.
///     pub struct JobId;
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub smol_str::SmolStr);

        impl $name {
            pub fn new(id: impl Into<smol_str::SmolStr>) -> Self {
                Self(id.into())
            }

            #[allow(dead_code)]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Leading `n` bytes of the id, for log lines and compact output.
            pub fn short(&self, n: usize) -> &str {
                $crate::id::short(&self.0, n)
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&String> for $name {
            fn from(s: &String) -> Self {
                Self::new(s.as_str())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Host-assigned identifier of one remote job, unique for its lifetime.
    pub struct JobId;
}

define_id! {
    /// Host-assigned identifier of an incremental validation session.
    pub struct SessionId;
}

define_id! {
    /// Node identifier inside a test-case graph.
    pub struct BlockId;
}

define_id! {
    /// Connection identifier inside a test-case graph.
    pub struct EdgeId;
}

define_id! {
    /// Identifier of a generated plan (AI tasks).
    pub struct PlanId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
