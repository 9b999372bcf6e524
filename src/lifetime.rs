//! Service lifetime definitions.

use std::fmt;

/// Service lifetimes controlling instance caching behavior
///
/// Defines where an instance is cached and which container is responsible
/// for tearing it down.
///
/// # Lifetime Characteristics
///
/// - **Singleton**: cached in the root, shared by every scope
/// - **Scoped**: cached per scope, independent across scopes
/// - **Transient**: built on every resolution, each instance tracked separately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per root container, cached until the root is disposed
    ///
    /// Singleton services are always materialized in the root, no matter
    /// which scope requested them.
    Singleton,
    /// Single instance per scope, cached for the scope's lifetime
    Scoped,
    /// New instance per resolution, never served from cache
    ///
    /// Every transient instance is still recorded in the resolving scope so
    /// that its teardown runs when the scope is disposed.
    Transient,
}

impl Lifetime {
    /// Whether instances of this lifetime are served from a cache.
    pub fn is_cached(self) -> bool {
        !matches!(self, Lifetime::Transient)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        };
        f.write_str(s)
    }
}
