//! Instance keys and transient key generation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Key for an entry in a container's instance store.
///
/// Cached lifetimes (singleton, scoped) occupy at most one entry per service
/// name. Transient instances each get a unique key so several instances of
/// the same service can be tracked and torn down independently.
///
/// # Examples
///
/// ```rust
/// use named_di::InstanceKey;
///
/// let cached = InstanceKey::named("db");
/// let a = InstanceKey::transient("request", "1");
/// let b = InstanceKey::transient("request", "2");
///
/// assert_eq!(cached.service_name(), "db");
/// assert_eq!(a.service_name(), b.service_name());
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstanceKey {
    /// Cached instance keyed by its service name
    Named(String),
    /// Transient instance with a generated unique id
    Transient {
        /// Service name the instance was resolved under
        name: String,
        /// Collision-free id from the container's [`KeySource`]
        id: String,
    },
}

impl InstanceKey {
    /// Key for a cached (singleton or scoped) instance.
    pub fn named(name: impl Into<String>) -> Self {
        InstanceKey::Named(name.into())
    }

    /// Key for one transient instance.
    pub fn transient(name: impl Into<String>, id: impl Into<String>) -> Self {
        InstanceKey::Transient {
            name: name.into(),
            id: id.into(),
        }
    }

    /// The service name this instance was resolved under.
    pub fn service_name(&self) -> &str {
        match self {
            InstanceKey::Named(name) => name,
            InstanceKey::Transient { name, .. } => name,
        }
    }

    /// Whether this key identifies a transient instance.
    pub fn is_transient(&self) -> bool {
        matches!(self, InstanceKey::Transient { .. })
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceKey::Named(name) => f.write_str(name),
            InstanceKey::Transient { name, id } => write!(f, "{}#{}", name, id),
        }
    }
}

/// Source of collision-free ids for transient instances.
///
/// Any generator works as long as it never repeats an id within one scope.
pub trait KeySource: Send + Sync + 'static {
    /// Produces a fresh id for a transient instance of `service`.
    fn next_id(&self, service: &str) -> String;
}

/// Random v4 UUIDs. This is the default key source.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidKeySource;

impl KeySource for UuidKeySource {
    fn next_id(&self, _service: &str) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Monotonic counter, handy for deterministic diagnostics.
#[derive(Debug, Default)]
pub struct SequentialKeySource {
    next: AtomicU64,
}

impl SequentialKeySource {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for SequentialKeySource {
    fn next_id(&self, _service: &str) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
