//! Error types for the dependency injection container.

use thiserror::Error;

use crate::lifetime::Lifetime;

/// Boxed error produced by caller-supplied factories and teardowns.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Dependency injection errors
///
/// Represents the error conditions that can occur during service
/// registration, resolution, or disposal. Container errors fail fast and
/// are never retried internally; errors raised by factories or teardowns
/// pass through [`DiError::Service`] untouched.
///
/// # Examples
///
/// ```rust
/// use named_di::{Container, DiError, Resolver};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let root = Container::new();
/// match root.get::<String>("missing").await {
///     Err(DiError::NotRegistered { name }) => assert_eq!(name, "missing"),
///     _ => unreachable!(),
/// }
/// # }
/// ```
#[derive(Debug, Error)]
pub enum DiError {
    /// No configuration exists for the name anywhere along the root chain.
    #[error("Service not registered: {name}")]
    NotRegistered {
        /// The requested service name.
        name: String,
    },

    /// Scoped or transient registration attempted on a root container.
    #[error("Invalid container role: cannot register {lifetime} service `{name}` on a root container")]
    InvalidRole {
        /// The service name being registered.
        name: String,
        /// The rejected lifetime.
        lifetime: Lifetime,
    },

    /// A root container was asked to materialize a scope-lifetime service.
    #[error("Lifetime error: {lifetime} service `{name}` must be resolved from a scope")]
    WrongLifetime {
        /// The requested service name.
        name: String,
        /// Lifetime of the registered configuration.
        lifetime: Lifetime,
    },

    /// The instance registered under `name` is not of the requested type.
    #[error("Type mismatch for `{name}`: expected {expected}")]
    TypeMismatch {
        /// The requested service name.
        name: String,
        /// Type name the caller asked for.
        expected: &'static str,
    },

    /// Failure raised by a caller-supplied factory or teardown.
    #[error(transparent)]
    Service(BoxError),
}

impl DiError {
    /// Wraps an arbitrary error raised inside a factory or teardown.
    pub fn service<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        DiError::Service(err.into())
    }

    /// Returns true for [`DiError::NotRegistered`].
    pub fn is_not_registered(&self) -> bool {
        matches!(self, DiError::NotRegistered { .. })
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
