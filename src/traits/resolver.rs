//! Resolver traits for service resolution.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{DiError, DiResult};
use crate::registration::AnyArc;

/// Core resolver trait for object-safe service resolution.
///
/// Implemented by [`Container`](crate::Container),
/// [`ResolverContext`](crate::ResolverContext) and
/// [`ScopeHandle`](crate::ScopeHandle). Most callers should use the typed
/// [`Resolver::get`] instead.
#[async_trait]
pub trait ResolverCore: Send + Sync {
    /// Resolves a service by name without type information.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The resolved instance as `Arc<dyn Any>`
    /// * `Err(DiError)` - Not registered, wrong lifetime, or a factory failure
    async fn resolve_any(&self, name: &str) -> DiResult<AnyArc>;
}

/// High-level resolver interface with typed resolution.
///
/// Blanket-implemented for every [`ResolverCore`].
///
/// # Examples
///
/// ```
/// use named_di::{Container, Resolver};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> named_di::DiResult<()> {
/// let root = Container::new();
/// root.add_singleton("answer", |_| async { Ok(42usize) });
///
/// let answer = root.get::<usize>("answer").await?;
/// assert_eq!(*answer, 42);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Resolver: ResolverCore {
    /// Resolves `name` and downcasts it to `T`.
    ///
    /// # Errors
    ///
    /// [`DiError::TypeMismatch`] when the instance is not a `T`, plus any
    /// error from [`ResolverCore::resolve_any`].
    async fn get<T>(&self, name: &str) -> DiResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let any = self.resolve_any(name).await?;
        any.downcast::<T>().map_err(|_| DiError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }
}

impl<R: ResolverCore> Resolver for R {}
