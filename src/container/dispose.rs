//! Container disposal.

use super::{Container, Role};
use crate::error::DiResult;
use crate::internal::BoxFuture;

impl Container {
    /// Tears down the instances this container built.
    ///
    /// Instances are torn down newest first. Each instance whose service was
    /// registered with a teardown contributes its service name to the returned
    /// list, once per instance; instances without a teardown are dropped
    /// silently. The store is emptied and the shared configuration table is
    /// cleared, which unregisters every service for the whole hierarchy.
    ///
    /// With `dispose_root` set, a scope then disposes its root as well and
    /// appends the root's names. Disposing twice, or disposing a scope whose
    /// root was already disposed, is harmless and yields no names.
    ///
    /// # Errors
    ///
    /// Every teardown runs even when an earlier one fails, and the root
    /// cascade still happens. The first failure is then returned as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use named_di::{Container, Resolver};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> named_di::DiResult<()> {
    /// let root = Container::new();
    /// root.add_singleton_with_dispose("pool", |_| async { Ok(5u32) }, |_| async { Ok(()) });
    ///
    /// let scope = root.create_scope();
    /// scope.add_scoped_with_dispose("tx", |_| async { Ok(1u8) }, |_| async { Ok(()) })?;
    /// scope.get::<u32>("pool").await?;
    /// scope.get::<u8>("tx").await?;
    ///
    /// assert_eq!(scope.dispose(true).await?, vec!["tx", "pool"]);
    /// assert!(scope.dispose(true).await?.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn dispose(&self, dispose_root: bool) -> DiResult<Vec<String>> {
        self.dispose_boxed(dispose_root).await
    }

    fn dispose_boxed(&self, dispose_root: bool) -> BoxFuture<'_, DiResult<Vec<String>>> {
        Box::pin(async move {
            let entries = self.inner.store.lock().drain_lifo();
            let unregistered = self.inner.table.clear();
            self.inner.in_flight.clear();
            tracing::debug!(
                root = self.is_root(),
                instances = entries.len(),
                unregistered,
                "disposing container"
            );

            let mut disposed = Vec::new();
            let mut first_error = None;
            for entry in entries {
                let name = entry.key.service_name().to_string();
                let Some(teardown) = entry.teardown else {
                    tracing::trace!(instance = %entry.key, "instance dropped");
                    continue;
                };
                match teardown().await {
                    Ok(()) => {
                        tracing::debug!(instance = %entry.key, "instance disposed");
                        disposed.push(name);
                    }
                    Err(err) => {
                        tracing::warn!(instance = %entry.key, error = %err, "teardown failed");
                        first_error = first_error.or(Some(err));
                    }
                }
            }

            if dispose_root {
                if let Role::Scope { root } = &self.inner.role {
                    match root.dispose_boxed(true).await {
                        Ok(names) => disposed.extend(names),
                        Err(err) => first_error = first_error.or(Some(err)),
                    }
                }
            }

            match first_error {
                Some(err) => Err(err),
                None => Ok(disposed),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Resolver;
    use crate::DiError;

    #[tokio::test]
    async fn instances_without_teardown_are_not_reported() {
        let scope = Container::new().create_scope();
        scope.add_scoped("plain", |_| async { Ok(1u8) }).unwrap();
        scope
            .add_scoped_with_dispose("tracked", |_| async { Ok(2u8) }, |_| async { Ok(()) })
            .unwrap();
        scope.get::<u8>("plain").await.unwrap();
        scope.get::<u8>("tracked").await.unwrap();

        assert_eq!(scope.dispose(false).await.unwrap(), vec!["tracked"]);
        assert_eq!(scope.instance_count(), 0);
    }

    #[tokio::test]
    async fn dispose_unregisters_the_whole_hierarchy() {
        let root = Container::new();
        root.add_singleton("a", |_| async { Ok(1u8) });
        let scope = root.create_scope();
        let sibling = root.create_scope();

        scope.dispose(false).await.unwrap();

        assert_eq!(root.registration_count(), 0);
        assert!(sibling.get::<u8>("a").await.unwrap_err().is_not_registered());
    }

    #[tokio::test]
    async fn failing_teardown_does_not_skip_the_others() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let closed = Arc::new(AtomicUsize::new(0));
        let root = Container::new();
        let c = closed.clone();
        root.add_singleton_with_dispose(
            "pool",
            |_| async { Ok(()) },
            move |_| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            },
        );

        let scope = root.create_scope();
        let c = closed.clone();
        scope
            .add_scoped_with_dispose(
                "conn",
                |_| async { Ok(()) },
                move |_| {
                    c.fetch_add(1, Ordering::SeqCst);
                    async { Ok(()) }
                },
            )
            .unwrap();
        scope
            .add_scoped_with_dispose(
                "tx",
                |_| async { Ok(()) },
                |_| async { Err(DiError::service("rollback failed")) },
            )
            .unwrap();

        scope.get::<()>("pool").await.unwrap();
        scope.get::<()>("conn").await.unwrap();
        // Newest instance, torn down first.
        scope.get::<()>("tx").await.unwrap();

        let err = scope.dispose(true).await.unwrap_err();
        assert_eq!(err.to_string(), "rollback failed");
        assert_eq!(closed.load(Ordering::SeqCst), 2);
        assert_eq!(scope.instance_count(), 0);
        assert_eq!(root.instance_count(), 0);
        assert!(scope.dispose(true).await.unwrap().is_empty());
    }
}
