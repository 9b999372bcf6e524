//! Service resolution.

use async_trait::async_trait;

use super::{Container, ResolverContext, Role};
use crate::error::{DiError, DiResult};
use crate::internal::BoxFuture;
use crate::key::InstanceKey;
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, ServiceConfiguration};
use crate::traits::ResolverCore;

impl Container {
    /// Resolves `name` to a type-erased instance.
    ///
    /// Unknown names and singleton configurations seen from a scope are
    /// delegated to the root. Cached lifetimes are served from this
    /// container's store when present; otherwise the factory runs with this
    /// container as its resolver and the result is recorded here.
    pub(crate) fn resolve<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DiResult<AnyArc>> {
        Box::pin(async move {
            let Some(config) = self.inner.table.get(name) else {
                return match &self.inner.role {
                    Role::Scope { root } => {
                        tracing::trace!(service = name, "unknown in scope, asking root");
                        root.resolve(name).await
                    }
                    Role::Root => Err(DiError::NotRegistered {
                        name: name.to_string(),
                    }),
                };
            };

            match (&self.inner.role, config.lifetime) {
                (Role::Scope { root }, Lifetime::Singleton) => {
                    tracing::trace!(service = name, "delegating singleton to root");
                    root.resolve(name).await
                }
                (Role::Root, lifetime @ (Lifetime::Scoped | Lifetime::Transient)) => {
                    Err(DiError::WrongLifetime {
                        name: name.to_string(),
                        lifetime,
                    })
                }
                (_, Lifetime::Transient) => {
                    let id = self.inner.options.key_source.next_id(name);
                    self.construct(InstanceKey::transient(name, id), &config).await
                }
                _ => self.resolve_cached(name, &config).await,
            }
        })
    }

    async fn resolve_cached(&self, name: &str, config: &ServiceConfiguration) -> DiResult<AnyArc> {
        if let Some(hit) = self.cached(name) {
            return Ok(hit);
        }
        if !self.inner.options.single_flight {
            return self.construct(InstanceKey::named(name), config).await;
        }

        let gate = self.inner.in_flight.gate(name);
        let _permit = gate.lock().await;
        // Another resolution may have finished while we waited.
        if let Some(hit) = self.cached(name) {
            return Ok(hit);
        }
        self.construct(InstanceKey::named(name), config).await
    }

    fn cached(&self, name: &str) -> Option<AnyArc> {
        let hit = self.inner.store.lock().cached(name);
        if hit.is_some() {
            tracing::trace!(service = name, "cache hit");
        }
        hit
    }

    async fn construct(&self, key: InstanceKey, config: &ServiceConfiguration) -> DiResult<AnyArc> {
        let built = (config.create)(ResolverContext::new(self.clone())).await?;

        let displaced = self
            .inner
            .store
            .lock()
            .insert(key.clone(), built.value.clone(), built.teardown);
        if displaced.is_some() {
            tracing::debug!(instance = %key, "overlapping construction replaced cached instance");
        }
        tracing::debug!(
            instance = %key,
            lifetime = %config.lifetime,
            root = self.is_root(),
            "instance constructed"
        );
        Ok(built.value)
    }
}

#[async_trait]
impl ResolverCore for Container {
    async fn resolve_any(&self, name: &str) -> DiResult<AnyArc> {
        self.resolve(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Resolver;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn root_refuses_scope_lifetimes() {
        let root = Container::new();
        let scope = root.create_scope();
        scope.add_scoped("session", |_| async { Ok(7u32) }).unwrap();

        // Visible through the shared table, but only a scope may build it.
        let err = root.get::<u32>("session").await.unwrap_err();
        assert!(matches!(err, DiError::WrongLifetime { lifetime: Lifetime::Scoped, .. }));
        assert_eq!(*scope.get::<u32>("session").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn wrong_type_is_reported() {
        let scope = Container::new().create_scope();
        scope.add_scoped("port", |_| async { Ok(8080u16) }).unwrap();

        let err = scope.get::<String>("port").await.unwrap_err();
        assert!(matches!(err, DiError::TypeMismatch { ref name, .. } if name == "port"));
    }

    #[tokio::test]
    async fn singleton_is_cached_in_root_store_only() {
        let root = Container::new();
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        root.add_singleton("config", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(String::from("cfg")) }
        });

        let scope = root.create_scope();
        scope.get::<String>("config").await.unwrap();
        scope.get::<String>("config").await.unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(root.instance_count(), 1);
        assert_eq!(scope.instance_count(), 0);
    }

    #[tokio::test]
    async fn transient_instances_are_all_tracked() {
        let scope = Container::new().create_scope();
        scope.add_transient("job", |_| async { Ok(()) }).unwrap();

        for _ in 0..3 {
            scope.get::<()>("job").await.unwrap();
        }
        assert_eq!(scope.instance_count(), 3);
    }
}
