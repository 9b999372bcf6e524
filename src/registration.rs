//! Service configurations and the shared configuration table.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::container::ResolverContext;
use crate::error::DiResult;
use crate::internal::BoxFuture;
use crate::lifetime::Lifetime;

/// Type-erased instance as stored by containers.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// What a factory hands back: the instance and, when registered, its teardown.
pub(crate) struct Constructed {
    pub(crate) value: AnyArc,
    pub(crate) teardown: Option<Teardown>,
}

pub(crate) type Factory =
    Arc<dyn Fn(ResolverContext) -> BoxFuture<'static, DiResult<Constructed>> + Send + Sync>;

/// Teardown bound to one instance.
pub(crate) type Teardown = Box<dyn FnOnce() -> BoxFuture<'static, DiResult<()>> + Send>;

type TypedTeardown<T> = Arc<dyn Fn(Arc<T>) -> BoxFuture<'static, DiResult<()>> + Send + Sync>;

/// Lifetime and factory for one service name.
#[derive(Clone)]
pub(crate) struct ServiceConfiguration {
    pub(crate) lifetime: Lifetime,
    pub(crate) create: Factory,
}

impl ServiceConfiguration {
    pub(crate) fn new<T, F, Fut>(lifetime: Lifetime, create: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<T>> + Send + 'static,
    {
        Self::build(lifetime, create, None)
    }

    pub(crate) fn with_dispose<T, F, Fut, D, DFut>(
        lifetime: Lifetime,
        create: F,
        dispose: D,
    ) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<T>> + Send + 'static,
        D: Fn(Arc<T>) -> DFut + Send + Sync + 'static,
        DFut: Future<Output = DiResult<()>> + Send + 'static,
    {
        let dispose: TypedTeardown<T> =
            Arc::new(move |instance: Arc<T>| -> BoxFuture<'static, DiResult<()>> {
                Box::pin(dispose(instance))
            });
        Self::build(lifetime, create, Some(dispose))
    }

    fn build<T, F, Fut>(lifetime: Lifetime, create: F, dispose: Option<TypedTeardown<T>>) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<T>> + Send + 'static,
    {
        let create: Factory = Arc::new(
            move |ctx: ResolverContext| -> BoxFuture<'static, DiResult<Constructed>> {
                let fut = create(ctx);
                let dispose = dispose.clone();
                Box::pin(async move {
                    let instance = Arc::new(fut.await?);
                    let teardown = dispose.map(|dispose| {
                        let instance = instance.clone();
                        Box::new(move || dispose(instance)) as Teardown
                    });
                    Ok(Constructed {
                        value: instance as AnyArc,
                        teardown,
                    })
                })
            },
        );

        Self { lifetime, create }
    }
}

/// Name-keyed configurations shared by a root and all of its scopes.
///
/// Cloning yields another handle to the same table.
#[derive(Clone, Default)]
pub(crate) struct ConfigurationTable {
    inner: Arc<Mutex<HashMap<String, ServiceConfiguration>>>,
}

impl ConfigurationTable {
    /// Inserts or replaces. Returns the lifetime of a replaced configuration.
    pub(crate) fn insert(&self, name: String, config: ServiceConfiguration) -> Option<Lifetime> {
        self.inner
            .lock()
            .insert(name, config)
            .map(|previous| previous.lifetime)
    }

    pub(crate) fn get(&self, name: &str) -> Option<ServiceConfiguration> {
        self.inner.lock().get(name).cloned()
    }

    pub(crate) fn lifetime_of(&self, name: &str) -> Option<Lifetime> {
        self.inner.lock().get(name).map(|config| config.lifetime)
    }

    /// Drops every registration. Returns how many there were.
    pub(crate) fn clear(&self) -> usize {
        let mut table = self.inner.lock();
        let count = table.len();
        table.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[cfg(test)]
    pub(crate) fn shares_with(&self, other: &ConfigurationTable) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
