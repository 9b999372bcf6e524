//! Resolver context handed to factories.

use async_trait::async_trait;

use super::Container;
use crate::error::DiResult;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Context passed to factory functions for resolving dependencies.
///
/// Wraps the container that is building the service, so dependencies are
/// resolved with the same lifetime rules: a scoped factory sees the scope's
/// instances, a singleton factory sees the root. Only resolution is exposed;
/// factories cannot register services or dispose containers.
///
/// # Examples
///
/// ```
/// use named_di::{Container, Resolver, ResolverContext};
/// use std::sync::Arc;
///
/// struct Settings { retries: u32 }
/// struct Client { settings: Arc<Settings> }
///
/// let root = Container::new();
/// root.add_singleton("settings", |_| async { Ok(Settings { retries: 3 }) });
/// root.add_singleton("client", |ctx: ResolverContext| async move {
///     Ok(Client { settings: ctx.get::<Settings>("settings").await? })
/// });
/// ```
#[derive(Clone)]
pub struct ResolverContext {
    container: Container,
}

impl ResolverContext {
    pub(crate) fn new(container: Container) -> Self {
        Self { container }
    }

    /// Whether the service is being built by the root container.
    pub fn is_root(&self) -> bool {
        self.container.is_root()
    }
}

#[async_trait]
impl ResolverCore for ResolverContext {
    async fn resolve_any(&self, name: &str) -> DiResult<AnyArc> {
        self.container.resolve(name).await
    }
}
