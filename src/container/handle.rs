//! Capability-restricted container handle.

use async_trait::async_trait;

use super::Container;
use crate::error::DiResult;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Handle exposing only resolution and disposal.
///
/// Give this to code that consumes services but must not register them.
#[derive(Clone, Debug)]
pub struct ScopeHandle {
    container: Container,
}

impl ScopeHandle {
    pub(crate) fn new(container: Container) -> Self {
        Self { container }
    }

    /// Disposes the underlying container. See [`Container::dispose`].
    pub async fn dispose(&self, dispose_root: bool) -> DiResult<Vec<String>> {
        self.container.dispose(dispose_root).await
    }
}

#[async_trait]
impl ResolverCore for ScopeHandle {
    async fn resolve_any(&self, name: &str) -> DiResult<AnyArc> {
        self.container.resolve(name).await
    }
}
