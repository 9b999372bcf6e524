//! The container and its root/scope roles.
//!
//! A root container owns the configuration table and the singleton store.
//! Scopes share the root's table, forward singleton work to the root and
//! keep their own store of scoped and transient instances.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{DiError, DiResult};
use crate::internal::{InFlight, InstanceStore};
use crate::lifetime::Lifetime;
use crate::options::{ContainerBuilder, ContainerOptions};
use crate::registration::{ConfigurationTable, ServiceConfiguration};

mod context;
mod dispose;
mod handle;
mod resolve;

pub use context::ResolverContext;
pub use handle::ScopeHandle;

/// Dependency injection container, acting either as a root or as a scope.
///
/// `Container` is a cheap handle: clones refer to the same container.
///
/// # Lifetime Behavior
///
/// - **Singleton**: built and cached in the root, shared by all scopes
/// - **Scoped**: built and cached in the resolving scope
/// - **Transient**: built on every resolution and tracked by the resolving scope
///
/// # Examples
///
/// ```
/// use named_di::{Container, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repository { db: Arc<Database> }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> named_di::DiResult<()> {
/// let root = Container::new();
/// root.add_singleton("db", |_| async {
///     Ok(Database { url: "postgres://localhost".to_string() })
/// });
///
/// let scope = root.create_scope();
/// scope.add_scoped("repo", |ctx| async move {
///     Ok(Repository { db: ctx.get::<Database>("db").await? })
/// })?;
///
/// let repo = scope.get::<Repository>("repo").await?;
/// assert_eq!(repo.db.url, "postgres://localhost");
/// assert!(Arc::ptr_eq(&repo, &scope.get::<Repository>("repo").await?));
/// # Ok(())
/// # }
/// ```
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    role: Role,
    table: ConfigurationTable,
    store: Mutex<InstanceStore>,
    in_flight: InFlight,
    options: ContainerOptions,
}

enum Role {
    Root,
    Scope { root: Container },
}

impl Container {
    /// Creates a root container with default options.
    pub fn new() -> Self {
        Self::root_with(ContainerOptions::default())
    }

    /// Starts configuring a root container.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn root_with(options: ContainerOptions) -> Self {
        Self::from_parts(Role::Root, ConfigurationTable::default(), options)
    }

    fn from_parts(role: Role, table: ConfigurationTable, options: ContainerOptions) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                role,
                table,
                store: Mutex::new(InstanceStore::default()),
                in_flight: InFlight::default(),
                options,
            }),
        }
    }

    /// Whether this container is the root of its hierarchy.
    pub fn is_root(&self) -> bool {
        matches!(self.inner.role, Role::Root)
    }

    /// The root of this hierarchy; a root returns a handle to itself.
    pub fn root(&self) -> Container {
        match &self.inner.role {
            Role::Root => self.clone(),
            Role::Scope { root } => root.clone(),
        }
    }

    /// Whether two handles refer to the same container.
    pub fn ptr_eq(a: &Container, b: &Container) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Lifetime of the configuration currently registered under `name`.
    pub fn lifetime_of(&self, name: &str) -> Option<Lifetime> {
        self.inner.table.lifetime_of(name)
    }

    /// Whether a configuration is registered under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.lifetime_of(name).is_some()
    }

    /// Number of registered configurations, as seen through this container.
    pub fn registration_count(&self) -> usize {
        self.inner.table.len()
    }

    /// Number of instances owned by this container.
    pub fn instance_count(&self) -> usize {
        self.inner.store.lock().len()
    }

    /// Creates a new scope sharing this hierarchy's configurations.
    ///
    /// Scopes created from another scope point at the same root, so the
    /// hierarchy is always one level deep. Every scope gets its own store:
    /// scoped and transient instances are never shared between scopes.
    pub fn create_scope(&self) -> Container {
        let root = self.root();
        let scope = Self::from_parts(
            Role::Scope { root },
            self.inner.table.clone(),
            self.inner.options.clone(),
        );
        tracing::debug!(from_root = self.is_root(), "scope created");
        scope
    }

    /// Creates a fresh root and returns a working scope over it.
    pub fn new_scope() -> Container {
        Self::new().create_scope()
    }

    /// Restricted handle exposing only resolution and disposal.
    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle::new(self.clone())
    }

    // ===== Registration =====

    /// Registers a singleton factory.
    ///
    /// Calls made through a scope are forwarded to the root, so singletons
    /// are always registered and cached there. Registering an existing name
    /// replaces its configuration.
    pub fn add_singleton<T, F, Fut>(&self, name: impl Into<String>, create: F)
    where
        T: Send + Sync + 'static,
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<T>> + Send + 'static,
    {
        let config = ServiceConfiguration::new(Lifetime::Singleton, create);
        self.register_singleton(name.into(), config);
    }

    /// Registers a singleton factory together with its teardown.
    pub fn add_singleton_with_dispose<T, F, Fut, D, DFut>(
        &self,
        name: impl Into<String>,
        create: F,
        dispose: D,
    ) where
        T: Send + Sync + 'static,
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<T>> + Send + 'static,
        D: Fn(Arc<T>) -> DFut + Send + Sync + 'static,
        DFut: Future<Output = DiResult<()>> + Send + 'static,
    {
        let config = ServiceConfiguration::with_dispose(Lifetime::Singleton, create, dispose);
        self.register_singleton(name.into(), config);
    }

    /// Registers a scoped factory.
    ///
    /// # Errors
    ///
    /// [`DiError::InvalidRole`] when called on a root container.
    pub fn add_scoped<T, F, Fut>(&self, name: impl Into<String>, create: F) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<T>> + Send + 'static,
    {
        self.register_in_scope(name.into(), ServiceConfiguration::new(Lifetime::Scoped, create))
    }

    /// Registers a scoped factory together with its teardown.
    ///
    /// # Errors
    ///
    /// [`DiError::InvalidRole`] when called on a root container.
    pub fn add_scoped_with_dispose<T, F, Fut, D, DFut>(
        &self,
        name: impl Into<String>,
        create: F,
        dispose: D,
    ) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<T>> + Send + 'static,
        D: Fn(Arc<T>) -> DFut + Send + Sync + 'static,
        DFut: Future<Output = DiResult<()>> + Send + 'static,
    {
        let config = ServiceConfiguration::with_dispose(Lifetime::Scoped, create, dispose);
        self.register_in_scope(name.into(), config)
    }

    /// Registers a transient factory.
    ///
    /// # Errors
    ///
    /// [`DiError::InvalidRole`] when called on a root container.
    pub fn add_transient<T, F, Fut>(&self, name: impl Into<String>, create: F) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<T>> + Send + 'static,
    {
        self.register_in_scope(name.into(), ServiceConfiguration::new(Lifetime::Transient, create))
    }

    /// Registers a transient factory together with its teardown.
    ///
    /// Every transient instance is torn down individually when the scope
    /// that resolved it is disposed.
    ///
    /// # Errors
    ///
    /// [`DiError::InvalidRole`] when called on a root container.
    pub fn add_transient_with_dispose<T, F, Fut, D, DFut>(
        &self,
        name: impl Into<String>,
        create: F,
        dispose: D,
    ) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<T>> + Send + 'static,
        D: Fn(Arc<T>) -> DFut + Send + Sync + 'static,
        DFut: Future<Output = DiResult<()>> + Send + 'static,
    {
        let config = ServiceConfiguration::with_dispose(Lifetime::Transient, create, dispose);
        self.register_in_scope(name.into(), config)
    }

    fn register_singleton(&self, name: String, config: ServiceConfiguration) {
        match &self.inner.role {
            Role::Scope { root } => {
                tracing::trace!(service = %name, "forwarding singleton registration to root");
                root.register_singleton(name, config);
            }
            Role::Root => self.insert_config(name, config),
        }
    }

    fn register_in_scope(&self, name: String, config: ServiceConfiguration) -> DiResult<()> {
        match self.inner.role {
            Role::Root => Err(DiError::InvalidRole {
                name,
                lifetime: config.lifetime,
            }),
            Role::Scope { .. } => {
                self.insert_config(name, config);
                Ok(())
            }
        }
    }

    fn insert_config(&self, name: String, config: ServiceConfiguration) {
        let lifetime = config.lifetime;
        match self.inner.table.insert(name.clone(), config) {
            Some(previous) => tracing::debug!(
                service = %name,
                %lifetime,
                %previous,
                "service registration replaced"
            ),
            None => tracing::debug!(service = %name, %lifetime, "service registered"),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("root", &self.is_root())
            .field("registrations", &self.registration_count())
            .field("instances", &self.instance_count())
            .finish()
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        if self.store.get_mut().has_teardowns() {
            tracing::warn!(
                root = matches!(self.role, Role::Root),
                "container dropped with undisposed instances; call dispose() before dropping"
            );
        }
    }
}
