//! Container configuration.

use std::fmt;
use std::sync::Arc;

use crate::container::Container;
use crate::key::{KeySource, UuidKeySource};

/// Settings shared by a root container and every scope created from it.
#[derive(Clone)]
pub(crate) struct ContainerOptions {
    pub(crate) key_source: Arc<dyn KeySource>,
    pub(crate) single_flight: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            key_source: Arc::new(UuidKeySource),
            single_flight: true,
        }
    }
}

impl fmt::Debug for ContainerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerOptions")
            .field("single_flight", &self.single_flight)
            .finish_non_exhaustive()
    }
}

/// Builder for a root [`Container`].
///
/// # Examples
///
/// ```
/// use named_di::{Container, SequentialKeySource};
///
/// let root = Container::builder()
///     .key_source(SequentialKeySource::new())
///     .single_flight(false)
///     .build();
/// assert!(root.is_root());
/// ```
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    options: ContainerOptions,
}

impl ContainerBuilder {
    /// Starts from the defaults: UUID transient keys, single-flight on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the generator used to key transient instances.
    pub fn key_source<K: KeySource>(mut self, source: K) -> Self {
        self.options.key_source = Arc::new(source);
        self
    }

    /// Toggles the per-name construction gate.
    ///
    /// When enabled, overlapping resolutions of the same singleton or scoped
    /// name in one container run the factory once and share its instance.
    /// When disabled, each overlapping resolution that misses the cache runs
    /// the factory and the last one to finish stays cached.
    pub fn single_flight(mut self, enabled: bool) -> Self {
        self.options.single_flight = enabled;
        self
    }

    /// Builds the root container.
    pub fn build(self) -> Container {
        Container::root_with(self.options)
    }
}
