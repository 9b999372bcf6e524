//! Internal implementation details.

use std::future::Future;
use std::pin::Pin;

pub(crate) mod in_flight;
pub(crate) mod instance_store;

pub(crate) use in_flight::InFlight;
pub(crate) use instance_store::InstanceStore;

/// Boxed, sendable future used for factories, teardowns and recursive calls.
pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
