//! # named-di
//!
//! Name-keyed, async dependency injection with a root/scope container
//! hierarchy.
//!
//! ## Features
//!
//! - **Three lifetimes**: Singleton, Scoped, and Transient services
//! - **Async factories and teardowns**: factories may resolve their own dependencies
//! - **Root/scope hierarchy**: singletons live in the root, scoped and transient
//!   instances live in the scope that resolved them
//! - **Precise disposal**: each container tears down only what it built, exactly once
//! - **Single-flight construction**: overlapping resolutions of a cached service
//!   build it once
//!
//! ## Quick Start
//!
//! ```rust
//! use named_di::{Container, Resolver};
//! use std::sync::Arc;
//!
//! struct Database { url: String }
//! struct UnitOfWork { db: Arc<Database> }
//! struct Command { uow: Arc<UnitOfWork> }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> named_di::DiResult<()> {
//! let root = Container::new();
//! root.add_singleton("db", |_| async {
//!     Ok(Database { url: "postgres://localhost".to_string() })
//! });
//!
//! // Scoped and transient services are registered through a scope.
//! let scope = root.create_scope();
//! scope.add_scoped_with_dispose(
//!     "uow",
//!     |ctx| async move { Ok(UnitOfWork { db: ctx.get::<Database>("db").await? }) },
//!     |_uow| async { Ok(()) },
//! )?;
//! scope.add_transient_with_dispose(
//!     "command",
//!     |ctx| async move { Ok(Command { uow: ctx.get::<UnitOfWork>("uow").await? }) },
//!     |_cmd| async { Ok(()) },
//! )?;
//!
//! let first = scope.get::<Command>("command").await?;
//! let second = scope.get::<Command>("command").await?;
//! assert!(!Arc::ptr_eq(&first, &second));
//! assert!(Arc::ptr_eq(&first.uow, &second.uow));
//! assert_eq!(first.uow.db.url, "postgres://localhost");
//!
//! // The scope tears down what it built; the root's singleton is left alone.
//! let disposed = scope.dispose(false).await?;
//! assert_eq!(disposed, vec!["command", "command", "uow"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: built once in the root and shared by every scope
//! - **Scoped**: built once per scope
//! - **Transient**: built on every resolution, each instance torn down separately
//!
//! Scoped and transient services can only be registered through a scope;
//! the root rejects them with [`DiError::InvalidRole`].

pub mod container;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod options;
pub mod traits;

mod internal;
mod registration;

pub use container::{Container, ResolverContext, ScopeHandle};
pub use error::{BoxError, DiError, DiResult};
pub use key::{InstanceKey, KeySource, SequentialKeySource, UuidKeySource};
pub use lifetime::Lifetime;
pub use options::ContainerBuilder;
pub use registration::AnyArc;
pub use traits::{Resolver, ResolverCore};
