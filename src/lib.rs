//! # depkit
//!
//! A thread-safe capability registry. Modules publish themselves under a
//! capability (a trait object or a function type), and consumers resolve the
//! capability without knowing the concrete type behind it.
//!
//! Each capability holds at most one instance. The first registration wins, and
//! later ones are ignored until the capability is unregistered. A consumer that
//! runs before its provider can ask to be called back once the provider arrives.
//!
//! ## Quick Start
//!
//! ```rust
//! use depkit::{Registry, RegistryApi};
//! use std::sync::Arc;
//!
//! trait Namer: Send + Sync {
//!     fn name(&self) -> String;
//! }
//!
//! struct TestModule;
//!
//! impl Namer for TestModule {
//!     fn name(&self) -> String {
//!         "test".to_string()
//!     }
//! }
//!
//! let registry = Registry::new();
//!
//! // Wait for a Namer that is not there yet
//! registry
//!     .get_after_register::<dyn Namer, _>(|namer| assert_eq!(namer.name(), "test"))
//!     .unwrap();
//!
//! // Publish it; the callback above runs now
//! registry.register::<dyn Namer>(Arc::new(TestModule)).unwrap();
//!
//! let namer = registry.get::<dyn Namer>().unwrap();
//! assert_eq!(namer.name(), "test");
//! assert_eq!(registry.dependencies().len(), 1);
//! ```
//!
//! ## Main Types
//!
//! - [`Registry`] - An explicit registry instance
//! - [`RegistryApi`] - All registry operations, as default trait methods
//! - [`CapabilityId`] - The `"<scope>/<name>"` key of a capability
//! - [`define_registry!`] - A process-wide registry for the composition root
//! - [`RegistryEvent`] - Events delivered to the optional trace callback

mod capability;
mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;

pub mod store;

pub use capability::{CapabilityId, CapabilityKind};
pub use registry::Registry;
pub use registry_error::RegistryError;
pub use registry_event::{RegistryEvent, TraceCallback, Tracer};
pub use registry_trait::RegistryApi;
pub use store::Store;
