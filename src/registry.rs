//! The explicit, constructible registry.
//!
//! A [`Registry`] owns its store and trace hook; nothing is global. Create one at
//! the composition root and pass it (or an `Arc` of it) to the modules that
//! publish or consume capabilities. For a process-wide instance, see
//! [`define_registry!`](crate::define_registry).
//!
//! # Examples
//!
//! ```
//! use depkit::{Registry, RegistryApi};
//! use std::sync::Arc;
//!
//! trait Namer: Send + Sync {
//!     fn name(&self) -> String;
//! }
//!
//! struct Fixed;
//!
//! impl Namer for Fixed {
//!     fn name(&self) -> String {
//!         "test".to_string()
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.register::<dyn Namer>(Arc::new(Fixed)).unwrap();
//!
//! let namer = registry.get::<dyn Namer>().unwrap();
//! assert_eq!(namer.name(), "test");
//! ```

use std::fmt;

use crate::{RegistryApi, Store, Tracer};

/// Thread-safe capability registry.
///
/// All operations come from [`RegistryApi`]; bring the trait into scope to use
/// them.
#[derive(Default)]
pub struct Registry {
    store: Store,
    tracer: Tracer,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistryApi for Registry {
    fn store(&self) -> &Store {
        &self.store
    }

    fn tracer(&self) -> &Tracer {
        &self.tracer
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("store", &self.store)
            .field("tracer", &self.tracer)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
