//! Macro for a process-wide registry at the composition root.
//!
//! Libraries should accept a `&Registry` (or any `impl RegistryApi`) and leave the
//! choice of a global to the application. The application invokes
//! [`define_registry!`] once and wires everything through the generated module.

/// Creates a process-wide registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - A lazily initialised [`Registry`](crate::Registry) static (hidden)
/// - `registry()`, returning the static for code that takes `&Registry`
/// - Free functions for every registry operation
///
/// # Examples
///
/// ```rust
/// use depkit::define_registry;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// define_registry!(app);
///
/// app::register::<dyn Greeter>(Arc::new(English)).unwrap();
/// assert_eq!(app::get::<dyn Greeter>().unwrap().greet(), "hello");
/// ```
///
/// # Multiple Registries
///
/// Each invocation owns a separate registry:
///
/// ```rust
/// use depkit::define_registry;
/// use std::sync::Arc;
///
/// trait Endpoint: Send + Sync {
///     fn url(&self) -> &str;
/// }
///
/// struct Url(&'static str);
///
/// impl Endpoint for Url {
///     fn url(&self) -> &str {
///         self.0
///     }
/// }
///
/// define_registry!(database);
/// define_registry!(cache);
///
/// database::register::<dyn Endpoint>(Arc::new(Url("postgres://localhost"))).unwrap();
///
/// assert!(database::contains::<dyn Endpoint>().unwrap());
/// assert!(!cache::contains::<dyn Endpoint>().unwrap());
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        #[allow(dead_code)]
        pub mod $name {
            use ::std::sync::{Arc, LazyLock};
            use $crate::RegistryApi;

            static REGISTRY: LazyLock<$crate::Registry> = LazyLock::new($crate::Registry::new);

            /// The registry behind this module.
            pub fn registry() -> &'static $crate::Registry {
                &REGISTRY
            }

            /// Register `module` as the implementation of capability `T`.
            pub fn register<T>(module: Arc<T>) -> Result<bool, $crate::RegistryError>
            where
                T: ?Sized + Send + Sync + 'static,
            {
                REGISTRY.register(module)
            }

            /// Remove the instance of `T` and the callbacks waiting on it.
            pub fn unregister<T>() -> Result<bool, $crate::RegistryError>
            where
                T: ?Sized + Send + Sync + 'static,
            {
                REGISTRY.unregister::<T>()
            }

            /// Retrieve the instance of `T`.
            pub fn get<T>() -> Result<Arc<T>, $crate::RegistryError>
            where
                T: ?Sized + Send + Sync + 'static,
            {
                REGISTRY.get::<T>()
            }

            /// Retrieve the instance of `T`, panicking when it is missing.
            pub fn require<T>() -> Arc<T>
            where
                T: ?Sized + Send + Sync + 'static,
            {
                REGISTRY.require::<T>()
            }

            /// Run `callback` with the instance of `T` once it is registered.
            pub fn get_after_register<T, F>(callback: F) -> Result<(), $crate::RegistryError>
            where
                T: ?Sized + Send + Sync + 'static,
                F: FnOnce(Arc<T>) + Send + 'static,
            {
                REGISTRY.get_after_register::<T, F>(callback)
            }

            /// Check if `T` is registered.
            pub fn contains<T>() -> Result<bool, $crate::RegistryError>
            where
                T: ?Sized + Send + Sync + 'static,
            {
                REGISTRY.contains::<T>()
            }

            /// Number of callbacks waiting for `T`.
            pub fn pending_callbacks<T>() -> Result<usize, $crate::RegistryError>
            where
                T: ?Sized + Send + Sync + 'static,
            {
                REGISTRY.pending_callbacks::<T>()
            }

            /// Identifiers of the registered capabilities.
            pub fn dependencies() -> Vec<$crate::CapabilityId> {
                REGISTRY.dependencies()
            }

            /// Discard every registered instance and pending callback.
            pub fn reset() {
                REGISTRY.reset()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}
