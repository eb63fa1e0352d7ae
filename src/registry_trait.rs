//! Core trait defining registry behavior.
//!
//! This module provides the `RegistryApi` trait with default implementations for
//! registering, resolving and awaiting capabilities.
//!
//! The registry is capability-based: each [`CapabilityId`] can have exactly one
//! instance stored. The first registration wins; later ones are ignored until the
//! capability is unregistered.

use std::any::{type_name, Any};
use std::sync::Arc;

use crate::store::{Deferral, ErasedInstance, PendingBatch, PendingCallback, Store};
use crate::{CapabilityId, RegistryError, RegistryEvent, Tracer};

/// Core trait defining registry behavior.
///
/// Provides default implementations for all registry operations, requiring only
/// two accessor methods (`store` and `tracer`) to be implemented by the implementor.
///
/// Every operation is generic over the capability type `T`, which must be a trait
/// object (`dyn Namer`) or a function type (`dyn Fn(bool) -> bool + Send + Sync`,
/// `fn(u32) -> u32`). Instances travel as `Arc<T>`.
pub trait RegistryApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace hook.
    fn tracer(&self) -> &Tracer;

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked after every operation, outside of any registry
    /// lock, so it may call back into the registry.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        self.tracer().set(callback);
    }

    /// Clear the tracing callback.
    ///
    /// Registered capabilities are not affected.
    fn clear_trace_callback(&self) {
        self.tracer().clear();
    }

    /// Convenience wrapper to emit a registry event using the current callback.
    fn emit_event(&self, event: &RegistryEvent) {
        self.tracer().emit(event);
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Access the backing store.
    fn store(&self) -> &Store;

    /// Register `module` as the implementation of capability `T`.
    ///
    /// Returns `Ok(true)` when the module was stored. If the capability is
    /// already registered the call is a no-op returning `Ok(false)`: the first
    /// registration wins and `module` is dropped.
    ///
    /// Callbacks waiting on `T` (see [`get_after_register`](Self::get_after_register))
    /// are invoked synchronously, in the order they were queued, each exactly once.
    /// The store lock is released before the first callback runs, so callbacks
    /// may use the registry. If the registry is reset while callbacks are being
    /// invoked, the remaining ones are dropped. The reset is checked before each
    /// callback, so a callback that already passed the check still runs when a
    /// concurrent `reset` lands right before it is invoked.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidCapabilityKind`] when `T` is not a capability type.
    ///
    /// # Panics
    ///
    /// A panicking callback propagates to the caller; the callbacks after it are
    /// dropped. The registration itself stays in place.
    fn register<T>(&self, module: Arc<T>) -> Result<bool, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let id = resolve::<T>()?;
        let instance: ErasedInstance = Arc::new(Arc::clone(&module));

        let Some(PendingBatch {
            generation,
            callbacks,
        }) = self.store().insert_if_absent(id.clone(), instance)
        else {
            tracing::debug!(%id, "capability already registered, keeping the first instance");
            self.emit_event(&RegistryEvent::Register { id, stored: false });
            return Ok(false);
        };

        tracing::debug!(%id, pending = callbacks.len(), "capability registered");
        self.emit_event(&RegistryEvent::Register {
            id: id.clone(),
            stored: true,
        });

        if callbacks.is_empty() {
            return Ok(true);
        }

        let handle: &(dyn Any + Send + Sync) = &module;
        let mut fired = 0;
        for callback in callbacks {
            if self.store().generation() != generation {
                tracing::debug!(%id, fired, "registry reset while firing callbacks, dropping the rest");
                break;
            }
            callback(handle);
            fired += 1;
        }

        tracing::debug!(%id, fired, "pending callbacks fired");
        self.emit_event(&RegistryEvent::Fired { id, count: fired });

        Ok(true)
    }

    /// Remove the instance registered for `T` together with any callbacks still
    /// waiting on it. No callback is invoked.
    ///
    /// Returns whether an instance was removed.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidCapabilityKind`] when `T` is not a capability type.
    fn unregister<T>(&self) -> Result<bool, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let id = resolve::<T>()?;
        let removed = self.store().remove(&id);

        tracing::debug!(%id, removed, "capability unregistered");
        self.emit_event(&RegistryEvent::Unregister { id, removed });

        Ok(removed)
    }

    /// Retrieve the instance registered for `T`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] when nothing is registered for `T`
    /// - [`RegistryError::TypeMismatch`] when the stored instance is not an `Arc<T>`
    /// - [`RegistryError::InvalidCapabilityKind`] when `T` is not a capability type
    fn get<T>(&self) -> Result<Arc<T>, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let id = resolve::<T>()?;

        let result = match self.store().get_instance(&id) {
            Some(instance) => instance
                .downcast_ref::<Arc<T>>()
                .cloned()
                .ok_or_else(|| {
                    tracing::warn!(%id, expected = type_name::<T>(), "registered instance has a different type");
                    RegistryError::TypeMismatch {
                        id: id.clone(),
                        type_name: type_name::<T>(),
                    }
                }),
            None => Err(RegistryError::NotFound { id: id.clone() }),
        };

        let found = result.is_ok();
        tracing::trace!(%id, found, "capability lookup");
        self.emit_event(&RegistryEvent::Get { id, found });

        result
    }

    /// Retrieve the instance registered for `T`, treating its absence as a
    /// wiring bug.
    ///
    /// # Panics
    ///
    /// When [`get`](Self::get) fails for any reason.
    fn require<T>(&self) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self.get::<T>() {
            Ok(module) => module,
            Err(RegistryError::NotFound { id }) => panic!(
                "dependency with identifier '{id}' not found. Make sure to call register() \
                 before retrieving it, or use get_after_register()"
            ),
            Err(err) => panic!("{err}"),
        }
    }

    /// Run `callback` with the instance of `T` as soon as one is registered.
    ///
    /// If `T` is already registered, `callback` runs immediately on the calling
    /// thread, before this method returns. Otherwise it is queued and invoked by
    /// the [`register`](Self::register) call that provides `T`. The check and the
    /// queueing happen atomically, so a concurrent registration can never miss
    /// the callback.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::TypeMismatch`] when the stored instance is not an
    ///   `Arc<T>`; `callback` is dropped without running
    /// - [`RegistryError::InvalidCapabilityKind`] when `T` is not a capability type
    fn get_after_register<T, F>(&self, callback: F) -> Result<(), RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: FnOnce(Arc<T>) + Send + 'static,
    {
        let id = resolve::<T>()?;
        let pending = erase_callback::<T, F>(id.clone(), callback);

        match self.store().instance_or_defer(id.clone(), pending) {
            Deferral::Ready(instance, callback) => {
                if !instance.is::<Arc<T>>() {
                    tracing::warn!(%id, expected = type_name::<T>(), "registered instance has a different type");
                    return Err(RegistryError::TypeMismatch {
                        id,
                        type_name: type_name::<T>(),
                    });
                }

                tracing::trace!(%id, "capability already registered, invoking callback now");
                callback(instance.as_ref());
                self.emit_event(&RegistryEvent::Fired { id, count: 1 });
            }
            Deferral::Queued { pending } => {
                tracing::debug!(%id, pending, "callback deferred until registration");
                self.emit_event(&RegistryEvent::Deferred { id });
            }
        }

        Ok(())
    }

    /// Check if `T` is registered.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidCapabilityKind`] when `T` is not a capability type.
    fn contains<T>(&self) -> Result<bool, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let id = resolve::<T>()?;
        let found = self.store().contains(&id);

        self.emit_event(&RegistryEvent::Contains { id, found });

        Ok(found)
    }

    /// Number of callbacks waiting for `T`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidCapabilityKind`] when `T` is not a capability type.
    fn pending_callbacks<T>(&self) -> Result<usize, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Ok(self.store().pending(&resolve::<T>()?))
    }

    /// Identifiers of the registered capabilities, in no particular order.
    fn dependencies(&self) -> Vec<CapabilityId> {
        self.store().ids()
    }

    /// Discard every registered instance and pending callback.
    ///
    /// Does NOT affect:
    /// - Already-retrieved `Arc<T>` handles (they remain valid)
    /// - The tracing callback (use `clear_trace_callback()` to clear that)
    fn reset(&self) {
        self.store().clear();

        tracing::debug!("registry reset");
        self.emit_event(&RegistryEvent::Reset {});
    }
}

fn resolve<T: ?Sized + 'static>() -> Result<CapabilityId, RegistryError> {
    CapabilityId::of::<T>().inspect_err(|err| tracing::warn!(%err, "rejected capability type"))
}

/// Wraps a typed callback so the store can hold it next to callbacks of other
/// capabilities.
fn erase_callback<T, F>(id: CapabilityId, callback: F) -> PendingCallback
where
    T: ?Sized + Send + Sync + 'static,
    F: FnOnce(Arc<T>) + Send + 'static,
{
    Box::new(move |instance: &(dyn Any + Send + Sync)| {
        match instance.downcast_ref::<Arc<T>>() {
            Some(module) => callback(Arc::clone(module)),
            None => tracing::warn!(
                %id,
                expected = type_name::<T>(),
                "registered instance has a different type, dropping callback"
            ),
        }
    })
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
