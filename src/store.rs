//! Guarded storage of registered instances and pending callbacks.
//!
//! One mutex covers both maps. Every method is a single critical section and
//! none of them runs user code while holding the lock: values that leave the
//! maps (replaced instances, dropped callbacks) are released after unlocking,
//! so their destructors may touch the registry again.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::CapabilityId;

/// A registered instance with its type erased.
///
/// The registry stores the `Arc<T>` handed to `register` behind this handle and
/// downcasts back to `Arc<T>` on retrieval.
pub type ErasedInstance = Arc<dyn Any + Send + Sync>;

/// A callback waiting for a capability.
///
/// It receives the registered `Arc<T>` as `&dyn Any` and is consumed by the call.
pub type PendingCallback = Box<dyn FnOnce(&(dyn Any + Send + Sync)) + Send>;

/// Callbacks drained by [`Store::insert_if_absent`].
pub struct PendingBatch {
    /// Reset generation at the time of the drain.
    pub generation: u64,
    /// In the order they were appended.
    pub callbacks: Vec<PendingCallback>,
}

/// Outcome of [`Store::instance_or_defer`].
pub enum Deferral {
    /// An instance was already registered; the callback is handed back for the
    /// caller to run.
    Ready(ErasedInstance, PendingCallback),
    /// The callback was queued. `pending` is the queue length after the append.
    Queued { pending: usize },
}

#[derive(Default)]
struct State {
    instances: HashMap<CapabilityId, ErasedInstance>,
    callbacks: HashMap<CapabilityId, Vec<PendingCallback>>,
    generation: u64,
}

/// Mutually exclusive map of identifier → instance and identifier → callbacks.
#[derive(Default)]
pub struct Store {
    state: Mutex<State>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------------------------------
    // Primitives
    // ---------------------------------------------------------------------------------------------

    /// Returns the instance stored under `id`.
    pub fn get_instance(&self, id: &CapabilityId) -> Option<ErasedInstance> {
        self.state.lock().instances.get(id).cloned()
    }

    /// Removes and returns the callbacks pending on `id`, oldest first.
    pub fn take_callbacks(&self, id: &CapabilityId) -> Vec<PendingCallback> {
        self.state.lock().callbacks.remove(id).unwrap_or_default()
    }

    /// Stores `instance` under `id`, overwriting unconditionally. Returns the
    /// previous instance.
    pub fn set_instance(&self, id: CapabilityId, instance: ErasedInstance) -> Option<ErasedInstance> {
        self.state.lock().instances.insert(id, instance)
    }

    /// Appends `callback` to the queue of `id`. Returns the queue length.
    pub fn append_callback(&self, id: CapabilityId, callback: PendingCallback) -> usize {
        let mut state = self.state.lock();
        let queue = state.callbacks.entry(id).or_default();
        queue.push(callback);
        queue.len()
    }

    // ---------------------------------------------------------------------------------------------
    // Atomic compositions
    // ---------------------------------------------------------------------------------------------

    /// Stores `instance` unless `id` already has one, draining the pending
    /// callbacks in the same critical section.
    ///
    /// Returns `None`, and drops `instance`, when `id` was already registered.
    pub fn insert_if_absent(
        &self,
        id: CapabilityId,
        instance: ErasedInstance,
    ) -> Option<PendingBatch> {
        let mut state = self.state.lock();
        if state.instances.contains_key(&id) {
            return None;
        }

        let callbacks = state.callbacks.remove(&id).unwrap_or_default();
        state.instances.insert(id, instance);

        Some(PendingBatch {
            generation: state.generation,
            callbacks,
        })
    }

    /// Hands `callback` back with the instance of `id` when there is one,
    /// otherwise queues it. The check and the append are one critical section.
    pub fn instance_or_defer(&self, id: CapabilityId, callback: PendingCallback) -> Deferral {
        let mut state = self.state.lock();
        if let Some(instance) = state.instances.get(&id) {
            return Deferral::Ready(Arc::clone(instance), callback);
        }

        let queue = state.callbacks.entry(id).or_default();
        queue.push(callback);
        Deferral::Queued {
            pending: queue.len(),
        }
    }

    /// Removes the instance and the pending callbacks of `id`. Returns whether
    /// an instance was removed.
    pub fn remove(&self, id: &CapabilityId) -> bool {
        let (instance, callbacks) = {
            let mut state = self.state.lock();
            (state.instances.remove(id), state.callbacks.remove(id))
        };

        drop(callbacks);
        instance.is_some()
    }

    /// Discards every instance and pending callback and starts a new
    /// generation.
    pub fn clear(&self) {
        let stale = {
            let mut state = self.state.lock();
            let fresh = State {
                generation: state.generation.wrapping_add(1),
                ..State::default()
            };
            mem::replace(&mut *state, fresh)
        };

        drop(stale);
    }

    // ---------------------------------------------------------------------------------------------
    // Introspection
    // ---------------------------------------------------------------------------------------------

    pub fn contains(&self, id: &CapabilityId) -> bool {
        self.state.lock().instances.contains_key(id)
    }

    /// Number of callbacks queued on `id`.
    pub fn pending(&self, id: &CapabilityId) -> usize {
        self.state.lock().callbacks.get(id).map_or(0, Vec::len)
    }

    /// Identifiers that currently have an instance, in no particular order.
    pub fn ids(&self) -> Vec<CapabilityId> {
        self.state.lock().instances.keys().cloned().collect()
    }

    /// Incremented by every [`clear`](Self::clear).
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn len(&self) -> usize {
        self.state.lock().instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().instances.is_empty()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Store")
            .field("instances", &state.instances.len())
            .field(
                "pending",
                &state.callbacks.values().map(Vec::len).sum::<usize>(),
            )
            .field("generation", &state.generation)
            .finish()
    }
}
