use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::CapabilityId;

/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use depkit::{CapabilityId, RegistryEvent};
///
/// trait Namer: Send + Sync {}
///
/// let id = CapabilityId::of::<dyn Namer>().unwrap();
/// let event = RegistryEvent::Register {
///     id: id.clone(),
///     stored: true,
/// };
/// assert_eq!(event.to_string(), format!("register {{ id: {id}, stored: true }}"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A module was offered for a capability.
    Register {
        id: CapabilityId,
        /// `false` when an earlier registration was kept.
        stored: bool,
    },

    /// A capability was unregistered.
    Unregister {
        id: CapabilityId,
        /// Whether an instance was actually removed.
        removed: bool,
    },

    /// An instance was requested.
    Get { id: CapabilityId, found: bool },

    /// A registration check was performed.
    Contains { id: CapabilityId, found: bool },

    /// A callback was queued until the capability gets registered.
    Deferred { id: CapabilityId },

    /// Callbacks were invoked with a registered instance.
    Fired { id: CapabilityId, count: usize },

    /// The registry was reset.
    Reset {},
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEvent::Register { id, stored } => {
                write!(f, "register {{ id: {id}, stored: {stored} }}")
            }
            RegistryEvent::Unregister { id, removed } => {
                write!(f, "unregister {{ id: {id}, removed: {removed} }}")
            }
            RegistryEvent::Get { id, found } => write!(f, "get {{ id: {id}, found: {found} }}"),
            RegistryEvent::Contains { id, found } => {
                write!(f, "contains {{ id: {id}, found: {found} }}")
            }
            RegistryEvent::Deferred { id } => write!(f, "deferred {{ id: {id} }}"),
            RegistryEvent::Fired { id, count } => {
                write!(f, "fired {{ id: {id}, count: {count} }}")
            }
            RegistryEvent::Reset {} => write!(f, "Resetting the Registry"),
        }
    }
}

/// Type alias for the user-supplied tracing callback.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Holds the optional tracing callback of one registry.
///
/// The callback is cloned out of the slot before it runs, so it may call back
/// into the same registry (including `set_trace_callback`) without deadlocking.
#[derive(Default)]
pub struct Tracer {
    callback: Mutex<Option<Arc<TraceCallback>>>,
}

impl Tracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `callback`, replacing any previous one.
    pub fn set(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        *self.callback.lock() = Some(Arc::new(callback));
    }

    pub fn clear(&self) {
        *self.callback.lock() = None;
    }

    pub fn is_set(&self) -> bool {
        self.callback.lock().is_some()
    }

    /// Delivers `event` to the installed callback, if any.
    ///
    /// # Panics
    ///
    /// If the callback itself panics, the panic propagates to the caller.
    pub fn emit(&self, event: &RegistryEvent) {
        let callback = self.callback.lock().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("installed", &self.is_set())
            .finish()
    }
}
