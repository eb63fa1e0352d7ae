//! Capability identifiers.
//!
//! A capability is the type a module publishes under: a trait object
//! (`dyn Namer`) or a function type (`dyn Fn(bool) -> bool + Send + Sync`,
//! `fn(u32) -> u32`). Every capability maps to one [`CapabilityId`] of the form
//! `"<scope>/<name>"`, derived from [`std::any::type_name`]. The descriptor is
//! produced by the compiler, so the same type always yields the same identifier
//! within one process.
//!
//! Concrete types (structs, primitives, `Arc<dyn Trait>`, references...) are not
//! capabilities and are rejected with [`RegistryError::InvalidCapabilityKind`].

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::RegistryError;

/// Separator between scope and name. Never part of a Rust type path.
const SEPARATOR: char = '/';

/// Scope used for bare `fn` pointer types, which have no declaring module.
const FN_POINTER_SCOPE: &str = "fn";

/// What kind of type a capability parameter denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// A trait object such as `dyn Namer`.
    Interface,
    /// A closure trait object (`dyn Fn*`) or a `fn` pointer.
    Function,
    /// Anything else. Never accepted as a capability.
    Concrete,
}

impl CapabilityKind {
    /// Classifies `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        classify(type_name::<T>())
    }

    pub fn is_capability(self) -> bool {
        !matches!(self, CapabilityKind::Concrete)
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityKind::Interface => write!(f, "interface"),
            CapabilityKind::Function => write!(f, "function type"),
            CapabilityKind::Concrete => write!(f, "concrete type"),
        }
    }
}

/// Stable key of a capability: `"<scope>/<name>"`.
///
/// The string is for display. Equality and hashing also compare the
/// [`TypeId`] of the capability, so two distinct types that print the same
/// (same-named traits declared in sibling blocks of one function) stay
/// separate keys. Cloning is cheap (the string is shared).
///
/// # Examples
///
/// ```rust
/// use depkit::CapabilityId;
///
/// trait Namer: Send + Sync {
///     fn name(&self) -> String;
/// }
///
/// let id = CapabilityId::of::<dyn Namer>().unwrap();
/// assert_eq!(id.name(), "Namer");
/// assert_eq!(id.to_string(), format!("{}/Namer", id.scope()));
///
/// assert!(CapabilityId::of::<String>().is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityId {
    repr: Arc<str>,
    split: usize,
    type_id: TypeId,
}

impl CapabilityId {
    /// Resolves the identifier of capability type `T`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidCapabilityKind`] when `T` is neither a trait
    /// object nor a function type.
    pub fn of<T: ?Sized + 'static>() -> Result<Self, RegistryError> {
        let descriptor = type_name::<T>();
        match classify(descriptor) {
            CapabilityKind::Concrete => Err(RegistryError::InvalidCapabilityKind {
                type_name: descriptor,
                kind: CapabilityKind::Concrete,
            }),
            _ => {
                let (scope, name) = split_descriptor(descriptor);
                Ok(Self::from_parts(TypeId::of::<T>(), scope, &name))
            }
        }
    }

    /// Builds an identifier from its parts, not tied to any capability type.
    #[cfg(test)]
    pub(crate) fn new(scope: &str, name: &str) -> Self {
        enum Detached {}
        Self::from_parts(TypeId::of::<Detached>(), scope, name)
    }

    fn from_parts(type_id: TypeId, scope: &str, name: &str) -> Self {
        let repr: Arc<str> = format!("{scope}{SEPARATOR}{name}").into();
        Self {
            repr,
            split: scope.len(),
            type_id,
        }
    }

    /// Declaring module path, e.g. `my_app::naming`.
    pub fn scope(&self) -> &str {
        &self.repr[..self.split]
    }

    /// Declared name, including generic arguments and auto-trait bounds.
    pub fn name(&self) -> &str {
        &self.repr[self.split + SEPARATOR.len_utf8()..]
    }

    pub fn as_str(&self) -> &str {
        &self.repr
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl fmt::Debug for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CapabilityId").field(&&*self.repr).finish()
    }
}

impl AsRef<str> for CapabilityId {
    fn as_ref(&self) -> &str {
        &self.repr
    }
}

impl PartialEq<str> for CapabilityId {
    fn eq(&self, other: &str) -> bool {
        &*self.repr == other
    }
}

impl PartialEq<&str> for CapabilityId {
    fn eq(&self, other: &&str) -> bool {
        &*self.repr == *other
    }
}

impl PartialEq<String> for CapabilityId {
    fn eq(&self, other: &String) -> bool {
        *self.repr == **other
    }
}

// -------------------------------------------------------------------------------------------------
// Descriptor parsing
// -------------------------------------------------------------------------------------------------

fn classify(descriptor: &str) -> CapabilityKind {
    if let Some(object) = descriptor.strip_prefix("dyn ") {
        let (_, principal) = split_binder(object);
        if is_closure_trait(principal) {
            CapabilityKind::Function
        } else {
            CapabilityKind::Interface
        }
    } else if is_fn_pointer(descriptor) {
        CapabilityKind::Function
    } else {
        CapabilityKind::Concrete
    }
}

/// Splits a capability descriptor into scope and name.
///
/// Only called for descriptors `classify` accepted.
fn split_descriptor(descriptor: &str) -> (&str, String) {
    let Some(object) = descriptor.strip_prefix("dyn ") else {
        return (FN_POINTER_SCOPE, descriptor.to_string());
    };

    let (binder, principal) = split_binder(object);
    let path = &principal[..path_end(principal)];
    match path.rfind("::") {
        Some(at) => (&principal[..at], format!("{binder}{}", &principal[at + 2..])),
        None => ("", format!("{binder}{principal}")),
    }
}

/// Peels a leading `for<'a, ..> ` binder. Returns `(binder, rest)`; the binder
/// keeps its trailing space.
fn split_binder(s: &str) -> (&str, &str) {
    if !s.starts_with("for<") {
        return ("", s);
    }

    let mut depth = 0usize;
    for (at, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    let end = at + 1;
                    let end = if s[end..].starts_with(' ') { end + 1 } else { end };
                    return s.split_at(end);
                }
            }
            _ => {}
        }
    }

    ("", s)
}

/// Byte offset where the leading path of a trait-object descriptor ends.
fn path_end(s: &str) -> usize {
    s.find(['<', '(', ' ']).unwrap_or(s.len())
}

fn is_closure_trait(principal: &str) -> bool {
    let path = &principal[..path_end(principal)];
    let last = path.rsplit("::").next().unwrap_or(path);
    matches!(last, "Fn" | "FnMut" | "FnOnce")
}

fn is_fn_pointer(descriptor: &str) -> bool {
    let (_, mut rest) = split_binder(descriptor);
    if let Some(stripped) = rest.strip_prefix("unsafe ") {
        rest = stripped;
    }
    if let Some(abi) = rest.strip_prefix("extern \"") {
        let Some(close) = abi.find('"') else {
            return false;
        };
        rest = abi[close + 1..].trim_start();
    }
    rest.starts_with("fn(")
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
