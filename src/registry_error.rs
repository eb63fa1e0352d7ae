use thiserror::Error;

use crate::{CapabilityId, CapabilityKind};

/// Errors returned by registry operations.
///
/// Callers that want the registry to be fatal on a missing dependency use
/// [`RegistryApi::require`](crate::RegistryApi::require) or `unwrap` the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Nothing is registered under the capability.
    #[error("dependency with identifier '{id}' not found")]
    NotFound { id: CapabilityId },

    /// The type parameter is not a trait object or a function type.
    #[error("capability must be a trait object or a function type, not the {kind} '{type_name}'")]
    InvalidCapabilityKind {
        type_name: &'static str,
        kind: CapabilityKind,
    },

    /// The stored instance does not have the requested type.
    #[error("instance registered under '{id}' is not a {type_name}")]
    TypeMismatch {
        id: CapabilityId,
        type_name: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = RegistryError::NotFound {
            id: CapabilityId::new("app", "Namer"),
        };
        assert_eq!(
            err.to_string(),
            "dependency with identifier 'app/Namer' not found"
        );
    }

    #[test]
    fn test_invalid_kind_display() {
        let err = RegistryError::InvalidCapabilityKind {
            type_name: "app::TestModule",
            kind: CapabilityKind::Concrete,
        };
        assert_eq!(
            err.to_string(),
            "capability must be a trait object or a function type, not the concrete type 'app::TestModule'"
        );
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = RegistryError::TypeMismatch {
            id: CapabilityId::new("app", "Namer"),
            type_name: "dyn app::Namer",
        };
        assert_eq!(
            err.to_string(),
            "instance registered under 'app/Namer' is not a dyn app::Namer"
        );
    }

    #[test]
    fn test_equality() {
        let a = RegistryError::NotFound {
            id: CapabilityId::new("app", "Namer"),
        };
        assert_eq!(a, a.clone());
        assert_ne!(
            a,
            RegistryError::NotFound {
                id: CapabilityId::new("app", "Clock"),
            }
        );
    }

    #[test]
    fn test_error_trait() {
        let err: &dyn std::error::Error = &RegistryError::NotFound {
            id: CapabilityId::new("app", "Namer"),
        };
        assert!(err.source().is_none());
        assert!(err.to_string().contains("app/Namer"));
    }
}
