//! Error types for policy model access

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PolicyError>;

/// Errors raised by a policy model while loading or resolving components
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A name did not resolve to a component of the requested kind
    #[error("Unknown {kind}: {name}")]
    UnknownComponent { kind: ComponentKind, name: String },

    /// Two components of the same kind share a name
    #[error("Duplicate {kind}: {name}")]
    DuplicateComponent { kind: ComponentKind, name: String },

    /// Policy document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PolicyError {
    /// Create an unknown component error
    pub fn unknown<S: Into<String>>(kind: ComponentKind, name: S) -> Self {
        PolicyError::UnknownComponent {
            kind,
            name: name.into(),
        }
    }

    /// Create a duplicate component error
    pub fn duplicate<S: Into<String>>(kind: ComponentKind, name: S) -> Self {
        PolicyError::DuplicateComponent {
            kind,
            name: name.into(),
        }
    }
}

/// Kinds of components a policy model can resolve by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Role,
    Type,
    Attribute,
    User,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            ComponentKind::Role => "role",
            ComponentKind::Type => "type",
            ComponentKind::Attribute => "type attribute",
            ComponentKind::User => "user",
        };
        f.write_str(kind)
    }
}
