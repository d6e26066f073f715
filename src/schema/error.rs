//! Error types for schema construction

use thiserror::Error;

use super::types::AttributeType;

/// Errors raised while building the attribute set catalog or the component
/// registry. These are fatal to registry setup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    /// Type name not in the fixed set of attribute types
    #[error("unknown attribute type '{name}' (valid types: string, color, integer, float, event)")]
    UnknownType { name: String },

    /// Reference to an attribute set that was never registered
    #[error("unknown attribute set '{name}'")]
    UnknownAttributeSet { name: String },

    /// Second attribute set with the same name
    #[error("duplicate attribute set '{name}'")]
    DuplicateSetName { name: String },

    /// Two attributes with the same name end up in one name-space
    #[error("duplicate attribute '{name}' in {owner} (declared by {first} and by {second})")]
    DuplicateAttributeName {
        owner: String,
        name: String,
        first: String,
        second: String,
    },

    /// Second component kind with the same name
    #[error("duplicate component kind '{kind}'")]
    DuplicateComponentKind { kind: String },

    /// Lookup of a component kind that was never registered
    #[error("unknown component kind '{kind}'")]
    UnknownComponentKind { kind: String },

    /// A declared default value does not parse as the attribute's type
    #[error("invalid default for attribute '{attribute}': expected {expected}, got '{raw}'")]
    InvalidDefault {
        attribute: String,
        expected: AttributeType,
        raw: String,
    },
}

impl SchemaError {
    pub(crate) fn duplicate_attribute(
        owner: impl Into<String>,
        name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateAttributeName {
            owner: owner.into(),
            name: name.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}
