//! Validation errors, each tied to the source span that caused it

use thiserror::Error;

use crate::error::{render_report, Span};
use crate::schema::{AttributeType, LiteralError};

/// A declaration tree does not conform to the component registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Validation error at {span:?}: unknown component kind '{kind}'")]
    UnknownComponentKind { kind: String, span: Span },

    #[error("Validation error at {span:?}: component '{kind}' has no attribute '{name}'")]
    UnknownAttribute {
        kind: String,
        name: String,
        span: Span,
    },

    #[error("Validation error at {span:?}: attribute '{name}': invalid {expected} literal '{raw}': {reason}")]
    InvalidLiteral {
        name: String,
        raw: String,
        expected: AttributeType,
        reason: String,
        span: Span,
    },

    #[error("Validation error at {span:?}: component '{kind}' is missing required attribute '{name}'")]
    MissingRequiredAttribute {
        kind: String,
        name: String,
        span: Span,
    },
}

impl ValidationError {
    pub(crate) fn invalid_literal(name: &str, err: LiteralError, span: Span) -> Self {
        let LiteralError::Invalid {
            raw,
            expected,
            reason,
        } = err;
        ValidationError::InvalidLiteral {
            name: name.to_string(),
            raw,
            expected,
            reason,
            span,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            ValidationError::UnknownComponentKind { span, .. }
            | ValidationError::UnknownAttribute { span, .. }
            | ValidationError::InvalidLiteral { span, .. }
            | ValidationError::MissingRequiredAttribute { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span();
        match self {
            ValidationError::UnknownComponentKind { kind, .. } => render_report(
                source,
                filename,
                span,
                "Unknown component kind",
                &[(span.clone(), format!("'{}' is not a registered component kind", kind))],
                None,
            ),
            ValidationError::UnknownAttribute { kind, name, .. } => render_report(
                source,
                filename,
                span,
                "Unknown attribute",
                &[(span.clone(), format!("'{}' has no attribute '{}'", kind, name))],
                None,
            ),
            ValidationError::InvalidLiteral {
                raw,
                expected,
                reason,
                ..
            } => render_report(
                source,
                filename,
                span,
                "Invalid literal",
                &[(span.clone(), format!("'{}' is not a valid {}", raw, expected))],
                Some(reason),
            ),
            ValidationError::MissingRequiredAttribute { kind, name, .. } => render_report(
                source,
                filename,
                span,
                "Missing required attribute",
                &[(span.clone(), format!("'{}' needs a value for '{}'", kind, name))],
                None,
            ),
        }
    }
}
