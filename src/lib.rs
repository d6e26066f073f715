//! Markedly - a schema-driven declaration language for user interfaces
//!
//! This library provides the parser for Markedly documents, the registry of
//! component kinds and their typed attributes, and the validator that checks
//! one against the other.
//!
//! # Example
//!
//! ```rust
//! use markedly::{check, ComponentRegistry};
//!
//! let registry = ComponentRegistry::builtin();
//! let doc = check(r##"button { text: "OK"; color: "#FF0000"; }"##, &registry).unwrap();
//! assert_eq!(doc.components[0].kind, "button");
//! ```

pub mod error;
pub mod parser;
pub mod schema;
pub mod validate;

pub use error::{line_col, ParseError};
pub use parser::{declarations, parse, parse_with_config, Document, ParseConfig};
pub use schema::{
    AttributeDeclaration, AttributeSet, AttributeSetCatalog, AttributeType, Color,
    ComponentRegistry, ComponentSchema, SchemaConfigError, SchemaError, Value,
};
pub use validate::{
    Stylesheet, StylesheetError, ValidatedComponent, ValidatedDocument, ValidationError, Validator,
};

use thiserror::Error;

/// Errors that can occur during the check pipeline
#[derive(Debug, Error)]
pub enum CheckError {
    /// Error during parsing
    #[error("parse errors: {}", join_errors(.0))]
    Parse(Vec<ParseError>),

    /// Errors during validation
    #[error("validation errors: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl From<Vec<ParseError>> for CheckError {
    fn from(errors: Vec<ParseError>) -> Self {
        CheckError::Parse(errors)
    }
}

impl From<Vec<ValidationError>> for CheckError {
    fn from(errors: Vec<ValidationError>) -> Self {
        CheckError::Validation(errors)
    }
}

fn join_errors<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CheckError {
    /// Number of diagnostics carried
    pub fn len(&self) -> usize {
        match self {
            CheckError::Parse(errors) => errors.len(),
            CheckError::Validation(errors) => errors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render every diagnostic with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            CheckError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect(),
            CheckError::Validation(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect(),
        }
    }
}

/// Configuration for the check pipeline
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    /// Parser configuration
    pub parse: ParseConfig,
    /// Stylesheet supplying default attribute values
    pub stylesheet: Option<Stylesheet>,
}

impl CheckConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parser configuration
    pub fn with_parse(mut self, config: ParseConfig) -> Self {
        self.parse = config;
        self
    }

    /// Set the maximum declaration nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.parse = self.parse.with_max_depth(max_depth);
        self
    }

    /// Set the stylesheet
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = Some(stylesheet);
        self
    }
}

/// Parse and validate source with default configuration
///
/// This is the main entry point for the library.
///
/// # Example
///
/// ```rust
/// use markedly::{check, CheckError, ComponentRegistry};
///
/// let registry = ComponentRegistry::builtin();
/// let err = check(r#"button { unknown-attr: "x"; }"#, &registry).unwrap_err();
/// assert!(matches!(err, CheckError::Validation(ref errors) if errors.len() == 1));
/// ```
pub fn check(source: &str, registry: &ComponentRegistry) -> Result<ValidatedDocument, CheckError> {
    check_with_config(source, registry, &CheckConfig::default())
}

/// Parse and validate source with custom configuration
///
/// # Example
///
/// ```rust
/// use markedly::{check_with_config, CheckConfig, ComponentRegistry, Stylesheet};
///
/// let registry = ComponentRegistry::builtin();
/// let stylesheet = Stylesheet::from_str("button { color: red; }", &registry).unwrap();
/// let config = CheckConfig::new()
///     .with_max_depth(8)
///     .with_stylesheet(stylesheet);
///
/// let doc = check_with_config("button { }", &registry, &config).unwrap();
/// assert!(doc.components[0].get("color").is_some());
/// ```
pub fn check_with_config(
    source: &str,
    registry: &ComponentRegistry,
    config: &CheckConfig,
) -> Result<ValidatedDocument, CheckError> {
    let doc = parser::parse_with_config(source, &config.parse)?;

    let mut validator = Validator::new(registry);
    if let Some(stylesheet) = &config.stylesheet {
        validator = validator.with_stylesheet(stylesheet);
    }
    Ok(validator.validate_document(&doc)?)
}
