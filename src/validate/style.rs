//! Stylesheets: documents of declarations that supply default attribute values
//!
//! A stylesheet uses the same syntax as any Markedly document. Each declaration
//! becomes a rule for its kind, or for its kind and style class when it carries
//! one; nested declarations are rules of their own. Values are type-checked
//! once, when the stylesheet is loaded.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use log::debug;
use thiserror::Error;

use super::error::ValidationError;
use super::validator::resolve_assignment;
use crate::parser::{self, ComponentDecl};
use crate::schema::{ComponentRegistry, Value};
use crate::CheckError;

/// Errors that can occur when loading a stylesheet file
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid stylesheet: {0}")]
    Check(#[from] CheckError),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct KindStyle {
    base: BTreeMap<String, Value>,
    classes: HashMap<String, BTreeMap<String, Value>>,
}

/// Default attribute values per component kind and style class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    kinds: HashMap<String, KindStyle>,
}

impl Stylesheet {
    /// Load a stylesheet from a file
    pub fn from_file(path: &Path, registry: &ComponentRegistry) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_str(&content, registry)?)
    }

    /// Parse a stylesheet and check every value against `registry`
    pub fn from_str(source: &str, registry: &ComponentRegistry) -> Result<Self, CheckError> {
        let document = parser::parse(source).map_err(CheckError::Parse)?;

        let mut stylesheet = Stylesheet::default();
        let mut errors = Vec::new();
        for decl in document.iter() {
            stylesheet.add_rules(decl, registry, &mut errors);
        }

        if !errors.is_empty() {
            errors.sort_by_key(|e| e.span().start);
            return Err(CheckError::Validation(errors));
        }
        debug!(kinds = stylesheet.kinds.len(); "Loaded stylesheet");
        Ok(stylesheet)
    }

    fn add_rules(
        &mut self,
        decl: &ComponentDecl,
        registry: &ComponentRegistry,
        errors: &mut Vec<ValidationError>,
    ) {
        let kind = decl.kind.node.as_str();
        match registry.get(kind) {
            Some(schema) => {
                let style = self.kinds.entry(kind.to_string()).or_default();
                let rule = match &decl.class {
                    Some(class) => style.classes.entry(class.node.to_string()).or_default(),
                    None => &mut style.base,
                };
                for assignment in &decl.attributes {
                    match resolve_assignment(schema, assignment) {
                        Ok(value) => {
                            rule.insert(assignment.node.name.node.to_string(), value);
                        }
                        Err(err) => errors.push(err),
                    }
                }
            }
            None => errors.push(ValidationError::UnknownComponentKind {
                kind: kind.to_string(),
                span: decl.kind.span.clone(),
            }),
        }

        for child in &decl.children {
            self.add_rules(&child.node, registry, errors);
        }
    }

    /// Values for a declaration of `kind` with an optional style class:
    /// kind-wide values first, overridden by the class rule
    pub fn values_for(&self, kind: &str, class: Option<&str>) -> BTreeMap<String, Value> {
        let Some(style) = self.kinds.get(kind) else {
            return BTreeMap::new();
        };
        let mut values = style.base.clone();
        if let Some(rule) = class.and_then(|c| style.classes.get(c)) {
            values.extend(rule.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        values
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Color;

    #[test]
    fn test_later_assignments_win() {
        let registry = ComponentRegistry::builtin();
        let stylesheet = Stylesheet::from_str(
            "button { color: red; } button { color: blue; border-radius: 4.0; }",
            &registry,
        )
        .expect("valid stylesheet");
        let values = stylesheet.values_for("button", None);
        assert_eq!(values.get("color"), Some(&Value::Color(Color::rgb(0, 0, 255))));
        assert_eq!(values.get("border-radius"), Some(&Value::Float(4.0)));
    }

    #[test]
    fn test_class_overrides_kind() {
        let registry = ComponentRegistry::builtin();
        let stylesheet = Stylesheet::from_str(
            "button.primary { color: blue; } button { color: gray; text-color: white; }",
            &registry,
        )
        .expect("valid stylesheet");
        let values = stylesheet.values_for("button", Some("primary"));
        assert_eq!(values.get("color"), Some(&Value::Color(Color::rgb(0, 0, 255))));
        assert_eq!(
            values.get("text-color"),
            Some(&Value::Color(Color::rgb(255, 255, 255)))
        );
        assert_eq!(
            stylesheet.values_for("button", Some("unknown")).get("color"),
            Some(&Value::Color(Color::rgb(128, 128, 128)))
        );
        assert!(stylesheet.values_for("container", None).is_empty());
    }

    #[test]
    fn test_nested_rules_are_flattened() {
        let registry = ComponentRegistry::builtin();
        let stylesheet = Stylesheet::from_str(
            "container { color: white; button { text-color: red; } }",
            &registry,
        )
        .expect("valid stylesheet");
        assert_eq!(
            stylesheet.values_for("button", None).get("text-color"),
            Some(&Value::Color(Color::rgb(255, 0, 0)))
        );
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let registry = ComponentRegistry::builtin();
        let err = Stylesheet::from_str("button { color: 12; } slider { }", &registry).unwrap_err();
        match err {
            CheckError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(matches!(errors[0], ValidationError::InvalidLiteral { .. }));
                assert!(matches!(errors[1], ValidationError::UnknownComponentKind { .. }));
            }
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error() {
        let registry = ComponentRegistry::builtin();
        assert!(matches!(
            Stylesheet::from_str("button { color red; }", &registry),
            Err(CheckError::Parse(_))
        ));
    }
}
