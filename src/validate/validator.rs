//! Schema validation of parsed declaration trees

use std::collections::{BTreeMap, HashSet};

use log::{debug, trace};

use super::error::ValidationError;
use super::model::{ValidatedComponent, ValidatedDocument};
use super::style::Stylesheet;
use crate::parser::{AttributeAssignment, ComponentDecl, Document, Spanned};
use crate::schema::{ComponentRegistry, ComponentSchema, Value};

/// Checks declaration trees against a component registry.
///
/// Holds only shared borrows, so one validator can check any number of
/// documents and always gives the same answer for the same input.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r ComponentRegistry,
    stylesheet: Option<&'r Stylesheet>,
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self {
            registry,
            stylesheet: None,
        }
    }

    /// Apply stylesheet values before each declaration's own assignments
    pub fn with_stylesheet(mut self, stylesheet: &'r Stylesheet) -> Self {
        self.stylesheet = Some(stylesheet);
        self
    }

    /// Validate root declarations, collecting every error in source order
    pub fn validate<'d, I>(&self, components: I) -> Result<ValidatedDocument, Vec<ValidationError>>
    where
        I: IntoIterator<Item = &'d ComponentDecl>,
    {
        let mut errors = Vec::new();
        let components: Vec<_> = components
            .into_iter()
            .map(|decl| self.check(decl, &mut errors))
            .collect();

        debug!(components = components.len(), errors = errors.len(); "Validated document");
        finish(ValidatedDocument { components }, errors)
    }

    pub fn validate_document(
        &self,
        document: &Document,
    ) -> Result<ValidatedDocument, Vec<ValidationError>> {
        self.validate(document.iter())
    }

    /// Validate one declaration and its subtree
    pub fn validate_component(
        &self,
        decl: &ComponentDecl,
    ) -> Result<ValidatedComponent, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let component = self.check(decl, &mut errors);
        finish(component, errors)
    }

    fn check(&self, decl: &ComponentDecl, errors: &mut Vec<ValidationError>) -> ValidatedComponent {
        let kind = decl.kind.node.as_str();
        let class = decl.class.as_ref().map(|c| c.node.as_str());
        trace!(kind = kind, class:? = class; "Validating component");

        let schema = match self.registry.get(kind) {
            Some(schema) => Some(schema),
            None => {
                errors.push(ValidationError::UnknownComponentKind {
                    kind: kind.to_string(),
                    span: decl.kind.span.clone(),
                });
                None
            }
        };

        let mut attributes = BTreeMap::new();
        if let (Some(schema), Some(stylesheet)) = (schema, self.stylesheet) {
            for (name, value) in stylesheet.values_for(kind, class) {
                // The stylesheet may have been checked against another registry
                let declared = schema.attribute(&name).map(|a| a.attribute_type);
                if declared == Some(value.attribute_type()) {
                    attributes.insert(name, value);
                } else {
                    debug!(kind = kind, attribute = name.as_str(), declared:? = declared; "Ignoring stylesheet value of mismatched type");
                }
            }
        }

        // Repeated assignments are allowed; the last one wins
        let mut assigned: HashSet<&str> = HashSet::new();
        for assignment in &decl.attributes {
            let name = &assignment.node.name;
            if !assigned.insert(name.node.as_str()) {
                trace!(kind = kind, attribute = name.node.as_str(); "Attribute assigned again");
            }

            let Some(schema) = schema else { continue };
            match resolve_assignment(schema, assignment) {
                Ok(value) => {
                    attributes.insert(name.node.to_string(), value);
                }
                Err(err) => errors.push(err),
            }
        }

        if let Some(schema) = schema {
            for required in schema.required_attributes() {
                if !attributes.contains_key(&required.name)
                    && !assigned.contains(required.name.as_str())
                {
                    errors.push(ValidationError::MissingRequiredAttribute {
                        kind: kind.to_string(),
                        name: required.name.clone(),
                        span: decl.kind.span.clone(),
                    });
                }
            }
        }

        let children = decl
            .children
            .iter()
            .map(|child| self.check(&child.node, errors))
            .collect();

        ValidatedComponent {
            kind: kind.to_string(),
            class: class.map(str::to_string),
            attributes,
            children,
        }
    }
}

/// Type-check one assignment against `schema`
pub(crate) fn resolve_assignment(
    schema: &ComponentSchema,
    assignment: &Spanned<AttributeAssignment>,
) -> Result<Value, ValidationError> {
    let name = &assignment.node.name;
    let value = &assignment.node.value;
    let declaration =
        schema
            .attribute(name.node.as_str())
            .ok_or_else(|| ValidationError::UnknownAttribute {
                kind: schema.kind().to_string(),
                name: name.node.to_string(),
                span: name.span.clone(),
            })?;
    declaration
        .attribute_type
        .parse_literal(value.node.as_str())
        .map_err(|err| ValidationError::invalid_literal(name.node.as_str(), err, value.span.clone()))
}

fn finish<T>(value: T, mut errors: Vec<ValidationError>) -> Result<T, Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(value)
    } else {
        errors.sort_by_key(|e| e.span().start);
        Err(errors)
    }
}
