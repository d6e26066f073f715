//! Attribute declarations, reusable attribute sets, and the catalog that owns them

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;

use super::error::SchemaError;
use super::types::{AttributeType, Value};

/// A named, typed attribute a component may set
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDeclaration {
    pub name: String,
    pub attribute_type: AttributeType,
    /// Human-readable description, as shown in component tables and tooltips
    pub description: String,
    /// Whether a declaration must assign this attribute (unless a default exists)
    pub required: bool,
    /// Value used when the attribute is not assigned
    pub default: Option<Value>,
}

impl AttributeDeclaration {
    pub fn new(
        name: impl Into<String>,
        attribute_type: AttributeType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            description: description.into(),
            required: false,
            default: None,
        }
    }

    /// Mark the attribute as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default from raw literal text, parsed with the attribute's type
    pub fn with_default(mut self, raw: &str) -> Result<Self, SchemaError> {
        let value = self
            .attribute_type
            .parse_literal(raw)
            .map_err(|_| SchemaError::InvalidDefault {
                attribute: self.name.clone(),
                expected: self.attribute_type,
                raw: raw.to_string(),
            })?;
        self.default = Some(value);
        Ok(self)
    }

    /// Required and without a default, so it must be assigned explicitly
    pub fn must_be_assigned(&self) -> bool {
        self.required && self.default.is_none()
    }
}

/// A reusable, named group of attribute declarations (e.g. `Background`)
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSet {
    name: String,
    attributes: Vec<AttributeDeclaration>,
}

impl AttributeSet {
    /// Create a set, rejecting two attributes with the same name
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<AttributeDeclaration>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let mut seen = HashSet::new();
        for attr in &attributes {
            if !seen.insert(attr.name.as_str()) {
                return Err(SchemaError::duplicate_attribute(
                    format!("attribute set '{}'", name),
                    attr.name.clone(),
                    format!("set '{}'", name),
                    format!("set '{}'", name),
                ));
            }
        }
        Ok(Self { name, attributes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in declaration order
    pub fn attributes(&self) -> &[AttributeDeclaration] {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDeclaration> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Owner of every attribute set, keyed by name.
///
/// Sets are stored once and handed out as `Arc`s, so every component schema
/// that includes a set refers to the same declaration list.
#[derive(Debug, Default, Clone)]
pub struct AttributeSetCatalog {
    sets: HashMap<String, Arc<AttributeSet>>,
}

impl AttributeSetCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a set; its name must be new to the catalog
    pub fn register(&mut self, set: AttributeSet) -> Result<Arc<AttributeSet>, SchemaError> {
        if self.sets.contains_key(set.name()) {
            return Err(SchemaError::DuplicateSetName {
                name: set.name().to_string(),
            });
        }
        debug!(set = set.name(), attributes = set.attributes().len(); "Registered attribute set");
        let set = Arc::new(set);
        self.sets.insert(set.name().to_string(), Arc::clone(&set));
        Ok(set)
    }

    /// Get a set by name
    pub fn lookup(&self, name: &str) -> Result<Arc<AttributeSet>, SchemaError> {
        self.sets
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownAttributeSet {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Set names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
