//! Loading component registries from TOML schema files

use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use super::catalog::{AttributeDeclaration, AttributeSet, AttributeSetCatalog};
use super::error::SchemaError;
use super::registry::ComponentRegistry;
use super::types::AttributeType;

/// Errors that can occur when loading a schema file
#[derive(Error, Debug)]
pub enum SchemaConfigError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse schema TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),
}

/// TOML structure for deserializing schema files
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSchema {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    sets: Vec<TomlSet>,
    #[serde(default)]
    components: Vec<TomlComponent>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlMetadata {
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSet {
    name: String,
    #[serde(default)]
    attributes: Vec<TomlAttribute>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlComponent {
    kind: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    attributes: Vec<TomlAttribute>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlAttribute {
    name: String,
    #[serde(rename = "type")]
    attribute_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    required: bool,
    default: Option<String>,
}

impl TomlAttribute {
    fn into_declaration(self) -> Result<AttributeDeclaration, SchemaError> {
        let attribute_type: AttributeType = self.attribute_type.parse()?;
        let mut declaration = AttributeDeclaration::new(self.name, attribute_type, self.description);
        declaration.required = self.required;
        match self.default {
            Some(raw) => declaration.with_default(&raw),
            None => Ok(declaration),
        }
    }
}

fn declarations(attributes: Vec<TomlAttribute>) -> Result<Vec<AttributeDeclaration>, SchemaError> {
    attributes
        .into_iter()
        .map(TomlAttribute::into_declaration)
        .collect()
}

/// Schema shipped with the library: the `Background` set plus `button` and `container`
const DEFAULT_SCHEMA: &str = r##"
[metadata]
name = "builtin"

[[sets]]
name = "Background"

[[sets.attributes]]
name = "color"
type = "color"
description = "Fill color"

[[sets.attributes]]
name = "color-hovering"
type = "color"
description = "Fill color while the pointer is over the component"

[[sets.attributes]]
name = "border-radius"
type = "float"
description = "Corner radius in pixels"
default = "0.0"

[[components]]
kind = "button"
description = "Clickable button with a text label"
include = ["Background"]

[[components.attributes]]
name = "text"
type = "string"
description = "Label text"

[[components.attributes]]
name = "text-color"
type = "color"
description = "Label color"
default = "#000000"

[[components.attributes]]
name = "on-pressed"
type = "event"
description = "Event raised when the button is pressed"

[[components]]
kind = "container"
description = "Plain box holding other components"
include = ["Background"]
"##;

impl ComponentRegistry {
    /// Load a registry from a TOML schema file
    pub fn from_file(path: &Path) -> Result<Self, SchemaConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a registry from a TOML schema string.
    ///
    /// Every attribute set is registered before any component, wherever the
    /// tables appear in the file.
    pub fn from_toml_str(content: &str) -> Result<Self, SchemaConfigError> {
        let parsed: TomlSchema = toml::from_str(content)?;

        let mut catalog = AttributeSetCatalog::new();
        for set in parsed.sets {
            catalog.register(AttributeSet::new(set.name, declarations(set.attributes)?)?)?;
        }

        let mut registry = ComponentRegistry::new(catalog);
        registry.name = parsed.metadata.and_then(|m| m.name);
        for component in parsed.components {
            let include: Vec<&str> = component.include.iter().map(String::as_str).collect();
            registry.register_with_description(
                &component.kind,
                &component.description,
                &include,
                declarations(component.attributes)?,
            )?;
        }

        debug!(
            sets = registry.catalog().len(),
            kinds = registry.len();
            "Loaded component schema"
        );
        Ok(registry)
    }

    /// The built-in schema
    pub fn builtin() -> Self {
        Self::from_toml_str(DEFAULT_SCHEMA).expect("Built-in schema should be valid")
    }
}
