//! Typed, schema-checked document tree

use std::collections::BTreeMap;
use std::fmt;

use crate::schema::{ComponentSchema, Value};

/// A component instance whose attributes all parsed against its schema.
///
/// `attributes` holds the values assigned in the source or supplied by a
/// stylesheet; schema defaults are not copied in.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedComponent {
    pub kind: String,
    pub class: Option<String>,
    pub attributes: BTreeMap<String, Value>,
    pub children: Vec<ValidatedComponent>,
}

impl ValidatedComponent {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Effective value of `name`: the assigned value, else the schema default
    pub fn value_or_default<'a>(
        &'a self,
        name: &str,
        schema: &'a ComponentSchema,
    ) -> Option<&'a Value> {
        self.attributes
            .get(name)
            .or_else(|| schema.attribute(name).and_then(|a| a.default.as_ref()))
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{}{}", indent, self.kind)?;
        if let Some(class) = &self.class {
            write!(f, ".{}", class)?;
        }
        writeln!(f)?;
        for (name, value) in &self.attributes {
            writeln!(f, "{}  {}: {} = {}", indent, name, value.attribute_type(), value)?;
        }
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Tree dump with one attribute per line, as printed by `markedly --dump`
impl fmt::Display for ValidatedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// The validated form of a whole document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedDocument {
    pub components: Vec<ValidatedComponent>,
}

impl ValidatedDocument {
    pub fn iter(&self) -> impl Iterator<Item = &ValidatedComponent> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for ValidatedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in &self.components {
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Color, ComponentRegistry};

    fn button(attributes: &[(&str, Value)]) -> ValidatedComponent {
        ValidatedComponent {
            kind: "button".to_string(),
            class: None,
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            children: vec![],
        }
    }

    #[test]
    fn test_value_or_default() {
        let registry = ComponentRegistry::builtin();
        let schema = registry.schema_for("button").unwrap();
        let component = button(&[("text-color", Value::Color(Color::rgb(255, 255, 255)))]);

        assert_eq!(
            component.value_or_default("text-color", schema),
            Some(&Value::Color(Color::rgb(255, 255, 255)))
        );
        assert_eq!(
            component.value_or_default("border-radius", schema),
            Some(&Value::Float(0.0))
        );
        assert_eq!(component.value_or_default("text", schema), None);
    }

    #[test]
    fn test_dump_format() {
        let mut container = ValidatedComponent {
            kind: "container".to_string(),
            class: Some("menu".to_string()),
            attributes: BTreeMap::new(),
            children: vec![],
        };
        container
            .children
            .push(button(&[("text", Value::String("OK".to_string()))]));
        assert_eq!(
            container.to_string(),
            "container.menu\n  button\n    text: string = \"OK\"\n"
        );
    }
}
