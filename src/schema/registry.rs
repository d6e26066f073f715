//! Component schema registry: kind name to fully resolved attribute schema

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use super::catalog::{AttributeDeclaration, AttributeSet, AttributeSetCatalog};
use super::error::SchemaError;

/// Where a resolved attribute is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Index into `included_sets`, then into that set's attributes
    Set(usize, usize),
    /// Index into `own_attributes`
    Own(usize),
}

/// Resolved schema of one component kind.
///
/// The name-to-attribute index is computed once at registration; lookups never
/// walk the included sets again.
#[derive(Debug, Clone)]
pub struct ComponentSchema {
    kind: String,
    description: String,
    included_sets: Vec<Arc<AttributeSet>>,
    own_attributes: Vec<AttributeDeclaration>,
    index: HashMap<String, Slot>,
}

impl ComponentSchema {
    fn resolve(
        kind: &str,
        description: &str,
        included_sets: Vec<Arc<AttributeSet>>,
        own_attributes: Vec<AttributeDeclaration>,
    ) -> Result<Self, SchemaError> {
        let mut index: HashMap<String, Slot> = HashMap::new();

        for (set_idx, set) in included_sets.iter().enumerate() {
            for (attr_idx, attr) in set.attributes().iter().enumerate() {
                claim(
                    &mut index,
                    kind,
                    &attr.name,
                    Slot::Set(set_idx, attr_idx),
                    &included_sets,
                )?;
            }
        }
        for (attr_idx, attr) in own_attributes.iter().enumerate() {
            claim(&mut index, kind, &attr.name, Slot::Own(attr_idx), &included_sets)?;
        }

        Ok(Self {
            kind: kind.to_string(),
            description: description.to_string(),
            included_sets,
            own_attributes,
            index,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Included attribute sets in inclusion order
    pub fn included_sets(&self) -> &[Arc<AttributeSet>] {
        &self.included_sets
    }

    pub fn own_attributes(&self) -> &[AttributeDeclaration] {
        &self.own_attributes
    }

    /// Look up an attribute by name across included sets and own attributes
    pub fn attribute(&self, name: &str) -> Option<&AttributeDeclaration> {
        self.index.get(name).map(|slot| self.declaration(*slot))
    }

    /// Name of the attribute set declaring `name`, or `None` for own attributes
    /// and unknown names
    pub fn origin(&self, name: &str) -> Option<&str> {
        match self.index.get(name)? {
            Slot::Set(set_idx, _) => Some(self.included_sets[*set_idx].name()),
            Slot::Own(_) => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Every attribute: included sets first, in inclusion order, then own attributes
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDeclaration> {
        self.included_sets
            .iter()
            .flat_map(|set| set.attributes().iter())
            .chain(self.own_attributes.iter())
    }

    /// Attributes that every declaration of this kind has to assign
    pub fn required_attributes(&self) -> impl Iterator<Item = &AttributeDeclaration> {
        self.attributes().filter(|a| a.must_be_assigned())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn declaration(&self, slot: Slot) -> &AttributeDeclaration {
        match slot {
            Slot::Set(set_idx, attr_idx) => &self.included_sets[set_idx].attributes()[attr_idx],
            Slot::Own(attr_idx) => &self.own_attributes[attr_idx],
        }
    }
}

/// Record `name` at `slot`, failing if another source already declared it
fn claim(
    index: &mut HashMap<String, Slot>,
    kind: &str,
    name: &str,
    slot: Slot,
    sets: &[Arc<AttributeSet>],
) -> Result<(), SchemaError> {
    if let Some(existing) = index.get(name) {
        return Err(SchemaError::duplicate_attribute(
            format!("component '{}'", kind),
            name,
            describe_slot(*existing, sets),
            describe_slot(slot, sets),
        ));
    }
    index.insert(name.to_string(), slot);
    Ok(())
}

fn describe_slot(slot: Slot, sets: &[Arc<AttributeSet>]) -> String {
    match slot {
        Slot::Set(set_idx, _) => format!("set '{}'", sets[set_idx].name()),
        Slot::Own(_) => "own attributes".to_string(),
    }
}

/// Registry of component kinds.
///
/// Takes ownership of the attribute set catalog, so no set can be added once
/// kinds start referring to them. Registration needs `&mut self`; validation
/// only borrows the registry, which makes a fully built registry safe to share
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    catalog: AttributeSetCatalog,
    schemas: HashMap<String, ComponentSchema>,
    /// Optional name, e.g. from a schema file's metadata
    pub name: Option<String>,
}

impl ComponentRegistry {
    pub fn new(catalog: AttributeSetCatalog) -> Self {
        Self {
            catalog,
            schemas: HashMap::new(),
            name: None,
        }
    }

    /// The frozen catalog of attribute sets
    pub fn catalog(&self) -> &AttributeSetCatalog {
        &self.catalog
    }

    /// Register a component kind including the named sets plus its own attributes
    pub fn register(
        &mut self,
        kind: &str,
        included_sets: &[&str],
        own_attributes: Vec<AttributeDeclaration>,
    ) -> Result<&ComponentSchema, SchemaError> {
        self.register_with_description(kind, "", included_sets, own_attributes)
    }

    /// Like [`register`](Self::register), with a description for tooling
    pub fn register_with_description(
        &mut self,
        kind: &str,
        description: &str,
        included_sets: &[&str],
        own_attributes: Vec<AttributeDeclaration>,
    ) -> Result<&ComponentSchema, SchemaError> {
        if self.schemas.contains_key(kind) {
            return Err(SchemaError::DuplicateComponentKind {
                kind: kind.to_string(),
            });
        }

        let sets = included_sets
            .iter()
            .map(|name| self.catalog.lookup(name))
            .collect::<Result<Vec<_>, _>>()?;
        let schema = ComponentSchema::resolve(kind, description, sets, own_attributes)?;

        debug!(
            kind = kind,
            sets:? = included_sets,
            attributes = schema.len();
            "Registered component kind"
        );

        let schema: &ComponentSchema = self.schemas.entry(kind.to_string()).or_insert(schema);
        Ok(schema)
    }

    /// Get the resolved schema for a kind
    pub fn schema_for(&self, kind: &str) -> Result<&ComponentSchema, SchemaError> {
        self.schemas
            .get(kind)
            .ok_or_else(|| SchemaError::UnknownComponentKind {
                kind: kind.to_string(),
            })
    }

    pub fn get(&self, kind: &str) -> Option<&ComponentSchema> {
        self.schemas.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.schemas.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::AttributeType;

    fn catalog() -> AttributeSetCatalog {
        let mut catalog = AttributeSetCatalog::new();
        catalog
            .register(
                AttributeSet::new(
                    "Background",
                    vec![
                        AttributeDeclaration::new("color", AttributeType::Color, ""),
                        AttributeDeclaration::new("color-hovering", AttributeType::Color, ""),
                        AttributeDeclaration::new("border-radius", AttributeType::Float, ""),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        catalog
            .register(
                AttributeSet::new(
                    "Border",
                    vec![
                        AttributeDeclaration::new("border-width", AttributeType::Float, ""),
                        AttributeDeclaration::new("border-color", AttributeType::Color, ""),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        catalog
            .register(
                AttributeSet::new(
                    "Tint",
                    vec![AttributeDeclaration::new("color", AttributeType::Color, "")],
                )
                .unwrap(),
            )
            .unwrap();
        catalog
    }

    fn text() -> AttributeDeclaration {
        AttributeDeclaration::new("text", AttributeType::String, "Label text")
    }

    #[test]
    fn test_resolves_included_and_own() {
        let mut registry = ComponentRegistry::new(catalog());
        let schema = registry
            .register("button", &["Background"], vec![text()])
            .expect("valid schema");
        assert_eq!(schema.len(), 4);
        assert_eq!(
            schema.attribute("color").map(|a| a.attribute_type),
            Some(AttributeType::Color)
        );
        assert_eq!(schema.origin("color"), Some("Background"));
        assert_eq!(schema.origin("text"), None);
        let names: Vec<_> = schema.attributes().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["color", "color-hovering", "border-radius", "text"]);
    }

    #[test]
    fn test_disjoint_sets_never_collide() {
        let mut registry = ComponentRegistry::new(catalog());
        let schema = registry
            .register("panel", &["Background", "Border"], vec![text()])
            .expect("disjoint sets");
        assert_eq!(schema.len(), 6);
    }

    #[test]
    fn test_set_and_own_collision_in_any_order() {
        let own_color = || vec![AttributeDeclaration::new("color", AttributeType::String, "")];

        let mut registry = ComponentRegistry::new(catalog());
        let err = registry
            .register("a", &["Background"], own_color())
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateAttributeName { ref name, .. } if name == "color"));

        // Own attribute listed before a second, unrelated set: still a collision
        let err = registry
            .register("b", &["Border", "Background"], own_color())
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateAttributeName { ref name, .. } if name == "color"));
    }

    #[test]
    fn test_set_and_set_collision_in_any_order() {
        let mut registry = ComponentRegistry::new(catalog());
        assert!(matches!(
            registry.register("a", &["Background", "Tint"], vec![]),
            Err(SchemaError::DuplicateAttributeName { .. })
        ));
        assert!(matches!(
            registry.register("b", &["Tint", "Background"], vec![]),
            Err(SchemaError::DuplicateAttributeName { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_collision_message_names_both_sources() {
        let mut registry = ComponentRegistry::new(catalog());
        let err = registry
            .register("a", &["Background", "Tint"], vec![])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "duplicate attribute 'color' in component 'a' (declared by set 'Background' and by set 'Tint')"
        );
    }

    #[test]
    fn test_unknown_set_fails_at_registration() {
        let mut registry = ComponentRegistry::new(catalog());
        assert_eq!(
            registry.register("a", &["Shadow"], vec![]).unwrap_err(),
            SchemaError::UnknownAttributeSet {
                name: "Shadow".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_kind() {
        let mut registry = ComponentRegistry::new(catalog());
        registry.register("button", &[], vec![]).expect("first");
        assert_eq!(
            registry.register("button", &[], vec![]).unwrap_err(),
            SchemaError::DuplicateComponentKind {
                kind: "button".to_string()
            }
        );
    }

    #[test]
    fn test_schema_for_unknown_kind() {
        let registry = ComponentRegistry::new(catalog());
        assert_eq!(
            registry.schema_for("slider").unwrap_err(),
            SchemaError::UnknownComponentKind {
                kind: "slider".to_string()
            }
        );
    }

    #[test]
    fn test_included_sets_are_shared() {
        let mut registry = ComponentRegistry::new(catalog());
        registry.register("button", &["Background"], vec![]).unwrap();
        registry.register("container", &["Background"], vec![]).unwrap();
        let a = &registry.schema_for("button").unwrap().included_sets()[0];
        let b = &registry.schema_for("container").unwrap().included_sets()[0];
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn test_kinds_sorted() {
        let mut registry = ComponentRegistry::new(catalog());
        registry.register("container", &[], vec![]).unwrap();
        registry.register("button", &[], vec![]).unwrap();
        assert_eq!(registry.kinds(), vec!["button", "container"]);
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ComponentRegistry>();
    }
}
