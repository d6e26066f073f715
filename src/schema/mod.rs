//! Component schemas: attribute types, reusable attribute sets and the registry
//! of component kinds
//!
//! A registry is built once (programmatically or from a TOML schema file) and
//! then only borrowed, so validation never observes a half-registered kind.

mod catalog;
mod config;
mod error;
mod registry;
mod types;

pub use catalog::{AttributeDeclaration, AttributeSet, AttributeSetCatalog};
pub use config::SchemaConfigError;
pub use error::SchemaError;
pub use registry::{ComponentRegistry, ComponentSchema};
pub use types::{is_identifier, named_color, AttributeType, Color, LiteralError, Value};
