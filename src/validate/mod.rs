//! Validation of declaration trees against a component registry
//!
//! Unlike the parser, validation never stops early: every unknown kind, unknown
//! attribute, bad literal, duplicate or missing required attribute across the
//! whole tree is reported.

mod error;
mod model;
mod style;
mod validator;

pub use error::ValidationError;
pub use model::{ValidatedComponent, ValidatedDocument};
pub use style::{Stylesheet, StylesheetError};
pub use validator::Validator;
