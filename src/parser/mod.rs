//! Parser for Markedly declarations
//!
//! Parsing is purely syntactic and never consults a schema, so it can only
//! report malformed input. It stops at the first syntax error.

pub mod ast;
mod grammar;
pub mod lexer;
mod stream;

pub use ast::*;
pub use stream::{Declarations, ParseConfig, DEFAULT_MAX_DEPTH};

use crate::error::ParseError;

/// Parse source into a document with the default configuration
pub fn parse(input: &str) -> Result<Document, Vec<ParseError>> {
    parse_with_config(input, &ParseConfig::default())
}

/// Parse source into a document, collecting every root declaration
pub fn parse_with_config(input: &str, config: &ParseConfig) -> Result<Document, Vec<ParseError>> {
    declarations_with_config(input, config)
        .collect::<Result<Vec<_>, _>>()
        .map(|components| Document { components })
        .map_err(|err| vec![err])
}

/// Lazily iterate the root declarations of `input`
pub fn declarations(input: &str) -> Declarations<'_> {
    Declarations::new(input, ParseConfig::default())
}

/// Lazily iterate the root declarations of `input` with a custom configuration
pub fn declarations_with_config<'src>(
    input: &'src str,
    config: &ParseConfig,
) -> Declarations<'src> {
    Declarations::new(input, config.clone())
}
