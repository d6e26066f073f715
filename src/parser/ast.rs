//! Syntax tree for Markedly declarations
//!
//! The tree is purely syntactic: attribute values are kept as the raw literal
//! text found in the source and only receive a type during validation.

use std::fmt;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (letters, digits, `_` and `-`, starting with a letter or `_`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw literal text of an attribute value, exactly as typed
///
/// Strings keep their quotes and escapes. Tuples are normalized to
/// `(a, b, c)` with single spaces after commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue(pub String);

impl RawValue {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root AST node - every top-level declaration of a document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub components: Vec<Spanned<ComponentDecl>>,
}

impl Document {
    /// Iterate the root declarations without their spans
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDecl> {
        self.components.iter().map(|c| &c.node)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// A component declaration: `kind(.class)? { attr: value; child { ... } }`
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDecl {
    pub kind: Spanned<Identifier>,
    /// Optional style class selecting extra stylesheet defaults
    pub class: Option<Spanned<Identifier>>,
    /// Assignments in source order; duplicates are kept for the validator to report
    pub attributes: Vec<Spanned<AttributeAssignment>>,
    pub children: Vec<Spanned<ComponentDecl>>,
}

impl ComponentDecl {
    /// First assignment of `name`, if any
    pub fn attribute(&self, name: &str) -> Option<&AttributeAssignment> {
        self.attributes
            .iter()
            .map(|a| &a.node)
            .find(|a| a.name.node.as_str() == name)
    }

    /// Depth of the deepest branch, counting this declaration as 1
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.node.depth())
            .max()
            .unwrap_or(0)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "    ".repeat(depth);
        write!(f, "{}{}", indent, self.kind.node)?;
        if let Some(class) = &self.class {
            write!(f, ".{}", class.node)?;
        }
        if self.attributes.is_empty() && self.children.is_empty() {
            return writeln!(f, " {{}}");
        }
        writeln!(f, " {{")?;
        for attr in &self.attributes {
            writeln!(f, "{}    {}", indent, attr.node)?;
        }
        for child in &self.children {
            child.node.write_indented(f, depth + 1)?;
        }
        writeln!(f, "{}}}", indent)
    }
}

/// Attribute assignment inside a declaration body: `name: value;`
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeAssignment {
    pub name: Spanned<Identifier>,
    pub value: Spanned<RawValue>,
}

impl fmt::Display for AttributeAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.name.node, self.value.node)
    }
}

/// Canonical source form: four-space indentation, one attribute per line,
/// children after attributes
impl fmt::Display for ComponentDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in &self.components {
            write!(f, "{}", component.node)?;
        }
        Ok(())
    }
}
