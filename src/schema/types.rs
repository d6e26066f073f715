//! Attribute value types and their literal grammars
//!
//! The set of types is fixed. Each type knows how to turn the raw literal text
//! of an attribute assignment into a typed [`Value`]; there is no implicit
//! coercion between types, so `5` is an integer and never a float.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::error::SchemaError;

/// Primitive attribute value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    String,
    Color,
    Integer,
    Float,
    Event,
}

impl AttributeType {
    /// Every attribute type, in declaration order
    pub const ALL: [AttributeType; 5] = [
        AttributeType::String,
        AttributeType::Color,
        AttributeType::Integer,
        AttributeType::Float,
        AttributeType::Event,
    ];

    /// Canonical lowercase name, as used in schema files
    pub fn name(self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Color => "color",
            AttributeType::Integer => "integer",
            AttributeType::Float => "float",
            AttributeType::Event => "event",
        }
    }

    /// Parse raw literal text as a value of this type
    pub fn parse_literal(self, raw: &str) -> Result<Value, LiteralError> {
        let invalid = |reason: &str| LiteralError::Invalid {
            raw: raw.to_string(),
            expected: self,
            reason: reason.to_string(),
        };
        match self {
            AttributeType::String => parse_string(raw).map(Value::String).map_err(invalid),
            AttributeType::Color => parse_color(raw).map(Value::Color).map_err(invalid),
            AttributeType::Integer => parse_integer(raw).map(Value::Integer).map_err(invalid),
            AttributeType::Float => parse_float(raw).map(Value::Float).map_err(invalid),
            AttributeType::Event => parse_event(raw).map(Value::Event).map_err(invalid),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeType {
    type Err = SchemaError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        AttributeType::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| SchemaError::UnknownType {
                name: name.to_string(),
            })
    }
}

/// A literal did not conform to its declared type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LiteralError {
    #[error("invalid {expected} literal '{raw}': {reason}")]
    Invalid {
        raw: String,
        expected: AttributeType,
        reason: String,
    },
}

/// An RGBA color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new_u8(r, g, b, 255)
    }
}

/// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

/// A typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Color(Color),
    Integer(i64),
    Float(f64),
    /// Name of the handler raised for the event
    Event(String),
}

impl Value {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Value::String(_) => AttributeType::String,
            Value::Color(_) => AttributeType::Color,
            Value::Integer(_) => AttributeType::Integer,
            Value::Float(_) => AttributeType::Float,
            Value::Event(_) => AttributeType::Event,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Event(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Source literal that parses back to this value under its own type
    pub fn to_literal(&self) -> String {
        match self {
            Value::String(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('"');
                for ch in s.chars() {
                    match ch {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\t' => out.push_str("\\t"),
                        other => out.push(other),
                    }
                }
                out.push('"');
                out
            }
            Value::Color(c) => c.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(v) => {
                let s = format!("{:?}", v);
                if s.contains(['.', 'e', 'E']) {
                    s
                } else {
                    format!("{}.0", s)
                }
            }
            Value::Event(name) => name.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

/// Named colors accepted by the `color` type
const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("transparent", Color::new_u8(0, 0, 0, 0)),
];

/// Look up a named color, ignoring case
pub fn named_color(name: &str) -> Option<Color> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, c)| *c)
}

fn strip_quotes(raw: &str) -> Option<&str> {
    raw.strip_prefix('"').and_then(|s| s.strip_suffix('"'))
}

fn parse_string(raw: &str) -> Result<String, &'static str> {
    let inner = match strip_quotes(raw) {
        Some(inner) if raw.len() >= 2 => inner,
        _ => return Err("expected a double-quoted string"),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                _ => return Err("unknown escape sequence"),
            },
            '"' => return Err("unescaped quote inside string"),
            other => out.push(other),
        }
    }
    Ok(out)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn strip_sign(s: &str) -> &str {
    s.strip_prefix(['+', '-']).unwrap_or(s)
}

fn parse_integer(raw: &str) -> Result<i64, &'static str> {
    if !is_digits(strip_sign(raw)) {
        return Err("expected an optionally signed sequence of decimal digits");
    }
    raw.parse::<i64>().map_err(|_| "integer out of range")
}

fn parse_float(raw: &str) -> Result<f64, &'static str> {
    let body = strip_sign(raw);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };

    if !is_digits(whole)
        || fraction.is_some_and(|f| !is_digits(f))
        || exponent.is_some_and(|e| !is_digits(strip_sign(e)))
    {
        return Err("expected digits with a decimal point or exponent");
    }
    if fraction.is_none() && exponent.is_none() {
        return Err("integer literals are not accepted as float; write e.g. '16.0'");
    }

    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err("float out of range"),
    }
}

fn parse_hex_color(hex: &str) -> Result<Color, &'static str> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err("hex colors may only contain 0-9 and a-f");
    }
    let channel = |i: usize, len: usize| -> u8 {
        let digits = &hex[i * len..(i + 1) * len];
        let value = u8::from_str_radix(digits, 16).unwrap_or(0);
        if len == 1 {
            value * 17
        } else {
            value
        }
    };
    match hex.len() {
        3 => Ok(Color::rgb(channel(0, 1), channel(1, 1), channel(2, 1))),
        6 => Ok(Color::rgb(channel(0, 2), channel(1, 2), channel(2, 2))),
        8 => Ok(Color::new_u8(
            channel(0, 2),
            channel(1, 2),
            channel(2, 2),
            channel(3, 2),
        )),
        _ => Err("hex colors need 3, 6 or 8 digits"),
    }
}

fn parse_tuple_color(inner: &str) -> Result<Color, &'static str> {
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err("color tuples need 3 or 4 components");
    }
    if parts.iter().any(|p| p.is_empty()) {
        return Err("color tuples may not have empty components");
    }

    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        let value = parse_integer(part).map_err(|_| "color channels must be integers")?;
        *slot = u8::try_from(value).map_err(|_| "color channels must be in 0 to 255")?;
    }

    let alpha = match parts.get(3) {
        Some(part) => {
            let value = parse_float(part)
                .or_else(|_| parse_integer(part).map(|i| i as f64))
                .map_err(|_| "alpha must be a number")?;
            if !(0.0..=1.0).contains(&value) {
                return Err("alpha must be in 0.0 to 1.0");
            }
            (255.0 * value).round() as u8
        }
        None => 255,
    };

    Ok(Color::new_u8(rgb[0], rgb[1], rgb[2], alpha))
}

fn parse_color(raw: &str) -> Result<Color, &'static str> {
    let text = strip_quotes(raw).unwrap_or(raw).trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex_color(hex);
    }
    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        return parse_tuple_color(inner);
    }
    named_color(text).ok_or("expected a hex color, a named color or an (r, g, b[, a]) tuple")
}

/// Identifier rule shared with the lexer: `[A-Za-z_][A-Za-z0-9_-]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn parse_event(raw: &str) -> Result<String, &'static str> {
    let name = strip_quotes(raw).unwrap_or(raw);
    if is_identifier(name) {
        Ok(name.to_string())
    } else {
        Err("expected the name of an event handler")
    }
}
