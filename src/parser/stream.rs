//! Lazy, restartable stream of root declarations
//!
//! The source is tokenized once up front; each call to `next` then hands the
//! tokens of a single root declaration to the chumsky grammar. Brace depth is
//! measured on the token list before parsing so that pathological nesting is
//! rejected without recursing into it.

use chumsky::input::Stream;
use chumsky::prelude::*;
use log::{debug, trace};

use crate::error::ParseError;
use crate::parser::ast::{ComponentDecl, Span, Spanned};
use crate::parser::grammar::declaration_parser;
use crate::parser::lexer::{lex, Token};

/// Default limit on how deeply declarations may nest
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Characters of an unrecognized token quoted in its error message
const UNRECOGNIZED_QUOTE_LIMIT: usize = 20;

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Maximum nesting depth of declarations; a root declaration is depth 1
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Iterator over the root declarations of a document.
///
/// Yields `Ok` for every well-formed root declaration in order. At the first
/// syntax error it yields that error once and then ends. `restart` rewinds to
/// the first declaration; clones iterate independently.
#[derive(Debug, Clone)]
pub struct Declarations<'src> {
    source: &'src str,
    /// Tokens up to (not including) the first unrecognized character
    tokens: Vec<(Token, Span)>,
    /// Span of the first unrecognized character, if any
    lex_error: Option<Span>,
    config: ParseConfig,
    cursor: usize,
    finished: bool,
}

impl<'src> Declarations<'src> {
    pub fn new(source: &'src str, config: ParseConfig) -> Self {
        let mut tokens = Vec::new();
        let mut lex_error = None;
        for result in lex(source) {
            match result {
                Ok(token) => tokens.push(token),
                Err(span) => {
                    lex_error = Some(span);
                    break;
                }
            }
        }
        trace!(tokens = tokens.len(); "Tokenized source");

        Self {
            source,
            tokens,
            lex_error,
            config,
            cursor: 0,
            finished: false,
        }
    }

    /// Rewind to the first declaration
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.finished = false;
    }

    /// The source text being parsed
    pub fn source(&self) -> &'src str {
        self.source
    }

    fn unrecognized(&self, span: &Span) -> ParseError {
        let text = self.source.get(span.clone()).unwrap_or_default();
        let first_line = text.lines().next().unwrap_or_default();
        let mut quoted: String = first_line.chars().take(UNRECOGNIZED_QUOTE_LIMIT).collect();
        if quoted.len() < text.len() {
            quoted.push_str("...");
        }
        ParseError::syntax(span.clone(), format!("Unrecognized token '{}'", quoted))
    }

    /// Find the token range of the next root declaration.
    ///
    /// The range ends after the brace closing the first opened block. If the
    /// block never closes the range runs to the end of the tokens and the
    /// grammar reports the missing brace.
    fn next_extent(&self) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        for (i, (token, span)) in self.tokens.iter().enumerate().skip(self.cursor) {
            match token {
                Token::BraceOpen => {
                    depth += 1;
                    if depth > self.config.max_depth {
                        return Err(ParseError::syntax(
                            span.clone(),
                            format!(
                                "Declarations nested deeper than the maximum of {}",
                                self.config.max_depth
                            ),
                        ));
                    }
                }
                Token::BraceClose => {
                    if depth <= 1 {
                        return Ok(i + 1);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        Ok(self.tokens.len())
    }

    fn parse_range(&self, stop: usize) -> Result<Spanned<ComponentDecl>, ParseError> {
        let reaches_end = stop == self.tokens.len();
        let slice = &self.tokens[self.cursor..stop];

        let eoi = match (&self.lex_error, reaches_end) {
            (Some(lex_span), true) => lex_span.start..lex_span.start,
            (None, true) => self.source.len()..self.source.len(),
            _ => slice
                .last()
                .map(|(_, s)| s.end..s.end)
                .unwrap_or(self.source.len()..self.source.len()),
        };

        let token_iter = slice.iter().cloned().map(|(tok, span)| (tok, span.into()));
        let token_stream =
            Stream::from_iter(token_iter).map(eoi.clone().into(), |(t, s): (_, _)| (t, s));

        declaration_parser()
            .then_ignore(end())
            .parse(token_stream)
            .into_result()
            .map_err(|errs| {
                // An unrecognized character cuts the token list short, so a
                // failure running into it is really about that character.
                match (&self.lex_error, reaches_end) {
                    (Some(lex_span), true) => self.unrecognized(lex_span),
                    _ => errs
                        .into_iter()
                        .next()
                        .map(ParseError::from)
                        .unwrap_or_else(|| ParseError::syntax(eoi.clone(), "Invalid declaration")),
                }
            })
    }
}

impl Iterator for Declarations<'_> {
    type Item = Result<Spanned<ComponentDecl>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.cursor >= self.tokens.len() {
            self.finished = true;
            return self.lex_error.as_ref().map(|span| Err(self.unrecognized(span)));
        }

        let result = self
            .next_extent()
            .and_then(|stop| self.parse_range(stop).map(|decl| (decl, stop)));

        match result {
            Ok((decl, stop)) => {
                let span = decl.span.clone();
                debug!(kind = decl.node.kind.node.as_str(), span:?; "Parsed declaration");
                self.cursor = stop;
                Some(Ok(decl))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
