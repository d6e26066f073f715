//! Declaration grammar using chumsky

use chumsky::input::ValueInput;
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Body item of a declaration, split into attributes and children afterwards
#[derive(Debug, Clone)]
enum Item {
    Attribute(Spanned<AttributeAssignment>),
    Child(Spanned<ComponentDecl>),
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

/// Parser for one (possibly nested) component declaration
pub(crate) fn declaration_parser<'a, I>(
) -> impl Parser<'a, I, Spanned<ComponentDecl>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    // Raw values keep their literal text; tuples are rebuilt with normalized
    // separators since the token stream no longer has the source slice.
    let raw_value = recursive(|value| {
        let scalar = select! {
            Token::String(s) => s,
            Token::Number(n) => n,
            Token::HexColor(c) => c,
            Token::Ident(s) => s,
        };

        let tuple = value
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .at_least(1)
            .collect::<Vec<String>>()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
            .map(|items: Vec<String>| format!("({})", items.join(", ")));

        choice((scalar, tuple))
    })
    .map_with(|text, e| Spanned::new(RawValue::new(text), span_range(&e.span())));

    let attribute = identifier
        .clone()
        .then_ignore(just(Token::Colon))
        .then(raw_value)
        .then_ignore(just(Token::Semicolon))
        .map_with(|(name, value), e| {
            Spanned::new(AttributeAssignment { name, value }, span_range(&e.span()))
        });

    let class = just(Token::Dot).ignore_then(identifier.clone());

    recursive(|declaration| {
        // Attributes are tried first: `name:` and `kind {` share a leading identifier
        let item = choice((
            attribute.clone().map(Item::Attribute),
            declaration.map(Item::Child),
        ));

        identifier
            .clone()
            .then(class.clone().or_not())
            .then(
                item.repeated()
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::BraceOpen), just(Token::BraceClose)),
            )
            .map_with(|((kind, class), items), e| {
                let mut attributes = Vec::new();
                let mut children = Vec::new();
                for item in items {
                    match item {
                        Item::Attribute(a) => attributes.push(a),
                        Item::Child(c) => children.push(c),
                    }
                }
                Spanned::new(
                    ComponentDecl {
                        kind,
                        class,
                        attributes,
                        children,
                    },
                    span_range(&e.span()),
                )
            })
            .boxed()
    })
}
