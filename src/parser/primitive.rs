use nom::branch::*;
use nom::bytes::complete::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::error::context;
use nom::Parser;

use crate::ast::LiteralValue;
use crate::result::{ParseResult, Span};

use super::identifier::kw;

pub fn literal(input: Span) -> ParseResult<LiteralValue> {
    context("literal", alt((string, number, boolean, null))).parse(input)
}

pub fn string(input: Span) -> ParseResult<LiteralValue> {
    let (input, _) = char('"')(input)?;
    let (input, content) = opt(escaped(is_not("\\\""), '\\', one_of("\"\\nrt"))).parse(input)?;
    let (input, _) = char('"')(input)?;

    let content = content.map(|s| *s.fragment()).unwrap_or("");
    Ok((input, LiteralValue::String(unescape(content))))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

pub fn number(input: Span) -> ParseResult<LiteralValue> {
    let (input, text) =
        recognize((opt(char('-')), digit1, opt((char('.'), digit1)))).parse(input)?;

    let raw = str::replace(text.fragment(), "_", "");
    let value = if raw.contains('.') {
        LiteralValue::Float(raw.parse::<f64>().unwrap_or(0.0))
    } else {
        LiteralValue::Integer(raw.parse::<i64>().unwrap_or(0))
    };
    Ok((input, value))
}

pub fn boolean(input: Span) -> ParseResult<LiteralValue> {
    alt((
        value(LiteralValue::Boolean(true), kw("true")),
        value(LiteralValue::Boolean(false), kw("false")),
    ))
    .parse(input)
}

pub fn null(input: Span) -> ParseResult<LiteralValue> {
    value(LiteralValue::Null, kw("null")).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(input: &str) -> LiteralValue {
        let (rest, value) = literal(Span::new(input)).unwrap();
        assert_eq!(*rest.fragment(), "");
        value
    }

    #[test]
    fn test_literal() {
        assert_eq!(parsed("true"), LiteralValue::Boolean(true));
        assert_eq!(parsed("false"), LiteralValue::Boolean(false));
        assert_eq!(parsed("null"), LiteralValue::Null);
        assert_eq!(parsed("123"), LiteralValue::Integer(123));
        assert_eq!(parsed("-42"), LiteralValue::Integer(-42));
        assert_eq!(parsed("1.5"), LiteralValue::Float(1.5));
        assert_eq!(parsed("\"\""), LiteralValue::String(String::new()));
        assert_eq!(
            parsed("\"a \\\"b\\\"\""),
            LiteralValue::String("a \"b\"".to_string())
        );
    }

    #[test]
    fn test_keyword_boundary() {
        // `trueish` is an identifier, not a boolean literal
        assert!(boolean(Span::new("trueish")).is_err());
    }
}
