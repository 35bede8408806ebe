use nom::branch::*;
use nom::bytes::complete::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::error::{ErrorKind, ParseError};
use nom::multi::*;
use nom::sequence::*;
use nom::Parser;
use nom_language::error::VerboseError;

use crate::result::{ParseResult, Span};

/// Hard keywords; never valid as identifiers.
const RESERVED: &[&str] = &[
    "package", "import", "class", "interface", "fun", "val", "var", "if", "else", "return",
    "true", "false", "null",
];

pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn identifier(input: Span) -> ParseResult<Span> {
    let (rest, ident) = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)?;

    if RESERVED.contains(ident.fragment()) {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::Verify,
        )));
    }
    Ok((rest, ident))
}

/// match `word` only when it is not a prefix of a longer identifier
pub fn kw<'a>(word: &'static str) -> impl FnMut(Span<'a>) -> ParseResult<'a, Span<'a>> {
    move |input| terminated(tag(word), not(satisfy(is_ident_char))).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        let (rest, ident) = identifier(Span::new("foo_1 bar")).unwrap();
        assert_eq!(*ident.fragment(), "foo_1");
        assert_eq!(*rest.fragment(), " bar");

        // keywords are rejected, but a keyword prefix is fine
        assert!(identifier(Span::new("return")).is_err());
        let (_, ident) = identifier(Span::new("returnValue")).unwrap();
        assert_eq!(*ident.fragment(), "returnValue");
    }

    #[test]
    fn test_kw() {
        assert!(kw("if")(Span::new("if (x)")).is_ok());
        assert!(kw("if")(Span::new("ifx")).is_err());
        assert!(kw("fun")(Span::new("fun")).is_ok());
    }
}
