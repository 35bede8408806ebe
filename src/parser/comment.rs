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

/// parse a comment, either `// ...` or `/* ... */`
pub fn comment(input: Span) -> ParseResult<Span> {
    alt((comment_single, comment_multi)).parse(input)
}

/// parse comment like `// C++/EOL-style comments`, content without `//`
pub fn comment_single(input: Span) -> ParseResult<Span> {
    preceded(tag("//"), take_while(|c| c != '\n' && c != '\r')).parse(input)
}

/// parse comment like `/* C-style comments */`, content without the markers.
/// Block comments nest: `/* outer /* inner */ outer */` is one comment.
pub fn comment_multi(input: Span) -> ParseResult<Span> {
    let (input, _) = tag("/*")(input)?;

    let bytes = input.fragment().as_bytes();
    let mut depth = 1usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            depth += 1;
            i += 2;
        } else if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
            depth -= 1;
            if depth == 0 {
                break;
            }
            i += 2;
        } else {
            i += 1;
        }
    }

    if depth != 0 {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::TakeUntil,
        )));
    }

    let (input, content) = take(i)(input)?;
    let (input, _) = tag("*/")(input)?;
    Ok((input, content))
}

/// match contiguous comments or whitespaces, which can be multiple lines
pub fn span0(input: Span) -> ParseResult<()> {
    value(
        (),
        many0(alt((value((), comment), value((), multispace1)))),
    )
    .parse(input)
}

/// match contiguous comments or whitespaces, which is only one line
pub fn span0_inline(input: Span) -> ParseResult<()> {
    value((), many0(alt((value((), comment), value((), space1))))).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(input: &str, parser: fn(Span) -> ParseResult<Span>) -> (String, String) {
        let (rest, content) = parser(Span::new(input)).unwrap();
        (content.fragment().to_string(), rest.fragment().to_string())
    }

    #[test]
    fn test_comment_single() {
        assert_eq!(
            ok("// comment\nnext", comment_single),
            (" comment".to_string(), "\nnext".to_string())
        );
        assert_eq!(ok("//", comment_single), (String::new(), String::new()));
        // CR stays outside the comment content
        assert_eq!(
            ok("// c\r\n", comment_single),
            (" c".to_string(), "\r\n".to_string())
        );
    }

    #[test]
    fn test_comment_multi() {
        assert_eq!(
            ok("/* comment */x", comment_multi),
            (" comment ".to_string(), "x".to_string())
        );
        assert_eq!(ok("/* \n */", comment_multi), (" \n ".to_string(), String::new()));
        // nested
        assert_eq!(
            ok("/* a /* b */ c */x", comment_multi),
            (" a /* b */ c ".to_string(), "x".to_string())
        );
        assert!(comment_multi(Span::new("/* unterminated")).is_err());
    }

    #[test]
    fn test_span0() {
        for input in ["", " ", "\t\n", "// c\n  ", "/* a */ // b", "  /* a\nb */\n"] {
            let (rest, _) = span0(Span::new(input)).unwrap();
            assert_eq!(*rest.fragment(), "", "span0 should consume {input:?}");
        }
        let (rest, _) = span0(Span::new(" // c\nnext")).unwrap();
        assert_eq!(*rest.fragment(), "next");
    }
}
