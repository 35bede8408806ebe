//! The semantic front end: nom parsers producing the resolved tree in
//! [`crate::ast`].
//!
//! These parsers discard whitespace and comments the way a compiler does,
//! keeping only byte offsets per node. Pair the result with the raw source
//! and feed both to [`crate::lst::builder`] to recover a lossless tree.

mod comment;
mod declaration;
mod expression;
mod identifier;
mod primitive;
mod statement;
mod types;

use nom::character::complete::char;
use nom::combinator::{all_consuming, opt};
use nom::multi::{many0, separated_list1};
use nom::sequence::{preceded, terminated};
use nom::Finish;
use nom::Parser;
use nom_language::error::{VerboseError, VerboseErrorKind};

use crate::ast::{File, ImportDecl, PackageDecl, SrcRange};
use crate::error::{KaedeError, Result};
use crate::result::{ParseResult, Span};

use self::comment::span0;
use self::declaration::declaration_with_separator;
use self::identifier::{identifier, kw};

pub use self::expression::expression;
pub use self::statement::{block, statement};

/// parse a source file which is a package directive, imports and declarations
pub fn parse(name: &str, input: &str) -> Result<File> {
    let span = Span::new(input);
    match all_consuming(terminated(file, span0)).parse(span).finish() {
        Ok((_, mut file)) => {
            file.name = name.to_string();
            file.range = SrcRange::new(0, input.len());
            Ok(file)
        }
        Err(e) => Err(convert_error(e)),
    }
}

fn file(input: Span) -> ParseResult<File> {
    let (input, package) = opt(preceded(span0, package_decl)).parse(input)?;
    let (input, imports) = many0(preceded(span0, import_decl)).parse(input)?;
    let (input, declarations) =
        many0(preceded(span0, declaration_with_separator)).parse(input)?;

    Ok((
        input,
        File {
            name: String::new(),
            package,
            imports,
            declarations,
            range: SrcRange::default(),
        },
    ))
}

fn package_decl(input: Span) -> ParseResult<PackageDecl> {
    let start = input.location_offset();
    let (input, _) = kw("package")(input)?;
    let (input, _) = span0(input)?;
    let (input, name) = qualified_name(input)?;
    let end = input.location_offset();
    let (input, _) = opt(preceded(span0, char(';'))).parse(input)?;

    Ok((
        input,
        PackageDecl {
            name,
            range: SrcRange::new(start, end),
        },
    ))
}

fn import_decl(input: Span) -> ParseResult<ImportDecl> {
    let start = input.location_offset();
    let (input, _) = kw("import")(input)?;
    let (input, _) = span0(input)?;
    let (input, path) = qualified_name(input)?;
    let (input, star) = opt(preceded(
        preceded(span0, char('.')),
        preceded(span0, char('*')),
    ))
    .parse(input)?;
    let end = input.location_offset();
    let (input, _) = opt(preceded(span0, char(';'))).parse(input)?;

    Ok((
        input,
        ImportDecl {
            path,
            all_under: star.is_some(),
            range: SrcRange::new(start, end),
        },
    ))
}

fn qualified_name(input: Span) -> ParseResult<String> {
    let (input, parts) = separated_list1(
        preceded(span0, char('.')),
        preceded(span0, identifier),
    )
    .parse(input)?;

    Ok((
        input,
        parts
            .iter()
            .map(|p| *p.fragment())
            .collect::<Vec<_>>()
            .join("."),
    ))
}

fn convert_error(e: VerboseError<Span>) -> KaedeError {
    let (offset, message) = e
        .errors
        .first()
        .map(|(span, kind)| {
            let message = match kind {
                VerboseErrorKind::Context(c) => format!("expected {c}"),
                VerboseErrorKind::Char(c) => format!("expected '{c}'"),
                VerboseErrorKind::Nom(k) => format!("unexpected input ({k:?})"),
            };
            (span.location_offset(), message)
        })
        .unwrap_or((0, "unknown error".to_string()));

    KaedeError::Parse { message, offset }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Decl;

    #[test]
    fn test_parse_file() {
        let source = "package org.example\n\nimport org.other.Thing\nimport org.other.util.*\n\nclass A {\n    fun foo() {}\n}\n";
        let file = parse("a.kd", source).unwrap();

        assert_eq!(file.name, "a.kd");
        assert_eq!(file.package.as_ref().unwrap().name, "org.example");
        assert_eq!(file.imports.len(), 2);
        assert!(!file.imports[0].all_under);
        assert!(file.imports[1].all_under);
        assert_eq!(file.imports[1].path, "org.other.util");
        assert_eq!(file.declarations.len(), 1);
        assert!(matches!(file.declarations[0], Decl::Class(_)));
    }

    #[test]
    fn test_parse_without_package() {
        let file = parse("b.kd", "fun main() {}\n").unwrap();
        assert!(file.package.is_none());
        assert_eq!(file.declarations.len(), 1);
    }

    #[test]
    fn test_parse_error_offset() {
        let err = parse("broken.kd", "class A {\n    fun foo( {}\n}\n").unwrap_err();
        match err {
            KaedeError::Parse { offset, .. } => assert!(offset > 0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_comments_are_discarded() {
        let source = "// leading\nclass A /* side */ {}\n";
        let file = parse("c.kd", source).unwrap();
        assert_eq!(file.declarations.len(), 1);
    }
}
