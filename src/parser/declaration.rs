use nom::branch::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::multi::*;
use nom::sequence::*;
use nom::Parser;

use crate::ast::{
    Block, ClassDecl, ClassKind, Decl, Expr, FunctionDecl, Modifier, ModifierKind, Param,
    PropertyDecl, SrcRange,
};
use crate::result::{ParseResult, Span};

use super::comment::span0;
use super::expression::expression;
use super::identifier::{identifier, kw};
use super::statement::block;
use super::types::type_ref;

/// parse a declaration (class, function or property), including its
/// modifier list; starts at the first significant character
pub fn declaration(input: Span) -> ParseResult<Decl> {
    let start = input.location_offset();
    let (input, mods) = modifiers(input)?;
    let (input, _) = span0(input)?;

    if peek(opt(alt((kw("class"), kw("interface"))))).parse(input)?.1.is_some() {
        let (input, class) = class_decl(input, mods, start)?;
        return Ok((input, Decl::Class(class)));
    }
    if peek(opt(kw("fun"))).parse(input)?.1.is_some() {
        let (input, function) = function_decl(input, mods, start)?;
        return Ok((input, Decl::Function(function)));
    }
    if peek(opt(alt((kw("val"), kw("var"))))).parse(input)?.1.is_some() {
        let (input, property) = property_decl(input, mods, start)?;
        return Ok((input, Decl::Property(property)));
    }

    Err(nom::Err::Error(nom::error::ParseError::from_error_kind(
        input,
        nom::error::ErrorKind::Alt,
    )))
}

/// declaration with an optional trailing `;` consumed
pub fn declaration_with_separator(input: Span) -> ParseResult<Decl> {
    terminated(declaration, opt(preceded(span0, char(';')))).parse(input)
}

fn modifiers(input: Span) -> ParseResult<Vec<Modifier>> {
    many0(preceded(span0, modifier)).parse(input)
}

fn modifier(input: Span) -> ParseResult<Modifier> {
    alt((annotation, keyword_modifier)).parse(input)
}

fn keyword_modifier(input: Span) -> ParseResult<Modifier> {
    let start = input.location_offset();
    let (input, kind) = alt((
        value(ModifierKind::Public, kw("public")),
        value(ModifierKind::Private, kw("private")),
        value(ModifierKind::Protected, kw("protected")),
        value(ModifierKind::Internal, kw("internal")),
        value(ModifierKind::Open, kw("open")),
        value(ModifierKind::Final, kw("final")),
        value(ModifierKind::Abstract, kw("abstract")),
        value(ModifierKind::Sealed, kw("sealed")),
        value(ModifierKind::Override, kw("override")),
        value(ModifierKind::Data, kw("data")),
    ))
    .parse(input)?;
    let end = input.location_offset();

    Ok((
        input,
        Modifier {
            kind,
            range: SrcRange::new(start, end),
        },
    ))
}

fn annotation(input: Span) -> ParseResult<Modifier> {
    let start = input.location_offset();
    let (input, _) = char('@')(input)?;
    let (input, _) = span0(input)?;
    let (input, name) = identifier(input)?;

    let (input, args) = opt(preceded(
        preceded(span0, char('(')),
        terminated(
            separated_list0(preceded(span0, char(',')), preceded(span0, expression)),
            preceded(span0, char(')')),
        ),
    ))
    .parse(input)?;
    let end = input.location_offset();

    Ok((
        input,
        Modifier {
            kind: ModifierKind::Annotation {
                name: name.fragment().to_string(),
                args,
            },
            range: SrcRange::new(start, end),
        },
    ))
}

fn class_decl(input: Span, modifiers: Vec<Modifier>, start: usize) -> ParseResult<ClassDecl> {
    let (input, kind) = alt((
        value(ClassKind::Class, kw("class")),
        value(ClassKind::Interface, kw("interface")),
    ))
    .parse(input)?;
    let (input, _) = span0(input)?;
    let (input, name) = identifier(input)?;
    let name_end = input.location_offset();

    let (input, type_params) = opt(preceded(
        preceded(span0, char('<')),
        terminated(
            separated_list1(preceded(span0, char(',')), preceded(span0, identifier)),
            preceded(span0, char('>')),
        ),
    ))
    .parse(input)?;

    let (input, body) = opt(preceded(span0, class_body)).parse(input)?;
    let end = input.location_offset();

    let mut members = Vec::new();
    // the front end always generates a primary constructor; it has no
    // lexical analogue and must be filtered by lossless-tree construction
    members.push(Decl::Function(FunctionDecl {
        modifiers: Vec::new(),
        name: "<init>".to_string(),
        params: Vec::new(),
        return_type: None,
        body: None,
        synthetic: true,
        range: SrcRange::point(name_end),
    }));
    let has_body = body.is_some();
    members.extend(body.unwrap_or_default());

    Ok((
        input,
        ClassDecl {
            modifiers,
            kind,
            name: name.fragment().to_string(),
            type_params: type_params
                .unwrap_or_default()
                .iter()
                .map(|p| p.fragment().to_string())
                .collect(),
            members,
            has_body,
            range: SrcRange::new(start, end),
        },
    ))
}

fn class_body(input: Span) -> ParseResult<Vec<Decl>> {
    delimited(
        char('{'),
        many0(preceded(span0, declaration_with_separator)),
        preceded(span0, char('}')),
    )
    .parse(input)
}

fn function_decl(
    input: Span,
    modifiers: Vec<Modifier>,
    start: usize,
) -> ParseResult<FunctionDecl> {
    let (input, _) = kw("fun")(input)?;
    let (input, _) = span0(input)?;
    let (input, name) = identifier(input)?;

    let (input, _) = preceded(span0, char('(')).parse(input)?;
    let (input, params) =
        separated_list0(preceded(span0, char(',')), preceded(span0, param)).parse(input)?;
    let (input, _) = span0(input)?;
    let (input, _) = char(')')(input)?;

    let (input, return_type) = opt(preceded(
        preceded(span0, char(':')),
        preceded(span0, type_ref),
    ))
    .parse(input)?;

    let (input, body) = opt(preceded(span0, block)).parse(input)?;
    let end = input.location_offset();

    Ok((
        input,
        FunctionDecl {
            modifiers,
            name: name.fragment().to_string(),
            params,
            return_type,
            body,
            synthetic: false,
            range: SrcRange::new(start, end),
        },
    ))
}

fn param(input: Span) -> ParseResult<Param> {
    let start = input.location_offset();
    let (input, name) = identifier(input)?;
    let (input, _) = preceded(span0, char(':')).parse(input)?;
    let (input, _) = span0(input)?;
    let (input, ty) = type_ref(input)?;

    let (input, default_value) = opt(preceded(
        preceded(span0, char('=')),
        preceded(span0, expression),
    ))
    .parse(input)?;
    let end = input.location_offset();

    Ok((
        input,
        Param {
            name: name.fragment().to_string(),
            ty,
            default_value,
            range: SrcRange::new(start, end),
        },
    ))
}

pub fn property_decl(
    input: Span,
    modifiers: Vec<Modifier>,
    start: usize,
) -> ParseResult<PropertyDecl> {
    let (input, mutable) =
        alt((value(false, kw("val")), value(true, kw("var")))).parse(input)?;
    let (input, _) = span0(input)?;
    let (input, name) = identifier(input)?;

    let (input, ty) = opt(preceded(
        preceded(span0, char(':')),
        preceded(span0, type_ref),
    ))
    .parse(input)?;

    let (input, initializer): (Span, Option<Expr>) = opt(preceded(
        preceded(span0, char('=')),
        preceded(span0, expression),
    ))
    .parse(input)?;
    let end = input.location_offset();

    Ok((
        input,
        PropertyDecl {
            modifiers,
            mutable,
            name: name.fragment().to_string(),
            ty,
            initializer,
            range: SrcRange::new(start, end),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(input: &str) -> Decl {
        let (rest, decl) = declaration(Span::new(input)).unwrap();
        assert_eq!(*rest.fragment(), "", "unparsed input left over");
        decl
    }

    #[test]
    fn test_class_with_members() {
        match parsed("class A {\n    fun foo() {}\n}") {
            Decl::Class(c) => {
                assert_eq!(c.name, "A");
                assert_eq!(c.kind, ClassKind::Class);
                assert!(c.has_body);
                // synthetic primary constructor plus the declared function
                assert_eq!(c.members.len(), 2);
                assert!(c.members[0].is_synthetic());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_class_without_body() {
        match parsed("class A") {
            Decl::Class(c) => {
                assert!(!c.has_body);
                assert_eq!(c.members.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_modifiers_and_annotations() {
        match parsed("@Suppress(\"all\") private open class A {}") {
            Decl::Class(c) => {
                assert_eq!(c.modifiers.len(), 3);
                assert!(matches!(
                    c.modifiers[0].kind,
                    ModifierKind::Annotation { .. }
                ));
                assert_eq!(c.modifiers[1].kind, ModifierKind::Private);
                assert_eq!(c.modifiers[2].kind, ModifierKind::Open);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_function() {
        match parsed("fun add(a: Int, b: Int = 0): Int {\n    return a + b\n}") {
            Decl::Function(f) => {
                assert_eq!(f.name, "add");
                assert_eq!(f.params.len(), 2);
                assert!(f.params[1].default_value.is_some());
                assert_eq!(f.return_type.as_ref().unwrap().name, "Int");
                assert!(f.body.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_interface_function_without_body() {
        match parsed("interface I {\n    fun foo()\n}") {
            Decl::Class(c) => {
                assert_eq!(c.kind, ClassKind::Interface);
                match &c.members[1] {
                    Decl::Function(f) => assert!(f.body.is_none()),
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
