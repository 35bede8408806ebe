use nom::character::complete::*;
use nom::combinator::*;
use nom::multi::*;
use nom::sequence::*;
use nom::Parser;

use crate::ast::{SrcRange, TypeRef};
use crate::result::{ParseResult, Span};

use super::comment::span0;
use super::identifier::identifier;

/// parse a type reference like `Int`, `List<Int>`, `Map<String, List<Int>>`.
/// Starts at the first significant character; the caller eats leading trivia.
pub fn type_ref(input: Span) -> ParseResult<TypeRef> {
    let start = input.location_offset();
    let (input, name) = identifier(input)?;

    let (input, type_args) = opt(preceded(
        preceded(span0, char('<')),
        terminated(
            separated_list1(
                preceded(span0, char(',')),
                preceded(span0, type_ref),
            ),
            preceded(span0, char('>')),
        ),
    ))
    .parse(input)?;

    let end = input.location_offset();
    Ok((
        input,
        TypeRef {
            name: name.fragment().to_string(),
            type_args: type_args.unwrap_or_default(),
            range: SrcRange::new(start, end),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref() {
        let (rest, ty) = type_ref(Span::new("Int)")).unwrap();
        assert_eq!(*rest.fragment(), ")");
        assert_eq!(ty.name, "Int");
        assert!(ty.type_args.is_empty());
        assert_eq!(ty.range, SrcRange::new(0, 3));
    }

    #[test]
    fn test_type_ref_generic() {
        let (rest, ty) = type_ref(Span::new("Map<String, List<Int>> ")).unwrap();
        assert_eq!(*rest.fragment(), " ");
        assert_eq!(ty.name, "Map");
        assert_eq!(ty.type_args.len(), 2);
        assert_eq!(ty.type_args[1].name, "List");
        assert_eq!(ty.type_args[1].type_args[0].name, "Int");
    }
}
