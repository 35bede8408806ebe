use nom::branch::*;
use nom::bytes::complete::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::multi::*;
use nom::sequence::*;
use nom::Parser;

use crate::ast::{
    BinaryExpr, BinaryOp, CallExpr, Expr, FieldAccessExpr, LambdaExpr, SrcRange,
};
use crate::result::{ParseResult, Span};

use super::comment::span0;
use super::identifier::identifier;
use super::primitive::literal;
use super::statement::statement_with_separator;

/// parse an expression; starts at the first significant character
pub fn expression(input: Span) -> ParseResult<Expr> {
    binary_or(input)
}

fn binary_or(input: Span) -> ParseResult<Expr> {
    binary_tier(input, |i| value(BinaryOp::Or, tag("||")).parse(i), binary_and)
}

fn binary_and(input: Span) -> ParseResult<Expr> {
    binary_tier(input, |i| value(BinaryOp::And, tag("&&")).parse(i), equality)
}

fn equality(input: Span) -> ParseResult<Expr> {
    binary_tier(
        input,
        |i| {
            alt((
                value(BinaryOp::Equal, tag("==")),
                value(BinaryOp::NotEqual, tag("!=")),
            ))
            .parse(i)
        },
        comparison,
    )
}

fn comparison(input: Span) -> ParseResult<Expr> {
    binary_tier(
        input,
        |i| {
            alt((
                value(BinaryOp::LessOrEqual, tag("<=")),
                value(BinaryOp::GreaterOrEqual, tag(">=")),
                value(BinaryOp::Less, tag("<")),
                value(BinaryOp::Greater, tag(">")),
            ))
            .parse(i)
        },
        additive,
    )
}

fn additive(input: Span) -> ParseResult<Expr> {
    binary_tier(
        input,
        |i| {
            alt((
                value(BinaryOp::Add, tag("+")),
                value(BinaryOp::Sub, tag("-")),
            ))
            .parse(i)
        },
        multiplicative,
    )
}

fn multiplicative(input: Span) -> ParseResult<Expr> {
    binary_tier(
        input,
        |i| {
            alt((
                value(BinaryOp::Mul, tag("*")),
                value(BinaryOp::Div, tag("/")),
            ))
            .parse(i)
        },
        postfix,
    )
}

/// left-associative fold of one precedence tier
fn binary_tier<'a>(
    input: Span<'a>,
    mut op: impl FnMut(Span<'a>) -> ParseResult<'a, BinaryOp>,
    mut operand: impl FnMut(Span<'a>) -> ParseResult<'a, Expr>,
) -> ParseResult<'a, Expr> {
    let (mut input, mut left) = operand(input)?;
    loop {
        let probe = opt(preceded(span0, |i| op(i))).parse(input)?;
        let Some(op_kind) = probe.1 else {
            return Ok((input, left));
        };
        let (rest, _) = span0(probe.0)?;
        let (rest, right) = operand(rest)?;
        let range = SrcRange::new(left.range().start, right.range().end);
        left = Expr::Binary(Box::new(BinaryExpr {
            left,
            op: op_kind,
            right,
            range,
        }));
        input = rest;
    }
}

/// postfix chain: field accesses and method calls, e.g. `a.b.c(1).d()`
fn postfix(input: Span) -> ParseResult<Expr> {
    let (mut input, mut expr) = primary(input)?;
    loop {
        let (rest, dot) = opt(preceded(span0, char('.'))).parse(input)?;
        if dot.is_none() {
            return Ok((input, expr));
        }
        let (rest, _) = span0(rest)?;
        let (rest, name) = identifier(rest)?;
        let (rest, args) = opt(call_args).parse(rest)?;

        let start = expr.range().start;
        let end = rest.location_offset();
        expr = match args {
            Some(args) => Expr::Call(Box::new(CallExpr {
                receiver: Some(expr),
                name: name.fragment().to_string(),
                args,
                range: SrcRange::new(start, end),
            })),
            None => Expr::FieldAccess(Box::new(FieldAccessExpr {
                target: expr,
                name: name.fragment().to_string(),
                range: SrcRange::new(start, end),
            })),
        };
        input = rest;
    }
}

fn primary(input: Span) -> ParseResult<Expr> {
    alt((literal_expr, paren_expr, lambda_expr, name_or_call)).parse(input)
}

fn literal_expr(input: Span) -> ParseResult<Expr> {
    let start = input.location_offset();
    let (input, value) = literal(input)?;
    let end = input.location_offset();
    Ok((
        input,
        Expr::Literal {
            value,
            range: SrcRange::new(start, end),
        },
    ))
}

fn paren_expr(input: Span) -> ParseResult<Expr> {
    let start = input.location_offset();
    let (input, _) = char('(')(input)?;
    let (input, _) = span0(input)?;
    let (input, inner) = expression(input)?;
    let (input, _) = span0(input)?;
    let (input, _) = char(')')(input)?;
    let end = input.location_offset();
    Ok((
        input,
        Expr::Paren {
            inner: Box::new(inner),
            range: SrcRange::new(start, end),
        },
    ))
}

fn name_or_call(input: Span) -> ParseResult<Expr> {
    let start = input.location_offset();
    let (input, name) = identifier(input)?;
    let (input, args) = opt(call_args).parse(input)?;
    let end = input.location_offset();

    let expr = match args {
        Some(args) => Expr::Call(Box::new(CallExpr {
            receiver: None,
            name: name.fragment().to_string(),
            args,
            range: SrcRange::new(start, end),
        })),
        None => Expr::Name {
            name: name.fragment().to_string(),
            range: SrcRange::new(start, end),
        },
    };
    Ok((input, expr))
}

/// argument list of a call. Only inline space is allowed before the opening
/// parenthesis so that a parenthesized expression on the next line is not
/// glued onto the preceding name.
fn call_args(input: Span) -> ParseResult<Vec<Expr>> {
    let (input, _) = preceded(space0, char('(')).parse(input)?;
    let (input, args) = separated_list0(
        preceded(span0, char(',')),
        preceded(span0, expression),
    )
    .parse(input)?;
    let (input, _) = span0(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, args))
}

/// lambda expression `{ a, b -> ... }` or `{ ... }`
fn lambda_expr(input: Span) -> ParseResult<Expr> {
    let start = input.location_offset();
    let (input, _) = char('{')(input)?;

    let (input, params) = opt(terminated(
        separated_list1(
            preceded(span0, char(',')),
            preceded(span0, identifier),
        ),
        preceded(span0, tag("->")),
    ))
    .parse(input)?;

    let (input, statements) = many0(preceded(span0, statement_with_separator)).parse(input)?;
    let (input, _) = span0(input)?;
    let (input, _) = char('}')(input)?;
    let end = input.location_offset();

    Ok((
        input,
        Expr::Lambda(Box::new(LambdaExpr {
            params: params
                .unwrap_or_default()
                .iter()
                .map(|p| p.fragment().to_string())
                .collect(),
            statements,
            range: SrcRange::new(start, end),
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LiteralValue;

    fn parsed(input: &str) -> Expr {
        let (rest, expr) = expression(Span::new(input)).unwrap();
        assert_eq!(*rest.fragment(), "", "unparsed input left over");
        expr
    }

    #[test]
    fn test_literal_expr() {
        match parsed("42") {
            Expr::Literal { value, range } => {
                assert_eq!(value, LiteralValue::Integer(42));
                assert_eq!(range, SrcRange::new(0, 2));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_call_chain() {
        match parsed("a.b(1).c") {
            Expr::FieldAccess(fa) => {
                assert_eq!(fa.name, "c");
                match &fa.target {
                    Expr::Call(call) => {
                        assert_eq!(call.name, "b");
                        assert_eq!(call.args.len(), 1);
                        assert!(call.receiver.is_some());
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_chain_across_lines() {
        match parsed("builder\n    .build()") {
            Expr::Call(call) => assert_eq!(call.name, "build"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_binary_precedence() {
        match parsed("1 + 2 * 3") {
            Expr::Binary(b) => {
                assert_eq!(b.op, BinaryOp::Add);
                assert!(matches!(b.right, Expr::Binary(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_lambda() {
        match parsed("{ x -> print(x) }") {
            Expr::Lambda(l) => {
                assert_eq!(l.params, vec!["x".to_string()]);
                assert_eq!(l.statements.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        match parsed("{ print(1) }") {
            Expr::Lambda(l) => assert!(l.params.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_no_call_across_newline() {
        // `foo` followed by a parenthesized expression on the next line must
        // stay a bare name
        let (rest, expr) = expression(Span::new("foo\n(1)")).unwrap();
        assert!(matches!(expr, Expr::Name { .. }));
        assert_eq!(*rest.fragment(), "\n(1)");
    }
}
