use nom::branch::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::multi::*;
use nom::sequence::*;
use nom::Parser;

use crate::ast::{Block, IfStmt, ReturnStmt, SrcRange, Stmt};
use crate::result::{ParseResult, Span};

use super::comment::{span0, span0_inline};
use super::declaration::property_decl;
use super::expression::expression;
use super::identifier::kw;

/// parse a statement; starts at the first significant character
pub fn statement(input: Span) -> ParseResult<Stmt> {
    if peek(opt(alt((kw("val"), kw("var"))))).parse(input)?.1.is_some() {
        let (rest, property) = property_decl(input, Vec::new(), input.location_offset())?;
        return Ok((rest, Stmt::Property(property)));
    }
    if peek(opt(kw("return"))).parse(input)?.1.is_some() {
        return return_stmt(input);
    }
    if peek(opt(kw("if"))).parse(input)?.1.is_some() {
        return if_stmt(input);
    }
    if input.fragment().starts_with('{') {
        let (rest, block) = block(input)?;
        return Ok((rest, Stmt::Block(block)));
    }
    let (rest, expr) = expression(input)?;
    Ok((rest, Stmt::Expr(expr)))
}

/// statement with an optional trailing `;` consumed
pub fn statement_with_separator(input: Span) -> ParseResult<Stmt> {
    terminated(statement, opt(preceded(span0, char(';')))).parse(input)
}

/// parse a braced block `{ ... }`
pub fn block(input: Span) -> ParseResult<Block> {
    let start = input.location_offset();
    let (input, _) = char('{')(input)?;
    let (input, statements) = many0(preceded(span0, statement_with_separator)).parse(input)?;
    let (input, _) = span0(input)?;
    let (input, _) = char('}')(input)?;
    let end = input.location_offset();

    Ok((
        input,
        Block {
            statements,
            range: SrcRange::new(start, end),
        },
    ))
}

fn return_stmt(input: Span) -> ParseResult<Stmt> {
    let start = input.location_offset();
    let (input, _) = kw("return")(input)?;
    // the returned expression must start on the same line
    let (input, expr) = opt(preceded(span0_inline, expression)).parse(input)?;
    let end = input.location_offset();

    Ok((
        input,
        Stmt::Return(ReturnStmt {
            expr,
            range: SrcRange::new(start, end),
        }),
    ))
}

fn if_stmt(input: Span) -> ParseResult<Stmt> {
    let start = input.location_offset();
    let (input, _) = kw("if")(input)?;
    let (input, _) = span0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, _) = span0(input)?;
    let (input, condition) = expression(input)?;
    let (input, _) = span0(input)?;
    let (input, _) = char(')')(input)?;

    let (input, _) = span0(input)?;
    let (input, then_branch) = statement(input)?;
    let (input, _) = opt(preceded(span0, char(';'))).parse(input)?;

    let (input, else_branch) = opt(preceded(
        preceded(span0, kw("else")),
        preceded(span0, statement),
    ))
    .parse(input)?;
    let end = input.location_offset();

    Ok((
        input,
        Stmt::If(Box::new(IfStmt {
            condition,
            then_branch,
            else_branch,
            range: SrcRange::new(start, end),
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    fn parsed(input: &str) -> Stmt {
        let (rest, stmt) = statement(Span::new(input)).unwrap();
        assert_eq!(*rest.fragment(), "", "unparsed input left over");
        stmt
    }

    #[test]
    fn test_property_stmt() {
        match parsed("val x: Int = 1") {
            Stmt::Property(p) => {
                assert!(!p.mutable);
                assert_eq!(p.name, "x");
                assert_eq!(p.ty.as_ref().unwrap().name, "Int");
                assert!(p.initializer.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_return_stmt() {
        match parsed("return 1 + 2") {
            Stmt::Return(r) => assert!(r.expr.is_some()),
            other => panic!("unexpected {other:?}"),
        }
        // a bare return does not swallow the next line
        let (rest, stmt) = statement(Span::new("return\nfoo()")).unwrap();
        assert!(matches!(stmt, Stmt::Return(ReturnStmt { expr: None, .. })));
        assert_eq!(*rest.fragment(), "\nfoo()");
    }

    #[test]
    fn test_if_else() {
        match parsed("if (a == b) foo() else { bar() }") {
            Stmt::If(i) => {
                assert!(matches!(i.condition, Expr::Binary(_)));
                assert!(matches!(i.then_branch, Stmt::Expr(_)));
                assert!(matches!(i.else_branch, Some(Stmt::Block(_))));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_block() {
        let (_, block) = block(Span::new("{\n    foo();\n    bar()\n}")).unwrap();
        assert_eq!(block.statements.len(), 2);
    }
}
