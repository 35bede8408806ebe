//! Structural re-indentation of a lossless tree.
//!
//! One depth-first pass recomputes the leading whitespace of every line from
//! block nesting depth, continuation rules for wrapped constructs, and the
//! tab/space policy, rewriting only `Space` values. The engine never fails:
//! it is not a validator, and all shift arithmetic clamps instead of
//! panicking so adversarial whitespace cannot corrupt anything beyond the
//! line it sits on.

use log::debug;

use super::marker::Marker;
use super::node::*;
use super::printer;
use super::space::Space;
use super::style::IndentStyle;
use super::visitor::FileVisitor;

/// Per-statement indentation context: the statement's own block indent and
/// the column continuation lines inside it take. Continuation frames do not
/// stack; a wrapped construct inside another wrapped construct reuses the
/// statement's single continuation column, which keeps repeated passes
/// idempotent.
#[derive(Debug, Clone, Copy)]
struct Ctx {
    indent: usize,
    cont: usize,
}

pub struct IndentVisitor<'a> {
    style: &'a IndentStyle,
}

impl<'a> IndentVisitor<'a> {
    pub fn new(style: &'a IndentStyle) -> Self {
        Self { style }
    }

    fn ctx(&self, indent: usize) -> Ctx {
        Ctx {
            indent,
            cont: indent + self.style.continuation_indent_size,
        }
    }

    // ------------------------------------------------------------------
    // tree walk

    fn format_file(&self, file: SourceFile) -> SourceFile {
        debug!("re-indenting {}", file.name);
        let SourceFile {
            id,
            markers,
            name,
            package,
            imports,
            statements,
            eof,
        } = file;

        SourceFile {
            id,
            markers,
            name,
            package: package.map(|p| {
                let RightPadded {
                    element,
                    after,
                    markers,
                } = p;
                RightPadded {
                    element: PackageDecl {
                        prefix: self.indent_to(&element.prefix, 0),
                        ..element
                    },
                    after,
                    markers,
                }
            }),
            imports: imports
                .into_iter()
                .map(|i| {
                    let RightPadded {
                        element,
                        after,
                        markers,
                    } = i;
                    RightPadded {
                        element: ImportDecl {
                            prefix: self.indent_to(&element.prefix, 0),
                            ..element
                        },
                        after,
                        markers,
                    }
                })
                .collect(),
            statements: self.format_statements(statements, 0),
            eof,
        }
    }

    fn format_statements(
        &self,
        statements: Vec<RightPadded<Stmt>>,
        indent: usize,
    ) -> Vec<RightPadded<Stmt>> {
        statements
            .into_iter()
            .map(|s| {
                let RightPadded {
                    element,
                    after,
                    markers,
                } = s;
                RightPadded {
                    element: self.format_stmt(element, indent),
                    after,
                    markers,
                }
            })
            .collect()
    }

    fn format_stmt(&self, stmt: Stmt, indent: usize) -> Stmt {
        match stmt {
            Stmt::Class(c) => Stmt::Class(self.format_class(c, indent)),
            Stmt::Function(f) => Stmt::Function(self.format_function(f, indent)),
            Stmt::Variable(v) => Stmt::Variable(self.format_variable(v, indent)),
            Stmt::Expr(e) => Stmt::Expr(self.format_expr(e, indent, self.ctx(indent))),
            Stmt::Return(r) => Stmt::Return(self.format_return(r, indent)),
            Stmt::If(i) => Stmt::If(Box::new(self.format_if(*i, indent))),
            Stmt::Block(b) => Stmt::Block(self.format_block(b, indent)),
        }
    }

    fn format_class(&self, class: ClassDecl, indent: usize) -> ClassDecl {
        let ctx = self.ctx(indent);
        let ClassDecl {
            id,
            prefix,
            markers,
            modifiers,
            kind,
            name,
            type_params,
            body,
        } = class;

        ClassDecl {
            id,
            prefix: self.indent_to(&prefix, indent),
            markers,
            modifiers: self.format_modifiers(modifiers, indent, ctx),
            kind: ClassKind {
                prefix: self.indent_to(&kind.prefix, indent),
                kind: kind.kind,
            },
            name: self.format_identifier(name, ctx.cont),
            type_params: type_params.map(|params| Container {
                before: self.indent_to(&params.before, ctx.cont),
                elements: params
                    .elements
                    .into_iter()
                    .map(|p| {
                        let RightPadded {
                            element,
                            after,
                            markers,
                        } = p;
                        RightPadded {
                            element: TypeParam {
                                prefix: self.indent_to(&element.prefix, ctx.cont),
                                ..element
                            },
                            after: self.indent_to(&after, ctx.cont),
                            markers,
                        }
                    })
                    .collect(),
            }),
            body: self.format_block(body, indent),
        }
    }

    fn format_identifier(&self, ident: Identifier, column: usize) -> Identifier {
        Identifier {
            prefix: self.indent_to(&ident.prefix, column),
            ..ident
        }
    }

    fn format_modifiers(
        &self,
        modifiers: Vec<DeclModifier>,
        indent: usize,
        ctx: Ctx,
    ) -> Vec<DeclModifier> {
        modifiers
            .into_iter()
            .map(|modifier| match modifier {
                DeclModifier::Keyword(m) => DeclModifier::Keyword(Modifier {
                    prefix: self.indent_to(&m.prefix, indent),
                    ..m
                }),
                DeclModifier::Annotation(a) => {
                    let Annotation {
                        id,
                        prefix,
                        markers,
                        name,
                        args,
                    } = a;
                    DeclModifier::Annotation(Annotation {
                        id,
                        prefix: self.indent_to(&prefix, indent),
                        markers,
                        name,
                        args: args.map(|args| self.format_expr_container(args, ctx)),
                    })
                }
            })
            .collect()
    }

    fn format_function(&self, function: FunctionDecl, indent: usize) -> FunctionDecl {
        let ctx = self.ctx(indent);
        let FunctionDecl {
            id,
            prefix,
            markers,
            modifiers,
            kw,
            name,
            params,
            return_type,
            body,
        } = function;

        // settle everything left of the parameter list first; wrapped
        // parameters may align on the column right after the `(`
        let prefix = self.indent_to(&prefix, indent);
        let modifiers = self.format_modifiers(modifiers, indent, ctx);
        let kw = self.indent_to(&kw, indent);
        let name = self.format_identifier(name, ctx.cont);

        let header = printer::function_header(&prefix, &modifiers, &kw, &name, &params.before);
        let params = self.format_function_params(params, &header, ctx);

        FunctionDecl {
            id,
            prefix,
            markers,
            modifiers,
            kw,
            name,
            params,
            return_type: return_type.map(|rt| LeftPadded {
                before: self.indent_to(&rt.before, ctx.cont),
                element: self.format_type_ref(rt.element, ctx),
            }),
            body: body.map(|b| self.format_block(b, indent)),
        }
    }

    /// Wrapped parameters take continuation indent, or align under the first
    /// parameter's column when `align_when_multiple` is set and the first
    /// parameter stays on the header line.
    fn format_function_params(
        &self,
        params: Container<ParamItem>,
        header: &str,
        ctx: Ctx,
    ) -> Container<ParamItem> {
        let Container { before, elements } = params;

        let first_on_new_line = elements
            .first()
            .map(|p| match &p.element {
                ParamItem::Param(param) => param.prefix.has_newline(),
                ParamItem::Empty(empty) => empty.prefix.has_newline(),
            })
            .unwrap_or(false);

        let align = self
            .style
            .function_declaration_parameters
            .align_when_multiple;
        let rest_column = if align && !first_on_new_line {
            let line = header.rsplit('\n').next().unwrap_or(header);
            let first_prefix = match elements.first().map(|p| &p.element) {
                Some(ParamItem::Param(param)) => param.prefix.print(),
                _ => String::new(),
            };
            self.visual_width(line) + self.visual_width(&first_prefix)
        } else {
            ctx.cont
        };

        let elements = elements
            .into_iter()
            .enumerate()
            .map(|(i, padded)| {
                let column = if i == 0 { ctx.cont } else { rest_column };
                let RightPadded {
                    element,
                    after,
                    markers,
                } = padded;
                let element = match element {
                    ParamItem::Param(param) => ParamItem::Param(self.format_param(param, column, ctx)),
                    ParamItem::Empty(empty) => ParamItem::Empty(Empty {
                        prefix: self.indent_to(&empty.prefix, ctx.cont),
                        ..empty
                    }),
                };
                RightPadded {
                    element,
                    after: self.indent_to(&after, ctx.cont),
                    markers,
                }
            })
            .collect();

        Container { before, elements }
    }

    fn format_param(&self, param: Param, column: usize, ctx: Ctx) -> Param {
        let Param {
            id,
            prefix,
            markers,
            name,
            ty,
            default_value,
        } = param;
        Param {
            id,
            prefix: self.indent_to(&prefix, column),
            markers,
            name,
            ty: LeftPadded {
                before: self.indent_to(&ty.before, ctx.cont),
                element: self.format_type_ref(ty.element, ctx),
            },
            default_value: default_value.map(|d| LeftPadded {
                before: self.indent_to(&d.before, ctx.cont),
                element: self.format_expr(d.element, ctx.cont, ctx),
            }),
        }
    }

    fn format_type_ref(&self, ty: TypeRef, ctx: Ctx) -> TypeRef {
        let TypeRef {
            id,
            prefix,
            markers,
            name,
            type_args,
        } = ty;
        TypeRef {
            id,
            prefix: self.indent_to(&prefix, ctx.cont),
            markers,
            name,
            type_args: type_args.map(|args| Container {
                before: self.indent_to(&args.before, ctx.cont),
                elements: args
                    .elements
                    .into_iter()
                    .map(|a| {
                        let RightPadded {
                            element,
                            after,
                            markers,
                        } = a;
                        RightPadded {
                            element: self.format_type_ref(element, ctx),
                            after: self.indent_to(&after, ctx.cont),
                            markers,
                        }
                    })
                    .collect(),
            }),
        }
    }

    fn format_variable(&self, variable: VariableDecl, indent: usize) -> VariableDecl {
        let ctx = self.ctx(indent);
        let VariableDecl {
            id,
            prefix,
            markers,
            modifiers,
            kw,
            mutable,
            name,
            ty,
            initializer,
        } = variable;

        VariableDecl {
            id,
            prefix: self.indent_to(&prefix, indent),
            markers,
            modifiers: self.format_modifiers(modifiers, indent, ctx),
            kw: self.indent_to(&kw, indent),
            mutable,
            name: self.format_identifier(name, ctx.cont),
            ty: ty.map(|ty| LeftPadded {
                before: self.indent_to(&ty.before, ctx.cont),
                element: self.format_type_ref(ty.element, ctx),
            }),
            initializer: initializer.map(|init| LeftPadded {
                before: self.indent_to(&init.before, ctx.cont),
                element: self.format_expr(init.element, ctx.cont, ctx),
            }),
        }
    }

    fn format_return(&self, ret: Return, indent: usize) -> Return {
        let ctx = self.ctx(indent);
        let Return {
            id,
            prefix,
            markers,
            expr,
        } = ret;
        Return {
            id,
            prefix: self.indent_to(&prefix, indent),
            markers,
            expr: expr.map(|e| self.format_expr(e, ctx.cont, ctx)),
        }
    }

    fn format_if(&self, if_stmt: If, indent: usize) -> If {
        let ctx = self.ctx(indent);
        let If {
            id,
            prefix,
            markers,
            condition,
            then_part,
            else_part,
        } = if_stmt;

        let then_indent = self.control_body_indent(&then_part.element, indent);
        let then_part = {
            let RightPadded {
                element,
                after,
                markers,
            } = then_part;
            RightPadded {
                element: self.format_stmt(element, then_indent),
                after,
                markers,
            }
        };

        let else_part = else_part.map(|else_part| {
            let Else { prefix, body } = else_part;
            let body_indent = self.control_body_indent(&body.element, indent);
            let RightPadded {
                element,
                after,
                markers,
            } = body;
            Else {
                prefix: self.indent_to(&prefix, indent),
                body: RightPadded {
                    element: self.format_stmt(element, body_indent),
                    after,
                    markers,
                },
            }
        });

        If {
            id,
            prefix: self.indent_to(&prefix, indent),
            markers,
            condition: ControlParens {
                prefix: self.indent_to(&condition.prefix, ctx.cont),
                tree: {
                    let RightPadded {
                        element,
                        after,
                        markers,
                    } = condition.tree;
                    RightPadded {
                        element: self.format_expr(element, ctx.cont, ctx),
                        after: self.indent_to(&after, ctx.cont),
                        markers,
                    }
                },
            },
            then_part,
            else_part,
        }
    }

    /// A braced body stays at the `if`'s own indent; a guarded single
    /// statement on its own line goes one block level deeper; an `else if`
    /// continuing the same line keeps the chain's indent.
    fn control_body_indent(&self, stmt: &Stmt, indent: usize) -> usize {
        match stmt {
            Stmt::Block(_) => indent,
            Stmt::If(nested) if !nested.prefix.has_newline() => indent,
            _ => indent + self.style.indent_size,
        }
    }

    fn format_block(&self, block: Block, indent: usize) -> Block {
        if block.markers.contains(Marker::EmptyBody) {
            return block;
        }
        let inner = indent + self.style.indent_size;
        let Block {
            id,
            prefix,
            markers,
            statements,
            end,
        } = block;
        Block {
            id,
            prefix: self.indent_to(&prefix, indent),
            markers,
            statements: self.format_statements(statements, inner),
            // comments in front of the closing brace align with the
            // statements, the brace itself with the block owner
            end: self.indent_spans(&end, inner, indent),
        }
    }

    /// `lead` is the column the expression's first token takes if it starts a
    /// line; everything wrapped inside the expression takes the statement's
    /// continuation column.
    fn format_expr(&self, expr: Expr, lead: usize, ctx: Ctx) -> Expr {
        match expr {
            Expr::Literal(literal) => Expr::Literal(Literal {
                prefix: self.indent_to(&literal.prefix, lead),
                ..literal
            }),
            Expr::Identifier(ident) => Expr::Identifier(self.format_identifier(ident, lead)),
            Expr::Empty(empty) => Expr::Empty(Empty {
                prefix: self.indent_to(&empty.prefix, lead),
                ..empty
            }),
            Expr::FieldAccess(fa) => {
                let FieldAccess {
                    id,
                    prefix,
                    markers,
                    target,
                    name,
                } = *fa;
                Expr::FieldAccess(Box::new(FieldAccess {
                    id,
                    prefix: self.indent_to(&prefix, lead),
                    markers,
                    target: self.format_expr(target, lead, ctx),
                    name: LeftPadded {
                        before: self.indent_to(&name.before, ctx.cont),
                        element: self.format_identifier(name.element, ctx.cont),
                    },
                }))
            }
            Expr::Call(call) => {
                let Call {
                    id,
                    prefix,
                    markers,
                    receiver,
                    name,
                    args,
                } = *call;
                let name_column = if receiver.is_some() { ctx.cont } else { lead };
                Expr::Call(Box::new(Call {
                    id,
                    prefix: self.indent_to(&prefix, lead),
                    markers,
                    receiver: receiver.map(|r| {
                        let RightPadded {
                            element,
                            after,
                            markers,
                        } = r;
                        RightPadded {
                            element: self.format_expr(element, lead, ctx),
                            after: self.indent_to(&after, ctx.cont),
                            markers,
                        }
                    }),
                    name: self.format_identifier(name, name_column),
                    args: self.format_expr_container(args, ctx),
                }))
            }
            Expr::Binary(binary) => {
                let Binary {
                    id,
                    prefix,
                    markers,
                    left,
                    op,
                    right,
                } = *binary;
                Expr::Binary(Box::new(Binary {
                    id,
                    prefix: self.indent_to(&prefix, lead),
                    markers,
                    left: self.format_expr(left, lead, ctx),
                    op: LeftPadded {
                        before: self.indent_to(&op.before, ctx.cont),
                        element: op.element,
                    },
                    right: self.format_expr(right, ctx.cont, ctx),
                }))
            }
            Expr::Lambda(lambda) => {
                let Lambda {
                    id,
                    prefix,
                    markers,
                    params,
                    statements,
                    end,
                } = *lambda;
                // a lambda opening on its own line sits at its lead column;
                // the body indents one block level past the line the brace
                // landed on
                let base = if prefix.has_newline() { lead } else { ctx.indent };
                let inner = base + self.style.indent_size;
                Expr::Lambda(Box::new(Lambda {
                    id,
                    prefix: self.indent_to(&prefix, lead),
                    markers,
                    params: params.map(|params| LambdaParams {
                        params: params
                            .params
                            .into_iter()
                            .map(|p| {
                                let RightPadded {
                                    element,
                                    after,
                                    markers,
                                } = p;
                                RightPadded {
                                    element: self.format_identifier(element, inner),
                                    after: self.indent_to(&after, inner),
                                    markers,
                                }
                            })
                            .collect(),
                    }),
                    statements: self.format_statements(statements, inner),
                    end: self.indent_spans(&end, inner, base),
                }))
            }
            Expr::Paren(paren) => {
                let Paren {
                    id,
                    prefix,
                    markers,
                    tree,
                } = *paren;
                let RightPadded {
                    element,
                    after,
                    markers: tree_markers,
                } = tree;
                Expr::Paren(Box::new(Paren {
                    id,
                    prefix: self.indent_to(&prefix, lead),
                    markers,
                    tree: RightPadded {
                        element: self.format_expr(element, ctx.cont, ctx),
                        after: self.indent_to(&after, ctx.cont),
                        markers: tree_markers,
                    },
                }))
            }
        }
    }

    fn format_expr_container(&self, container: Container<Expr>, ctx: Ctx) -> Container<Expr> {
        let Container { before, elements } = container;
        Container {
            before: self.indent_to(&before, ctx.cont),
            elements: elements
                .into_iter()
                .map(|e| {
                    let RightPadded {
                        element,
                        after,
                        markers,
                    } = e;
                    RightPadded {
                        element: self.format_expr(element, ctx.cont, ctx),
                        after: self.indent_to(&after, ctx.cont),
                        markers,
                    }
                })
                .collect(),
        }
    }

    // ------------------------------------------------------------------
    // space rewriting

    fn indent_to(&self, space: &Space, column: usize) -> Space {
        self.indent_spans(space, column, column)
    }

    /// Rewrite the line-start segments of a space: comments go to
    /// `comment_column`, the following token to `token_column`. Segments
    /// without a line break are untouched; everything up to the last line
    /// break of a segment (blank lines included) is preserved verbatim.
    fn indent_spans(&self, space: &Space, comment_column: usize, token_column: usize) -> Space {
        if !space.has_newline() {
            return space.clone();
        }

        let mut whitespace = space.whitespace.clone();
        let mut comments = space.comments.clone();

        for i in 0..comments.len() {
            let segment = if i == 0 {
                whitespace.clone()
            } else {
                comments[i - 1].suffix.clone()
            };
            let Some(break_at) = segment.rfind('\n') else {
                continue;
            };
            let old_column = self.visual_width(&segment[break_at + 1..]);

            // a line comment already at column 0 is an intentional
            // annotation outside the construct's indentation; never shift it
            if !comments[i].multiline && old_column == 0 {
                continue;
            }

            let rewritten = self.reindent_tail(&segment, comment_column);
            if i == 0 {
                whitespace = rewritten;
            } else {
                comments[i - 1].suffix = rewritten;
            }

            if comments[i].multiline && comments[i].text.contains('\n') {
                let delta = comment_column as isize - old_column as isize;
                comments[i].text = self.shift_comment_body(&comments[i].text, delta);
            }
        }

        match comments.last_mut() {
            Some(last) => {
                if last.suffix.contains('\n') {
                    last.suffix = self.reindent_tail(&last.suffix, token_column);
                }
            }
            None => {
                if whitespace.contains('\n') {
                    whitespace = self.reindent_tail(&whitespace, token_column);
                }
            }
        }

        Space {
            whitespace,
            comments,
        }
    }

    /// Replace the text after the last line break with the indent for
    /// `column`; earlier lines (blank lines, carriage returns) stay as-is.
    fn reindent_tail(&self, text: &str, column: usize) -> String {
        match text.rfind('\n') {
            Some(pos) => {
                let mut out = text[..=pos].to_string();
                out.push_str(&self.indent_string(column));
                out
            }
            None => text.to_string(),
        }
    }

    fn indent_string(&self, column: usize) -> String {
        if self.style.use_tab_character && self.style.tab_size > 0 {
            let mut out = "\t".repeat(column / self.style.tab_size);
            out.push_str(&" ".repeat(column % self.style.tab_size));
            out
        } else {
            " ".repeat(column)
        }
    }

    /// Column width of `text`, advancing tabs to the next tab stop.
    fn visual_width(&self, text: &str) -> usize {
        let tab = self.style.tab_size.max(1);
        let mut width = 0;
        for c in text.chars() {
            if c == '\t' {
                width = width + tab - width % tab;
            } else {
                width += 1;
            }
        }
        width
    }

    /// Shift every interior line of a multi-line comment by the same delta
    /// as its first line, preserving the comment's internal alignment. The
    /// removal side clamps at the first non-whitespace character.
    fn shift_comment_body(&self, text: &str, delta: isize) -> String {
        if delta == 0 {
            return text.to_string();
        }
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        for line in lines.iter_mut().skip(1) {
            if line.is_empty() {
                continue;
            }
            if delta > 0 {
                line.insert_str(0, &self.indent_string(delta as usize));
            } else {
                let mut to_remove = (-delta) as usize;
                let tab = self.style.tab_size.max(1);
                let mut cut = 0;
                for c in line.chars() {
                    if to_remove == 0 {
                        break;
                    }
                    match c {
                        ' ' => {
                            to_remove -= 1;
                            cut += 1;
                        }
                        '\t' if tab <= to_remove => {
                            to_remove -= tab;
                            cut += 1;
                        }
                        _ => break,
                    }
                }
                *line = line[cut..].to_string();
            }
        }
        lines.join("\n")
    }
}

impl FileVisitor for IndentVisitor<'_> {
    fn visit_file(&mut self, file: SourceFile) -> SourceFile {
        self.format_file(file)
    }
}
