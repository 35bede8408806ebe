//! Cursor-driven construction of the lossless tree.
//!
//! The builder walks the resolved semantic tree top-down while a single
//! byte-offset cursor walks the raw source. Each visit captures the trivia
//! before its tokens, advances past text whose presence the semantic tree
//! already guarantees, and recurses into children strictly in source order.
//! The semantic offsets are only used to bound how far the cursor may
//! legally advance, never to skip scanning.

use log::trace;

use crate::ast;
use crate::error::{KaedeError, Result};

use super::marker::{Marker, Markers};
use super::node::*;
use super::space::Space;

/// Build the lossless tree for one file. A failure aborts the whole file:
/// a half-built tree would not re-serialize faithfully.
pub fn build(source: &str, file: &ast::File) -> Result<SourceFile> {
    TreeBuilder::new(source).build_file(file)
}

pub struct TreeBuilder<'a> {
    source: &'a str,
    cursor: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, cursor: 0 }
    }

    pub fn build_file(&mut self, file: &ast::File) -> Result<SourceFile> {
        trace!("building lossless tree for {}", file.name);

        let package = match &file.package {
            Some(p) => {
                let package = self.visit_package(p)?;
                Some(self.maybe_semicolon(package))
            }
            None => None,
        };

        let mut imports = Vec::with_capacity(file.imports.len());
        for import in &file.imports {
            let node = self.visit_import(import)?;
            imports.push(self.maybe_semicolon(node));
        }

        let mut statements = Vec::new();
        for decl in &file.declarations {
            if decl.is_synthetic() {
                continue;
            }
            let stmt = self.visit_decl(decl)?;
            self.clamp_to(decl.range());
            statements.push(self.maybe_semicolon(stmt));
        }

        let eof = self.whitespace();
        if self.cursor < self.source.len() {
            return Err(KaedeError::TrailingSource {
                name: file.name.clone(),
                offset: self.cursor,
            });
        }

        Ok(SourceFile {
            id: TreeId::next(),
            markers: Markers::empty(),
            name: file.name.clone(),
            package,
            imports,
            statements,
            eof,
        })
    }

    // ------------------------------------------------------------------
    // declarations

    fn visit_package(&mut self, package: &ast::PackageDecl) -> Result<PackageDecl> {
        let prefix = self.whitespace();
        self.skip_expected("package", "package directive")?;
        let name = self.visit_qualified_name(&package.name, false)?;
        Ok(PackageDecl {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            name,
        })
    }

    fn visit_import(&mut self, import: &ast::ImportDecl) -> Result<ImportDecl> {
        let prefix = self.whitespace();
        self.skip_expected("import", "import directive")?;
        let name = self.visit_qualified_name(&import.path, import.all_under)?;
        Ok(ImportDecl {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            name,
        })
    }

    fn visit_qualified_name(&mut self, path: &str, all_under: bool) -> Result<QualifiedName> {
        let mut parts = Vec::new();
        for part in path.split('.') {
            let dot = if parts.is_empty() {
                None
            } else {
                Some(self.source_before("."))
            };
            let prefix = self.whitespace();
            self.skip_expected(part, "qualified name")?;
            parts.push(NamePart {
                dot,
                ident: Identifier {
                    id: TreeId::next(),
                    prefix,
                    markers: Markers::empty(),
                    name: part.to_string(),
                },
            });
        }
        if all_under {
            let dot = Some(self.source_before("."));
            let prefix = self.whitespace();
            self.skip_expected("*", "import wildcard")?;
            parts.push(NamePart {
                dot,
                ident: Identifier {
                    id: TreeId::next(),
                    prefix,
                    markers: Markers::empty(),
                    name: "*".to_string(),
                },
            });
        }
        Ok(QualifiedName { parts })
    }

    fn visit_decl(&mut self, decl: &ast::Decl) -> Result<Stmt> {
        match decl {
            ast::Decl::Class(c) => Ok(Stmt::Class(self.visit_class(c)?)),
            ast::Decl::Function(f) => Ok(Stmt::Function(self.visit_function(f)?)),
            ast::Decl::Property(p) => Ok(Stmt::Variable(self.visit_property(p)?)),
        }
    }

    fn visit_class(&mut self, class: &ast::ClassDecl) -> Result<ClassDecl> {
        let prefix = self.whitespace();
        let modifiers = self.visit_modifiers(&class.modifiers)?;

        let kind = match class.kind {
            ast::ClassKind::Class => ClassKind {
                prefix: self.source_before("class"),
                kind: ClassKindType::Class,
            },
            ast::ClassKind::Interface => ClassKind {
                prefix: self.source_before("interface"),
                kind: ClassKindType::Interface,
            },
        };

        let name = Identifier {
            id: TreeId::next(),
            prefix: self.whitespace(),
            markers: Markers::empty(),
            name: class.name.clone(),
        };
        self.skip_expected(&class.name, "class declaration")?;

        let type_params = if class.type_params.is_empty() {
            None
        } else {
            let before = self.source_before("<");
            let mut elements = Vec::with_capacity(class.type_params.len());
            for (i, param) in class.type_params.iter().enumerate() {
                let element = TypeParam {
                    id: TreeId::next(),
                    prefix: self.whitespace(),
                    markers: Markers::empty(),
                    name: param.clone(),
                };
                self.skip_expected(param, "type parameter")?;
                let terminal = if i == class.type_params.len() - 1 { ">" } else { "," };
                elements.push(RightPadded {
                    element,
                    after: self.source_before(terminal),
                    markers: Markers::empty(),
                });
            }
            Some(Container { before, elements })
        };

        // look ahead for the opening brace; a class may have no body at all
        let save_cursor = self.cursor;
        let body_prefix = self.whitespace();
        let body = if self.source[self.cursor..].starts_with('{') {
            self.cursor += 1;
            let mut statements = Vec::new();
            for member in &class.members {
                if member.is_synthetic() {
                    continue;
                }
                let stmt = self.visit_decl(member)?;
                self.clamp_to(member.range());
                statements.push(self.maybe_semicolon(stmt));
            }
            Block {
                id: TreeId::next(),
                prefix: body_prefix,
                markers: Markers::empty(),
                statements,
                end: self.source_before("}"),
            }
        } else {
            self.cursor = save_cursor;
            Block {
                id: TreeId::next(),
                prefix: Space::empty(),
                markers: Markers::empty().add_if_absent(Marker::EmptyBody),
                statements: Vec::new(),
                end: Space::empty(),
            }
        };

        trace!("built class {} at offset {}", class.name, self.cursor);
        Ok(ClassDecl {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            modifiers,
            kind,
            name,
            type_params,
            body,
        })
    }

    fn visit_function(&mut self, function: &ast::FunctionDecl) -> Result<FunctionDecl> {
        let prefix = self.whitespace();
        let modifiers = self.visit_modifiers(&function.modifiers)?;
        let kw = self.source_before("fun");

        let name = Identifier {
            id: TreeId::next(),
            prefix: self.whitespace(),
            markers: Markers::empty(),
            name: function.name.clone(),
        };
        self.skip_expected(&function.name, "function declaration")?;

        let before = self.source_before("(");
        let elements = if function.params.is_empty() {
            vec![RightPadded::new(ParamItem::Empty(Empty {
                id: TreeId::next(),
                prefix: self.source_before(")"),
                markers: Markers::empty(),
            }))]
        } else {
            let mut elements = Vec::with_capacity(function.params.len());
            for (i, param) in function.params.iter().enumerate() {
                let element = self.visit_param(param)?;
                self.clamp_to(param.range);
                let terminal = if i == function.params.len() - 1 { ")" } else { "," };
                elements.push(RightPadded {
                    element: ParamItem::Param(element),
                    after: self.source_before(terminal),
                    markers: Markers::empty(),
                });
            }
            elements
        };
        let params = Container { before, elements };

        let return_type = match &function.return_type {
            Some(ty) => Some(LeftPadded::new(self.source_before(":"), self.visit_type_ref(ty)?)),
            None => None,
        };

        let body = match &function.body {
            Some(body) => Some(self.visit_block(body)?),
            None => None,
        };

        trace!("built function {} at offset {}", function.name, self.cursor);
        Ok(FunctionDecl {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            modifiers,
            kw,
            name,
            params,
            return_type,
            body,
        })
    }

    fn visit_param(&mut self, param: &ast::Param) -> Result<Param> {
        let prefix = self.whitespace();
        self.skip_expected(&param.name, "parameter")?;
        let ty = LeftPadded::new(self.source_before(":"), self.visit_type_ref(&param.ty)?);
        let default_value = match &param.default_value {
            Some(expr) => Some(LeftPadded::new(self.source_before("="), self.visit_expr(expr)?)),
            None => None,
        };
        Ok(Param {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            name: param.name.clone(),
            ty,
            default_value,
        })
    }

    fn visit_property(&mut self, property: &ast::PropertyDecl) -> Result<VariableDecl> {
        let prefix = self.whitespace();
        let modifiers = self.visit_modifiers(&property.modifiers)?;
        let kw = self.source_before(if property.mutable { "var" } else { "val" });

        let name = Identifier {
            id: TreeId::next(),
            prefix: self.whitespace(),
            markers: Markers::empty(),
            name: property.name.clone(),
        };
        self.skip_expected(&property.name, "property declaration")?;

        let ty = match &property.ty {
            Some(ty) => Some(LeftPadded::new(self.source_before(":"), self.visit_type_ref(ty)?)),
            None => None,
        };
        let initializer = match &property.initializer {
            Some(expr) => Some(LeftPadded::new(self.source_before("="), self.visit_expr(expr)?)),
            None => None,
        };

        Ok(VariableDecl {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            modifiers,
            kw,
            mutable: property.mutable,
            name,
            ty,
            initializer,
        })
    }

    fn visit_modifiers(&mut self, modifiers: &[ast::Modifier]) -> Result<Vec<DeclModifier>> {
        let mut out = Vec::with_capacity(modifiers.len());
        for modifier in modifiers {
            match &modifier.kind {
                ast::ModifierKind::Annotation { name, args } => {
                    out.push(DeclModifier::Annotation(self.visit_annotation(name, args)?));
                }
                keyword => {
                    let prefix = self.whitespace();
                    let (word, kind) = modifier_keyword(keyword).ok_or(
                        KaedeError::UnsupportedConstruct {
                            kind: "modifier",
                            offset: self.cursor,
                        },
                    )?;
                    self.skip_expected(word, "modifier")?;
                    out.push(DeclModifier::Keyword(Modifier {
                        id: TreeId::next(),
                        prefix,
                        markers: Markers::empty(),
                        kind,
                    }));
                }
            }
        }
        Ok(out)
    }

    fn visit_annotation(
        &mut self,
        name: &str,
        args: &Option<Vec<ast::Expr>>,
    ) -> Result<Annotation> {
        let prefix = self.whitespace();
        self.skip_expected("@", "annotation")?;
        let ident = Identifier {
            id: TreeId::next(),
            prefix: self.whitespace(),
            markers: Markers::empty(),
            name: name.to_string(),
        };
        self.skip_expected(name, "annotation")?;

        let args = match args {
            Some(args) => Some(self.visit_expr_container(args)?),
            None => None,
        };
        Ok(Annotation {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            name: ident,
            args,
        })
    }

    fn visit_type_ref(&mut self, ty: &ast::TypeRef) -> Result<TypeRef> {
        let prefix = self.whitespace();
        self.skip_expected(&ty.name, "type reference")?;

        let type_args = if ty.type_args.is_empty() {
            None
        } else {
            let before = self.source_before("<");
            let mut elements = Vec::with_capacity(ty.type_args.len());
            for (i, arg) in ty.type_args.iter().enumerate() {
                let element = self.visit_type_ref(arg)?;
                self.clamp_to(arg.range);
                let terminal = if i == ty.type_args.len() - 1 { ">" } else { "," };
                elements.push(RightPadded {
                    element,
                    after: self.source_before(terminal),
                    markers: Markers::empty(),
                });
            }
            Some(Container { before, elements })
        };

        Ok(TypeRef {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            name: ty.name.clone(),
            type_args,
        })
    }

    // ------------------------------------------------------------------
    // statements

    fn visit_block(&mut self, block: &ast::Block) -> Result<Block> {
        let prefix = self.whitespace();
        self.skip_expected("{", "block")?;

        let mut statements = Vec::with_capacity(block.statements.len());
        for stmt in &block.statements {
            let node = self.visit_stmt(stmt)?;
            self.clamp_to(stmt.range());
            statements.push(self.maybe_semicolon(node));
        }

        Ok(Block {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            statements,
            end: self.source_before("}"),
        })
    }

    fn visit_stmt(&mut self, stmt: &ast::Stmt) -> Result<Stmt> {
        match stmt {
            ast::Stmt::Expr(e) => Ok(Stmt::Expr(self.visit_expr(e)?)),
            ast::Stmt::Property(p) => Ok(Stmt::Variable(self.visit_property(p)?)),
            ast::Stmt::Return(r) => Ok(Stmt::Return(self.visit_return(r)?)),
            ast::Stmt::If(i) => Ok(Stmt::If(Box::new(self.visit_if(i)?))),
            ast::Stmt::Block(b) => Ok(Stmt::Block(self.visit_block(b)?)),
        }
    }

    fn visit_return(&mut self, ret: &ast::ReturnStmt) -> Result<Return> {
        let prefix = self.whitespace();
        self.skip_expected("return", "return statement")?;
        let expr = match &ret.expr {
            Some(e) => Some(self.visit_expr(e)?),
            None => None,
        };
        Ok(Return {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            expr,
        })
    }

    fn visit_if(&mut self, if_stmt: &ast::IfStmt) -> Result<If> {
        let prefix = self.whitespace();
        self.skip_expected("if", "if statement")?;

        let condition = ControlParens {
            prefix: self.source_before("("),
            tree: RightPadded {
                element: self.visit_expr(&if_stmt.condition)?,
                after: self.source_before(")"),
                markers: Markers::empty(),
            },
        };

        let then_stmt = self.visit_stmt(&if_stmt.then_branch)?;
        self.clamp_to(if_stmt.then_branch.range());
        let then_part = self.maybe_semicolon(then_stmt);

        let else_part = match &if_stmt.else_branch {
            Some(else_branch) => {
                let else_prefix = self.source_before("else");
                let body_stmt = self.visit_stmt(else_branch)?;
                self.clamp_to(else_branch.range());
                Some(Else {
                    prefix: else_prefix,
                    body: self.maybe_semicolon(body_stmt),
                })
            }
            None => None,
        };

        Ok(If {
            id: TreeId::next(),
            prefix,
            markers: Markers::empty(),
            condition,
            then_part,
            else_part,
        })
    }

    // ------------------------------------------------------------------
    // expressions

    fn visit_expr(&mut self, expr: &ast::Expr) -> Result<Expr> {
        match expr {
            ast::Expr::Literal { value, range } => {
                let prefix = self.whitespace();
                let source = self
                    .source
                    .get(range.start..range.end)
                    .ok_or(KaedeError::UnsupportedConstruct {
                        kind: "literal",
                        offset: self.cursor,
                    })?
                    .to_string();
                self.cursor = self.cursor.max(range.end);
                Ok(Expr::Literal(Literal {
                    id: TreeId::next(),
                    prefix,
                    markers: Markers::empty(),
                    value: value.clone(),
                    source,
                }))
            }
            ast::Expr::Name { name, .. } => {
                let prefix = self.whitespace();
                self.skip_expected(name, "identifier")?;
                Ok(Expr::Identifier(Identifier {
                    id: TreeId::next(),
                    prefix,
                    markers: Markers::empty(),
                    name: name.clone(),
                }))
            }
            ast::Expr::FieldAccess(fa) => {
                let target = self.visit_expr(&fa.target)?;
                let before = self.source_before(".");
                let ident_prefix = self.whitespace();
                self.skip_expected(&fa.name, "field access")?;
                Ok(Expr::FieldAccess(Box::new(FieldAccess {
                    id: TreeId::next(),
                    prefix: Space::empty(),
                    markers: Markers::empty(),
                    target,
                    name: LeftPadded::new(
                        before,
                        Identifier {
                            id: TreeId::next(),
                            prefix: ident_prefix,
                            markers: Markers::empty(),
                            name: fa.name.clone(),
                        },
                    ),
                })))
            }
            ast::Expr::Call(call) => {
                let receiver = match &call.receiver {
                    Some(receiver) => {
                        let element = self.visit_expr(receiver)?;
                        Some(RightPadded {
                            element,
                            after: self.source_before("."),
                            markers: Markers::empty(),
                        })
                    }
                    None => None,
                };
                let name = Identifier {
                    id: TreeId::next(),
                    prefix: self.whitespace(),
                    markers: Markers::empty(),
                    name: call.name.clone(),
                };
                self.skip_expected(&call.name, "call")?;
                let args = self.visit_expr_container(&call.args)?;
                Ok(Expr::Call(Box::new(Call {
                    id: TreeId::next(),
                    prefix: Space::empty(),
                    markers: Markers::empty(),
                    receiver,
                    name,
                    args,
                })))
            }
            ast::Expr::Binary(binary) => {
                let left = self.visit_expr(&binary.left)?;
                let op = LeftPadded::new(self.source_before(binary.op.symbol()), binary.op);
                let right = self.visit_expr(&binary.right)?;
                Ok(Expr::Binary(Box::new(Binary {
                    id: TreeId::next(),
                    prefix: Space::empty(),
                    markers: Markers::empty(),
                    left,
                    op,
                    right,
                })))
            }
            ast::Expr::Lambda(lambda) => {
                let prefix = self.whitespace();
                self.skip_expected("{", "lambda")?;

                let params = if lambda.params.is_empty() {
                    None
                } else {
                    let mut params = Vec::with_capacity(lambda.params.len());
                    for (i, param) in lambda.params.iter().enumerate() {
                        let ident = Identifier {
                            id: TreeId::next(),
                            prefix: self.whitespace(),
                            markers: Markers::empty(),
                            name: param.clone(),
                        };
                        self.skip_expected(param, "lambda parameter")?;
                        let terminal = if i == lambda.params.len() - 1 { "->" } else { "," };
                        params.push(RightPadded {
                            element: ident,
                            after: self.source_before(terminal),
                            markers: Markers::empty(),
                        });
                    }
                    Some(LambdaParams { params })
                };

                let mut statements = Vec::with_capacity(lambda.statements.len());
                for stmt in &lambda.statements {
                    let node = self.visit_stmt(stmt)?;
                    self.clamp_to(stmt.range());
                    statements.push(self.maybe_semicolon(node));
                }

                Ok(Expr::Lambda(Box::new(Lambda {
                    id: TreeId::next(),
                    prefix,
                    markers: Markers::empty(),
                    params,
                    statements,
                    end: self.source_before("}"),
                })))
            }
            ast::Expr::Paren { inner, .. } => {
                let prefix = self.whitespace();
                self.skip_expected("(", "parenthesized expression")?;
                let tree = RightPadded {
                    element: self.visit_expr(inner)?,
                    after: self.source_before(")"),
                    markers: Markers::empty(),
                };
                Ok(Expr::Paren(Box::new(Paren {
                    id: TreeId::next(),
                    prefix,
                    markers: Markers::empty(),
                    tree,
                })))
            }
        }
    }

    fn visit_expr_container(&mut self, args: &[ast::Expr]) -> Result<Container<Expr>> {
        let before = self.source_before("(");
        let elements = if args.is_empty() {
            vec![RightPadded::new(Expr::Empty(Empty {
                id: TreeId::next(),
                prefix: self.source_before(")"),
                markers: Markers::empty(),
            }))]
        } else {
            let mut elements = Vec::with_capacity(args.len());
            for (i, arg) in args.iter().enumerate() {
                let element = self.visit_expr(arg)?;
                self.clamp_to(arg.range());
                let terminal = if i == args.len() - 1 { ")" } else { "," };
                elements.push(RightPadded {
                    element,
                    after: self.source_before(terminal),
                    markers: Markers::empty(),
                });
            }
            elements
        };
        Ok(Container { before, elements })
    }

    // ------------------------------------------------------------------
    // scanner

    /// Capture the space up to (but not including) `until_delim` and advance
    /// past the delimiter. When the delimiter cannot be found the cursor does
    /// not move and an empty space is returned; callers treat that as "the
    /// construct is absent from source".
    fn source_before(&mut self, until_delim: &str) -> Space {
        let Some(delim_index) = self.position_of_next(until_delim) else {
            return Space::empty();
        };
        let prefix = &self.source[self.cursor..delim_index];
        self.cursor = delim_index + until_delim.len();
        Space::parse(prefix)
    }

    /// Find the next occurrence of `until_delim` outside comments and
    /// string/character literals. Block comments nest.
    fn position_of_next(&self, until_delim: &str) -> Option<usize> {
        let bytes = self.source.as_bytes();
        let mut in_line_comment = false;
        let mut block_comment_depth = 0usize;
        let mut in_string = false;
        let mut in_char = false;

        let mut i = self.cursor;
        while i + until_delim.len() <= bytes.len() {
            let c = bytes[i];
            if in_line_comment {
                if c == b'\n' {
                    in_line_comment = false;
                }
            } else if block_comment_depth > 0 {
                if c == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    block_comment_depth -= 1;
                    i += 1;
                } else if c == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    block_comment_depth += 1;
                    i += 1;
                }
            } else if in_string {
                if c == b'\\' {
                    i += 1;
                } else if c == b'"' {
                    in_string = false;
                }
            } else if in_char {
                if c == b'\\' {
                    i += 1;
                } else if c == b'\'' {
                    in_char = false;
                }
            } else {
                match c {
                    b'/' if bytes.get(i + 1) == Some(&b'/') => {
                        in_line_comment = true;
                        i += 1;
                    }
                    b'/' if bytes.get(i + 1) == Some(&b'*') => {
                        block_comment_depth += 1;
                        i += 1;
                    }
                    b'"' => in_string = true,
                    b'\'' => in_char = true,
                    _ => {}
                }
                if !in_line_comment
                    && block_comment_depth == 0
                    && !in_string
                    && !in_char
                    && self.source.get(i..).is_some_and(|s| s.starts_with(until_delim))
                {
                    return Some(i);
                }
            }
            i += 1;
        }
        None
    }

    /// Consume trivia (whitespace and comments) up to the next significant
    /// character.
    fn whitespace(&mut self) -> Space {
        let end = self.index_of_next_non_trivia();
        let prefix = &self.source[self.cursor..end];
        self.cursor = end;
        Space::parse(prefix)
    }

    fn index_of_next_non_trivia(&self) -> usize {
        let bytes = self.source.as_bytes();
        let mut i = self.cursor;
        loop {
            while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r' | 0x0c) {
                i += 1;
            }
            if bytes[i..].starts_with(b"//") {
                i += 2;
                while i < bytes.len() && bytes[i] != b'\n' && bytes[i] != b'\r' {
                    i += 1;
                }
            } else if bytes[i..].starts_with(b"/*") {
                let mut depth = 1usize;
                i += 2;
                while i < bytes.len() && depth > 0 {
                    if bytes[i..].starts_with(b"/*") {
                        depth += 1;
                        i += 2;
                    } else if bytes[i..].starts_with(b"*/") {
                        depth -= 1;
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
            } else {
                return i;
            }
        }
    }

    /// Advance past text the semantic tree already guarantees is present.
    /// A mismatch means the semantic tree and the source disagree, which
    /// aborts construction rather than producing a tree that would
    /// re-serialize incorrectly.
    fn skip_expected(&mut self, token: &str, kind: &'static str) -> Result<()> {
        if self.source[self.cursor..].starts_with(token) {
            self.cursor += token.len();
            Ok(())
        } else {
            Err(KaedeError::UnsupportedConstruct {
                kind,
                offset: self.cursor,
            })
        }
    }

    /// Capture an optional trailing `;` as a marker on the right padding.
    fn maybe_semicolon<T>(&mut self, element: T) -> RightPadded<T> {
        let save_cursor = self.cursor;
        let before = self.whitespace();
        if self.source[self.cursor..].starts_with(';') {
            self.cursor += 1;
            RightPadded {
                element,
                after: before,
                markers: Markers::empty().add_if_absent(Marker::Semicolon),
            }
        } else {
            self.cursor = save_cursor;
            RightPadded::new(element)
        }
    }

    /// The cursor may never end up short of a visited node's own end offset;
    /// a non-empty suffix may already have moved it past.
    fn clamp_to(&mut self, range: ast::SrcRange) {
        self.cursor = self.cursor.max(range.end);
    }
}

fn modifier_keyword(kind: &ast::ModifierKind) -> Option<(&'static str, ModifierKeyword)> {
    let keyword = match kind {
        ast::ModifierKind::Public => ModifierKeyword::Public,
        ast::ModifierKind::Private => ModifierKeyword::Private,
        ast::ModifierKind::Protected => ModifierKeyword::Protected,
        ast::ModifierKind::Internal => ModifierKeyword::Internal,
        ast::ModifierKind::Open => ModifierKeyword::Open,
        ast::ModifierKind::Final => ModifierKeyword::Final,
        ast::ModifierKind::Abstract => ModifierKeyword::Abstract,
        ast::ModifierKind::Sealed => ModifierKeyword::Sealed,
        ast::ModifierKind::Override => ModifierKeyword::Override,
        ast::ModifierKind::Data => ModifierKeyword::Data,
        ast::ModifierKind::Annotation { .. } => return None,
    };
    kind.keyword().map(|word| (word, keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lst::printer;
    use crate::parser;

    fn build_from(source: &str) -> SourceFile {
        let file = parser::parse("test.kd", source).unwrap();
        build(source, &file).unwrap()
    }

    #[test]
    fn test_scanner_skips_comments() {
        let mut b = TreeBuilder::new("a /* } */ }");
        b.cursor = 1;
        let space = b.source_before("}");
        assert_eq!(space.print(), " /* } */ ");
        assert_eq!(b.cursor, 11);
    }

    #[test]
    fn test_scanner_skips_strings_and_chars() {
        // the comma inside the string literal is not a match
        let b = TreeBuilder::new("\",\" ,");
        assert_eq!(b.position_of_next(","), Some(4));

        let b = TreeBuilder::new("','  ,");
        assert_eq!(b.position_of_next(","), Some(5));

        // an escaped quote does not end the string
        let b = TreeBuilder::new("\"a\\\",b\" ,");
        assert_eq!(b.position_of_next(","), Some(8));
    }

    #[test]
    fn test_scanner_delimiter_not_found() {
        let mut b = TreeBuilder::new("no braces here");
        let space = b.source_before("{");
        assert!(space.is_empty());
        assert_eq!(b.cursor, 0, "cursor must not move on a failed scan");
    }

    #[test]
    fn test_whitespace_stops_at_significant() {
        let mut b = TreeBuilder::new("  // note\n  fun");
        let space = b.whitespace();
        assert_eq!(space.print(), "  // note\n  ");
        assert_eq!(&b.source[b.cursor..], "fun");
    }

    #[test]
    fn test_build_captures_semicolon_marker() {
        let tree = build_from("fun f() {\n    g();\n    h()\n}\n");
        match &tree.statements[0].element {
            Stmt::Function(f) => {
                let body = f.body.as_ref().unwrap();
                assert!(body.statements[0].markers.contains(Marker::Semicolon));
                assert!(!body.statements[1].markers.contains(Marker::Semicolon));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_build_empty_class_body_marker() {
        let tree = build_from("class A\n");
        match &tree.statements[0].element {
            Stmt::Class(c) => assert!(c.body.markers.contains(Marker::EmptyBody)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_build_roundtrip_smoke() {
        let source = "package a.b\n\nclass A {\n    fun f(x: Int) { // go\n        g(x);\n    }\n}\n";
        let tree = build_from(source);
        assert_eq!(printer::print(&tree), source);
    }

    #[test]
    fn test_mismatched_semantic_tree_fails() {
        // a hand-built semantic tree whose identifier does not occur in the
        // source must abort construction, not produce a corrupt tree
        let file = parser::parse("test.kd", "fun f() {}\n").unwrap();
        let err = build("fun g() {}\n", &file).unwrap_err();
        assert!(matches!(err, KaedeError::UnsupportedConstruct { .. }));
    }
}
