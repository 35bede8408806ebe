//! Re-serialization of the lossless tree.
//!
//! Printing an untouched tree reproduces the original source byte for byte,
//! line endings included. Only the `Space` values and captured token text are
//! emitted; nothing is normalized.

use super::marker::Marker;
use super::node::*;

pub fn print(file: &SourceFile) -> String {
    let mut out = String::new();

    if let Some(package) = &file.package {
        print_package(&package.element, &mut out);
        print_padding_end(package, &mut out);
    }
    for import in &file.imports {
        print_import(&import.element, &mut out);
        print_padding_end(import, &mut out);
    }
    for stmt in &file.statements {
        print_stmt(&stmt.element, &mut out);
        print_padding_end(stmt, &mut out);
    }
    file.eof.print_into(&mut out);

    out
}

/// Trailing space of a right-padded element, plus the `;` its marker records.
fn print_padding_end<T>(padded: &RightPadded<T>, out: &mut String) {
    padded.after.print_into(out);
    if padded.markers.contains(Marker::Semicolon) {
        out.push(';');
    }
}

fn print_package(package: &PackageDecl, out: &mut String) {
    package.prefix.print_into(out);
    out.push_str("package");
    print_qualified_name(&package.name, out);
}

fn print_import(import: &ImportDecl, out: &mut String) {
    import.prefix.print_into(out);
    out.push_str("import");
    print_qualified_name(&import.name, out);
}

fn print_qualified_name(name: &QualifiedName, out: &mut String) {
    for part in &name.parts {
        if let Some(dot) = &part.dot {
            dot.print_into(out);
            out.push('.');
        }
        part.ident.prefix.print_into(out);
        out.push_str(&part.ident.name);
    }
}

fn print_stmt(stmt: &Stmt, out: &mut String) {
    match stmt {
        Stmt::Class(c) => print_class(c, out),
        Stmt::Function(f) => print_function(f, out),
        Stmt::Variable(v) => print_variable(v, out),
        Stmt::Expr(e) => print_expr(e, out),
        Stmt::Return(r) => print_return(r, out),
        Stmt::If(i) => print_if(i, out),
        Stmt::Block(b) => print_block(b, out),
    }
}

fn print_class(class: &ClassDecl, out: &mut String) {
    class.prefix.print_into(out);
    print_modifiers(&class.modifiers, out);
    class.kind.prefix.print_into(out);
    out.push_str(class.kind.kind.keyword());
    class.name.prefix.print_into(out);
    out.push_str(&class.name.name);

    if let Some(type_params) = &class.type_params {
        type_params.before.print_into(out);
        out.push('<');
        print_elements(&type_params.elements, out, |param, out| {
            param.prefix.print_into(out);
            out.push_str(&param.name);
        });
        out.push('>');
    }

    print_block(&class.body, out);
}

/// Header text of a function declaration up to and including the opening
/// parenthesis; the indentation engine uses it to compute alignment columns
/// for wrapped parameter lists.
pub(crate) fn function_header(
    prefix: &super::space::Space,
    modifiers: &[DeclModifier],
    kw: &super::space::Space,
    name: &Identifier,
    params_before: &super::space::Space,
) -> String {
    let mut out = String::new();
    prefix.print_into(&mut out);
    print_modifiers(modifiers, &mut out);
    kw.print_into(&mut out);
    out.push_str("fun");
    name.prefix.print_into(&mut out);
    out.push_str(&name.name);
    params_before.print_into(&mut out);
    out.push('(');
    out
}

fn print_modifiers(modifiers: &[DeclModifier], out: &mut String) {
    for modifier in modifiers {
        match modifier {
            DeclModifier::Keyword(m) => {
                m.prefix.print_into(out);
                out.push_str(m.kind.keyword());
            }
            DeclModifier::Annotation(a) => {
                a.prefix.print_into(out);
                out.push('@');
                a.name.prefix.print_into(out);
                out.push_str(&a.name.name);
                if let Some(args) = &a.args {
                    args.before.print_into(out);
                    out.push('(');
                    print_elements(args.elements.as_slice(), out, print_expr_ref);
                    out.push(')');
                }
            }
        }
    }
}

fn print_function(function: &FunctionDecl, out: &mut String) {
    function.prefix.print_into(out);
    print_modifiers(&function.modifiers, out);
    function.kw.print_into(out);
    out.push_str("fun");
    function.name.prefix.print_into(out);
    out.push_str(&function.name.name);

    function.params.before.print_into(out);
    out.push('(');
    print_elements(&function.params.elements, out, |item, out| match item {
        ParamItem::Param(param) => print_param(param, out),
        ParamItem::Empty(empty) => empty.prefix.print_into(out),
    });
    out.push(')');

    if let Some(return_type) = &function.return_type {
        return_type.before.print_into(out);
        out.push(':');
        print_type_ref(&return_type.element, out);
    }
    if let Some(body) = &function.body {
        print_block(body, out);
    }
}

fn print_param(param: &Param, out: &mut String) {
    param.prefix.print_into(out);
    out.push_str(&param.name);
    param.ty.before.print_into(out);
    out.push(':');
    print_type_ref(&param.ty.element, out);
    if let Some(default) = &param.default_value {
        default.before.print_into(out);
        out.push('=');
        print_expr(&default.element, out);
    }
}

fn print_variable(variable: &VariableDecl, out: &mut String) {
    variable.prefix.print_into(out);
    print_modifiers(&variable.modifiers, out);
    variable.kw.print_into(out);
    out.push_str(if variable.mutable { "var" } else { "val" });
    variable.name.prefix.print_into(out);
    out.push_str(&variable.name.name);

    if let Some(ty) = &variable.ty {
        ty.before.print_into(out);
        out.push(':');
        print_type_ref(&ty.element, out);
    }
    if let Some(initializer) = &variable.initializer {
        initializer.before.print_into(out);
        out.push('=');
        print_expr(&initializer.element, out);
    }
}

fn print_type_ref(ty: &TypeRef, out: &mut String) {
    ty.prefix.print_into(out);
    out.push_str(&ty.name);
    if let Some(args) = &ty.type_args {
        args.before.print_into(out);
        out.push('<');
        print_elements(&args.elements, out, |arg, out| print_type_ref(arg, out));
        out.push('>');
    }
}

fn print_block(block: &Block, out: &mut String) {
    if block.markers.contains(Marker::EmptyBody) {
        return;
    }
    block.prefix.print_into(out);
    out.push('{');
    for stmt in &block.statements {
        print_stmt(&stmt.element, out);
        print_padding_end(stmt, out);
    }
    block.end.print_into(out);
    out.push('}');
}

fn print_return(ret: &Return, out: &mut String) {
    ret.prefix.print_into(out);
    out.push_str("return");
    if let Some(expr) = &ret.expr {
        print_expr(expr, out);
    }
}

fn print_if(if_stmt: &If, out: &mut String) {
    if_stmt.prefix.print_into(out);
    out.push_str("if");
    if_stmt.condition.prefix.print_into(out);
    out.push('(');
    print_expr(&if_stmt.condition.tree.element, out);
    if_stmt.condition.tree.after.print_into(out);
    out.push(')');

    print_stmt(&if_stmt.then_part.element, out);
    print_padding_end(&if_stmt.then_part, out);

    if let Some(else_part) = &if_stmt.else_part {
        else_part.prefix.print_into(out);
        out.push_str("else");
        print_stmt(&else_part.body.element, out);
        print_padding_end(&else_part.body, out);
    }
}

fn print_expr(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Literal(literal) => {
            literal.prefix.print_into(out);
            out.push_str(&literal.source);
        }
        Expr::Identifier(ident) => {
            ident.prefix.print_into(out);
            out.push_str(&ident.name);
        }
        Expr::FieldAccess(fa) => {
            fa.prefix.print_into(out);
            print_expr(&fa.target, out);
            fa.name.before.print_into(out);
            out.push('.');
            fa.name.element.prefix.print_into(out);
            out.push_str(&fa.name.element.name);
        }
        Expr::Call(call) => {
            call.prefix.print_into(out);
            if let Some(receiver) = &call.receiver {
                print_expr(&receiver.element, out);
                receiver.after.print_into(out);
                out.push('.');
            }
            call.name.prefix.print_into(out);
            out.push_str(&call.name.name);
            call.args.before.print_into(out);
            out.push('(');
            print_elements(&call.args.elements, out, print_expr_ref);
            out.push(')');
        }
        Expr::Binary(binary) => {
            binary.prefix.print_into(out);
            print_expr(&binary.left, out);
            binary.op.before.print_into(out);
            out.push_str(binary.op.element.symbol());
            print_expr(&binary.right, out);
        }
        Expr::Lambda(lambda) => {
            lambda.prefix.print_into(out);
            out.push('{');
            if let Some(params) = &lambda.params {
                for (i, param) in params.params.iter().enumerate() {
                    param.element.prefix.print_into(out);
                    out.push_str(&param.element.name);
                    param.after.print_into(out);
                    if i + 1 < params.params.len() {
                        out.push(',');
                    } else {
                        out.push_str("->");
                    }
                }
            }
            for stmt in &lambda.statements {
                print_stmt(&stmt.element, out);
                print_padding_end(stmt, out);
            }
            lambda.end.print_into(out);
            out.push('}');
        }
        Expr::Paren(paren) => {
            paren.prefix.print_into(out);
            out.push('(');
            print_expr(&paren.tree.element, out);
            paren.tree.after.print_into(out);
            out.push(')');
        }
        Expr::Empty(empty) => {
            empty.prefix.print_into(out);
        }
    }
}

fn print_expr_ref(expr: &Expr, out: &mut String) {
    print_expr(expr, out);
}

/// Print comma-separated right-padded elements; each `after` is the space
/// before the separator or the closing bracket, which the caller prints.
fn print_elements<T>(
    elements: &[RightPadded<T>],
    out: &mut String,
    mut print_element: impl FnMut(&T, &mut String),
) {
    for (i, element) in elements.iter().enumerate() {
        print_element(&element.element, out);
        element.after.print_into(out);
        if i + 1 < elements.len() {
            out.push(',');
        }
    }
}
