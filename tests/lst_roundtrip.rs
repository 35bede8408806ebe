//! Round-trip guarantees of the lossless tree: parsing a file, building the
//! tree and printing it back must reproduce the input byte for byte.

use kaede::lst::{self, Marker, Stmt};
use kaede::parser;

fn roundtrip(source: &str) {
    let file = parser::parse("roundtrip.kd", source)
        .unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
    let tree = lst::build(source, &file)
        .unwrap_or_else(|e| panic!("build failed for {source:?}: {e}"));
    let printed = lst::print(&tree);
    assert_eq!(printed, source, "re-serialization must be byte-identical");
}

#[test]
fn roundtrip_minimal() {
    roundtrip("");
    roundtrip("\n");
    roundtrip("class A\n");
    roundtrip("class A {}\n");
    roundtrip("fun main() {}\n");
}

#[test]
fn roundtrip_package_and_imports() {
    roundtrip("package org.example\n");
    roundtrip("package org.example;\n");
    roundtrip("package a . b\n\nimport a.b.C\nimport a.b.util.*\n");
    roundtrip("import x.Y;\nimport x.z.*;\n");
}

#[test]
fn roundtrip_comments_everywhere() {
    roundtrip("// leading file comment\nclass A {}\n");
    roundtrip("/* header */\npackage a.b\n\n// note\nclass A {\n    // inner\n    fun f() {} // trailing\n}\n");
    roundtrip("class A /* between */ {\n    /* before member */ fun f() {}\n}\n");
    roundtrip("fun f(/* doc */ x: Int) {}\n");
    roundtrip("/* outer /* nested */ still comment */\nclass A {}\n");
}

#[test]
fn roundtrip_odd_spacing_is_kept() {
    roundtrip("class  A   {\n\n\n}\n");
    roundtrip("fun   f(  a:   Int ,  b: String  )  :  Int   {\n    return  a\n}\n");
    roundtrip("val  x   =  1\n");
    roundtrip("class A {\n\tfun f() {\n\t\tg( )\n\t}\n}\n");
}

#[test]
fn roundtrip_crlf_line_endings() {
    roundtrip("class A {\r\n    fun f() {\r\n        g()\r\n    }\r\n}\r\n");
    roundtrip("package a.b\r\n\r\nclass A\r\n");
}

#[test]
fn roundtrip_statements_and_expressions() {
    roundtrip("fun f() {\n    val x: Int = 1 + 2 * 3\n    var y = x == 4\n    if (y) g(); else h()\n    return x\n}\n");
    roundtrip("fun f() {\n    builder\n        .first()\n        .second(1, \"two\")\n}\n");
    roundtrip("fun f() {\n    items.forEach({ x -> print(x) })\n}\n");
    roundtrip("fun f() {\n    val g = { a, b -> a }\n    val h = { make() }\n}\n");
    roundtrip("fun f() {\n    if (a == b) {\n        c()\n    } else {\n        d()\n    }\n}\n");
    roundtrip("fun f() {\n    return (1 + 2) * 3\n}\n");
}

#[test]
fn roundtrip_declarations() {
    roundtrip("@Suppress(\"all\")\nprivate open class A<T, U> {\n    override fun f(x: T): U {}\n}\n");
    roundtrip("interface I {\n    fun f(name: String): Int\n}\n");
    roundtrip("data class Point {\n    val x: Int = 0;\n    val y: Int = 0;\n}\n");
    roundtrip("fun f(xs: Map<String, List<Int>>) {}\n");
    roundtrip("class A {\n    fun f(a: Int = 1, b: String = \"two\") {}\n}\n");
}

#[test]
fn roundtrip_string_contents_untouched() {
    roundtrip("fun f() {\n    g(\"  spaced  out  \")\n    h(\"// not a comment\")\n    i(\"}\")\n}\n");
}

#[test]
fn semicolon_is_a_marker_not_a_node() {
    let source = "fun f() {\n    g();\n    h()\n}\n";
    let file = parser::parse("semi.kd", source).unwrap();
    let tree = lst::build(source, &file).unwrap();

    let Stmt::Function(f) = &tree.statements[0].element else {
        panic!("expected a function");
    };
    let body = f.body.as_ref().unwrap();
    assert!(body.statements[0].markers.contains(Marker::Semicolon));
    assert!(!body.statements[1].markers.contains(Marker::Semicolon));
    // the marker is part of the padding, so printing restores the `;`
    assert_eq!(lst::print(&tree), source);
}

#[test]
fn elided_class_body_is_a_marker() {
    let source = "class A\n\nclass B {}\n";
    let file = parser::parse("elided.kd", source).unwrap();
    let tree = lst::build(source, &file).unwrap();

    let Stmt::Class(a) = &tree.statements[0].element else {
        panic!("expected a class");
    };
    let Stmt::Class(b) = &tree.statements[1].element else {
        panic!("expected a class");
    };
    assert!(a.body.markers.contains(Marker::EmptyBody));
    assert!(!b.body.markers.contains(Marker::EmptyBody));
    assert_eq!(lst::print(&tree), source);
}

#[test]
fn build_failure_reports_offset() {
    // the semantic tree disagrees with the source text
    let file = parser::parse("bad.kd", "fun f() {}\n").unwrap();
    let err = lst::build("fun other() {}\n", &file).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("offset"), "unhelpful error: {message}");
}
