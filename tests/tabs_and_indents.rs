//! Re-indentation scenarios: block indent, continuation indent, parameter
//! alignment, comment realignment and the tab/space policy.

use kaede::lst::{self, FileVisitor, IndentStyle, IndentVisitor};
use kaede::parser;

/// Format `source` with `style` and compare against `expected`, reporting
/// the first differing line on failure.
fn assert_formatted_with(style: &IndentStyle, source: &str, expected: &str) {
    let file = parser::parse("fmt.kd", source)
        .unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
    let tree = lst::build(source, &file)
        .unwrap_or_else(|e| panic!("build failed for {source:?}: {e}"));

    let formatted = IndentVisitor::new(style).visit_file(tree);
    let actual = lst::print(&formatted);

    if actual != expected {
        let actual_lines: Vec<&str> = actual.lines().collect();
        let expected_lines: Vec<&str> = expected.lines().collect();
        for i in 0..actual_lines.len().max(expected_lines.len()) {
            let a = actual_lines.get(i).copied().unwrap_or("<missing>");
            let e = expected_lines.get(i).copied().unwrap_or("<missing>");
            if a != e {
                panic!(
                    "formatted output differs at line {}:\n  expected: {e:?}\n  actual:   {a:?}\n\nfull output:\n{actual}",
                    i + 1
                );
            }
        }
        panic!("formatted output differs only in line endings:\n{actual:?}\nvs\n{expected:?}");
    }

    // formatting is idempotent: a second pass must change nothing
    let file = parser::parse("fmt.kd", &actual).unwrap();
    let tree = lst::build(&actual, &file).unwrap();
    let again = lst::print(&IndentVisitor::new(style).visit_file(tree));
    assert_eq!(again, actual, "second formatting pass must be a no-op");
}

fn assert_formatted(source: &str, expected: &str) {
    assert_formatted_with(&IndentStyle::default(), source, expected);
}

#[test]
fn block_misindentation() {
    // the second call only looks like it is guarded by the `if`; it belongs
    // to the enclosing block
    assert_formatted(
        "fun test() {
    if (true)
    doTheThing();
    doTheThing();
}
",
        "fun test() {
    if (true)
        doTheThing();
    doTheThing();
}
",
    );
}

#[test]
fn guarded_statement_after_blank_line() {
    assert_formatted(
        "fun test() {
    if (true == false)
    doTheThing();

    doTheOtherThing();
    somethingElseEntirely();

    foo();
}
",
        "fun test() {
    if (true == false)
        doTheThing();

    doTheOtherThing();
    somethingElseEntirely();

    foo();
}
",
    );
}

#[test]
fn if_else_with_braces_keeps_brace_indent() {
    assert_formatted(
        "fun test() {
            if (a == b) {
        c()
        } else {
            d()
            }
}
",
        "fun test() {
    if (a == b) {
        c()
    } else {
        d()
    }
}
",
    );
}

#[test]
fn nested_blocks() {
    assert_formatted(
        "class A {
fun f() {
if (x)
g()
}
}
",
        "class A {
    fun f() {
        if (x)
            g()
    }
}
",
    );
}

#[test]
fn align_function_parameters_when_multiple() {
    // wrapped parameters align on the column right after the opening
    // parenthesis
    assert_formatted(
        "class Test {
    private fun firstArgNoPrefix(first: String,
     second: Int,
     third: String) {
    }
}
",
        "class Test {
    private fun firstArgNoPrefix(first: String,
                                 second: Int,
                                 third: String) {
    }
}
",
    );
}

#[test]
fn align_function_parameters_first_on_new_line() {
    // when the first parameter already starts on its own line, the whole
    // list takes continuation indent
    assert_formatted(
        "class Test {
    private fun firstArgOnNewLine(
     first: String,
     second: Int,
     third: String) {
    }
}
",
        "class Test {
    private fun firstArgOnNewLine(
            first: String,
            second: Int,
            third: String) {
    }
}
",
    );
}

#[test]
fn continuation_indent_for_parameters_when_alignment_off() {
    let style = IndentStyle::default().with_align_parameters(false);
    assert_formatted_with(
        &style,
        "class Test {
    private fun firstArgNoPrefix(first: String,
                                 second: Int,
                                 third: String) {
    }
}
",
        "class Test {
    private fun firstArgNoPrefix(first: String,
            second: Int,
            third: String) {
    }
}
",
    );
}

#[test]
fn method_chain_continuation() {
    assert_formatted(
        "fun f() {
    builder
    .first()
    .second()
}
",
        "fun f() {
    builder
            .first()
            .second()
}
",
    );
}

#[test]
fn binary_expression_continuation() {
    assert_formatted(
        "fun f() {
    val x = 1 +
    2
}
",
        "fun f() {
    val x = 1 +
            2
}
",
    );
}

#[test]
fn lambda_body_indents_one_level() {
    assert_formatted(
        "fun f() {
    val g = {
    make()
    }
}
",
        "fun f() {
    val g = {
        make()
    }
}
",
    );
}

#[test]
fn column_zero_line_comment_is_kept() {
    // a commented-out directive at column 0 is intentional; the code around
    // it still reindents
    assert_formatted(
        "fun f() {
// keep me
        g()
}
",
        "fun f() {
// keep me
    g()
}
",
    );
}

#[test]
fn misplaced_line_comment_moves_with_the_code() {
    assert_formatted(
        "fun f() {
            // move me
        g()
}
",
        "fun f() {
    // move me
    g()
}
",
    );
}

#[test]
fn multiline_comment_keeps_internal_alignment() {
    assert_formatted(
        "fun f() {
  /* one
   * two
   */
    g()
}
",
        "fun f() {
    /* one
     * two
     */
    g()
}
",
    );
}

#[test]
fn multiline_comment_with_ragged_margin_shifts_as_a_unit() {
    // interior lines that sit left of the comment opener shift by the same
    // delta, clamped at column zero
    assert_formatted(
        "fun f() {
    if (true)
        foo();
        foo();
    /*
 line-one
line-two
*/
}
",
        "fun f() {
    if (true)
        foo();
    foo();
    /*
 line-one
line-two
*/
}
",
    );
}

#[test]
fn comment_before_closing_brace_aligns_with_statements() {
    assert_formatted(
        "fun f() {
    g()
        // why we stopped here
}
",
        "fun f() {
    g()
    // why we stopped here
}
",
    );
}

#[test]
fn tab_round_trip_adds_exactly_one_tab() {
    let style = IndentStyle::default().with_tabs(true);
    assert_formatted_with(
        &style,
        "class A {
\tfun f() {
\t\tg()
\th()
\t}
}
",
        "class A {
\tfun f() {
\t\tg()
\t\th()
\t}
}
",
    );
}

#[test]
fn tab_size_one_produces_depth_tabs() {
    let style = IndentStyle::default()
        .with_tabs(true)
        .with_tab_size(1)
        .with_indent_size(1);
    assert_formatted_with(
        &style,
        "class A {
fun f() {
g()
}
}
",
        "class A {
\tfun f() {
\t\tg()
\t}
}
",
    );
}

#[test]
fn crlf_line_endings_are_preserved() {
    assert_formatted(
        "class A {\r\n  fun f() {\r\n  g()\r\n  }\r\n}\r\n",
        "class A {\r\n    fun f() {\r\n        g()\r\n    }\r\n}\r\n",
    );
}

#[test]
fn already_formatted_is_untouched() {
    let source = "package org.example

import org.example.util.*

class App {
    val count: Int = 0

    fun greet(name: String): String {
        if (name == \"\")
            fallback();
        return hello(name)
    }
}
";
    assert_formatted(source, source);
}

#[test]
fn blank_lines_between_members_survive() {
    assert_formatted(
        "class A {
        fun f() {}


        fun g() {}
}
",
        "class A {
    fun f() {}


    fun g() {}
}
",
    );
}
