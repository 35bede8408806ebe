use anyhow::Context;
use kaede::lst::{self, FileVisitor, IndentStyle, IndentVisitor};
use kaede::parser;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/sample.kd".to_string());
    let source = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;

    let file = parser::parse(&path, &source)?;
    let tree = lst::build(&source, &file)?;

    let style = IndentStyle::default();
    let formatted = IndentVisitor::new(&style).visit_file(tree);

    print!("{}", lst::print(&formatted));
    Ok(())
}
