//! Lossless tree node definitions.
//!
//! Every node owns its leading [`Space`] and any delimiter spacing through
//! the padding wrappers, so that printing a tree reproduces the original
//! source byte for byte. Nodes are immutable values: a transformation clones
//! and replaces fields, sharing untouched children, so multiple passes can
//! hold references to earlier versions safely.

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::{BinaryOp, LiteralValue};

use super::marker::Markers;
use super::space::Space;

/// Identity token, fresh per construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeId(u64);

impl TreeId {
    pub fn next() -> TreeId {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        TreeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An element followed by trailing space up to (not including) a delimiter,
/// e.g. a parameter and the space before the comma after it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RightPadded<T> {
    pub element: T,
    pub after: Space,
    pub markers: Markers,
}

impl<T> RightPadded<T> {
    pub fn new(element: T) -> Self {
        Self {
            element,
            after: Space::empty(),
            markers: Markers::empty(),
        }
    }
}

/// Space preceding a delimiter that introduces an element, e.g. the `=`
/// before an initializer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeftPadded<T> {
    pub before: Space,
    pub element: T,
}

impl<T> LeftPadded<T> {
    pub fn new(before: Space, element: T) -> Self {
        Self { before, element }
    }
}

/// A bracketed, delimiter-separated list: `before` is the space before the
/// opening bracket, each element's `after` holds the space before the comma
/// or the closing bracket.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container<T> {
    pub before: Space,
    pub elements: Vec<RightPadded<T>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceFile {
    pub id: TreeId,
    pub markers: Markers,
    pub name: String,
    pub package: Option<RightPadded<PackageDecl>>,
    pub imports: Vec<RightPadded<ImportDecl>>,
    pub statements: Vec<RightPadded<Stmt>>,
    /// Trailing trivia after the last statement.
    pub eof: Space,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackageDecl {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub name: QualifiedName,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImportDecl {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub name: QualifiedName,
}

/// Dotted name with the spacing around every dot preserved, so
/// `org . example` round-trips.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QualifiedName {
    pub parts: Vec<NamePart>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamePart {
    /// Space before the `.` introducing this part; `None` on the first part.
    pub dot: Option<Space>,
    pub ident: Identifier,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Identifier {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stmt {
    Class(ClassDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
    Expr(Expr),
    Return(Return),
    If(Box<If>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassDecl {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub modifiers: Vec<DeclModifier>,
    pub kind: ClassKind,
    pub name: Identifier,
    pub type_params: Option<Container<TypeParam>>,
    /// Carries an `EmptyBody` marker when the class had no braces at all.
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassKind {
    /// Space before the `class`/`interface` keyword.
    pub prefix: Space,
    pub kind: ClassKindType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClassKindType {
    Class,
    Interface,
}

impl ClassKindType {
    pub fn keyword(&self) -> &'static str {
        match self {
            ClassKindType::Class => "class",
            ClassKindType::Interface => "interface",
        }
    }
}

/// Modifier-list entry, keeping keyword modifiers and annotations in their
/// original interleaving.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeclModifier {
    Keyword(Modifier),
    Annotation(Annotation),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Modifier {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub kind: ModifierKeyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModifierKeyword {
    Public,
    Private,
    Protected,
    Internal,
    Open,
    Final,
    Abstract,
    Sealed,
    Override,
    Data,
}

impl ModifierKeyword {
    pub fn keyword(&self) -> &'static str {
        match self {
            ModifierKeyword::Public => "public",
            ModifierKeyword::Private => "private",
            ModifierKeyword::Protected => "protected",
            ModifierKeyword::Internal => "internal",
            ModifierKeyword::Open => "open",
            ModifierKeyword::Final => "final",
            ModifierKeyword::Abstract => "abstract",
            ModifierKeyword::Sealed => "sealed",
            ModifierKeyword::Override => "override",
            ModifierKeyword::Data => "data",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Annotation {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    /// Name after the `@`; its prefix is the (rare) space between them.
    pub name: Identifier,
    /// `None` when the annotation had no argument list at all.
    pub args: Option<Container<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeParam {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionDecl {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub modifiers: Vec<DeclModifier>,
    /// Space before the `fun` keyword.
    pub kw: Space,
    pub name: Identifier,
    pub params: Container<ParamItem>,
    /// The space before the `:`; the type carries the space after it.
    pub return_type: Option<LeftPadded<TypeRef>>,
    pub body: Option<Block>,
}

/// A parameter position; `Empty` stands in for the space inside `()` when
/// the list has no parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamItem {
    Param(Param),
    Empty(Empty),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub name: String,
    pub ty: LeftPadded<TypeRef>,
    pub default_value: Option<LeftPadded<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariableDecl {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub modifiers: Vec<DeclModifier>,
    /// Space before the `val`/`var` keyword.
    pub kw: Space,
    pub mutable: bool,
    pub name: Identifier,
    pub ty: Option<LeftPadded<TypeRef>>,
    pub initializer: Option<LeftPadded<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeRef {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub name: String,
    pub type_args: Option<Container<TypeRef>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Block {
    pub id: TreeId,
    /// Space before the `{`.
    pub prefix: Space,
    pub markers: Markers,
    pub statements: Vec<RightPadded<Stmt>>,
    /// Space before the `}`.
    pub end: Space,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Return {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub expr: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct If {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub condition: ControlParens,
    pub then_part: RightPadded<Stmt>,
    pub else_part: Option<Else>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlParens {
    /// Space before the `(`.
    pub prefix: Space,
    /// The condition; its `after` is the space before the `)`.
    pub tree: RightPadded<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Else {
    /// Space before the `else` keyword.
    pub prefix: Space,
    pub body: RightPadded<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    Literal(Literal),
    Identifier(Identifier),
    FieldAccess(Box<FieldAccess>),
    Call(Box<Call>),
    Binary(Box<Binary>),
    Lambda(Box<Lambda>),
    Paren(Box<Paren>),
    Empty(Empty),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Literal {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub value: LiteralValue,
    /// Exact source text of the literal, quotes and all.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldAccess {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub target: Expr,
    /// `before` is the space before the `.`; the identifier's prefix is the
    /// space after it.
    pub name: LeftPadded<Identifier>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    /// Receiver of a method call; its `after` is the space before the `.`.
    pub receiver: Option<RightPadded<Expr>>,
    pub name: Identifier,
    pub args: Container<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    pub left: Expr,
    pub op: LeftPadded<BinaryOp>,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lambda {
    pub id: TreeId,
    /// Space before the `{`.
    pub prefix: Space,
    pub markers: Markers,
    pub params: Option<LambdaParams>,
    pub statements: Vec<RightPadded<Stmt>>,
    /// Space before the `}`.
    pub end: Space,
}

/// Lambda parameter list; the last element's `after` is the space before the
/// `->`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LambdaParams {
    pub params: Vec<RightPadded<Identifier>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paren {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
    /// The inner expression; its `after` is the space before the `)`.
    pub tree: RightPadded<Expr>,
}

/// A zero-width element holding the space inside empty brackets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Empty {
    pub id: TreeId,
    pub prefix: Space,
    pub markers: Markers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_ids_are_fresh() {
        assert_ne!(TreeId::next(), TreeId::next());
    }
}
