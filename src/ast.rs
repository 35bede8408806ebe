//! The resolved semantic tree produced by the front end.
//!
//! These nodes are what a compiler keeps: declarations, statements and
//! expressions with their source byte offsets, and nothing else. Whitespace
//! and comments are discarded during parsing; the lossless tree builder in
//! [`crate::lst`] re-scans the raw source to recover them, using the offsets
//! here only to bound how far the cursor may legally advance.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into the source text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SrcRange {
    pub start: usize,
    pub end: usize,
}

impl SrcRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width range, used for synthetic nodes that have no source text.
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A single source file.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct File {
    pub name: String,
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub declarations: Vec<Decl>,
    pub range: SrcRange,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackageDecl {
    /// Dot-joined qualified name, e.g. `org.example.app`.
    pub name: String,
    pub range: SrcRange,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImportDecl {
    pub path: String,
    /// `import a.b.*`
    pub all_under: bool,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Decl {
    Class(ClassDecl),
    Function(FunctionDecl),
    Property(PropertyDecl),
}

impl Decl {
    pub fn range(&self) -> SrcRange {
        match self {
            Decl::Class(c) => c.range,
            Decl::Function(f) => f.range,
            Decl::Property(p) => p.range,
        }
    }

    /// Compiler-inserted nodes with no lexical analogue in the source.
    /// The front end generates a primary constructor for every class; the
    /// lossless tree builder must filter these before recursing.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Decl::Function(f) if f.synthetic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassDecl {
    pub modifiers: Vec<Modifier>,
    pub kind: ClassKind,
    pub name: String,
    pub type_params: Vec<String>,
    /// Members in source order, including the generated primary constructor.
    pub members: Vec<Decl>,
    /// `false` when the class has no `{ ... }` in source at all.
    pub has_body: bool,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionDecl {
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeRef>,
    pub body: Option<Block>,
    pub synthetic: bool,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<Expr>,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PropertyDecl {
    pub modifiers: Vec<Modifier>,
    /// `var` when true, `val` otherwise.
    pub mutable: bool,
    pub name: String,
    pub ty: Option<TypeRef>,
    pub initializer: Option<Expr>,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Modifier {
    pub kind: ModifierKind,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModifierKind {
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
    /// `@Name` or `@Name(args)`; `args` is `None` when no parentheses were
    /// written at all, `Some(vec![])` for an explicit empty list.
    Annotation {
        name: String,
        args: Option<Vec<Expr>>,
    },
}

impl ModifierKind {
    /// Keyword text as it appears in source; annotations have none.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            ModifierKind::Public => Some("public"),
            ModifierKind::Private => Some("private"),
            ModifierKind::Protected => Some("protected"),
            ModifierKind::Internal => Some("internal"),
            ModifierKind::Open => Some("open"),
            ModifierKind::Final => Some("final"),
            ModifierKind::Abstract => Some("abstract"),
            ModifierKind::Sealed => Some("sealed"),
            ModifierKind::Override => Some("override"),
            ModifierKind::Data => Some("data"),
            ModifierKind::Annotation { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeRef {
    pub name: String,
    pub type_args: Vec<TypeRef>,
    pub range: SrcRange,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stmt {
    Expr(Expr),
    Property(PropertyDecl),
    Return(ReturnStmt),
    If(Box<IfStmt>),
    Block(Block),
}

impl Stmt {
    pub fn range(&self) -> SrcRange {
        match self {
            Stmt::Expr(e) => e.range(),
            Stmt::Property(p) => p.range,
            Stmt::Return(r) => r.range,
            Stmt::If(i) => i.range,
            Stmt::Block(b) => b.range,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReturnStmt {
    pub expr: Option<Expr>,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Stmt,
    pub else_branch: Option<Stmt>,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    Literal { value: LiteralValue, range: SrcRange },
    Name { name: String, range: SrcRange },
    FieldAccess(Box<FieldAccessExpr>),
    Call(Box<CallExpr>),
    Binary(Box<BinaryExpr>),
    Lambda(Box<LambdaExpr>),
    Paren { inner: Box<Expr>, range: SrcRange },
}

impl Expr {
    pub fn range(&self) -> SrcRange {
        match self {
            Expr::Literal { range, .. } => *range,
            Expr::Name { range, .. } => *range,
            Expr::FieldAccess(f) => f.range,
            Expr::Call(c) => c.range,
            Expr::Binary(b) => b.range,
            Expr::Lambda(l) => l.range,
            Expr::Paren { range, .. } => *range,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldAccessExpr {
    pub target: Expr,
    pub name: String,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CallExpr {
    pub receiver: Option<Expr>,
    pub name: String,
    pub args: Vec<Expr>,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinaryExpr {
    pub left: Expr,
    pub op: BinaryOp,
    pub right: Expr,
    pub range: SrcRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    LessOrEqual,
    GreaterOrEqual,
    Less,
    Greater,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::GreaterOrEqual => ">=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LambdaExpr {
    pub params: Vec<String>,
    pub statements: Vec<Stmt>,
    pub range: SrcRange,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LiteralValue {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}
