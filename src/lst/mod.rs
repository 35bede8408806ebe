//! Lossless syntax tree: construction, printing and re-indentation.
//!
//! The tree preserves every byte of the original source, including comments
//! and insignificant whitespace. [`builder`] reconstructs it from raw source
//! plus the resolved semantic tree; [`printer`] serializes it back;
//! [`indent`] rewrites only the whitespace according to an [`IndentStyle`].

pub mod builder;
pub mod indent;
pub mod marker;
pub mod node;
pub mod printer;
pub mod space;
pub mod style;
pub mod visitor;

pub use builder::build;
pub use indent::IndentVisitor;
pub use marker::{Marker, Markers};
pub use node::*;
pub use printer::print;
pub use space::{Comment, Space};
pub use style::{FunctionDeclarationParameters, IndentStyle};
pub use visitor::FileVisitor;
