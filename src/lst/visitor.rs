//! The contract under which a host engine invokes tree transformations.

use super::node::SourceFile;

/// Visit a file, return its replacement. Implementations must return a tree
/// of the same shape; the host engine is responsible for scheduling repeated
/// passes until a fixed point and for final re-serialization.
pub trait FileVisitor {
    fn visit_file(&mut self, file: SourceFile) -> SourceFile;
}
