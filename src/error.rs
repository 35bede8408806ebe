use thiserror::Error;

pub type Result<T, E = KaedeError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum KaedeError {
    #[error("parse error at offset {offset}: {message}")]
    Parse { message: String, offset: usize },

    /// The semantic tree claims a construct that cannot be reconciled with
    /// the source text at the cursor. Fatal for the whole file: a half-built
    /// lossless tree is not independently useful.
    #[error("construct not yet supported: {kind} at offset {offset}")]
    UnsupportedConstruct { kind: &'static str, offset: usize },

    #[error("source text remains after building `{name}` at offset {offset}")]
    TrailingSource { name: String, offset: usize },
}
