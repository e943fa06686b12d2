use flute_syntax::parser::ParserError;
use thiserror::Error;

pub use crate::resolver::errors::ResolverError;

/// Any error a bundle can hand back to the caller.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum FluentError {
    /// An id was already taken when a resource or function was added; the
    /// first occurrence wins.
    #[error("Attempt to override an existing {kind}: \"{id}\"")]
    Overriding { kind: &'static str, id: String },
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Resolver(#[from] ResolverError),
    /// The builder was asked to produce a bundle without a terminal list
    /// reducer installed.
    #[error("A terminal list reducer function is required")]
    MissingReducer,
}
