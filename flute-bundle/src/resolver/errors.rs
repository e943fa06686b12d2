use thiserror::Error;

/// A failure recorded while resolving a pattern.
///
/// Resolution errors never abort a `format` call: each one is appended to
/// the scope's error list and an error value is placed in the output at the
/// failure site.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ResolverError {
    #[error("Unknown message: '{id}'")]
    UnknownMessage { id: String },
    #[error("Unknown term: -{id}")]
    UnknownTerm { id: String },
    #[error("Unknown variable: ${id}")]
    UnknownVariable { id: String },
    #[error("Unknown attribute: {entry}.{attribute}")]
    UnknownAttribute { entry: String, attribute: String },
    #[error("Unknown function: {id}()")]
    UnknownFunction { id: String },
    #[error("No pattern specified for message: '{id}'")]
    NoValue { id: String },
    #[error("Cyclic reference detected")]
    Cyclic,
    #[error("Too many placeable expansions")]
    TooManyPlaceables,
    #[error("{func}(): {message}")]
    Function { func: String, message: String },
}
