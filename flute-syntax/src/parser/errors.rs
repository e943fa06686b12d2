use std::ops::Range;

use thiserror::Error;

/// A recovery diagnostic produced while parsing.
///
/// Parse errors are non-fatal: the parser records the error, skips to the
/// next entry boundary and keeps the skipped bytes as a
/// [`Junk`](crate::ast::ResourceEntry::Junk) entry. Every error carries a
/// stable `E00xx` code, the byte range it covers and the 1-based line the
/// range starts on.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("{}: {} (line {})", .kind.code(), .kind, .line)]
pub struct ParserError {
    pub kind: ErrorKind,
    pub pos: Range<usize>,
    pub line: usize,
}

impl ParserError {
    pub fn new(kind: ErrorKind, pos: Range<usize>, line: usize) -> Self {
        Self { kind, pos, line }
    }

    /// The stable error code, e.g. `"E0003"`.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// The closed set of parser diagnostics.
///
/// Codes are part of the public interface and never change meaning between
/// releases.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    #[error("Expected a token starting with \"{0}\"")]
    ExpectedToken(char),
    #[error("Expected one of \"{range}\"")]
    ExpectedCharRange { range: String },
    #[error("Expected message \"{entry_id}\" to have a value or attributes")]
    ExpectedMessageField { entry_id: String },
    #[error("Expected term \"-{entry_id}\" to have a value")]
    ExpectedTermField { entry_id: String },
    #[error("The callee has to be an upper-case identifier")]
    ForbiddenCallee,
    #[error("Expected one of the variants to be marked as default (*)")]
    MissingDefaultVariant,
    #[error("Expected a value")]
    ExpectedValue,
    #[error("Only one variant can be marked as default (*)")]
    MultipleDefaultVariants,
    #[error("Message references cannot be used as selectors")]
    MessageReferenceAsSelector,
    #[error("Terms cannot be used as selectors")]
    TermReferenceAsSelector,
    #[error("Attributes of messages cannot be used as selectors")]
    MessageAttributeAsSelector,
    #[error("Unterminated string literal")]
    UnterminatedStringLiteral,
    #[error("Positional arguments must not follow named arguments")]
    PositionalArgumentFollowsNamed,
    #[error("Named arguments must be literals")]
    ExpectedLiteral,
    #[error("The \"{0}\" argument appears twice")]
    DuplicatedNamedArgument(String),
    #[error("Unknown escape sequence: \\{0}")]
    UnknownEscapeSequence(char),
    #[error("Invalid unicode escape sequence: {0}")]
    InvalidUnicodeEscapeSequence(String),
    #[error("Unbalanced closing brace")]
    UnbalancedClosingBrace,
    #[error("Expected an inline expression")]
    ExpectedInlineExpression,
    #[error("Expected a simple expression as selector")]
    ExpectedSimpleExpressionAsSelector,
    #[error("Positional arguments are not allowed on term references")]
    PositionalArgumentsOnTermReference,
    #[error("Expected a variant after \"->\"")]
    ExpectedVariant,
}

impl ErrorKind {
    /// The stable `E00xx` code for this diagnostic.
    pub fn code(&self) -> &'static str {
        use ErrorKind::*;
        match self {
            ExpectedToken(..) => "E0003",
            ExpectedCharRange { .. } => "E0004",
            ExpectedMessageField { .. } => "E0005",
            ExpectedTermField { .. } => "E0006",
            ForbiddenCallee => "E0008",
            MissingDefaultVariant => "E0010",
            ExpectedValue => "E0012",
            MultipleDefaultVariants => "E0015",
            MessageReferenceAsSelector => "E0016",
            TermReferenceAsSelector | MessageAttributeAsSelector => "E0017",
            UnterminatedStringLiteral => "E0020",
            PositionalArgumentFollowsNamed => "E0021",
            ExpectedLiteral | DuplicatedNamedArgument(..) => "E0022",
            UnknownEscapeSequence(..) => "E0025",
            InvalidUnicodeEscapeSequence(..) => "E0026",
            UnbalancedClosingBrace => "E0027",
            ExpectedInlineExpression => "E0028",
            ExpectedSimpleExpressionAsSelector => "E0029",
            PositionalArgumentsOnTermReference => "E0031",
            ExpectedVariant => "E0032",
        }
    }
}
