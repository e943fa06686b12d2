//! Abstract Syntax Tree for the FTL format.
//!
//! All nodes borrow from the source string handed to
//! [`parser::parse`](crate::parser::parse); an AST is cheap to produce and
//! cheap to clone, and it serializes back to FTL via
//! [`serializer`](crate::serializer).
//!
//! The tree is a plain tagged data model. Consumers are expected to match
//! exhaustively; there is no visitor machinery.

/// A parsed FTL file: an ordered list of entries and junk slices.
///
/// Order is preserved for round-trip tooling. Recovery diagnostics travel
/// separately, next to the resource, as a `Vec<ParserError>`.
#[derive(Debug, PartialEq, Clone)]
pub struct Resource<'ast> {
    pub body: Vec<ResourceEntry<'ast>>,
}

/// A top-level slot in a [`Resource`]: either a well-formed entry or a raw
/// slice of source skipped during error recovery.
#[derive(Debug, PartialEq, Clone)]
pub enum ResourceEntry<'ast> {
    Entry(Entry<'ast>),
    Junk(&'ast str),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Entry<'ast> {
    Message(Message<'ast>),
    Term(Term<'ast>),
    Comment(Comment<'ast>),
}

/// A translatable unit addressable from the outside.
///
/// Holds a value pattern, at least one attribute, or both; the parser
/// rejects a message with neither (E0005).
#[derive(Debug, PartialEq, Clone)]
pub struct Message<'ast> {
    pub id: Identifier<'ast>,
    pub value: Option<Pattern<'ast>>,
    pub attributes: Vec<Attribute<'ast>>,
    pub comment: Option<Comment<'ast>>,
}

/// A private entry, written `-id` in source and referenced only from other
/// patterns. The stored identifier omits the `-` sigil. A term always has a
/// value pattern (E0006).
#[derive(Debug, PartialEq, Clone)]
pub struct Term<'ast> {
    pub id: Identifier<'ast>,
    pub value: Pattern<'ast>,
    pub attributes: Vec<Attribute<'ast>>,
    pub comment: Option<Comment<'ast>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Attribute<'ast> {
    pub id: Identifier<'ast>,
    pub value: Pattern<'ast>,
}

/// `[A-Za-z][A-Za-z0-9_-]*`, compared byte-exact and case-sensitive.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Identifier<'ast> {
    pub name: &'ast str,
}

/// The body of a message, term, attribute or variant: interleaved text and
/// placeables. Never empty when present; an entry with no value stores
/// `None` instead of an empty pattern.
#[derive(Debug, PartialEq, Clone)]
pub struct Pattern<'ast> {
    pub elements: Vec<PatternElement<'ast>>,
}

/// Text elements are opaque slices of source with indentation already
/// stripped; escape sequences are only meaningful inside string literals,
/// never in text.
#[derive(Debug, PartialEq, Clone)]
pub enum PatternElement<'ast> {
    TextElement(&'ast str),
    Placeable(Expression<'ast>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression<'ast> {
    InlineExpression(InlineExpression<'ast>),
    SelectExpression {
        selector: InlineExpression<'ast>,
        variants: Vec<Variant<'ast>>,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub enum InlineExpression<'ast> {
    /// `"…"` — the slice between the quotes, escapes validated but not yet
    /// decoded (see [`unicode::unescape`](crate::unicode::unescape)).
    StringLiteral {
        value: &'ast str,
    },
    /// `-?[0-9]+(\.[0-9]+)?` — kept as the raw lexeme so literals
    /// re-serialize byte-equal.
    NumberLiteral {
        value: &'ast str,
    },
    FunctionReference {
        id: Identifier<'ast>,
        arguments: CallArguments<'ast>,
    },
    MessageReference {
        id: Identifier<'ast>,
        attribute: Option<Identifier<'ast>>,
    },
    TermReference {
        id: Identifier<'ast>,
        attribute: Option<Identifier<'ast>>,
        arguments: Option<CallArguments<'ast>>,
    },
    VariableReference {
        id: Identifier<'ast>,
    },
    Placeable {
        expression: Box<Expression<'ast>>,
    },
}

/// Arguments of a function or term call. Named-argument keys are unique
/// within one call and their values are literals only; both rules are
/// enforced at parse time. Term references admit no positional arguments.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct CallArguments<'ast> {
    pub positional: Vec<InlineExpression<'ast>>,
    pub named: Vec<NamedArgument<'ast>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct NamedArgument<'ast> {
    pub name: Identifier<'ast>,
    pub value: InlineExpression<'ast>,
}

/// One `[key] pattern` arm of a select expression. Exactly one variant per
/// select carries `default == true` (E0010/E0015).
#[derive(Debug, PartialEq, Clone)]
pub struct Variant<'ast> {
    pub key: VariantKey<'ast>,
    pub value: Pattern<'ast>,
    pub default: bool,
}

#[derive(Debug, PartialEq, Clone)]
pub enum VariantKey<'ast> {
    Identifier { name: &'ast str },
    NumberLiteral { value: &'ast str },
}

#[derive(Debug, PartialEq, Clone)]
pub struct Comment<'ast> {
    pub comment_type: CommentType,
    pub content: Vec<&'ast str>,
}

/// Comment severity: `#` line, `##` group, `###` resource.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CommentType {
    Regular,
    Group,
    Resource,
}
