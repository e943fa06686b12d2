//! The function subsystem.
//!
//! A function is a record of up to three capabilities — `transform`,
//! `selector`, `formatter` — produced by a [`FunctionFactory`] for a
//! concrete `(locale, options)` pair. The bundle caches factory output per
//! `(name, locale, options)` under a size-bounded policy.
//!
//! Error values are always passed through unchanged by transforms; they
//! surface at the placeable layer, and selectors treat an error selector as
//! "match default".

mod boolean;
mod cache;
mod datetime;
mod list;
mod math;
mod number;
mod registry;
mod temporal;
mod text;

pub use boolean::BooleanFactory;
pub use cache::{CachePolicy, FunctionCache};
pub use datetime::DateTimeFactory;
pub use list::ListFactory;
pub use math::{AbsFactory, OffsetFactory, SignFactory};
pub use number::NumberFactory;
pub(crate) use number::select_number;
pub use registry::FunctionRegistry;
pub use temporal::TemporalFieldFactory;
pub use text::{CaseFactory, CountFactory, NumSortFactory, StringSortFactory};

use std::sync::Arc;

use flute_syntax::ast::VariantKey;
use intl_memoizer::concurrent::IntlLangMemoizer;
use thiserror::Error;
use unic_langid::LanguageIdentifier;

use crate::types::{FluentValue, FunctionOptions};

/// What a function sees of the world: the bundle locale and the intl
/// memoizer. Functions are pure and non-blocking.
pub struct FunctionContext<'c> {
    pub locale: &'c LanguageIdentifier,
    pub intls: &'c IntlLangMemoizer,
}

/// An error raised by a function; rendered as `{NAME(): message}`.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum FunctionError {
    #[error("invalid type for option \"{name}\", expected {expected}")]
    InvalidOptionType { name: String, expected: &'static str },
    #[error("invalid value for option \"{name}\": {value}")]
    InvalidOptionValue { name: String, value: String },
    #[error("option \"{name}\" cannot be combined with \"{other}\"")]
    ConflictingOptions { name: String, other: String },
    #[error("option \"{name}\" is required")]
    MissingOption { name: String },
    #[error("{0}")]
    Argument(String),
    #[error("{name} has no {capability} capability")]
    MissingCapability {
        name: String,
        capability: &'static str,
    },
}

/// One positional argument: a single value or a list of values. The
/// distinction survives resolution because functions such as `COUNT` and
/// the terminal reducer treat the two shapes differently.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter<'a> {
    Single(FluentValue<'a>),
    Many(Vec<FluentValue<'a>>),
}

impl<'a> Parameter<'a> {
    pub fn values(&self) -> &[FluentValue<'a>] {
        match self {
            Parameter::Single(value) => std::slice::from_ref(value),
            Parameter::Many(values) => values,
        }
    }
}

/// The resolved arguments of one function invocation. Options are not part
/// of this: they were merged into the function instance at creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParameters<'a> {
    pub positional: Vec<Parameter<'a>>,
}

impl<'a> ResolvedParameters<'a> {
    pub fn flat_values(&self) -> impl Iterator<Item = &FluentValue<'a>> {
        self.positional.iter().flat_map(|parameter| parameter.values().iter())
    }

    /// Total number of values across all positional arguments, list
    /// members included.
    pub fn count(&self) -> usize {
        self.positional
            .iter()
            .map(|parameter| parameter.values().len())
            .sum()
    }

    pub fn first(&self) -> Option<&FluentValue<'a>> {
        self.positional.first().and_then(|parameter| parameter.values().first())
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }
}

pub type FunctionResult<'a> = Result<Vec<FluentValue<'a>>, FunctionError>;

/// General-purpose evaluation: any number of values in, any number out.
pub type TransformFn = Arc<
    dyn for<'a, 'c> Fn(&ResolvedParameters<'a>, &FunctionContext<'c>) -> FunctionResult<'a>
        + Send
        + Sync,
>;

/// Variant selection: given the resolved selector and the variant keys,
/// return the index of the chosen variant (the default index to decline).
pub type SelectorFn = Arc<
    dyn for<'a, 'k, 'c> Fn(
            &ResolvedParameters<'a>,
            &[VariantKey<'k>],
            usize,
            &FunctionContext<'c>,
        ) -> usize
        + Send
        + Sync,
>;

/// Single-value formatting: the Transform contract narrowed to "singleton
/// string or error out".
pub type FormatterFn = Arc<
    dyn for<'a, 'c> Fn(FluentValue<'a>, &FunctionContext<'c>) -> Result<FluentValue<'a>, FunctionError>
        + Send
        + Sync,
>;

/// A concrete function instance: a record of optional capabilities, checked
/// at the dispatch site. No inheritance, no visitors.
pub struct FluentFunction {
    pub transform: Option<TransformFn>,
    pub selector: Option<SelectorFn>,
    pub formatter: Option<FormatterFn>,
}

impl FluentFunction {
    pub fn transform_only(transform: TransformFn) -> Self {
        Self {
            transform: Some(transform),
            selector: None,
            formatter: None,
        }
    }
}

/// Produces function instances for a `(locale, options)` pair.
///
/// Factories may be invoked concurrently. An instance is cacheable unless
/// the factory says otherwise; non-cacheable factories are re-invoked on
/// every call site.
pub trait FunctionFactory: Send + Sync {
    fn create(
        &self,
        locale: &LanguageIdentifier,
        options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError>;

    fn cacheable(&self) -> bool {
        true
    }
}

/// The textual form of a variant key, as selectors match against it.
pub fn variant_key_text<'k>(key: &'k VariantKey<'k>) -> &'k str {
    match key {
        VariantKey::Identifier { name } => name,
        VariantKey::NumberLiteral { value } => value,
    }
}
