//! The runtime value model.
//!
//! Every expression evaluates to one or more [`FluentValue`]s. Values carry
//! their own formatting options (merged in by `NUMBER`/`DATETIME`), so
//! rendering is a property of the value, not of the call site that produced
//! it. [`Error`](FluentValue::Error) values are propagating sentinels:
//! functions pass them through and they only materialize as text at the
//! placeable layer.

mod number;
mod options;
mod plural;
mod temporal;

pub use number::{
    FluentNumber, FluentNumberGrouping, FluentNumberKind, FluentNumberOptions, FluentNumberStyle,
    NumberValue,
};
pub use options::{FunctionOptions, OptionEnum, OptionValue};
pub use plural::{category_name, PluralRules};
pub use temporal::{FluentTemporal, FluentTemporalOptions, TemporalStyle};

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use intl_memoizer::concurrent::IntlLangMemoizer;

/// A caller-supplied type carried opaquely through resolution.
///
/// The default functions ignore custom values; a formatter that knows the
/// concrete type can recover it through [`as_any`](FluentType::as_any).
pub trait FluentType: fmt::Debug + Send + Sync {
    fn duplicate(&self) -> Box<dyn FluentType>;
    fn as_string(&self, intls: &IntlLangMemoizer) -> Cow<'static, str>;
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn FluentType> {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

/// The boolean custom type formatted by `BOOLEAN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluentBool(pub bool);

impl FluentType for FluentBool {
    fn duplicate(&self) -> Box<dyn FluentType> {
        Box::new(*self)
    }

    fn as_string(&self, _intls: &IntlLangMemoizer) -> Cow<'static, str> {
        if self.0 {
            "true".into()
        } else {
            "false".into()
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A resolution-failure sentinel and its rendered form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValue {
    /// `{<description>}`, e.g. `{Unknown variable: $x}`.
    Reference(String),
    /// `{NAME(): <message>}`.
    Function { name: String, message: String },
    /// `[dirty]` — cycle detected or placeable budget exhausted.
    Dirty,
}

impl ErrorValue {
    pub fn write<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        match self {
            ErrorValue::Reference(description) => write!(w, "{{{}}}", description),
            ErrorValue::Function { name, message } => {
                write!(w, "{{{}(): {}}}", name, message)
            }
            ErrorValue::Dirty => w.write_str("[dirty]"),
        }
    }
}

/// A tagged runtime value.
#[derive(Debug, Clone)]
pub enum FluentValue<'source> {
    String(Cow<'source, str>),
    Number(FluentNumber),
    Temporal(FluentTemporal),
    Custom(Box<dyn FluentType>),
    Error(ErrorValue),
}

impl<'source> FluentValue<'source> {
    /// Parses `value` as a number, falling back to a string value.
    pub fn try_number(value: &'source str) -> Self {
        match FluentNumber::from_lexical(value) {
            Ok(number) => FluentValue::Number(number),
            Err(_) => FluentValue::String(value.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FluentValue::Error(_))
    }

    pub fn write<W: fmt::Write>(&self, w: &mut W, intls: &IntlLangMemoizer) -> fmt::Result {
        match self {
            FluentValue::String(s) => w.write_str(s),
            FluentValue::Number(n) => w.write_str(&n.as_string()),
            FluentValue::Temporal(t) => w.write_str(&t.as_string()),
            FluentValue::Custom(c) => w.write_str(&c.as_string(intls)),
            FluentValue::Error(e) => e.write(w),
        }
    }

    pub fn as_string(&self, intls: &IntlLangMemoizer) -> Cow<'source, str> {
        match self {
            FluentValue::String(s) => s.clone(),
            other => {
                let mut out = String::new();
                let _ = other.write(&mut out, intls);
                Cow::Owned(out)
            }
        }
    }
}

impl PartialEq for FluentValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FluentValue::String(a), FluentValue::String(b)) => a == b,
            (FluentValue::Number(a), FluentValue::Number(b)) => a == b,
            (FluentValue::Temporal(a), FluentValue::Temporal(b)) => a == b,
            (FluentValue::Error(a), FluentValue::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl<'source> From<&'source str> for FluentValue<'source> {
    fn from(value: &'source str) -> Self {
        FluentValue::String(value.into())
    }
}

impl From<String> for FluentValue<'_> {
    fn from(value: String) -> Self {
        FluentValue::String(value.into())
    }
}

impl<'source> From<Cow<'source, str>> for FluentValue<'source> {
    fn from(value: Cow<'source, str>) -> Self {
        FluentValue::String(value)
    }
}

impl<T: Into<FluentNumber>> From<T> for FluentValue<'_> {
    fn from(value: T) -> Self {
        FluentValue::Number(value.into())
    }
}

impl From<bool> for FluentValue<'_> {
    fn from(value: bool) -> Self {
        FluentValue::Custom(Box::new(FluentBool(value)))
    }
}

impl From<DateTime<Utc>> for FluentValue<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        FluentValue::Temporal(value.into())
    }
}

impl From<FluentTemporal> for FluentValue<'_> {
    fn from(value: FluentTemporal) -> Self {
        FluentValue::Temporal(value)
    }
}
