use std::fmt;

use crate::functions::FunctionError;

/// A scalar option value: string, 64-bit integer or double.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Double(f64),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::String(s) => f.write_str(s),
            OptionValue::Integer(i) => write!(f, "{}", i),
            OptionValue::Double(d) => write!(f, "{}", d),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Double(value)
    }
}

/// Marker for enums readable from an option value by case-insensitive name.
pub trait OptionEnum: Sized {
    /// Human-readable list of accepted names, used in error messages.
    const EXPECTED: &'static str;

    fn from_name(name: &str) -> Option<Self>;
}

/// An immutable name → scalar map.
///
/// Option names are case-sensitive; values are read through typed queries
/// which report a [`FunctionError`] on a type mismatch. Well-behaved
/// functions ignore options they do not know.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionOptions {
    values: Vec<(String, OptionValue)>,
}

impl FunctionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// A copy of `self` with every option from `overrides` written on top.
    pub fn overridden_by(&self, overrides: &FunctionOptions) -> FunctionOptions {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            merged.set(name, value.clone());
        }
        merged
    }

    /// A canonical key for cache lookups: sorted `name=value` pairs.
    pub fn fingerprint(&self) -> String {
        let mut pairs: Vec<String> = self
            .values
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        pairs.sort_unstable();
        pairs.join(";")
    }

    pub fn as_string(&self, name: &str) -> Result<Option<&str>, FunctionError> {
        match self.get(name) {
            None => Ok(None),
            Some(OptionValue::String(s)) => Ok(Some(s)),
            Some(_) => Err(FunctionError::InvalidOptionType {
                name: name.to_owned(),
                expected: "a string",
            }),
        }
    }

    pub fn as_int(&self, name: &str) -> Result<Option<i64>, FunctionError> {
        match self.get(name) {
            None => Ok(None),
            Some(OptionValue::Integer(i)) => Ok(Some(*i)),
            Some(OptionValue::Double(d)) if d.fract() == 0.0 => Ok(Some(*d as i64)),
            Some(_) => Err(FunctionError::InvalidOptionType {
                name: name.to_owned(),
                expected: "an integer",
            }),
        }
    }

    /// A non-negative integer, as used by digit-count options.
    pub fn as_count(&self, name: &str) -> Result<Option<usize>, FunctionError> {
        match self.as_int(name)? {
            None => Ok(None),
            Some(i) if i >= 0 => Ok(Some(i as usize)),
            Some(i) => Err(FunctionError::InvalidOptionValue {
                name: name.to_owned(),
                value: i.to_string(),
            }),
        }
    }

    pub fn as_double(&self, name: &str) -> Result<Option<f64>, FunctionError> {
        match self.get(name) {
            None => Ok(None),
            Some(OptionValue::Integer(i)) => Ok(Some(*i as f64)),
            Some(OptionValue::Double(d)) => Ok(Some(*d)),
            Some(_) => Err(FunctionError::InvalidOptionType {
                name: name.to_owned(),
                expected: "a number",
            }),
        }
    }

    /// Strict boolean parsing: only the strings `"true"` and `"false"`.
    pub fn as_bool(&self, name: &str) -> Result<Option<bool>, FunctionError> {
        match self.as_string(name)? {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(FunctionError::InvalidOptionValue {
                name: name.to_owned(),
                value: other.to_owned(),
            }),
        }
    }

    /// Case-insensitive enum-name match.
    pub fn as_enum<T: OptionEnum>(&self, name: &str) -> Result<Option<T>, FunctionError> {
        match self.as_string(name)? {
            None => Ok(None),
            Some(value) => match T::from_name(value) {
                Some(parsed) => Ok(Some(parsed)),
                None => Err(FunctionError::InvalidOptionValue {
                    name: name.to_owned(),
                    value: format!("{} (expected one of: {})", value, T::EXPECTED),
                }),
            },
        }
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for FunctionOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = FunctionOptions::new();
        for (name, value) in iter {
            options.set(name, value);
        }
        options
    }
}
