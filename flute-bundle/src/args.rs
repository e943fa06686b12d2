use std::borrow::Cow;

use crate::types::FluentValue;

/// The value bound to one external argument: a scalar or a list.
///
/// The distinction is preserved all the way to the terminal reducer and to
/// functions such as `COUNT`, which treat single values and list members
/// differently from one another.
#[derive(Debug, Clone, PartialEq)]
pub enum FluentArgValue<'args> {
    Single(FluentValue<'args>),
    Many(Vec<FluentValue<'args>>),
}

impl<'args> FluentArgValue<'args> {
    pub fn values(&self) -> &[FluentValue<'args>] {
        match self {
            FluentArgValue::Single(value) => std::slice::from_ref(value),
            FluentArgValue::Many(values) => values,
        }
    }
}

impl<'args> From<FluentValue<'args>> for FluentArgValue<'args> {
    fn from(value: FluentValue<'args>) -> Self {
        FluentArgValue::Single(value)
    }
}

impl<'args> From<Vec<FluentValue<'args>>> for FluentArgValue<'args> {
    fn from(values: Vec<FluentValue<'args>>) -> Self {
        FluentArgValue::Many(values)
    }
}

impl<'args> From<&'args str> for FluentArgValue<'args> {
    fn from(value: &'args str) -> Self {
        FluentArgValue::Single(FluentValue::from(value))
    }
}

impl<'args> From<Cow<'args, str>> for FluentArgValue<'args> {
    fn from(value: Cow<'args, str>) -> Self {
        FluentArgValue::Single(FluentValue::from(value))
    }
}

macro_rules! arg_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'args> From<$ty> for FluentArgValue<'args> {
                fn from(value: $ty) -> Self {
                    FluentArgValue::Single(FluentValue::from(value))
                }
            }
        )*
    };
}
arg_value_from!(
    String,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    isize,
    f32,
    f64,
    bool,
    chrono::DateTime<chrono::Utc>,
    crate::types::FluentNumber,
    crate::types::FluentTemporal,
);

/// External arguments of a single `format` call.
///
/// # Example
///
/// ```
/// use flute_bundle::FluentArgs;
///
/// let mut args = FluentArgs::new();
/// args.set("name", "world");
/// args.set("count", 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluentArgs<'args>(Vec<(Cow<'args, str>, FluentArgValue<'args>)>);

impl<'args> FluentArgs<'args> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn get(&self, key: &str) -> Option<&FluentArgValue<'args>> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<Cow<'args, str>>,
        V: Into<FluentArgValue<'args>>,
    {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FluentArgValue<'args>)> {
        self.0.iter().map(|(name, value)| (name.as_ref(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'args, K, V> FromIterator<(K, V)> for FluentArgs<'args>
where
    K: Into<Cow<'args, str>>,
    V: Into<FluentArgValue<'args>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = FluentArgs::new();
        for (key, value) in iter {
            args.set(key, value);
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_list_values() {
        let mut args = FluentArgs::new();
        args.set("name", "world");
        args.set("items", vec![FluentValue::from("a"), FluentValue::from("b")]);

        assert_eq!(args.get("name").unwrap().values().len(), 1);
        assert_eq!(args.get("items").unwrap().values().len(), 2);
        assert!(args.get("missing").is_none());
    }

    #[test]
    fn set_replaces_existing_keys() {
        let mut args = FluentArgs::new();
        args.set("k", 1);
        args.set("k", 2);
        assert_eq!(args.len(), 1);
        assert_eq!(
            args.get("k"),
            Some(&FluentArgValue::Single(FluentValue::from(2)))
        );
    }
}
