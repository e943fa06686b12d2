use std::sync::Arc;

use unic_langid::LanguageIdentifier;

use super::{FluentFunction, FunctionError, FunctionFactory, TransformFn};
use crate::types::{FluentValue, FunctionOptions, OptionEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ListUnit {
    #[default]
    And,
    Or,
    Units,
}

impl OptionEnum for ListUnit {
    const EXPECTED: &'static str = "and, or, units";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if name.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else if name.eq_ignore_ascii_case("units") {
            Some(Self::Units)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ListWidth {
    #[default]
    Wide,
    Short,
    Narrow,
}

impl OptionEnum for ListWidth {
    const EXPECTED: &'static str = "wide, short, narrow";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("wide") {
            Some(Self::Wide)
        } else if name.eq_ignore_ascii_case("short") {
            Some(Self::Short)
        } else if name.eq_ignore_ascii_case("narrow") {
            Some(Self::Narrow)
        } else {
            None
        }
    }
}

/// `LIST(values, …)` — the terminal reducer: joins a value list into one
/// string with a locale-style conjunction and serial comma. A single value
/// passes through unchanged (errors included).
pub struct ListFactory;

impl FunctionFactory for ListFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let unit = options.as_enum::<ListUnit>("unit")?.unwrap_or_default();
        let width = options.as_enum::<ListWidth>("width")?.unwrap_or_default();

        let transform: TransformFn = Arc::new(move |params, ctx| {
            let values: Vec<&FluentValue> = params.flat_values().collect();
            match values.len() {
                0 => Ok(vec![FluentValue::String("".into())]),
                1 => Ok(vec![values[0].clone()]),
                _ => {
                    let items: Vec<String> = values
                        .iter()
                        .map(|value| value.as_string(ctx.intls).into_owned())
                        .collect();
                    Ok(vec![FluentValue::String(join(&items, unit, width).into())])
                }
            }
        });

        Ok(FluentFunction::transform_only(transform))
    }
}

fn join(items: &[String], unit: ListUnit, width: ListWidth) -> String {
    let connector = match (unit, width) {
        (ListUnit::And, ListWidth::Wide) => Some("and"),
        (ListUnit::And, ListWidth::Short) => Some("&"),
        (ListUnit::And, ListWidth::Narrow) => None,
        (ListUnit::Or, _) => Some("or"),
        (ListUnit::Units, _) => None,
    };

    match (items, connector) {
        ([a, b], Some(connector)) => format!("{} {} {}", a, connector, b),
        (items, Some(connector)) => {
            let mut out = String::new();
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                if index + 1 == items.len() {
                    out.push_str(connector);
                    out.push(' ');
                }
                out.push_str(item);
            }
            out
        }
        (items, None) => items.join(", "),
    }
}
