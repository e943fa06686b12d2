use std::sync::Arc;

use unic_langid::LanguageIdentifier;

use super::{
    FluentFunction, FormatterFn, FunctionError, FunctionFactory, SelectorFn, TransformFn,
};
use crate::types::{FluentTemporalOptions, FluentValue, FunctionOptions};

/// `DATETIME(value, …)` — re-tags temporal values with `dateStyle`,
/// `timeStyle` and `zone`. Non-temporal input passes through. Instants
/// render in UTC unless a zone applies.
pub struct DateTimeFactory;

impl FunctionFactory for DateTimeFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let mut validated = FluentTemporalOptions::default();
        validated.merge(options)?;

        let transform_options = options.clone();
        let transform: TransformFn = Arc::new(move |params, _ctx| {
            let mut values = Vec::new();
            for value in params.flat_values() {
                values.push(retag(value, &transform_options)?);
            }
            Ok(values)
        });

        let selector_options = options.clone();
        let selector: SelectorFn = Arc::new(move |params, keys, default_index, _ctx| {
            if params.count() != 1 {
                return default_index;
            }
            let Some(FluentValue::Temporal(temporal)) = params.first() else {
                return default_index;
            };
            let mut temporal = temporal.clone();
            if temporal.options.merge(&selector_options).is_err() {
                return default_index;
            }
            // Selection on a temporal value matches its formatted output.
            let formatted = temporal.as_string();
            keys.iter()
                .position(|key| super::variant_key_text(key) == formatted)
                .unwrap_or(default_index)
        });

        let formatter_options = options.clone();
        let formatter: FormatterFn = Arc::new(move |value, _ctx| {
            match retag(&value, &formatter_options)? {
                FluentValue::Temporal(temporal) => {
                    Ok(FluentValue::String(temporal.as_string().into()))
                }
                other => Ok(other),
            }
        });

        Ok(FluentFunction {
            transform: Some(transform),
            selector: Some(selector),
            formatter: Some(formatter),
        })
    }
}

fn retag<'a>(
    value: &FluentValue<'a>,
    options: &FunctionOptions,
) -> Result<FluentValue<'a>, FunctionError> {
    match value {
        FluentValue::Temporal(temporal) => {
            let mut temporal = temporal.clone();
            temporal.options.merge(options)?;
            Ok(FluentValue::Temporal(temporal))
        }
        other => Ok(other.clone()),
    }
}
