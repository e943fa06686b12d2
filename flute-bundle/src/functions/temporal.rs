use std::sync::Arc;

use unic_langid::LanguageIdentifier;

use super::{FluentFunction, FunctionError, FunctionFactory, TransformFn};
use crate::types::{FluentNumber, FluentNumberGrouping, FluentValue, FunctionOptions};

/// `XTEMPORAL(value, field)` — extracts a temporal field as a number.
/// Unsupported fields are errors; non-temporal values pass through.
pub struct TemporalFieldFactory;

impl FunctionFactory for TemporalFieldFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        _options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let transform: TransformFn = Arc::new(|params, ctx| {
            let field = match params.positional.get(1).and_then(|p| p.values().first()) {
                Some(FluentValue::String(s)) => s.clone().into_owned(),
                Some(other) => {
                    return Err(FunctionError::Argument(format!(
                        "XTEMPORAL field must be a string, got {}",
                        other.as_string(ctx.intls)
                    )));
                }
                None => {
                    return Err(FunctionError::Argument(
                        "XTEMPORAL requires a field argument".to_owned(),
                    ));
                }
            };

            let Some(first) = params.positional.first() else {
                return Err(FunctionError::Argument(
                    "XTEMPORAL requires a value argument".to_owned(),
                ));
            };
            let mut values = Vec::new();
            for value in first.values() {
                values.push(match value {
                    FluentValue::Temporal(temporal) => {
                        // Field numbers are labels, not quantities: no
                        // grouping ("2,026" is not a year).
                        let mut number = FluentNumber::from(temporal.field(&field)?);
                        number.options.use_grouping = FluentNumberGrouping::Never;
                        FluentValue::Number(number)
                    }
                    other => other.clone(),
                });
            }
            Ok(values)
        });
        Ok(FluentFunction::transform_only(transform))
    }
}
