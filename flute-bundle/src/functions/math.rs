use std::sync::Arc;

use unic_langid::LanguageIdentifier;

use super::{FluentFunction, FunctionError, FunctionFactory, TransformFn};
use crate::types::{FluentNumber, FluentValue, FunctionOptions, NumberValue};

/// `ABS(n)` — absolute value; non-numbers pass through.
pub struct AbsFactory;

impl FunctionFactory for AbsFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        _options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let transform: TransformFn = Arc::new(|params, _ctx| {
            Ok(params
                .flat_values()
                .map(|value| match value {
                    FluentValue::Number(number) => {
                        let value = match number.value {
                            NumberValue::Integer(i) => {
                                NumberValue::Integer(i.checked_abs().unwrap_or(i64::MAX))
                            }
                            NumberValue::Decimal(d) => NumberValue::Decimal(d.abs()),
                        };
                        FluentValue::Number(FluentNumber::new(value, number.options.clone()))
                    }
                    other => other.clone(),
                })
                .collect())
        });
        Ok(FluentFunction::transform_only(transform))
    }
}

/// `SIGN(n)` — classifies a number; non-numbers pass through.
pub struct SignFactory;

impl FunctionFactory for SignFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        _options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let transform: TransformFn = Arc::new(|params, _ctx| {
            Ok(params
                .flat_values()
                .map(|value| match value {
                    FluentValue::Number(number) => {
                        FluentValue::String(sign_of(number.value).into())
                    }
                    other => other.clone(),
                })
                .collect())
        });
        Ok(FluentFunction::transform_only(transform))
    }
}

fn sign_of(value: NumberValue) -> &'static str {
    match value {
        NumberValue::Integer(i) => {
            if i > 0 {
                "positive"
            } else if i < 0 {
                "negative"
            } else {
                "zero"
            }
        }
        NumberValue::Decimal(d) => {
            if d.is_nan() {
                "NaN"
            } else if d == f64::INFINITY {
                "positiveInfinity"
            } else if d == f64::NEG_INFINITY {
                "negativeInfinity"
            } else if d == 0.0 {
                "zero"
            } else if d > 0.0 {
                "positive"
            } else {
                "negative"
            }
        }
    }
}

/// `OFFSET(n, increment | decrement)` — integer offset. Exactly one of the
/// two options must be present and integral; non-integer input is an error
/// (error values still pass through).
pub struct OffsetFactory;

impl FunctionFactory for OffsetFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let increment = options.as_int("increment")?;
        let decrement = options.as_int("decrement")?;
        let delta = match (increment, decrement) {
            (Some(increment), None) => increment,
            (None, Some(decrement)) => -decrement,
            (Some(_), Some(_)) => {
                return Err(FunctionError::ConflictingOptions {
                    name: "increment".to_owned(),
                    other: "decrement".to_owned(),
                });
            }
            (None, None) => {
                return Err(FunctionError::MissingOption {
                    name: "increment".to_owned(),
                });
            }
        };

        let transform: TransformFn = Arc::new(move |params, _ctx| {
            let mut values = Vec::new();
            for value in params.flat_values() {
                values.push(match value {
                    FluentValue::Error(_) => value.clone(),
                    FluentValue::Number(number) => {
                        let base = match number.value {
                            NumberValue::Integer(i) => i,
                            NumberValue::Decimal(d) if d.fract() == 0.0 && d.is_finite() => {
                                d as i64
                            }
                            _ => {
                                return Err(FunctionError::Argument(
                                    "OFFSET requires an integral number".to_owned(),
                                ));
                            }
                        };
                        let shifted = base.checked_add(delta).ok_or_else(|| {
                            FunctionError::Argument("OFFSET overflowed".to_owned())
                        })?;
                        FluentValue::Number(FluentNumber::new(
                            NumberValue::Integer(shifted),
                            number.options.clone(),
                        ))
                    }
                    _ => {
                        return Err(FunctionError::Argument(
                            "OFFSET requires an integral number".to_owned(),
                        ));
                    }
                });
            }
            Ok(values)
        });
        Ok(FluentFunction::transform_only(transform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_classification() {
        assert_eq!(sign_of(NumberValue::Integer(3)), "positive");
        assert_eq!(sign_of(NumberValue::Integer(-3)), "negative");
        assert_eq!(sign_of(NumberValue::Integer(0)), "zero");
        assert_eq!(sign_of(NumberValue::Decimal(f64::NAN)), "NaN");
        assert_eq!(
            sign_of(NumberValue::Decimal(f64::INFINITY)),
            "positiveInfinity"
        );
        assert_eq!(
            sign_of(NumberValue::Decimal(f64::NEG_INFINITY)),
            "negativeInfinity"
        );
        assert_eq!(sign_of(NumberValue::Decimal(-0.0)), "zero");
    }

    #[test]
    fn offset_requires_exactly_one_direction() {
        let locale: LanguageIdentifier = "en".parse().expect("valid locale");
        let mut options = FunctionOptions::new();
        assert!(OffsetFactory.create(&locale, &options).is_err());

        options.set("increment", 2i64);
        assert!(OffsetFactory.create(&locale, &options).is_ok());

        options.set("decrement", 1i64);
        assert!(OffsetFactory.create(&locale, &options).is_err());
    }
}
