use std::sync::Arc;

use unic_langid::LanguageIdentifier;

use super::{FluentFunction, FunctionError, FunctionFactory, TransformFn};
use crate::types::{FluentValue, FunctionOptions, OptionEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CaseStyle {
    #[default]
    Upper,
    Lower,
}

impl OptionEnum for CaseStyle {
    const EXPECTED: &'static str = "upper, lower";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("upper") {
            Some(Self::Upper)
        } else if name.eq_ignore_ascii_case("lower") {
            Some(Self::Lower)
        } else {
            None
        }
    }
}

/// `CASE(s, style)` — case mapping over string values; everything else,
/// errors included, passes through.
pub struct CaseFactory;

impl FunctionFactory for CaseFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let style = options.as_enum::<CaseStyle>("style")?.unwrap_or_default();

        let transform: TransformFn = Arc::new(move |params, _ctx| {
            Ok(params
                .flat_values()
                .map(|value| match value {
                    FluentValue::String(s) => {
                        let mapped = match style {
                            CaseStyle::Upper => s.to_uppercase(),
                            CaseStyle::Lower => s.to_lowercase(),
                        };
                        FluentValue::String(mapped.into())
                    }
                    other => other.clone(),
                })
                .collect())
        });
        Ok(FluentFunction::transform_only(transform))
    }
}

/// `COUNT(…)` — the total number of values across all positional
/// arguments, list members included.
pub struct CountFactory;

impl FunctionFactory for CountFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        _options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let transform: TransformFn = Arc::new(|params, _ctx| {
            Ok(vec![FluentValue::from(params.count() as i64)])
        });
        Ok(FluentFunction::transform_only(transform))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum StringOrder {
    #[default]
    Natural,
    Reversed,
}

impl OptionEnum for StringOrder {
    const EXPECTED: &'static str = "natural, reversed";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("natural") {
            Some(Self::Natural)
        } else if name.eq_ignore_ascii_case("reversed") {
            Some(Self::Reversed)
        } else {
            None
        }
    }
}

/// `STRINGSORT(values, order)` — sorts the full positional input.
/// Heterogeneous input is allowed: non-strings are coerced through their
/// formatted representation. Error values pass through, after the sorted
/// run.
pub struct StringSortFactory;

impl FunctionFactory for StringSortFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let order = options.as_enum::<StringOrder>("order")?.unwrap_or_default();

        let transform: TransformFn = Arc::new(move |params, ctx| {
            let mut sortable: Vec<(String, FluentValue)> = Vec::new();
            let mut errors: Vec<FluentValue> = Vec::new();
            for value in params.flat_values() {
                if value.is_error() {
                    errors.push(value.clone());
                } else {
                    sortable.push((value.as_string(ctx.intls).into_owned(), value.clone()));
                }
            }

            sortable.sort_by(|(a, _), (b, _)| a.cmp(b));
            if order == StringOrder::Reversed {
                sortable.reverse();
            }

            let mut values: Vec<FluentValue> =
                sortable.into_iter().map(|(_, value)| value).collect();
            values.extend(errors);
            Ok(values)
        });
        Ok(FluentFunction::transform_only(transform))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum NumericOrder {
    #[default]
    Ascending,
    Descending,
}

impl OptionEnum for NumericOrder {
    const EXPECTED: &'static str = "ascending, descending";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("ascending") {
            Some(Self::Ascending)
        } else if name.eq_ignore_ascii_case("descending") {
            Some(Self::Descending)
        } else {
            None
        }
    }
}

/// `NUMSORT(values, order)` — numeric sort; any non-numeric value is a
/// function error.
pub struct NumSortFactory;

impl FunctionFactory for NumSortFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let order = options.as_enum::<NumericOrder>("order")?.unwrap_or_default();

        let transform: TransformFn = Arc::new(move |params, _ctx| {
            let mut numbers = Vec::new();
            for value in params.flat_values() {
                match value {
                    FluentValue::Number(number) => numbers.push(number.clone()),
                    _ => {
                        return Err(FunctionError::Argument(
                            "NUMSORT requires numeric input".to_owned(),
                        ));
                    }
                }
            }
            numbers.sort_by(|a, b| a.value.as_f64().total_cmp(&b.value.as_f64()));
            if order == NumericOrder::Descending {
                numbers.reverse();
            }
            Ok(numbers.into_iter().map(FluentValue::Number).collect())
        });
        Ok(FluentFunction::transform_only(transform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::{FunctionContext, Parameter, ResolvedParameters};
    use intl_memoizer::concurrent::IntlLangMemoizer;

    fn run<'a>(
        factory: &dyn FunctionFactory,
        options: &FunctionOptions,
        params: ResolvedParameters<'a>,
    ) -> Result<Vec<FluentValue<'a>>, FunctionError> {
        let locale: LanguageIdentifier = "en-US".parse().expect("valid locale");
        let intls = IntlLangMemoizer::new(locale.clone());
        let function = factory.create(&locale, options)?;
        let transform = function.transform.expect("transform capability");
        let ctx = FunctionContext {
            locale: &locale,
            intls: &intls,
        };
        transform(&params, &ctx)
    }

    fn single_many<'a>(values: Vec<FluentValue<'a>>) -> ResolvedParameters<'a> {
        ResolvedParameters {
            positional: vec![Parameter::Many(values)],
        }
    }

    #[test]
    fn case_upper_is_default_and_idempotent() {
        let params = single_many(vec![FluentValue::from("straße")]);
        let out = run(&CaseFactory, &FunctionOptions::new(), params).unwrap();
        assert_eq!(out, vec![FluentValue::from("STRASSE")]);

        let again = run(
            &CaseFactory,
            &FunctionOptions::new(),
            single_many(out.clone()),
        )
        .unwrap();
        assert_eq!(again, out);
    }

    #[test]
    fn case_passes_non_strings_through() {
        let params = single_many(vec![FluentValue::from(3)]);
        let out = run(&CaseFactory, &FunctionOptions::new(), params).unwrap();
        assert_eq!(out, vec![FluentValue::from(3)]);
    }

    #[test]
    fn count_spans_positionals_and_lists() {
        let params = ResolvedParameters {
            positional: vec![
                Parameter::Single(FluentValue::from(1)),
                Parameter::Many(vec![FluentValue::from("a"), FluentValue::from("b")]),
            ],
        };
        let out = run(&CountFactory, &FunctionOptions::new(), params).unwrap();
        assert_eq!(out, vec![FluentValue::from(3)]);
    }

    #[test]
    fn stringsort_coerces_and_sorts() {
        let params = single_many(vec![
            FluentValue::from("pear"),
            FluentValue::from(10),
            FluentValue::from("apple"),
        ]);
        let out = run(&StringSortFactory, &FunctionOptions::new(), params).unwrap();
        assert_eq!(
            out,
            vec![
                FluentValue::from(10),
                FluentValue::from("apple"),
                FluentValue::from("pear"),
            ]
        );
    }

    #[test]
    fn numsort_orders_and_rejects_non_numbers() {
        let params = single_many(vec![
            FluentValue::from(3),
            FluentValue::from(1.5),
            FluentValue::from(2),
        ]);
        let mut options = FunctionOptions::new();
        options.set("order", "descending");
        let out = run(&NumSortFactory, &options, params).unwrap();
        assert_eq!(
            out,
            vec![
                FluentValue::from(3),
                FluentValue::from(2),
                FluentValue::from(1.5),
            ]
        );

        let bad = single_many(vec![FluentValue::from("nope")]);
        assert!(run(&NumSortFactory, &FunctionOptions::new(), bad).is_err());
    }
}
