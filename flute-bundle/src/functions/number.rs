use std::sync::Arc;

use flute_syntax::ast::VariantKey;
use intl_memoizer::concurrent::IntlLangMemoizer;
use intl_pluralrules::PluralRuleType;
use unic_langid::LanguageIdentifier;

use super::{
    FluentFunction, FormatterFn, FunctionError, FunctionFactory, SelectorFn, TransformFn,
};
use crate::types::{
    category_name, FluentNumber, FluentNumberKind, FluentNumberOptions, FluentValue,
    FunctionOptions, PluralRules,
};

/// `NUMBER(value, …)` — re-tags numeric values with formatting options and
/// drives plural/exact selection. Non-numeric input passes through
/// unchanged.
pub struct NumberFactory;

impl FunctionFactory for NumberFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        // Validate the option set once, at instantiation.
        let mut validated = FluentNumberOptions::default();
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
        let selector: SelectorFn = Arc::new(move |params, keys, default_index, ctx| {
            let Some(value) = params.first() else {
                return default_index;
            };
            // A multi-value selector is not selectable.
            if params.count() != 1 {
                return default_index;
            }
            let FluentValue::Number(number) = value else {
                return default_index;
            };
            let mut number = number.clone();
            if number.options.merge(&selector_options).is_err() {
                return default_index;
            }
            select_number(&number, keys, ctx.intls).unwrap_or(default_index)
        });

        let formatter_options = options.clone();
        let formatter: FormatterFn = Arc::new(move |value, _ctx| {
            match retag(&value, &formatter_options)? {
                FluentValue::Number(number) => {
                    Ok(FluentValue::String(number.as_string().into_owned().into()))
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
        FluentValue::Number(number) => {
            let mut number = number.clone();
            number.options.merge(options)?;
            Ok(FluentValue::Number(number))
        }
        other => Ok(other.clone()),
    }
}

/// Selection over a number value per its `kind` option.
///
/// Cardinal/ordinal kinds first try an exact numeric match against number
/// keys, then the CLDR plural category against identifier keys; the
/// `exact` kind matches the formatted output byte for byte.
pub(crate) fn select_number(
    number: &FluentNumber,
    keys: &[VariantKey],
    intls: &IntlLangMemoizer,
) -> Option<usize> {
    match number.options.kind {
        FluentNumberKind::Exact => {
            let formatted = number.as_string();
            keys.iter()
                .position(|key| super::variant_key_text(key) == formatted)
        }
        kind => {
            let value = number.value.as_f64();
            let exact = keys.iter().position(|key| match key {
                VariantKey::NumberLiteral { value: key_value } => {
                    FluentNumber::from_lexical(key_value)
                        .map(|key_number| key_number.value.as_f64() == value)
                        .unwrap_or(false)
                }
                VariantKey::Identifier { .. } => false,
            });
            if exact.is_some() {
                return exact;
            }

            let rule_type = match kind {
                FluentNumberKind::Ordinal => PluralRuleType::ORDINAL,
                _ => PluralRuleType::CARDINAL,
            };
            let operands = number.as_operands();
            let category = intls
                .with_try_get::<PluralRules, _, _>((rule_type,), |rules| {
                    rules.0.select(operands)
                })
                .ok()?
                .ok()?;
            let name = category_name(category);
            keys.iter().position(|key| match key {
                VariantKey::Identifier { name: key_name } => *key_name == name,
                VariantKey::NumberLiteral { .. } => false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intls() -> IntlLangMemoizer {
        IntlLangMemoizer::new("en-US".parse().expect("valid locale"))
    }

    fn keys() -> Vec<VariantKey<'static>> {
        vec![
            VariantKey::NumberLiteral { value: "0" },
            VariantKey::Identifier { name: "one" },
            VariantKey::Identifier { name: "other" },
        ]
    }

    #[test]
    fn exact_numeric_match_wins_over_category() {
        let number = FluentNumber::from(0i64);
        assert_eq!(select_number(&number, &keys(), &intls()), Some(0));
    }

    #[test]
    fn cardinal_category_match() {
        let number = FluentNumber::from(1i64);
        assert_eq!(select_number(&number, &keys(), &intls()), Some(1));
        let number = FluentNumber::from(5i64);
        assert_eq!(select_number(&number, &keys(), &intls()), Some(2));
    }

    #[test]
    fn fraction_digits_change_the_category() {
        // "1.0" is not "one" in English.
        let number = FluentNumber::from_lexical("1.0").expect("parses");
        assert_eq!(select_number(&number, &keys(), &intls()), Some(2));
    }

    #[test]
    fn exact_kind_matches_formatted_output() {
        let mut number = FluentNumber::from(1000i64);
        number.options.kind = FluentNumberKind::Exact;
        let keys = vec![
            VariantKey::Identifier { name: "other" },
            VariantKey::NumberLiteral { value: "1000" },
        ];
        // Grouping applies before matching: "1,000" never equals "1000".
        assert_eq!(select_number(&number, &keys, &intls()), None);

        number.options.use_grouping = crate::types::FluentNumberGrouping::Never;
        assert_eq!(select_number(&number, &keys, &intls()), Some(1));
    }

    #[test]
    fn no_match_yields_none() {
        let number = FluentNumber::from(2i64);
        let keys = vec![VariantKey::Identifier { name: "one" }];
        assert_eq!(select_number(&number, &keys, &intls()), None);
    }
}
