use std::sync::Arc;

use unic_langid::LanguageIdentifier;

use super::{FluentFunction, FunctionError, FunctionFactory, TransformFn};
use crate::types::{FluentBool, FluentValue, FunctionOptions, OptionEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BooleanStyle {
    #[default]
    TrueFalse,
    YesNo,
    OnOff,
}

impl OptionEnum for BooleanStyle {
    const EXPECTED: &'static str = "truefalse, yesno, onoff";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("truefalse") {
            Some(Self::TrueFalse)
        } else if name.eq_ignore_ascii_case("yesno") {
            Some(Self::YesNo)
        } else if name.eq_ignore_ascii_case("onoff") {
            Some(Self::OnOff)
        } else {
            None
        }
    }
}

/// `BOOLEAN(value, …)` — formats boolean custom values; anything else
/// passes through.
pub struct BooleanFactory;

impl FunctionFactory for BooleanFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        let style = options.as_enum::<BooleanStyle>("style")?.unwrap_or_default();

        let transform: TransformFn = Arc::new(move |params, _ctx| {
            Ok(params
                .flat_values()
                .map(|value| match value {
                    FluentValue::Custom(custom) => {
                        match custom.as_any().downcast_ref::<FluentBool>() {
                            Some(FluentBool(flag)) => {
                                FluentValue::String(render(style, *flag).into())
                            }
                            None => value.clone(),
                        }
                    }
                    other => other.clone(),
                })
                .collect())
        });
        Ok(FluentFunction::transform_only(transform))
    }
}

fn render(style: BooleanStyle, flag: bool) -> &'static str {
    match (style, flag) {
        (BooleanStyle::TrueFalse, true) => "true",
        (BooleanStyle::TrueFalse, false) => "false",
        (BooleanStyle::YesNo, true) => "yes",
        (BooleanStyle::YesNo, false) => "no",
        (BooleanStyle::OnOff, true) => "on",
        (BooleanStyle::OnOff, false) => "off",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles() {
        assert_eq!(render(BooleanStyle::TrueFalse, true), "true");
        assert_eq!(render(BooleanStyle::YesNo, false), "no");
        assert_eq!(render(BooleanStyle::OnOff, true), "on");
    }
}
