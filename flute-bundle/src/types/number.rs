use std::borrow::Cow;

use intl_pluralrules::operands::PluralOperands;

use crate::functions::FunctionError;
use crate::types::options::{FunctionOptions, OptionEnum};

/// The numeric payload of a [`FluentNumber`].
///
/// Integers keep their exact 64-bit value; everything else is an IEEE-754
/// double. Numeric identity for selection follows the formatted form, not
/// this representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    Integer(i64),
    Decimal(f64),
}

impl NumberValue {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Decimal(d) => d,
        }
    }

    pub fn is_integral(self) -> bool {
        match self {
            Self::Integer(_) => true,
            Self::Decimal(d) => d.is_finite() && d.fract() == 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FluentNumberStyle {
    #[default]
    Decimal,
    Currency,
    Percent,
}

impl OptionEnum for FluentNumberStyle {
    const EXPECTED: &'static str = "decimal, currency, percent";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("decimal") {
            Some(Self::Decimal)
        } else if name.eq_ignore_ascii_case("currency") {
            Some(Self::Currency)
        } else if name.eq_ignore_ascii_case("percent") {
            Some(Self::Percent)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FluentNumberGrouping {
    Always,
    #[default]
    Auto,
    Min2,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FluentNumberKind {
    #[default]
    Cardinal,
    Ordinal,
    Exact,
}

impl OptionEnum for FluentNumberKind {
    const EXPECTED: &'static str = "cardinal, ordinal, exact";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("cardinal") {
            Some(Self::Cardinal)
        } else if name.eq_ignore_ascii_case("ordinal") {
            Some(Self::Ordinal)
        } else if name.eq_ignore_ascii_case("exact") {
            Some(Self::Exact)
        } else {
            None
        }
    }
}

/// Formatting and selection options of a number value.
///
/// `NUMBER()` merges call-site options over the options already carried by
/// the value, so `{ NUMBER($n, minimumFractionDigits: 2) }` affects both the
/// rendered form and plural-operand computation downstream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FluentNumberOptions {
    pub style: FluentNumberStyle,
    pub currency: Option<String>,
    pub use_grouping: FluentNumberGrouping,
    pub minimum_integer_digits: Option<usize>,
    pub minimum_fraction_digits: Option<usize>,
    pub maximum_fraction_digits: Option<usize>,
    pub minimum_significant_digits: Option<usize>,
    pub maximum_significant_digits: Option<usize>,
    pub kind: FluentNumberKind,
    pub skeleton: Option<String>,
}

impl FluentNumberOptions {
    /// Overlays the given option map onto `self`, validating values.
    pub fn merge(&mut self, options: &FunctionOptions) -> Result<(), FunctionError> {
        if let Some(style) = options.as_enum::<FluentNumberStyle>("style")? {
            self.style = style;
        }
        if let Some(currency) = options.as_string("currency")? {
            self.currency = Some(currency.to_owned());
        }
        if let Some(grouping) = options.as_string("useGrouping")? {
            self.use_grouping = match grouping {
                g if g.eq_ignore_ascii_case("always") || g.eq_ignore_ascii_case("true") => {
                    FluentNumberGrouping::Always
                }
                g if g.eq_ignore_ascii_case("auto") => FluentNumberGrouping::Auto,
                g if g.eq_ignore_ascii_case("min2") => FluentNumberGrouping::Min2,
                g if g.eq_ignore_ascii_case("false") => FluentNumberGrouping::Never,
                other => {
                    return Err(FunctionError::InvalidOptionValue {
                        name: "useGrouping".to_owned(),
                        value: other.to_owned(),
                    });
                }
            };
        }
        if let Some(digits) = options.as_count("minimumIntegerDigits")? {
            self.minimum_integer_digits = Some(digits);
        }
        if let Some(digits) = options.as_count("minimumFractionDigits")? {
            self.minimum_fraction_digits = Some(digits);
        }
        if let Some(digits) = options.as_count("maximumFractionDigits")? {
            self.maximum_fraction_digits = Some(digits);
        }
        if let Some(digits) = options.as_count("minimumSignificantDigits")? {
            self.minimum_significant_digits = Some(digits);
        }
        if let Some(digits) = options.as_count("maximumSignificantDigits")? {
            self.maximum_significant_digits = Some(digits);
        }
        if let Some(kind) = options.as_enum::<FluentNumberKind>("kind")? {
            self.kind = kind;
        }
        if let Some(skeleton) = options.as_string("skeleton")? {
            for conflicting in [
                "style",
                "useGrouping",
                "minimumIntegerDigits",
                "minimumFractionDigits",
                "maximumFractionDigits",
                "minimumSignificantDigits",
                "maximumSignificantDigits",
            ] {
                if options.contains(conflicting) {
                    return Err(FunctionError::ConflictingOptions {
                        name: "skeleton".to_owned(),
                        other: conflicting.to_owned(),
                    });
                }
            }
            self.skeleton = Some(skeleton.to_owned());
        }

        if let (Some(min), Some(max)) =
            (self.minimum_fraction_digits, self.maximum_fraction_digits)
        {
            if max < min {
                return Err(FunctionError::InvalidOptionValue {
                    name: "maximumFractionDigits".to_owned(),
                    value: format!("{} (smaller than minimumFractionDigits {})", max, min),
                });
            }
        }
        if let (Some(min), Some(max)) = (
            self.minimum_significant_digits,
            self.maximum_significant_digits,
        ) {
            if max < min {
                return Err(FunctionError::InvalidOptionValue {
                    name: "maximumSignificantDigits".to_owned(),
                    value: format!("{} (smaller than minimumSignificantDigits {})", max, min),
                });
            }
        }
        Ok(())
    }

    fn has_significant_digits(&self) -> bool {
        self.minimum_significant_digits.is_some() || self.maximum_significant_digits.is_some()
    }
}

/// A number value together with its formatting options.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentNumber {
    pub value: NumberValue,
    pub options: FluentNumberOptions,
}

impl FluentNumber {
    pub fn new(value: NumberValue, options: FluentNumberOptions) -> Self {
        Self { value, options }
    }

    /// Parses a number from its lexical form.
    ///
    /// A leading `+` is normalized away. A fraction part sets
    /// `minimumFractionDigits` so the value re-serializes byte-equal to its
    /// source form.
    pub fn from_lexical(input: &str) -> Result<Self, std::num::ParseFloatError> {
        let normalized = input.strip_prefix('+').unwrap_or(input);
        let mut options = FluentNumberOptions::default();

        if let Some(dot) = normalized.find('.') {
            let value: f64 = normalized.parse()?;
            options.minimum_fraction_digits = Some(normalized.len() - dot - 1);
            Ok(Self::new(NumberValue::Decimal(value), options))
        } else {
            match normalized.parse::<i64>() {
                Ok(value) => Ok(Self::new(NumberValue::Integer(value), options)),
                Err(_) => {
                    let value: f64 = normalized.parse()?;
                    Ok(Self::new(NumberValue::Decimal(value), options))
                }
            }
        }
    }

    /// Formats the number.
    pub fn as_string(&self) -> Cow<'static, str> {
        if self.options.skeleton.is_some() {
            // Skeleton formatting preserves the minimal lexical form.
            return self.minimal_string().into();
        }

        let opts = &self.options;
        let mut value = self.value.as_f64();
        if opts.style == FluentNumberStyle::Percent {
            value *= 100.0;
        }
        if !value.is_finite() {
            return if value.is_nan() {
                "NaN".into()
            } else if value > 0.0 {
                "∞".into()
            } else {
                "-∞".into()
            };
        }

        let negative = value < 0.0;
        let digits = self.base_digits(value.abs(), opts.style);
        let (int_digits, frac_digits) = match digits.split_once('.') {
            Some((i, f)) => (i.to_owned(), f.to_owned()),
            None => (digits, String::new()),
        };

        let mut int_digits = int_digits;
        if let Some(min_int) = opts.minimum_integer_digits {
            while int_digits.len() < min_int {
                int_digits.insert(0, '0');
            }
        }
        let grouped = group_digits(&int_digits, opts.use_grouping);

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        if opts.style == FluentNumberStyle::Currency {
            out.push_str(currency_symbol(opts.currency.as_deref()));
        }
        out.push_str(&grouped);
        if !frac_digits.is_empty() {
            out.push('.');
            out.push_str(&frac_digits);
        }
        if opts.style == FluentNumberStyle::Percent {
            out.push('%');
        }
        Cow::Owned(out)
    }

    /// CLDR plural operands, derived from the formatted (unstyled,
    /// ungrouped) form so that fraction-digit options influence plural
    /// selection the way the formatter renders them.
    pub fn as_operands(&self) -> PluralOperands {
        let base = self.base_digits(self.value.as_f64().abs(), FluentNumberStyle::Decimal);
        let (int_str, frac_str) = match base.split_once('.') {
            Some((i, f)) => (i, f),
            None => (base.as_str(), ""),
        };
        let trimmed = frac_str.trim_end_matches('0');
        PluralOperands {
            n: self.value.as_f64().abs(),
            i: int_str.parse().unwrap_or(0),
            v: frac_str.len(),
            w: trimmed.len(),
            f: frac_str.parse().unwrap_or(0),
            t: trimmed.parse().unwrap_or(0),
        }
    }

    /// The shortest faithful rendition of the raw value.
    pub fn minimal_string(&self) -> String {
        match self.value {
            NumberValue::Integer(i) => i.to_string(),
            NumberValue::Decimal(d) => {
                let mut out = format!("{}", d);
                if let Some(min) = self.options.minimum_fraction_digits {
                    pad_fraction(&mut out, min);
                }
                out
            }
        }
    }

    /// Digit sequence of `magnitude` after fraction/significant rules.
    /// No sign, no grouping, no style affixes.
    fn base_digits(&self, magnitude: f64, style: FluentNumberStyle) -> String {
        let opts = &self.options;

        if opts.has_significant_digits() {
            let max_sig = opts.maximum_significant_digits.unwrap_or(21).max(1);
            let min_sig = opts.minimum_significant_digits.unwrap_or(1).max(1);
            return significant_digits(magnitude, min_sig, max_sig);
        }

        let default_max = match style {
            // The Intl default for percent output is whole numbers.
            FluentNumberStyle::Percent => Some(0),
            FluentNumberStyle::Currency => Some(2),
            FluentNumberStyle::Decimal => None,
        };
        let max = opts.maximum_fraction_digits.or(default_max);
        let min = opts.minimum_fraction_digits.unwrap_or(match style {
            FluentNumberStyle::Currency => 2,
            _ => 0,
        });

        let mut out = match max {
            Some(max) => {
                let max = max.max(min);
                let mut s = format!("{:.*}", max, magnitude);
                if max > min {
                    trim_fraction(&mut s, min);
                }
                s
            }
            None => format!("{}", magnitude),
        };
        pad_fraction(&mut out, min);
        out
    }
}

impl TryFrom<&str> for FluentNumber {
    type Error = std::num::ParseFloatError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        Self::from_lexical(input)
    }
}

/// Trims trailing fraction zeros, keeping at least `min` fraction digits;
/// removes a bare trailing dot.
fn trim_fraction(s: &mut String, min: usize) {
    let Some(dot) = s.find('.') else { return };
    let mut end = s.len();
    while end > dot + 1 + min && s.as_bytes()[end - 1] == b'0' {
        end -= 1;
    }
    if end == dot + 1 {
        end = dot;
    }
    s.truncate(end);
}

/// Pads the fraction part with zeros up to `min` digits.
fn pad_fraction(s: &mut String, min: usize) {
    if min == 0 {
        return;
    }
    let frac_len = match s.find('.') {
        Some(dot) => s.len() - dot - 1,
        None => {
            s.push('.');
            0
        }
    };
    for _ in frac_len..min {
        s.push('0');
    }
}

fn significant_digits(magnitude: f64, min_sig: usize, max_sig: usize) -> String {
    let rounded = round_to_significant(magnitude, max_sig);
    let mut out = format!("{}", rounded);

    // Count significant digits present and pad up to the minimum.
    let digits = out
        .chars()
        .filter(|c| c.is_ascii_digit())
        .skip_while(|c| *c == '0')
        .count();
    let present = if digits == 0 { 1 } else { digits };
    if present < min_sig {
        let missing = min_sig - present;
        if !out.contains('.') {
            out.push('.');
        }
        for _ in 0..missing {
            out.push('0');
        }
    }
    out
}

fn round_to_significant(value: f64, sig: usize) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let exponent = value.abs().log10().floor();
    let factor = 10f64.powf(sig as f64 - 1.0 - exponent);
    (value * factor).round() / factor
}

fn group_digits(int_digits: &str, grouping: FluentNumberGrouping) -> String {
    let threshold = match grouping {
        FluentNumberGrouping::Never => return int_digits.to_owned(),
        FluentNumberGrouping::Min2 => 5,
        FluentNumberGrouping::Always | FluentNumberGrouping::Auto => 4,
    };
    if int_digits.len() < threshold {
        return int_digits.to_owned();
    }
    let mut out = String::with_capacity(int_digits.len() + int_digits.len() / 3);
    let offset = int_digits.len() % 3;
    for (idx, c) in int_digits.chars().enumerate() {
        if idx != 0 && idx % 3 == offset % 3 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn currency_symbol(code: Option<&str>) -> &str {
    match code {
        None | Some("USD") => "$",
        Some("EUR") => "€",
        Some("GBP") => "£",
        Some("JPY") => "¥",
        Some(other) => other,
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FluentNumber {
                fn from(value: $ty) -> Self {
                    Self::new(NumberValue::Integer(value as i64), Default::default())
                }
            }
        )*
    };
}
from_integer!(i8, i16, i32, i64, u8, u16, u32, isize);

impl From<f64> for FluentNumber {
    fn from(value: f64) -> Self {
        Self::new(NumberValue::Decimal(value), Default::default())
    }
}

impl From<f32> for FluentNumber {
    fn from(value: f32) -> Self {
        Self::new(NumberValue::Decimal(value as f64), Default::default())
    }
}
