use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

use crate::functions::FunctionError;
use crate::types::options::{FunctionOptions, OptionEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalStyle {
    Short,
    Medium,
    Long,
    Full,
}

impl OptionEnum for TemporalStyle {
    const EXPECTED: &'static str = "short, medium, long, full";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("short") {
            Some(Self::Short)
        } else if name.eq_ignore_ascii_case("medium") {
            Some(Self::Medium)
        } else if name.eq_ignore_ascii_case("long") {
            Some(Self::Long)
        } else if name.eq_ignore_ascii_case("full") {
            Some(Self::Full)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FluentTemporalOptions {
    pub date_style: Option<TemporalStyle>,
    pub time_style: Option<TemporalStyle>,
    /// `UTC`, `Z` or a fixed offset such as `+05:30`.
    pub zone: Option<String>,
}

impl FluentTemporalOptions {
    pub fn merge(&mut self, options: &FunctionOptions) -> Result<(), FunctionError> {
        if let Some(style) = options.as_enum::<TemporalStyle>("dateStyle")? {
            self.date_style = Some(style);
        }
        if let Some(style) = options.as_enum::<TemporalStyle>("timeStyle")? {
            self.time_style = Some(style);
        }
        if let Some(zone) = options.as_string("zone")? {
            parse_zone(zone)?;
            self.zone = Some(zone.to_owned());
        }
        Ok(())
    }
}

/// An instant together with rendering options. Instants are rendered in UTC
/// unless a `zone` option applies.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentTemporal {
    pub value: DateTime<Utc>,
    pub options: FluentTemporalOptions,
}

impl FluentTemporal {
    pub fn new(value: DateTime<Utc>) -> Self {
        Self {
            value,
            options: FluentTemporalOptions::default(),
        }
    }

    fn local(&self) -> DateTime<FixedOffset> {
        let offset = self
            .options
            .zone
            .as_deref()
            .and_then(|zone| parse_zone(zone).ok())
            .unwrap_or_else(utc_offset);
        self.value.with_timezone(&offset)
    }

    pub fn as_string(&self) -> String {
        let local = self.local();
        let (date_style, time_style) = match (self.options.date_style, self.options.time_style) {
            (None, None) => (Some(TemporalStyle::Medium), None),
            styles => styles,
        };

        let mut parts = Vec::with_capacity(2);
        if let Some(style) = date_style {
            parts.push(format_date(&local, style));
        }
        if let Some(style) = time_style {
            parts.push(format_time(&local, style));
        }
        parts.join(", ")
    }

    /// Extracts a named field as an integer, for `XTEMPORAL`.
    pub fn field(&self, name: &str) -> Result<i64, FunctionError> {
        let local = self.local();
        Ok(match name {
            "year" => local.year() as i64,
            "month" => local.month() as i64,
            "day" => local.day() as i64,
            "hour" => local.hour() as i64,
            "minute" => local.minute() as i64,
            "second" => local.second() as i64,
            "millisecond" => local.timestamp_subsec_millis() as i64,
            "weekday" => local.weekday().number_from_monday() as i64,
            "dayOfYear" => local.ordinal() as i64,
            "epochSecond" => local.timestamp(),
            other => {
                return Err(FunctionError::Argument(format!(
                    "unsupported temporal field \"{}\"",
                    other
                )));
            }
        })
    }
}

impl From<DateTime<Utc>> for FluentTemporal {
    fn from(value: DateTime<Utc>) -> Self {
        Self::new(value)
    }
}

impl From<DateTime<FixedOffset>> for FluentTemporal {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::new(value.with_timezone(&Utc))
    }
}

fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset is always valid")
}

fn parse_zone(zone: &str) -> Result<FixedOffset, FunctionError> {
    if zone.eq_ignore_ascii_case("utc") || zone == "Z" {
        return Ok(utc_offset());
    }
    let invalid = || FunctionError::InvalidOptionValue {
        name: "zone".to_owned(),
        value: zone.to_owned(),
    };

    let (sign, rest) = if let Some(rest) = zone.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = zone.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(invalid());
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None => return Err(invalid()),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn format_date(local: &DateTime<FixedOffset>, style: TemporalStyle) -> String {
    let spec = match style {
        TemporalStyle::Short => "%-m/%-d/%y",
        TemporalStyle::Medium => "%b %-d, %Y",
        TemporalStyle::Long => "%B %-d, %Y",
        TemporalStyle::Full => "%A, %B %-d, %Y",
    };
    local.format(spec).to_string()
}

fn format_time(local: &DateTime<FixedOffset>, style: TemporalStyle) -> String {
    let base = match style {
        TemporalStyle::Short => local.format("%-I:%M %p").to_string(),
        _ => local.format("%-I:%M:%S %p").to_string(),
    };
    match style {
        TemporalStyle::Long | TemporalStyle::Full => {
            let offset = *local.offset();
            if offset.local_minus_utc() == 0 {
                format!("{} UTC", base)
            } else {
                format!("{} GMT{}", base, offset)
            }
        }
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> FluentTemporal {
        // 2026-01-05 15:04:05 UTC, a Monday.
        FluentTemporal::new(Utc.with_ymd_and_hms(2026, 1, 5, 15, 4, 5).unwrap())
    }

    #[test]
    fn default_renders_medium_date() {
        assert_eq!(sample().as_string(), "Jan 5, 2026");
    }

    #[test]
    fn date_and_time_styles() {
        let mut temporal = sample();
        temporal.options.date_style = Some(TemporalStyle::Full);
        temporal.options.time_style = Some(TemporalStyle::Short);
        assert_eq!(temporal.as_string(), "Monday, January 5, 2026, 3:04 PM");
    }

    #[test]
    fn long_time_carries_zone_label() {
        let mut temporal = sample();
        temporal.options.time_style = Some(TemporalStyle::Long);
        assert_eq!(temporal.as_string(), "3:04:05 PM UTC");
    }

    #[test]
    fn zone_offsets_shift_rendering() {
        let mut temporal = sample();
        temporal.options.date_style = Some(TemporalStyle::Short);
        temporal.options.time_style = Some(TemporalStyle::Short);
        temporal.options.zone = Some("+05:30".to_owned());
        assert_eq!(temporal.as_string(), "1/5/26, 8:34 PM");
    }

    #[test]
    fn fields() {
        let temporal = sample();
        assert_eq!(temporal.field("year").unwrap(), 2026);
        assert_eq!(temporal.field("month").unwrap(), 1);
        assert_eq!(temporal.field("weekday").unwrap(), 1);
        assert_eq!(temporal.field("dayOfYear").unwrap(), 5);
        assert!(temporal.field("fortnight").is_err());
    }

    #[test]
    fn invalid_zone_is_rejected() {
        assert!(parse_zone("Mars/Olympus").is_err());
        assert!(parse_zone("+25:00").is_err());
        assert!(parse_zone("UTC").is_ok());
        assert!(parse_zone("-08:00").is_ok());
    }
}
