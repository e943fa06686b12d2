use chrono::TimeZone;
use flute_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use unic_langid::langid;

fn bundle(ftl: &str) -> FluentBundle {
    let resource = FluentResource::try_new(ftl.to_owned()).expect("FTL parses cleanly");
    let (bundle, errors) = FluentBundle::builder(langid!("en-US"))
        .use_isolation(false)
        .add_resource(resource)
        .build()
        .expect("bundle builds");
    assert!(errors.is_empty(), "unexpected build errors: {:?}", errors);
    bundle
}

fn format(bundle: &FluentBundle, id: &str, args: Option<&FluentArgs>) -> String {
    let (value, errors) = bundle.format(id, args).expect("message exists");
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    value
}

fn when() -> FluentValue<'static> {
    // 2026-01-05 15:04:05 UTC, a Monday.
    FluentValue::from(
        chrono::Utc
            .with_ymd_and_hms(2026, 1, 5, 15, 4, 5)
            .single()
            .expect("valid instant"),
    )
}

#[test]
fn number_grouping_and_digits() {
    let bundle = bundle(
        "g = { NUMBER($n, useGrouping: \"always\") }\n\
         ng = { NUMBER($n, useGrouping: \"false\") }\n\
         f = { NUMBER($n, minimumFractionDigits: 2) }\n",
    );
    let mut args = FluentArgs::new();
    args.set("n", 1234567);
    assert_eq!(format(&bundle, "g", Some(&args)), "1,234,567");
    assert_eq!(format(&bundle, "ng", Some(&args)), "1234567");

    let mut args = FluentArgs::new();
    args.set("n", 3);
    assert_eq!(format(&bundle, "f", Some(&args)), "3.00");
}

#[test]
fn number_passes_non_numeric_through() {
    let bundle = bundle("m = { NUMBER($s) }\n");
    let mut args = FluentArgs::new();
    args.set("s", "not a number");
    assert_eq!(format(&bundle, "m", Some(&args)), "not a number");
}

#[test]
fn number_invalid_options_surface_as_function_errors() {
    let bundle = bundle(
        "m = { NUMBER($n, minimumFractionDigits: 3, maximumFractionDigits: 1) }\n",
    );
    let mut args = FluentArgs::new();
    args.set("n", 5);
    let (value, errors) = bundle.format("m", Some(&args)).expect("message exists");
    assert!(value.starts_with("{NUMBER(): "), "got {:?}", value);
    assert_eq!(errors.len(), 1);
}

#[test]
fn number_skeleton_conflicts_with_formatting_options() {
    let bundle = bundle("m = { NUMBER($n, skeleton: \"raw\", style: \"percent\") }\n");
    let mut args = FluentArgs::new();
    args.set("n", 5);
    let (value, errors) = bundle.format("m", Some(&args)).expect("message exists");
    assert!(value.starts_with("{NUMBER(): "), "got {:?}", value);
    assert_eq!(errors.len(), 1);
}

#[test]
fn number_skeleton_reproduces_lexical_form() {
    let bundle = bundle("m = { NUMBER($n, skeleton: \"raw\") }\n");
    let mut args = FluentArgs::new();
    args.set("n", FluentValue::try_number("123456.789"));
    assert_eq!(format(&bundle, "m", Some(&args)), "123456.789");
}

#[test]
fn ordinal_selection() {
    let source = "\
place = { NUMBER($n, kind: \"ordinal\") ->
    [one] { $n }st
    [two] { $n }nd
    [few] { $n }rd
   *[other] { $n }th
 }
";
    let bundle = bundle(source);
    for (n, expected) in [(1, "1st"), (2, "2nd"), (3, "3rd"), (4, "4th"), (11, "11th")] {
        let mut args = FluentArgs::new();
        args.set("n", n);
        assert_eq!(format(&bundle, "place", Some(&args)), expected);
    }
}

#[test]
fn exact_selection_matches_formatted_output() {
    let source = "\
m = { NUMBER($n, kind: \"exact\") ->
    [1] exactly one
   *[other] something else
 }
";
    let bundle = bundle(source);
    let mut args = FluentArgs::new();
    args.set("n", 1);
    assert_eq!(format(&bundle, "m", Some(&args)), "exactly one");

    let mut args = FluentArgs::new();
    args.set("n", 2);
    assert_eq!(format(&bundle, "m", Some(&args)), "something else");
}

#[test]
fn exact_numeric_key_beats_plural_category() {
    let source = "\
m = { $n ->
    [0] none
    [one] one
   *[other] many
 }
";
    let bundle = bundle(source);
    let mut args = FluentArgs::new();
    args.set("n", 0);
    assert_eq!(format(&bundle, "m", Some(&args)), "none");
}

#[test]
fn datetime_styles() {
    let bundle = bundle(
        "d = { DATETIME($when, dateStyle: \"full\", timeStyle: \"short\") }\n\
         u = { DATETIME($when) }\n\
         z = { DATETIME($when, timeStyle: \"short\", zone: \"+05:30\") }\n",
    );
    let mut args = FluentArgs::new();
    args.set("when", when());
    assert_eq!(
        format(&bundle, "d", Some(&args)),
        "Monday, January 5, 2026, 3:04 PM"
    );
    assert_eq!(format(&bundle, "u", Some(&args)), "Jan 5, 2026");
    assert_eq!(format(&bundle, "z", Some(&args)), "8:34 PM");
}

#[test]
fn datetime_passes_non_temporal_through() {
    let bundle = bundle("m = { DATETIME($x) }\n");
    let mut args = FluentArgs::new();
    args.set("x", "tomorrow");
    assert_eq!(format(&bundle, "m", Some(&args)), "tomorrow");
}

#[test]
fn list_reduces_multi_valued_variables() {
    let bundle = bundle("m = { $items }\no = { LIST($items, unit: \"or\") }\n");
    let mut args = FluentArgs::new();
    args.set(
        "items",
        vec![
            FluentValue::from("a"),
            FluentValue::from("b"),
            FluentValue::from("c"),
        ],
    );
    assert_eq!(format(&bundle, "m", Some(&args)), "a, b, and c");
    assert_eq!(format(&bundle, "o", Some(&args)), "a, b, or c");
}

#[test]
fn abs_and_sign() {
    let bundle = bundle(
        "a = { ABS(-3.5) }\n\
         aa = { ABS(ABS(-3.5)) }\n\
         s = { SIGN(-3) }\n\
         z = { SIGN(0) }\n",
    );
    assert_eq!(format(&bundle, "a", None), "3.5");
    // ABS is idempotent.
    assert_eq!(format(&bundle, "aa", None), "3.5");
    assert_eq!(format(&bundle, "s", None), "negative");
    assert_eq!(format(&bundle, "z", None), "zero");
}

#[test]
fn offset_shifts_integers() {
    let bundle = bundle(
        "i = { OFFSET($n, increment: 2) }\n\
         d = { OFFSET($n, decrement: 1) }\n",
    );
    let mut args = FluentArgs::new();
    args.set("n", 5);
    assert_eq!(format(&bundle, "i", Some(&args)), "7");
    assert_eq!(format(&bundle, "d", Some(&args)), "4");
}

#[test]
fn offset_rejects_non_integral_input() {
    let bundle = bundle("m = { OFFSET($n, increment: 1) }\n");
    let mut args = FluentArgs::new();
    args.set("n", 1.5);
    let (value, errors) = bundle.format("m", Some(&args)).expect("message exists");
    assert!(value.starts_with("{OFFSET(): "), "got {:?}", value);
    assert_eq!(errors.len(), 1);
}

#[test]
fn case_maps_strings_and_passes_rest() {
    let bundle = bundle(
        "u = { CASE(\"hello\") }\n\
         l = { CASE(\"HeLLo\", style: \"lower\") }\n\
         n = { CASE(5) }\n",
    );
    assert_eq!(format(&bundle, "u", None), "HELLO");
    assert_eq!(format(&bundle, "l", None), "hello");
    assert_eq!(format(&bundle, "n", None), "5");
}

#[test]
fn count_totals_values_across_arguments() {
    let bundle = bundle("m = { COUNT($items, \"x\", 3) }\n");
    let mut args = FluentArgs::new();
    args.set(
        "items",
        vec![FluentValue::from("a"), FluentValue::from("b")],
    );
    assert_eq!(format(&bundle, "m", Some(&args)), "4");
}

#[test]
fn stringsort_coerces_via_formatted_representation() {
    let bundle = bundle(
        "n = { STRINGSORT($items) }\n\
         r = { STRINGSORT($items, order: \"reversed\") }\n",
    );
    let mut args = FluentArgs::new();
    args.set(
        "items",
        vec![
            FluentValue::from("pear"),
            FluentValue::from(10),
            FluentValue::from("apple"),
        ],
    );
    assert_eq!(format(&bundle, "n", Some(&args)), "10, apple, and pear");
    assert_eq!(format(&bundle, "r", Some(&args)), "pear, apple, and 10");
}

#[test]
fn numsort_orders_numbers_and_rejects_strings() {
    let bundle = bundle(
        "a = { NUMSORT($nums) }\n\
         d = { NUMSORT($nums, order: \"descending\") }\n\
         bad = { NUMSORT(\"x\") }\n",
    );
    let mut args = FluentArgs::new();
    args.set(
        "nums",
        vec![
            FluentValue::from(3),
            FluentValue::from(1),
            FluentValue::from(2),
        ],
    );
    assert_eq!(format(&bundle, "a", Some(&args)), "1, 2, and 3");
    assert_eq!(format(&bundle, "d", Some(&args)), "3, 2, and 1");

    let (value, errors) = bundle.format("bad", None).expect("message exists");
    assert!(value.starts_with("{NUMSORT(): "), "got {:?}", value);
    assert_eq!(errors.len(), 1);
}

#[test]
fn xtemporal_extracts_fields() {
    let bundle = bundle(
        "y = { XTEMPORAL($when, \"year\") }\n\
         w = { XTEMPORAL($when, \"weekday\") }\n\
         bad = { XTEMPORAL($when, \"fortnight\") }\n",
    );
    let mut args = FluentArgs::new();
    args.set("when", when());
    assert_eq!(format(&bundle, "y", Some(&args)), "2026");
    assert_eq!(format(&bundle, "w", Some(&args)), "1");

    let (value, errors) = bundle.format("bad", Some(&args)).expect("message exists");
    assert!(value.starts_with("{XTEMPORAL(): "), "got {:?}", value);
    assert_eq!(errors.len(), 1);
}

#[test]
fn xtemporal_passes_non_temporal_through() {
    let bundle = bundle("m = { XTEMPORAL($x, \"year\") }\n");
    let mut args = FluentArgs::new();
    args.set("x", "not a date");
    assert_eq!(format(&bundle, "m", Some(&args)), "not a date");
}

#[test]
fn boolean_formats_custom_booleans() {
    let bundle = bundle(
        "t = { BOOLEAN($flag) }\n\
         y = { BOOLEAN($flag, style: \"yesno\") }\n\
         o = { BOOLEAN($flag, style: \"onoff\") }\n",
    );
    let mut args = FluentArgs::new();
    args.set("flag", true);
    assert_eq!(format(&bundle, "t", Some(&args)), "true");
    assert_eq!(format(&bundle, "y", Some(&args)), "yes");
    assert_eq!(format(&bundle, "o", Some(&args)), "on");

    let mut args = FluentArgs::new();
    args.set("flag", false);
    assert_eq!(format(&bundle, "y", Some(&args)), "no");
}

#[test]
fn errors_pass_through_transforms_to_the_placeable_layer() {
    // $missing is unknown: CASE must not swallow the error value.
    let bundle = bundle("m = { CASE($missing) }\n");
    let (value, errors) = bundle.format("m", None).expect("message exists");
    assert_eq!(value, "{Unknown variable: $missing}");
    assert_eq!(errors.len(), 1);
}

#[test]
fn unknown_options_are_ignored() {
    let bundle = bundle("m = { NUMBER($n, unheardOf: \"sure\") }\n");
    let mut args = FluentArgs::new();
    args.set("n", 7);
    assert_eq!(format(&bundle, "m", Some(&args)), "7");
}

#[test]
fn global_function_options_merge_under_call_options() {
    let resource = FluentResource::try_new(
        "a = { NUMBER($n) }\nb = { NUMBER($n, minimumFractionDigits: 1) }\n".to_owned(),
    )
    .expect("FTL parses cleanly");
    let mut global = flute_bundle::FunctionOptions::new();
    global.set("minimumFractionDigits", 3i64);

    let (bundle, _) = FluentBundle::builder(langid!("en-US"))
        .use_isolation(false)
        .add_resource(resource)
        .function_options("NUMBER", global)
        .build()
        .expect("bundle builds");

    let mut args = FluentArgs::new();
    args.set("n", 2);
    assert_eq!(format(&bundle, "a", Some(&args)), "2.000");
    // The call site overrides the global option.
    assert_eq!(format(&bundle, "b", Some(&args)), "2.0");
}
