use flute_syntax::ast;
use flute_syntax::parser::parse;
use flute_syntax::serializer::{serialize, serialize_with_options, Options};

fn parse_ok(source: &str) -> ast::Resource<'_> {
    match parse(source) {
        Ok(resource) => resource,
        Err((_, errors)) => panic!("unexpected parse errors: {:?}", errors),
    }
}

/// emit(parse(src)) parsed again yields the same AST.
fn assert_idempotent(source: &str) {
    let first = parse_ok(source);
    let emitted = serialize(&first);
    let second = parse_ok(&emitted);
    assert_eq!(first, second, "AST changed across emit/parse for {:?}", source);
    // A canonical emission is a fixed point.
    assert_eq!(serialize(&second), emitted);
}

#[test]
fn simple_message_is_canonical() {
    assert_eq!(
        serialize(&parse_ok("hello = Hello, world!\n")),
        "hello = Hello, world!\n"
    );
}

#[test]
fn placeable_spacing_is_normalized() {
    assert_eq!(
        serialize(&parse_ok("hello = Hello, {$name}!\n")),
        "hello = Hello, { $name }!\n"
    );
}

#[test]
fn attributes_round_trip() {
    let source = "login =\n    .placeholder = email\n    .title = Type your login\n";
    assert_eq!(serialize(&parse_ok(source)), source);
}

#[test]
fn select_expression_layout() {
    let source = "\
key =
    { $num ->
        [one] One
       *[other] Other
    }
";
    assert_eq!(serialize(&parse_ok(source)), source);
}

#[test]
fn junk_is_dropped_by_default_and_kept_on_request() {
    let source = "key = Value\n!!!\n";
    let resource = match parse(source) {
        Err((resource, _)) => resource,
        Ok(_) => panic!("expected junk"),
    };
    assert_eq!(serialize(&resource), "key = Value\n");
    assert_eq!(
        serialize_with_options(&resource, Options { with_junk: true }),
        "key = Value\n!!!\n"
    );
}

#[test]
fn emit_parse_is_idempotent() {
    for source in [
        "hello = Hello, world!\n",
        "hello = Hello, { $name }!\n",
        "-brand = Aurora\nmsg = Welcome to { -brand(case: \"genitive\") } home.\n",
        "key =\n    aaa\n      bbb\n    ccc\n",
        "key =\n    aaa\n\n\n    bbb\n",
        "key = { NUMBER($n, style: \"percent\", maximumFractionDigits: 1) }\n",
        "key = { $count ->\n    [one] one\n   *[other] { $count } many\n }\n",
        "# comment\nkey = Value\n    .attr = x\n",
        "### resource\n## group\n# line\nkey = Value\n",
        "key = { \"\\u0041 \\\\ \\\"\" }\n",
        "key = { -3.14 }\n",
        "key = { msg.attr }\n",
        "key = { -term.attr ->\n   *[a] A\n }\n",
    ] {
        assert_idempotent(source);
    }
}
