use flute_syntax::ast::{self, CommentType, Entry, PatternElement, ResourceEntry, VariantKey};
use flute_syntax::parser::{parse, ParserError};

fn parse_ok(source: &str) -> ast::Resource<'_> {
    match parse(source) {
        Ok(resource) => resource,
        Err((_, errors)) => panic!("unexpected parse errors: {:?}", errors),
    }
}

fn parse_err(source: &str) -> (ast::Resource<'_>, Vec<ParserError>) {
    match parse(source) {
        Ok(_) => panic!("expected parse errors for {:?}", source),
        Err(result) => result,
    }
}

fn first_code(source: &str) -> &'static str {
    let (_, errors) = parse_err(source);
    errors[0].code()
}

fn messages<'a>(resource: &'a ast::Resource<'a>) -> Vec<&'a ast::Message<'a>> {
    resource
        .body
        .iter()
        .filter_map(|entry| match entry {
            ResourceEntry::Entry(Entry::Message(msg)) => Some(msg),
            _ => None,
        })
        .collect()
}

fn junk<'a>(resource: &'a ast::Resource<'a>) -> Vec<&'a str> {
    resource
        .body
        .iter()
        .filter_map(|entry| match entry {
            ResourceEntry::Junk(slice) => Some(*slice),
            _ => None,
        })
        .collect()
}

/// Concatenates the text elements of a pattern; panics on placeables.
fn text_value(pattern: &ast::Pattern) -> String {
    pattern
        .elements
        .iter()
        .map(|element| match element {
            PatternElement::TextElement(text) => *text,
            PatternElement::Placeable(_) => panic!("unexpected placeable"),
        })
        .collect()
}

#[test]
fn plain_message() {
    let resource = parse_ok("hello = Hello, world!\n");
    let msgs = messages(&resource);
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].id.name, "hello");
    assert_eq!(text_value(msgs[0].value.as_ref().unwrap()), "Hello, world!");
}

#[test]
fn message_without_trailing_newline() {
    let resource = parse_ok("hello = Hello");
    assert_eq!(
        text_value(messages(&resource)[0].value.as_ref().unwrap()),
        "Hello"
    );
}

#[test]
fn multiline_common_indent_is_stripped() {
    let resource = parse_ok("key =\n    aaa\n      bbb\n    ccc\n");
    let value = messages(&resource)[0].value.as_ref().unwrap();
    assert_eq!(text_value(value), "aaa\n  bbb\nccc");
}

#[test]
fn first_line_indent_beyond_common_is_kept() {
    let resource = parse_ok("key =\n      first\n    second\n");
    let value = messages(&resource)[0].value.as_ref().unwrap();
    assert_eq!(text_value(value), "  first\nsecond");
}

#[test]
fn value_on_first_line_does_not_count_into_common_indent() {
    let resource = parse_ok("key = first\n    second\n");
    let value = messages(&resource)[0].value.as_ref().unwrap();
    assert_eq!(text_value(value), "first\nsecond");
}

#[test]
fn blank_lines_become_literal_newlines() {
    let resource = parse_ok("key =\n    aaa\n\n\n    bbb\n");
    let value = messages(&resource)[0].value.as_ref().unwrap();
    assert_eq!(text_value(value), "aaa\n\n\nbbb");
}

#[test]
fn blank_line_whitespace_does_not_leak_into_output() {
    let resource = parse_ok("key =\n    aaa\n          \n    bbb\n");
    let value = messages(&resource)[0].value.as_ref().unwrap();
    assert_eq!(text_value(value), "aaa\n\nbbb");
}

#[test]
fn trailing_whitespace_and_newline_are_discarded() {
    let resource = parse_ok("key = value   \n");
    assert_eq!(
        text_value(messages(&resource)[0].value.as_ref().unwrap()),
        "value"
    );

    let resource = parse_ok("key =\n    value\n\n\n");
    assert_eq!(
        text_value(messages(&resource)[0].value.as_ref().unwrap()),
        "value"
    );
}

#[test]
fn placeable_lines_do_not_affect_common_indent() {
    let resource = parse_ok("key =\n  { $a }\n      text\n");
    let value = messages(&resource)[0].value.as_ref().unwrap();
    match &value.elements[..] {
        [PatternElement::Placeable(_), PatternElement::TextElement(newline), PatternElement::TextElement(text)] =>
        {
            assert_eq!(*newline, "\n");
            assert_eq!(*text, "text");
        }
        other => panic!("unexpected elements: {:?}", other),
    }
}

#[test]
fn attributes_are_parsed() {
    let resource = parse_ok("login =\n    .placeholder = email\n    .title = Type your login\n");
    let msg = messages(&resource)[0];
    assert!(msg.value.is_none());
    assert_eq!(msg.attributes.len(), 2);
    assert_eq!(msg.attributes[0].id.name, "placeholder");
    assert_eq!(text_value(&msg.attributes[1].value), "Type your login");
}

#[test]
fn value_and_attributes() {
    let resource = parse_ok("info = Hi\n    .email = me@example.com\n");
    let msg = messages(&resource)[0];
    assert_eq!(text_value(msg.value.as_ref().unwrap()), "Hi");
    assert_eq!(msg.attributes.len(), 1);
}

#[test]
fn term_is_parsed_and_id_drops_the_sigil() {
    let resource = parse_ok("-brand = Aurora\n");
    match &resource.body[0] {
        ResourceEntry::Entry(Entry::Term(term)) => {
            assert_eq!(term.id.name, "brand");
            assert_eq!(text_value(&term.value), "Aurora");
        }
        other => panic!("unexpected entry: {:?}", other),
    }
}

#[test]
fn select_expression_with_default() {
    let source = "\
you-have = You have { $count ->
    [one] one message
   *[other] { $count } messages
 }.
";
    let resource = parse_ok(source);
    let msg = messages(&resource)[0];
    let value = msg.value.as_ref().unwrap();
    assert_eq!(value.elements.len(), 3);

    match &value.elements[1] {
        PatternElement::Placeable(ast::Expression::SelectExpression { variants, .. }) => {
            assert_eq!(variants.len(), 2);
            assert!(!variants[0].default);
            assert!(variants[1].default);
            assert_eq!(variants[0].key, VariantKey::Identifier { name: "one" });
            assert_eq!(text_value(&variants[0].value), "one message");
        }
        other => panic!("unexpected element: {:?}", other),
    }
}

#[test]
fn number_variant_keys() {
    let source = "key = { $n ->\n    [0] none\n   *[other] some\n }\n";
    let resource = parse_ok(source);
    let msg = messages(&resource)[0];
    match &msg.value.as_ref().unwrap().elements[0] {
        PatternElement::Placeable(ast::Expression::SelectExpression { variants, .. }) => {
            assert_eq!(variants[0].key, VariantKey::NumberLiteral { value: "0" });
        }
        other => panic!("unexpected element: {:?}", other),
    }
}

#[test]
fn term_call_with_named_arguments() {
    let resource = parse_ok("msg = { -brand(case: \"genitive\") }\n");
    let msg = messages(&resource)[0];
    match &msg.value.as_ref().unwrap().elements[0] {
        PatternElement::Placeable(ast::Expression::InlineExpression(
            ast::InlineExpression::TermReference {
                id,
                arguments: Some(arguments),
                ..
            },
        )) => {
            assert_eq!(id.name, "brand");
            assert!(arguments.positional.is_empty());
            assert_eq!(arguments.named.len(), 1);
            assert_eq!(arguments.named[0].name.name, "case");
        }
        other => panic!("unexpected element: {:?}", other),
    }
}

#[test]
fn function_call_arguments() {
    let resource = parse_ok("msg = { NUMBER($n, minimumFractionDigits: 2) }\n");
    let msg = messages(&resource)[0];
    match &msg.value.as_ref().unwrap().elements[0] {
        PatternElement::Placeable(ast::Expression::InlineExpression(
            ast::InlineExpression::FunctionReference { id, arguments },
        )) => {
            assert_eq!(id.name, "NUMBER");
            assert_eq!(arguments.positional.len(), 1);
            assert_eq!(arguments.named.len(), 1);
        }
        other => panic!("unexpected element: {:?}", other),
    }
}

#[test]
fn string_literal_keeps_raw_escapes() {
    let resource = parse_ok("key = { \"\\u0041\\\\\" }\n");
    let msg = messages(&resource)[0];
    match &msg.value.as_ref().unwrap().elements[0] {
        PatternElement::Placeable(ast::Expression::InlineExpression(
            ast::InlineExpression::StringLiteral { value },
        )) => {
            assert_eq!(*value, "\\u0041\\\\");
        }
        other => panic!("unexpected element: {:?}", other),
    }
}

#[test]
fn nested_placeable() {
    let resource = parse_ok("key = { { \"x\" } }\n");
    let msg = messages(&resource)[0];
    match &msg.value.as_ref().unwrap().elements[0] {
        PatternElement::Placeable(ast::Expression::InlineExpression(
            ast::InlineExpression::Placeable { .. },
        )) => {}
        other => panic!("unexpected element: {:?}", other),
    }
}

// Comments.

#[test]
fn comment_attaches_to_following_message() {
    let resource = parse_ok("# About hello\nhello = Hi\n");
    let msg = messages(&resource)[0];
    let comment = msg.comment.as_ref().unwrap();
    assert_eq!(comment.comment_type, CommentType::Regular);
    assert_eq!(comment.content, vec!["About hello"]);
}

#[test]
fn blank_line_detaches_comment() {
    let resource = parse_ok("# Standalone\n\nhello = Hi\n");
    assert!(matches!(
        &resource.body[0],
        ResourceEntry::Entry(Entry::Comment(_))
    ));
    assert!(messages(&resource)[0].comment.is_none());
}

#[test]
fn group_and_resource_comments_stand_alone() {
    let resource = parse_ok("### File\n## Section\nhello = Hi\n");
    match &resource.body[0] {
        ResourceEntry::Entry(Entry::Comment(comment)) => {
            assert_eq!(comment.comment_type, CommentType::Resource);
        }
        other => panic!("unexpected entry: {:?}", other),
    }
    match &resource.body[1] {
        ResourceEntry::Entry(Entry::Comment(comment)) => {
            assert_eq!(comment.comment_type, CommentType::Group);
        }
        other => panic!("unexpected entry: {:?}", other),
    }
    assert!(messages(&resource)[0].comment.is_none());
}

#[test]
fn multiline_comment_merges() {
    let resource = parse_ok("# line one\n# line two\nhello = Hi\n");
    let msg = messages(&resource)[0];
    assert_eq!(
        msg.comment.as_ref().unwrap().content,
        vec!["line one", "line two"]
    );
}

// Recovery & junk.

#[test]
fn junk_preserves_skipped_source() {
    let source = "key = Value\n0bad\nkey2 = Value2\n";
    let (resource, errors) = parse_err(source);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), "E0004");
    assert_eq!(errors[0].line, 2);
    assert_eq!(junk(&resource), vec!["0bad\n"]);
    assert_eq!(messages(&resource).len(), 2);
}

#[test]
fn entries_and_junk_partition_the_source() {
    let source = "key = Value\n!!!\n@more\nkey2 = Value2\n";
    let (resource, _) = parse_err(source);
    // Junk runs to the next plausible entry start; neither `!` nor `@`
    // can begin one, so both lines land in a single junk slice.
    assert_eq!(junk(&resource), vec!["!!!\n@more\n"]);
    let roundtrip: String = resource
        .body
        .iter()
        .map(|entry| match entry {
            ResourceEntry::Junk(slice) => slice.to_string(),
            ResourceEntry::Entry(_) => String::new(),
        })
        .collect();
    assert!(source.contains(&roundtrip));
}

#[test]
fn resource_is_always_produced() {
    let (resource, errors) = parse_err("!!! nothing valid here");
    assert!(!errors.is_empty());
    assert_eq!(resource.body.len(), junk(&resource).len());
}

// Line terminators.

#[test]
fn crlf_terminates_lines() {
    let resource = parse_ok("key = Value\r\nkey2 = Value2\r\n");
    let msgs = messages(&resource);
    assert_eq!(msgs.len(), 2);
    assert_eq!(text_value(msgs[0].value.as_ref().unwrap()), "Value");
}

#[test]
fn crlf_multiline_pattern() {
    let resource = parse_ok("key =\r\n    aaa\r\n    bbb\r\n");
    assert_eq!(
        text_value(messages(&resource)[0].value.as_ref().unwrap()),
        "aaa\nbbb"
    );
}

#[test]
fn bare_cr_is_preserved_in_text() {
    let resource = parse_ok("key = a\rb\n");
    assert_eq!(
        text_value(messages(&resource)[0].value.as_ref().unwrap()),
        "a\rb"
    );
}

#[test]
fn bare_cr_in_structural_position_is_an_error() {
    let (resource, errors) = parse_err("key\r= v\nnext = ok\n");
    assert_eq!(errors[0].code(), "E0003");
    assert_eq!(junk(&resource).len(), 1);
    assert_eq!(messages(&resource).len(), 1);
}

// The error-code table.

#[test]
fn e0003_expected_token() {
    assert_eq!(first_code("key\n"), "E0003");
}

#[test]
fn e0004_expected_char_range() {
    assert_eq!(first_code("2bad = x\n"), "E0004");
}

#[test]
fn e0005_message_needs_value_or_attributes() {
    assert_eq!(first_code("key =\n"), "E0005");
}

#[test]
fn e0006_term_needs_value() {
    assert_eq!(first_code("-term =\n"), "E0006");
}

#[test]
fn e0008_bad_callee() {
    assert_eq!(first_code("msg = { lower(1) }\n"), "E0008");
}

#[test]
fn e0010_missing_default_variant() {
    assert_eq!(first_code("msg = { $x ->\n    [one] A\n }\n"), "E0010");
}

#[test]
fn e0012_attribute_needs_value() {
    assert_eq!(first_code("msg = x\n    .attr =\n"), "E0012");
}

#[test]
fn e0015_multiple_default_variants() {
    assert_eq!(
        first_code("msg = { $x ->\n   *[a] A\n   *[b] B\n }\n"),
        "E0015"
    );
}

#[test]
fn e0016_message_reference_as_selector() {
    assert_eq!(first_code("msg = { other ->\n   *[a] A\n }\n"), "E0016");
}

#[test]
fn e0017_term_reference_as_selector() {
    assert_eq!(first_code("msg = { -term ->\n   *[a] A\n }\n"), "E0017");
}

#[test]
fn e0017_message_attribute_as_selector() {
    assert_eq!(first_code("msg = { other.attr ->\n   *[a] A\n }\n"), "E0017");
}

#[test]
fn term_attribute_is_a_valid_selector() {
    parse_ok("msg = { -term.attr ->\n   *[a] A\n }\n");
}

#[test]
fn e0020_unterminated_string() {
    assert_eq!(first_code("msg = { \"abc }\n"), "E0020");
    assert_eq!(first_code("msg = { \"abc"), "E0020");
}

#[test]
fn e0021_positional_after_named() {
    assert_eq!(first_code("msg = { FOO(bar: 1, $x) }\n"), "E0021");
}

#[test]
fn e0022_named_argument_must_be_literal() {
    assert_eq!(first_code("msg = { FOO(bar: $x) }\n"), "E0022");
}

#[test]
fn e0022_duplicate_named_argument() {
    assert_eq!(first_code("msg = { FOO(a: 1, a: 2) }\n"), "E0022");
}

#[test]
fn e0025_unknown_escape() {
    assert_eq!(first_code("msg = { \"a\\qb\" }\n"), "E0025");
}

#[test]
fn e0026_invalid_unicode_escape() {
    assert_eq!(first_code("msg = { \"\\uZZZZ\" }\n"), "E0026");
}

#[test]
fn e0027_unbalanced_closing_brace() {
    assert_eq!(first_code("msg = }\n"), "E0027");
}

#[test]
fn e0028_expected_inline_expression() {
    assert_eq!(first_code("msg = { }\n"), "E0028");
}

#[test]
fn e0029_expected_simple_expression_as_selector() {
    assert_eq!(
        first_code("msg = { { \"x\" } ->\n   *[a] A\n }\n"),
        "E0029"
    );
}

#[test]
fn e0031_positional_arguments_on_term_reference() {
    assert_eq!(first_code("msg = { -term(1) }\n"), "E0031");
}

#[test]
fn e0032_expected_variant() {
    assert_eq!(first_code("msg = { $x ->\n }\n"), "E0032");
}

#[test]
fn errors_carry_offset_and_line() {
    let (_, errors) = parse_err("ok = fine\nbad\n");
    assert_eq!(errors[0].line, 2);
    assert!(errors[0].pos.start >= 10);
}
