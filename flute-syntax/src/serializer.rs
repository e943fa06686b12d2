//! A canonical FTL emitter.
//!
//! The serializer produces a normalized rendition of an AST: multiline
//! patterns are indented with four spaces, placeables are spaced `{ … }`,
//! and select variants are laid out one per line with the default marked by
//! `*`. Emitting a parsed resource and parsing the output again yields the
//! same AST.
//!
//! # Example
//!
//! ```
//! use flute_syntax::parser::parse;
//! use flute_syntax::serializer::serialize;
//!
//! let resource = parse("hello = Hello, { $name }!\n").expect("parse errors");
//! assert_eq!(serialize(&resource), "hello = Hello, { $name }!\n");
//! ```

use crate::ast;

/// Serialization options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Emit junk entries verbatim instead of dropping them.
    pub with_junk: bool,
}

/// Serializes a resource with default options (junk is dropped).
pub fn serialize(resource: &ast::Resource) -> String {
    serialize_with_options(resource, Options::default())
}

pub fn serialize_with_options(resource: &ast::Resource, options: Options) -> String {
    let mut serializer = Serializer {
        writer: TextWriter::default(),
        options,
    };
    serializer.serialize_resource(resource);
    serializer.writer.buffer
}

#[derive(Default)]
struct TextWriter {
    buffer: String,
    indent_level: usize,
}

impl TextWriter {
    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level -= 1;
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str("    ");
        }
    }

    /// Indent with the final column reserved for the default-variant star.
    fn write_variant_indent(&mut self, default: bool) {
        for _ in 0..self.indent_level.saturating_sub(1) {
            self.buffer.push_str("    ");
        }
        self.buffer.push_str(if default { "   *" } else { "    " });
    }

    fn write_literal(&mut self, item: &str) {
        self.buffer.push_str(item);
    }

    /// Writes pattern text, re-indenting after every embedded newline.
    fn write_text(&mut self, text: &str) {
        let mut first = true;
        for line in text.split('\n') {
            if !first {
                self.buffer.push('\n');
                self.write_indent();
            }
            self.buffer.push_str(line);
            first = false;
        }
    }
}

struct Serializer {
    writer: TextWriter,
    options: Options,
}

impl Serializer {
    fn serialize_resource(&mut self, resource: &ast::Resource) {
        for entry in &resource.body {
            match entry {
                ast::ResourceEntry::Entry(entry) => self.serialize_entry(entry),
                ast::ResourceEntry::Junk(junk) => {
                    if self.options.with_junk {
                        self.writer.write_literal(junk);
                    }
                }
            }
        }
    }

    fn serialize_entry(&mut self, entry: &ast::Entry) {
        match entry {
            ast::Entry::Message(msg) => self.serialize_message(msg),
            ast::Entry::Term(term) => self.serialize_term(term),
            ast::Entry::Comment(comment) => self.serialize_comment(comment),
        }
    }

    fn serialize_comment(&mut self, comment: &ast::Comment) {
        let sigil = match comment.comment_type {
            ast::CommentType::Regular => "#",
            ast::CommentType::Group => "##",
            ast::CommentType::Resource => "###",
        };
        for line in &comment.content {
            self.writer.write_literal(sigil);
            if !line.is_empty() {
                self.writer.write_literal(" ");
                self.writer.write_literal(line);
            }
            self.writer.write_literal("\n");
        }
    }

    fn serialize_message(&mut self, msg: &ast::Message) {
        if let Some(comment) = &msg.comment {
            self.serialize_comment(comment);
        }
        self.writer.write_literal(msg.id.name);
        self.writer.write_literal(" =");
        if let Some(value) = &msg.value {
            self.serialize_pattern(value);
        }
        self.serialize_attributes(&msg.attributes);
        self.writer.write_literal("\n");
    }

    fn serialize_term(&mut self, term: &ast::Term) {
        if let Some(comment) = &term.comment {
            self.serialize_comment(comment);
        }
        self.writer.write_literal("-");
        self.writer.write_literal(term.id.name);
        self.writer.write_literal(" =");
        self.serialize_pattern(&term.value);
        self.serialize_attributes(&term.attributes);
        self.writer.write_literal("\n");
    }

    fn serialize_attributes(&mut self, attributes: &[ast::Attribute]) {
        for attribute in attributes {
            self.writer.write_literal("\n");
            self.writer.indent();
            self.writer.write_indent();
            self.writer.write_literal(".");
            self.writer.write_literal(attribute.id.name);
            self.writer.write_literal(" =");
            self.serialize_pattern(&attribute.value);
            self.writer.dedent();
        }
    }

    fn serialize_pattern(&mut self, pattern: &ast::Pattern) {
        let start_on_newline = pattern.elements.iter().any(|element| match element {
            ast::PatternElement::TextElement(text) => text.contains('\n'),
            ast::PatternElement::Placeable(expression) => {
                matches!(expression, ast::Expression::SelectExpression { .. })
            }
        });

        if start_on_newline {
            self.writer.write_literal("\n");
            self.writer.indent();
            self.writer.write_indent();
        } else {
            self.writer.write_literal(" ");
        }

        for element in &pattern.elements {
            self.serialize_element(element);
        }

        if start_on_newline {
            self.writer.dedent();
        }
    }

    fn serialize_element(&mut self, element: &ast::PatternElement) {
        match element {
            ast::PatternElement::TextElement(text) => self.writer.write_text(text),
            ast::PatternElement::Placeable(expression) => self.serialize_placeable(expression),
        }
    }

    fn serialize_placeable(&mut self, expression: &ast::Expression) {
        self.writer.write_literal("{ ");
        self.serialize_expression(expression);
        match expression {
            // The variant list already put the closing brace on its own
            // indented line.
            ast::Expression::SelectExpression { .. } => self.writer.write_literal("}"),
            ast::Expression::InlineExpression(_) => self.writer.write_literal(" }"),
        }
    }

    fn serialize_expression(&mut self, expression: &ast::Expression) {
        match expression {
            ast::Expression::InlineExpression(inline) => {
                self.serialize_inline_expression(inline);
            }
            ast::Expression::SelectExpression { selector, variants } => {
                self.serialize_inline_expression(selector);
                self.writer.write_literal(" ->\n");
                self.writer.indent();
                for variant in variants {
                    self.serialize_variant(variant);
                }
                self.writer.dedent();
                self.writer.write_indent();
            }
        }
    }

    fn serialize_variant(&mut self, variant: &ast::Variant) {
        self.writer.write_variant_indent(variant.default);
        self.writer.write_literal("[");
        match &variant.key {
            ast::VariantKey::Identifier { name } => self.writer.write_literal(name),
            ast::VariantKey::NumberLiteral { value } => self.writer.write_literal(value),
        }
        self.writer.write_literal("]");
        self.serialize_pattern(&variant.value);
        self.writer.write_literal("\n");
    }

    fn serialize_inline_expression(&mut self, expression: &ast::InlineExpression) {
        match expression {
            ast::InlineExpression::StringLiteral { value } => {
                self.writer.write_literal("\"");
                self.writer.write_literal(value);
                self.writer.write_literal("\"");
            }
            ast::InlineExpression::NumberLiteral { value } => {
                self.writer.write_literal(value);
            }
            ast::InlineExpression::VariableReference { id } => {
                self.writer.write_literal("$");
                self.writer.write_literal(id.name);
            }
            ast::InlineExpression::MessageReference { id, attribute } => {
                self.writer.write_literal(id.name);
                if let Some(attribute) = attribute {
                    self.writer.write_literal(".");
                    self.writer.write_literal(attribute.name);
                }
            }
            ast::InlineExpression::TermReference {
                id,
                attribute,
                arguments,
            } => {
                self.writer.write_literal("-");
                self.writer.write_literal(id.name);
                if let Some(attribute) = attribute {
                    self.writer.write_literal(".");
                    self.writer.write_literal(attribute.name);
                }
                if let Some(arguments) = arguments {
                    self.serialize_call_arguments(arguments);
                }
            }
            ast::InlineExpression::FunctionReference { id, arguments } => {
                self.writer.write_literal(id.name);
                self.serialize_call_arguments(arguments);
            }
            ast::InlineExpression::Placeable { expression } => {
                self.serialize_placeable(expression);
            }
        }
    }

    fn serialize_call_arguments(&mut self, arguments: &ast::CallArguments) {
        self.writer.write_literal("(");
        let mut first = true;
        for positional in &arguments.positional {
            if !first {
                self.writer.write_literal(", ");
            }
            self.serialize_inline_expression(positional);
            first = false;
        }
        for named in &arguments.named {
            if !first {
                self.writer.write_literal(", ");
            }
            self.writer.write_literal(named.name.name);
            self.writer.write_literal(": ");
            self.serialize_inline_expression(&named.value);
            first = false;
        }
        self.writer.write_literal(")");
    }
}
