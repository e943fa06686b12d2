use super::core::Parser;
use super::errors::ErrorKind;
use super::Result;
use crate::ast;

impl<'s> Parser<'s> {
    pub(super) fn get_placeable(&mut self) -> Result<ast::Expression<'s>> {
        self.expect_byte(b'{')?;
        self.skip_blank();
        let expression = self.get_expression()?;
        self.skip_blank();
        self.expect_byte(b'}')?;
        Ok(expression)
    }

    fn get_expression(&mut self) -> Result<ast::Expression<'s>> {
        let selector = self.get_inline_expression()?;
        self.skip_blank();

        if !self.is_current_byte(b'-') || !self.is_byte_at(b'>', self.ptr + 1) {
            return Ok(ast::Expression::InlineExpression(selector));
        }

        // The selector must be a simple expression: a literal, a variable
        // reference, a function call or a term attribute access.
        match selector {
            ast::InlineExpression::MessageReference { ref attribute, .. } => {
                if attribute.is_none() {
                    return Err(self.error_here(ErrorKind::MessageReferenceAsSelector));
                }
                return Err(self.error_here(ErrorKind::MessageAttributeAsSelector));
            }
            ast::InlineExpression::TermReference { ref attribute, .. } => {
                if attribute.is_none() {
                    return Err(self.error_here(ErrorKind::TermReferenceAsSelector));
                }
            }
            ast::InlineExpression::StringLiteral { .. }
            | ast::InlineExpression::NumberLiteral { .. }
            | ast::InlineExpression::VariableReference { .. }
            | ast::InlineExpression::FunctionReference { .. } => {}
            ast::InlineExpression::Placeable { .. } => {
                return Err(self.error_here(ErrorKind::ExpectedSimpleExpressionAsSelector));
            }
        }

        self.ptr += 2; // ->
        self.skip_blank_inline();
        if !self.skip_eol() {
            return Err(self.error_char_range("\\n"));
        }
        self.skip_blank();

        let variants = self.get_variants()?;
        Ok(ast::Expression::SelectExpression {
            selector,
            variants,
        })
    }

    fn get_variants(&mut self) -> Result<Vec<ast::Variant<'s>>> {
        let mut variants: Vec<ast::Variant<'s>> = vec![];
        let mut has_default = false;

        loop {
            let default = self.take_byte_if(b'*');
            if !self.is_current_byte(b'[') {
                if default {
                    return Err(self.error_here(ErrorKind::ExpectedToken('[')));
                }
                break;
            }
            if default && has_default {
                return Err(self.error_here(ErrorKind::MultipleDefaultVariants));
            }

            self.expect_byte(b'[')?;
            self.skip_blank();
            let key = self.get_variant_key()?;
            self.skip_blank();
            self.expect_byte(b']')?;

            match self.get_pattern()? {
                Some(value) => {
                    if default {
                        has_default = true;
                    }
                    variants.push(ast::Variant {
                        key,
                        value,
                        default,
                    });
                    self.skip_blank();
                }
                None => return Err(self.error_here(ErrorKind::ExpectedValue)),
            }
        }

        if variants.is_empty() {
            return Err(self.error_here(ErrorKind::ExpectedVariant));
        }
        if !has_default {
            return Err(self.error_here(ErrorKind::MissingDefaultVariant));
        }
        Ok(variants)
    }

    fn get_variant_key(&mut self) -> Result<ast::VariantKey<'s>> {
        match self.current_byte() {
            Some(b) if b.is_ascii_digit() || b == b'-' => {
                let value = self.get_number_literal_slice()?;
                Ok(ast::VariantKey::NumberLiteral { value })
            }
            _ => {
                let id = self.get_identifier()?;
                Ok(ast::VariantKey::Identifier { name: id.name })
            }
        }
    }

    pub(super) fn get_inline_expression(&mut self) -> Result<ast::InlineExpression<'s>> {
        match self.current_byte() {
            Some(b'"') => self.get_string_literal(),
            Some(b) if b.is_ascii_digit() => {
                let value = self.get_number_literal_slice()?;
                Ok(ast::InlineExpression::NumberLiteral { value })
            }
            Some(b'-') => {
                if self.is_identifier_start_at(self.ptr + 1) {
                    self.ptr += 1;
                    let id = self.get_identifier()?;
                    let attribute = self.get_attribute_accessor()?;
                    let arguments = if self.is_current_byte(b'(') {
                        let call_start = self.ptr;
                        let arguments = self.get_call_arguments()?;
                        if !arguments.positional.is_empty() {
                            return Err(self.error_from(
                                ErrorKind::PositionalArgumentsOnTermReference,
                                call_start,
                            ));
                        }
                        Some(arguments)
                    } else {
                        None
                    };
                    Ok(ast::InlineExpression::TermReference {
                        id,
                        attribute,
                        arguments,
                    })
                } else {
                    let value = self.get_number_literal_slice()?;
                    Ok(ast::InlineExpression::NumberLiteral { value })
                }
            }
            Some(b'$') => {
                self.ptr += 1;
                let id = self.get_identifier()?;
                Ok(ast::InlineExpression::VariableReference { id })
            }
            Some(b) if b.is_ascii_alphabetic() => {
                let start = self.ptr;
                let id = self.get_identifier()?;
                if self.is_current_byte(b'(') {
                    if !is_callee(id.name) {
                        return Err(self.error_from(ErrorKind::ForbiddenCallee, start));
                    }
                    let arguments = self.get_call_arguments()?;
                    Ok(ast::InlineExpression::FunctionReference { id, arguments })
                } else {
                    let attribute = self.get_attribute_accessor()?;
                    Ok(ast::InlineExpression::MessageReference { id, attribute })
                }
            }
            Some(b'{') => {
                let expression = self.get_placeable()?;
                Ok(ast::InlineExpression::Placeable {
                    expression: Box::new(expression),
                })
            }
            _ => Err(self.error_here(ErrorKind::ExpectedInlineExpression)),
        }
    }

    fn get_string_literal(&mut self) -> Result<ast::InlineExpression<'s>> {
        self.expect_byte(b'"')?;
        let start = self.ptr;
        loop {
            match self.current_byte() {
                Some(b'\\') => match self.byte_at(self.ptr + 1) {
                    Some(b'\\') | Some(b'"') => self.ptr += 2,
                    Some(b'u') => {
                        self.ptr += 2;
                        self.skip_unicode_escape(4)?;
                    }
                    Some(b'U') => {
                        self.ptr += 2;
                        self.skip_unicode_escape(6)?;
                    }
                    Some(b) => {
                        return Err(self.error_here(ErrorKind::UnknownEscapeSequence(b as char)));
                    }
                    None => {
                        return Err(self.error_here(ErrorKind::UnterminatedStringLiteral));
                    }
                },
                Some(b'"') => break,
                Some(b'\n') => {
                    return Err(self.error_here(ErrorKind::UnterminatedStringLiteral));
                }
                Some(b'\r') if self.is_byte_at(b'\n', self.ptr + 1) => {
                    return Err(self.error_here(ErrorKind::UnterminatedStringLiteral));
                }
                None => {
                    return Err(self.error_here(ErrorKind::UnterminatedStringLiteral));
                }
                Some(_) => self.ptr += 1,
            }
        }
        let value = &self.source[start..self.ptr];
        self.ptr += 1; // closing quote
        Ok(ast::InlineExpression::StringLiteral { value })
    }

    fn skip_unicode_escape(&mut self, length: usize) -> Result<()> {
        let start = self.ptr;
        for _ in 0..length {
            match self.current_byte() {
                Some(b) if b.is_ascii_hexdigit() => self.ptr += 1,
                _ => {
                    // Only the hex digits consumed so far; the offending
                    // byte may start a multi-byte codepoint.
                    let sequence = self.source[start..self.ptr].to_owned();
                    return Err(self.error_from(
                        ErrorKind::InvalidUnicodeEscapeSequence(sequence),
                        start,
                    ));
                }
            }
        }
        Ok(())
    }

    pub(super) fn get_number_literal_slice(&mut self) -> Result<&'s str> {
        let start = self.ptr;
        self.take_byte_if(b'-');
        self.skip_digits()?;
        if self.take_byte_if(b'.') {
            self.skip_digits()?;
        }
        Ok(&self.source[start..self.ptr])
    }

    fn skip_digits(&mut self) -> Result<()> {
        let start = self.ptr;
        while matches!(self.current_byte(), Some(b) if b.is_ascii_digit()) {
            self.ptr += 1;
        }
        if start == self.ptr {
            Err(self.error_char_range("0-9"))
        } else {
            Ok(())
        }
    }

    fn get_call_arguments(&mut self) -> Result<ast::CallArguments<'s>> {
        self.expect_byte(b'(')?;

        let mut positional = vec![];
        let mut named: Vec<ast::NamedArgument<'s>> = vec![];

        loop {
            self.skip_blank();
            if self.is_current_byte(b')') {
                break;
            }

            let expression = self.get_inline_expression()?;
            self.skip_blank();

            let mut argument_name = None;
            if let ast::InlineExpression::MessageReference {
                id,
                attribute: None,
            } = &expression
            {
                if self.is_current_byte(b':') {
                    argument_name = Some(id.name);
                }
            }

            if let Some(name) = argument_name {
                if named.iter().any(|arg| arg.name.name == name) {
                    return Err(
                        self.error_here(ErrorKind::DuplicatedNamedArgument(name.to_owned()))
                    );
                }
                self.ptr += 1; // :
                self.skip_blank();
                let value = self.get_inline_expression()?;
                match value {
                    ast::InlineExpression::StringLiteral { .. }
                    | ast::InlineExpression::NumberLiteral { .. } => {}
                    _ => return Err(self.error_here(ErrorKind::ExpectedLiteral)),
                }
                named.push(ast::NamedArgument {
                    name: ast::Identifier { name },
                    value,
                });
            } else {
                if !named.is_empty() {
                    return Err(self.error_here(ErrorKind::PositionalArgumentFollowsNamed));
                }
                positional.push(expression);
            }

            self.skip_blank();
            if !self.take_byte_if(b',') {
                break;
            }
        }

        self.skip_blank();
        self.expect_byte(b')')?;
        Ok(ast::CallArguments { positional, named })
    }
}

/// Function callees are all-caps identifiers: `[A-Z][A-Z0-9_-]*`.
fn is_callee(name: &str) -> bool {
    name.bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}
