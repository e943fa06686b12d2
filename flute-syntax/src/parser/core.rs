use std::cmp;

use super::errors::{ErrorKind, ParserError};
use super::Result;
use crate::ast;

/// A mutable cursor over the source bytes.
///
/// The grammar is ASCII-dominated, so all structural decisions are made on
/// bytes; multi-byte codepoints only ever appear inside text content and
/// string literals, where they are carried through as opaque slices.
pub(super) struct Parser<'s> {
    pub source: &'s str,
    pub ptr: usize,
    pub length: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum TextElementType {
    Blank,
    NonBlank,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum TextElementPosition {
    InitialLineStart,
    LineStart,
    InLine,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum TextElementTermination {
    LineFeed,
    Crlf,
    PlaceableStart,
    Eof,
}

/// Pattern elements before indent normalization.
///
/// Text slices keep the full line prefix; the common-indent pass decides how
/// much of it survives.
enum PatternElementPlaceholder<'s> {
    Placeable(ast::Expression<'s>),
    TextElement {
        start: usize,
        end: usize,
        indent: usize,
        position: TextElementPosition,
        element_type: TextElementType,
    },
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            ptr: 0,
            length: source.len(),
        }
    }

    pub fn parse(
        mut self,
    ) -> std::result::Result<ast::Resource<'s>, (ast::Resource<'s>, Vec<ParserError>)> {
        let mut errors = vec![];
        let mut body = vec![];

        self.skip_blank_block();
        let mut last_comment: Option<ast::Comment<'s>> = None;
        let mut last_blank_count = 0;

        while self.ptr < self.length {
            let entry_start = self.ptr;
            match self.get_entry(entry_start) {
                Ok(ast::Entry::Comment(comment))
                    if comment.comment_type == ast::CommentType::Regular =>
                {
                    if let Some(prev) = last_comment.take() {
                        body.push(ast::ResourceEntry::Entry(ast::Entry::Comment(prev)));
                    }
                    last_comment = Some(comment);
                }
                Ok(mut entry) => {
                    if let Some(comment) = last_comment.take() {
                        match &mut entry {
                            ast::Entry::Message(msg) if last_blank_count == 0 => {
                                msg.comment = Some(comment);
                            }
                            ast::Entry::Term(term) if last_blank_count == 0 => {
                                term.comment = Some(comment);
                            }
                            _ => {
                                body.push(ast::ResourceEntry::Entry(ast::Entry::Comment(comment)));
                            }
                        }
                    }
                    body.push(ast::ResourceEntry::Entry(entry));
                }
                Err(err) => {
                    if let Some(comment) = last_comment.take() {
                        body.push(ast::ResourceEntry::Entry(ast::Entry::Comment(comment)));
                    }
                    self.skip_to_next_entry_start(entry_start);
                    errors.push(err);
                    body.push(ast::ResourceEntry::Junk(&self.source[entry_start..self.ptr]));
                }
            }
            last_blank_count = self.skip_blank_block();
        }

        if let Some(comment) = last_comment.take() {
            body.push(ast::ResourceEntry::Entry(ast::Entry::Comment(comment)));
        }

        let resource = ast::Resource { body };
        if errors.is_empty() {
            Ok(resource)
        } else {
            Err((resource, errors))
        }
    }

    fn get_entry(&mut self, entry_start: usize) -> Result<ast::Entry<'s>> {
        match self.current_byte() {
            Some(b'#') => self.get_comment().map(ast::Entry::Comment),
            Some(b'-') => self.get_term(entry_start).map(ast::Entry::Term),
            _ => self.get_message(entry_start).map(ast::Entry::Message),
        }
    }

    fn get_message(&mut self, entry_start: usize) -> Result<ast::Message<'s>> {
        let id = self.get_identifier()?;
        self.skip_blank_inline();
        self.expect_byte(b'=')?;
        let value = self.get_pattern()?;
        let attributes = self.get_attributes()?;

        if value.is_none() && attributes.is_empty() {
            return Err(self.error_from(
                ErrorKind::ExpectedMessageField {
                    entry_id: id.name.to_owned(),
                },
                entry_start,
            ));
        }

        Ok(ast::Message {
            id,
            value,
            attributes,
            comment: None,
        })
    }

    fn get_term(&mut self, entry_start: usize) -> Result<ast::Term<'s>> {
        self.expect_byte(b'-')?;
        let id = self.get_identifier()?;
        self.skip_blank_inline();
        self.expect_byte(b'=')?;
        let value = self.get_pattern()?;
        let attributes = self.get_attributes()?;

        match value {
            Some(value) => Ok(ast::Term {
                id,
                value,
                attributes,
                comment: None,
            }),
            None => Err(self.error_from(
                ErrorKind::ExpectedTermField {
                    entry_id: id.name.to_owned(),
                },
                entry_start,
            )),
        }
    }

    fn get_attributes(&mut self) -> Result<Vec<ast::Attribute<'s>>> {
        let mut attributes = vec![];
        loop {
            let line_start = self.ptr;
            self.skip_blank_inline();
            if !self.is_current_byte(b'.') {
                self.ptr = line_start;
                break;
            }
            attributes.push(self.get_attribute()?);
        }
        Ok(attributes)
    }

    fn get_attribute(&mut self) -> Result<ast::Attribute<'s>> {
        self.expect_byte(b'.')?;
        let id = self.get_identifier()?;
        self.skip_blank_inline();
        self.expect_byte(b'=')?;
        match self.get_pattern()? {
            Some(value) => Ok(ast::Attribute { id, value }),
            None => Err(self.error_here(ErrorKind::ExpectedValue)),
        }
    }

    pub(super) fn get_identifier(&mut self) -> Result<ast::Identifier<'s>> {
        let start = self.ptr;
        match self.current_byte() {
            Some(b) if b.is_ascii_alphabetic() => self.ptr += 1,
            _ => return Err(self.error_char_range("a-zA-Z")),
        }
        self.identifier_end();
        Ok(ast::Identifier {
            name: &self.source[start..self.ptr],
        })
    }

    /// Advances over `[A-Za-z0-9_-]`; the caller has verified the initial
    /// `[A-Za-z]`.
    pub(super) fn identifier_end(&mut self) {
        while let Some(b) = self.current_byte() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
                self.ptr += 1;
            } else {
                break;
            }
        }
    }

    pub(super) fn get_attribute_accessor(&mut self) -> Result<Option<ast::Identifier<'s>>> {
        if self.take_byte_if(b'.') {
            self.get_identifier().map(Some)
        } else {
            Ok(None)
        }
    }

    /// The multiline pattern algorithm.
    ///
    /// Raw text slices are collected first, together with per-line indent
    /// widths; a second pass computes the common indent over non-blank
    /// continuation lines, strips it, drops trailing blank elements and
    /// trims the final line.
    pub(super) fn get_pattern(&mut self) -> Result<Option<ast::Pattern<'s>>> {
        let mut elements = vec![];
        let mut last_non_blank = None;
        let mut common_indent: Option<usize> = None;

        self.skip_blank_inline();

        let mut text_element_role = if self.skip_eol() {
            self.skip_blank_block();
            TextElementPosition::LineStart
        } else {
            TextElementPosition::InitialLineStart
        };

        while self.ptr < self.length {
            if self.is_current_byte(b'{') {
                if text_element_role == TextElementPosition::LineStart {
                    common_indent = Some(0);
                }
                let expression = self.get_placeable()?;
                last_non_blank = Some(elements.len());
                elements.push(PatternElementPlaceholder::Placeable(expression));
                text_element_role = TextElementPosition::InLine;
                continue;
            }

            let slice_start = self.ptr;
            let mut indent = 0;
            if text_element_role == TextElementPosition::LineStart {
                indent = self.skip_blank_inline();
                match self.current_byte() {
                    None => break,
                    Some(b'\n') => {}
                    Some(_) if indent == 0 => {
                        self.ptr = slice_start;
                        break;
                    }
                    Some(b) if !is_pattern_continuation(b) => {
                        self.ptr = slice_start;
                        break;
                    }
                    Some(_) => {}
                }
            }

            let (start, end, element_type, termination) = self.get_text_slice()?;
            if start != end {
                if text_element_role == TextElementPosition::LineStart
                    && element_type == TextElementType::NonBlank
                {
                    common_indent = Some(match common_indent {
                        Some(ci) if ci <= indent => ci,
                        _ => indent,
                    });
                }
                if text_element_role != TextElementPosition::LineStart
                    || element_type == TextElementType::NonBlank
                    || termination == TextElementTermination::LineFeed
                {
                    if element_type == TextElementType::NonBlank {
                        last_non_blank = Some(elements.len());
                    }
                    // Blank line-start slices carry only their terminator;
                    // the leading blank was consumed above and must not
                    // reappear after dedenting.
                    let keep_start = if text_element_role == TextElementPosition::LineStart
                        && element_type == TextElementType::Blank
                    {
                        start
                    } else {
                        slice_start
                    };
                    elements.push(PatternElementPlaceholder::TextElement {
                        start: keep_start,
                        end,
                        indent,
                        position: text_element_role,
                        element_type,
                    });
                }
            }

            text_element_role = match termination {
                TextElementTermination::LineFeed | TextElementTermination::Crlf => {
                    TextElementPosition::LineStart
                }
                TextElementTermination::PlaceableStart | TextElementTermination::Eof => {
                    TextElementPosition::InLine
                }
            };
        }

        let last_non_blank = match last_non_blank {
            Some(idx) => idx,
            None => return Ok(None),
        };

        let elements = elements
            .into_iter()
            .take(last_non_blank + 1)
            .enumerate()
            .map(|(i, element)| match element {
                PatternElementPlaceholder::Placeable(expression) => {
                    ast::PatternElement::Placeable(expression)
                }
                PatternElementPlaceholder::TextElement {
                    start,
                    end,
                    indent,
                    position,
                    element_type,
                } => {
                    let start = if position == TextElementPosition::LineStart
                        && element_type == TextElementType::NonBlank
                    {
                        match common_indent {
                            Some(common_indent) => start + cmp::min(indent, common_indent),
                            None => start + indent,
                        }
                    } else {
                        start
                    };
                    let mut slice = &self.source[start..end];
                    if i == last_non_blank {
                        slice = slice
                            .trim_end_matches(|c| c == '\n' || c == '\r' || c == ' ' || c == '\t');
                    }
                    ast::PatternElement::TextElement(slice)
                }
            })
            .collect();

        Ok(Some(ast::Pattern { elements }))
    }

    fn get_text_slice(
        &mut self,
    ) -> Result<(usize, usize, TextElementType, TextElementTermination)> {
        let start = self.ptr;
        let mut element_type = TextElementType::Blank;
        let bytes = self.source.as_bytes();

        while self.ptr < self.length {
            match bytes[self.ptr] {
                b' ' | b'\t' => self.ptr += 1,
                b'\n' => {
                    self.ptr += 1;
                    return Ok((start, self.ptr, element_type, TextElementTermination::LineFeed));
                }
                b'\r' if self.is_byte_at(b'\n', self.ptr + 1) => {
                    self.ptr += 1;
                    return Ok((
                        start,
                        self.ptr - 1,
                        element_type,
                        TextElementTermination::Crlf,
                    ));
                }
                b'{' => {
                    return Ok((
                        start,
                        self.ptr,
                        element_type,
                        TextElementTermination::PlaceableStart,
                    ));
                }
                b'}' => return Err(self.error_here(ErrorKind::UnbalancedClosingBrace)),
                _ => {
                    element_type = TextElementType::NonBlank;
                    self.ptr += 1;
                }
            }
        }
        Ok((start, self.ptr, element_type, TextElementTermination::Eof))
    }

    // Scanner primitives.

    pub(super) fn current_byte(&self) -> Option<u8> {
        self.source.as_bytes().get(self.ptr).copied()
    }

    pub(super) fn byte_at(&self, pos: usize) -> Option<u8> {
        self.source.as_bytes().get(pos).copied()
    }

    pub(super) fn is_current_byte(&self, b: u8) -> bool {
        self.current_byte() == Some(b)
    }

    pub(super) fn is_byte_at(&self, b: u8, pos: usize) -> bool {
        self.byte_at(pos) == Some(b)
    }

    pub(super) fn take_byte_if(&mut self, b: u8) -> bool {
        if self.is_current_byte(b) {
            self.ptr += 1;
            true
        } else {
            false
        }
    }

    pub(super) fn expect_byte(&mut self, b: u8) -> Result<()> {
        if self.take_byte_if(b) {
            Ok(())
        } else {
            Err(self.error_here(ErrorKind::ExpectedToken(b as char)))
        }
    }

    pub(super) fn is_identifier_start_at(&self, pos: usize) -> bool {
        matches!(self.byte_at(pos), Some(b) if b.is_ascii_alphabetic())
    }

    /// Consumes SPACE and TAB, returning the width consumed.
    pub(super) fn skip_blank_inline(&mut self) -> usize {
        let start = self.ptr;
        while matches!(self.current_byte(), Some(b' ') | Some(b'\t')) {
            self.ptr += 1;
        }
        self.ptr - start
    }

    /// Consumes whole blank lines, returning the number of line terminators
    /// consumed. The cursor never ends up in the middle of a non-blank line.
    pub(super) fn skip_blank_block(&mut self) -> usize {
        let mut count = 0;
        loop {
            let line_start = self.ptr;
            self.skip_blank_inline();
            if !self.skip_eol() {
                self.ptr = line_start;
                break;
            }
            count += 1;
        }
        count
    }

    /// Consumes any run of inline blank and line terminators.
    pub(super) fn skip_blank(&mut self) {
        loop {
            match self.current_byte() {
                Some(b' ') | Some(b'\t') | Some(b'\n') => self.ptr += 1,
                Some(b'\r') if self.is_byte_at(b'\n', self.ptr + 1) => self.ptr += 2,
                _ => break,
            }
        }
    }

    /// Consumes one line terminator (`LF` or `CRLF`). A bare `CR` does not
    /// terminate a line.
    pub(super) fn skip_eol(&mut self) -> bool {
        match self.current_byte() {
            Some(b'\n') => {
                self.ptr += 1;
                true
            }
            Some(b'\r') if self.is_byte_at(b'\n', self.ptr + 1) => {
                self.ptr += 2;
                true
            }
            _ => false,
        }
    }

    /// Advances to the next LF (exclusive), or EOF.
    pub(super) fn skip_to_eol(&mut self) {
        match memchr::memchr(b'\n', &self.source.as_bytes()[self.ptr..]) {
            Some(offset) => self.ptr += offset,
            None => self.ptr = self.length,
        }
    }

    /// Error-recovery synchronization: advance to the first line after
    /// `junk_start` that could begin a new entry.
    fn skip_to_next_entry_start(&mut self, junk_start: usize) {
        let bytes = self.source.as_bytes();
        while self.ptr < self.length {
            let line_start = self.ptr == 0 || bytes[self.ptr - 1] == b'\n';
            if line_start && self.ptr > junk_start {
                match bytes[self.ptr] {
                    b'#' | b'-' => break,
                    b if b.is_ascii_alphabetic() => break,
                    _ => {}
                }
            }
            match memchr::memchr(b'\n', &bytes[self.ptr..]) {
                Some(offset) => self.ptr += offset + 1,
                None => self.ptr = self.length,
            }
        }
    }

    // Diagnostics.

    fn line_at(&self, offset: usize) -> usize {
        memchr::memchr_iter(b'\n', &self.source.as_bytes()[..offset]).count() + 1
    }

    pub(super) fn error_here(&self, kind: ErrorKind) -> ParserError {
        self.error_from(kind, self.ptr)
    }

    pub(super) fn error_from(&self, kind: ErrorKind, start: usize) -> ParserError {
        let end = cmp::min(cmp::max(self.ptr, start + 1), self.length.max(start + 1));
        ParserError::new(kind, start..end, self.line_at(cmp::min(start, self.length)))
    }

    pub(super) fn error_char_range(&self, range: &str) -> ParserError {
        self.error_here(ErrorKind::ExpectedCharRange {
            range: range.to_owned(),
        })
    }
}

/// A continuation line keeps belonging to the pattern unless its first
/// non-blank byte introduces an attribute, a variant or closes a placeable.
fn is_pattern_continuation(b: u8) -> bool {
    !matches!(b, b'}' | b'.' | b'[' | b'*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_blank_inline_consumes_space_and_tab() {
        let mut parser = Parser::new("  \t x");
        assert_eq!(parser.skip_blank_inline(), 3);
        assert_eq!(parser.ptr, 3);
        assert_eq!(parser.skip_blank_inline(), 0);
    }

    #[test]
    fn skip_blank_block_counts_line_terminators() {
        let mut parser = Parser::new("\n  \n\t\r\nfoo");
        assert_eq!(parser.skip_blank_block(), 3);
        assert!(parser.is_current_byte(b'f'));
    }

    #[test]
    fn skip_blank_block_rewinds_partial_line() {
        let mut parser = Parser::new("\n   foo");
        assert_eq!(parser.skip_blank_block(), 1);
        // The cursor is at the start of the non-blank line, not inside it.
        assert_eq!(parser.ptr, 1);
    }

    #[test]
    fn bare_cr_is_not_a_line_terminator() {
        let mut parser = Parser::new("\rx");
        assert!(!parser.skip_eol());
        assert_eq!(parser.ptr, 0);

        let mut parser = Parser::new("\r\nx");
        assert!(parser.skip_eol());
        assert_eq!(parser.ptr, 2);
    }

    #[test]
    fn identifier_end_stops_at_non_identifier_bytes() {
        let mut parser = Parser::new("abc-DEF_9 rest");
        let id = parser.get_identifier().unwrap();
        assert_eq!(id.name, "abc-DEF_9");
        assert!(parser.is_current_byte(b' '));
    }

    #[test]
    fn identifier_must_start_alphabetic() {
        let mut parser = Parser::new("9abc");
        let err = parser.get_identifier().unwrap_err();
        assert_eq!(err.code(), "E0004");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn skip_to_eol_stops_at_lf() {
        let mut parser = Parser::new("abc\ndef");
        parser.skip_to_eol();
        assert!(parser.is_current_byte(b'\n'));
    }

    #[test]
    fn error_line_numbers_are_one_based() {
        let parser = Parser::new("a\nb\nc");
        assert_eq!(parser.line_at(0), 1);
        assert_eq!(parser.line_at(2), 2);
        assert_eq!(parser.line_at(4), 3);
    }
}
