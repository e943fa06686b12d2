use super::core::Parser;
use super::Result;
use crate::ast;

impl<'s> Parser<'s> {
    /// Parses a run of comment lines of one level into a single comment.
    ///
    /// Consecutive lines of the same level merge; a level change ends the
    /// comment and leaves the cursor at the start of the new sigil run.
    pub(super) fn get_comment(&mut self) -> Result<ast::Comment<'s>> {
        let mut level = None;
        let mut content = vec![];

        loop {
            let line_level = self.get_comment_level();
            if level.is_some() && level != Some(line_level) {
                self.ptr -= line_level;
                break;
            }
            level = Some(line_level);

            if self.ptr >= self.length {
                content.push("");
                break;
            }
            if self.is_eol() {
                content.push("");
            } else {
                self.expect_byte(b' ')?;
                content.push(self.get_comment_line());
            }
            self.skip_eol();

            if !self.is_current_byte(b'#') {
                break;
            }
        }

        let comment_type = match level {
            Some(2) => ast::CommentType::Group,
            Some(3) => ast::CommentType::Resource,
            _ => ast::CommentType::Regular,
        };
        Ok(ast::Comment {
            comment_type,
            content,
        })
    }

    fn get_comment_level(&mut self) -> usize {
        let mut count = 0;
        while count < 3 && self.take_byte_if(b'#') {
            count += 1;
        }
        count
    }

    fn get_comment_line(&mut self) -> &'s str {
        let start = self.ptr;
        while self.ptr < self.length && !self.is_eol() {
            self.ptr += 1;
        }
        &self.source[start..self.ptr]
    }

    fn is_eol(&self) -> bool {
        match self.current_byte() {
            Some(b'\n') => true,
            Some(b'\r') => self.is_byte_at(b'\n', self.ptr + 1),
            _ => false,
        }
    }
}
