//! A recursive-descent parser for the FTL format.
//!
//! The parser operates directly on bytes of the UTF-8 source and only
//! decodes codepoints where the grammar admits non-ASCII content. It is
//! resilient: an error inside an entry is recorded, the parser synchronizes
//! on the next entry boundary, and the skipped bytes are preserved as a
//! [`Junk`](crate::ast::ResourceEntry::Junk) entry. A [`Resource`] is
//! therefore always produced.
//!
//! # Example
//!
//! ```
//! use flute_syntax::parser::parse;
//! use flute_syntax::ast;
//!
//! let ftl = "hello = Hello, world!\n";
//! let resource = parse(ftl).expect("parse errors");
//!
//! match &resource.body[0] {
//!     ast::ResourceEntry::Entry(ast::Entry::Message(msg)) => {
//!         assert_eq!(msg.id.name, "hello");
//!     }
//!     _ => panic!("expected a message"),
//! }
//! ```
//!
//! [`Resource`]: crate::ast::Resource

mod comment;
mod core;
mod errors;
mod expression;

pub use errors::{ErrorKind, ParserError};

use self::core::Parser;
use crate::ast;

pub(crate) type Result<T> = std::result::Result<T, ParserError>;

/// Parses an FTL source into a [`Resource`](crate::ast::Resource).
///
/// On recovered errors the AST is still returned, together with the list of
/// diagnostics, in the `Err` arm.
pub fn parse(
    source: &str,
) -> std::result::Result<ast::Resource<'_>, (ast::Resource<'_>, Vec<ParserError>)> {
    Parser::new(source).parse()
}
