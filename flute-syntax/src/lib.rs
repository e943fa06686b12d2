//! Syntax layer of the Flute localization system.
//!
//! This crate parses FTL sources into an [`ast::Resource`], reports
//! recoverable diagnostics with stable error codes, and serializes ASTs
//! back to canonical FTL. It carries no runtime policy: resolution,
//! formatting functions and bundles live in `flute-bundle`.

pub mod ast;
pub mod parser;
pub mod serializer;
pub mod unicode;
