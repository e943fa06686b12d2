//! Escape decoding for string literals.
//!
//! Text elements never interpret escapes; only `"…"` literals do. The
//! parser validates escape sequences and stores the raw slice; this module
//! is the single place where the sequences are decoded into codepoints.
//!
//! Surrogate pairs written as two `\uXXXX` escapes compose into a single
//! supplementary-plane codepoint. A lone or malformed surrogate decodes to
//! U+FFFD.

use std::borrow::Cow;
use std::fmt;

const UNKNOWN_CHAR: char = '\u{FFFD}';

fn hex_value(input: &str, start: usize, length: usize) -> Option<u32> {
    input
        .get(start..start + length)
        .and_then(|seq| u32::from_str_radix(seq, 16).ok())
}

/// Writes `input` with all escape sequences decoded.
pub fn unescape_unicode<W: fmt::Write>(w: &mut W, input: &str) -> fmt::Result {
    let bytes = input.as_bytes();
    let mut start = 0;
    let mut ptr = 0;

    while let Some(b) = bytes.get(ptr) {
        if b != &b'\\' {
            ptr += 1;
            continue;
        }
        if start != ptr {
            w.write_str(&input[start..ptr])?;
        }

        ptr += 1;
        let new_char = match bytes.get(ptr) {
            Some(b'\\') => {
                ptr += 1;
                '\\'
            }
            Some(b'"') => {
                ptr += 1;
                '"'
            }
            Some(u @ b'u') | Some(u @ b'U') => {
                let length = if u == &b'u' { 4 } else { 6 };
                ptr += 1;
                match hex_value(input, ptr, length) {
                    Some(code) => {
                        ptr += length;
                        match code {
                            0xD800..=0xDBFF => {
                                // A high surrogate: look for a trailing
                                // `\uXXXX` low surrogate to compose with.
                                let low = if bytes.get(ptr) == Some(&b'\\')
                                    && bytes.get(ptr + 1) == Some(&b'u')
                                {
                                    hex_value(input, ptr + 2, 4)
                                        .filter(|low| (0xDC00..=0xDFFF).contains(low))
                                } else {
                                    None
                                };
                                match low {
                                    Some(low) => {
                                        ptr += 6;
                                        let code = 0x10000
                                            + ((code - 0xD800) << 10)
                                            + (low - 0xDC00);
                                        char::from_u32(code).unwrap_or(UNKNOWN_CHAR)
                                    }
                                    None => UNKNOWN_CHAR,
                                }
                            }
                            _ => char::from_u32(code).unwrap_or(UNKNOWN_CHAR),
                        }
                    }
                    // Not a hex run (already a parse error); keep the tail
                    // verbatim after the replacement character.
                    None => UNKNOWN_CHAR,
                }
            }
            _ => {
                ptr += 1;
                UNKNOWN_CHAR
            }
        };
        w.write_char(new_char)?;
        start = ptr;
    }

    if start != bytes.len() {
        w.write_str(&input[start..])?;
    }
    Ok(())
}

/// Decodes escapes, borrowing when the input contains none.
pub fn unescape(input: &str) -> Cow<'_, str> {
    if !input.contains('\\') {
        return Cow::Borrowed(input);
    }
    let mut result = String::with_capacity(input.len());
    // Writing into a String is infallible.
    let _ = unescape_unicode(&mut result, input);
    Cow::Owned(result)
}
