//! Rust literal forms used in generated files
//!
//! Encoded payloads are emitted as byte-string literals: escaped (`b"..."`)
//! for the quote strategy, raw (`br"..."`) for every encoding whose alphabet
//! cannot contain a double quote. Keys are emitted as ordinary string
//! literals. Reading literals back goes through `syn`.

use syn::LitByteStr;

use crate::error::DecodeError;

/// Wrap an encoded body in raw byte-string delimiters.
///
/// The body must not contain `"`; hex and base64 alphabets never do.
pub fn raw_byte_string(body: &str) -> String {
    debug_assert!(!body.contains('"'));
    format!("br\"{body}\"")
}

/// Escape arbitrary bytes into a `b"..."` literal.
pub fn escaped_byte_string(bytes: &[u8]) -> String {
    format!("b\"{}\"", bytes.escape_ascii())
}

/// Render a key as a Rust string literal.
pub fn string_literal(value: &str) -> String {
    format!("{value:?}")
}

/// Bytes denoted by a byte-string literal in source form.
pub fn byte_string_value(literal: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(syn::parse_str::<LitByteStr>(literal)?.value())
}
