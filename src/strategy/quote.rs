use std::io;

use super::Strategy;
use crate::error::DecodeError;
use crate::literal;

/// Embeds bytes as an escaped `b"..."` literal; decoding is a copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quote;

const DECODE: &str = r#"fn decode(s: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(s.to_vec())
        }"#;

impl Strategy for Quote {
    fn encode_bytes(&self, bytes: &[u8]) -> io::Result<String> {
        Ok(literal::escaped_byte_string(bytes))
    }

    fn decode_source(&self) -> &'static str {
        DECODE
    }

    fn imports(&self) -> &'static [&'static str] {
        &[]
    }

    fn decode_payload(&self, payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
        Ok(payload.to_vec())
    }
}
