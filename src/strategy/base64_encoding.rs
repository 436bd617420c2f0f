use std::io;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{Strategy, zlib};
use crate::error::DecodeError;
use crate::literal;

/// Standard padded base64 in a raw byte string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64;

/// Zlib-compressed, then standard padded base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZBase64;

const BASE64_DECODE: &str = r#"fn decode(s: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(STANDARD.decode(s)?)
        }"#;

const ZBASE64_DECODE: &str = r#"fn decode(s: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
            let compressed = STANDARD.decode(s)?;
            let mut out = Vec::new();
            ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut out)?;
            Ok(out)
        }"#;

impl Strategy for Base64 {
    fn encode_bytes(&self, bytes: &[u8]) -> io::Result<String> {
        Ok(literal::raw_byte_string(&STANDARD.encode(bytes)))
    }

    fn decode_source(&self) -> &'static str {
        BASE64_DECODE
    }

    fn imports(&self) -> &'static [&'static str] {
        &["base64::Engine", "base64::engine::general_purpose::STANDARD"]
    }

    fn decode_payload(&self, payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
        Ok(STANDARD.decode(payload)?)
    }
}

impl Strategy for ZBase64 {
    fn encode_bytes(&self, bytes: &[u8]) -> io::Result<String> {
        let compressed = zlib::compress(bytes)?;
        Ok(literal::raw_byte_string(&STANDARD.encode(compressed)))
    }

    fn decode_source(&self) -> &'static str {
        ZBASE64_DECODE
    }

    fn imports(&self) -> &'static [&'static str] {
        &[
            "base64::Engine",
            "base64::engine::general_purpose::STANDARD",
            "flate2::read::ZlibDecoder",
            "std::io::Read",
        ]
    }

    fn decode_payload(&self, payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let compressed = STANDARD.decode(payload)?;
        Ok(zlib::decompress(&compressed)?)
    }
}
