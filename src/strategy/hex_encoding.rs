use std::io;

use super::{Strategy, zlib};
use crate::error::DecodeError;
use crate::literal;

/// Lowercase hexadecimal in a raw byte string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hex;

/// Zlib-compressed, then lowercase hexadecimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZHex;

const HEX_DECODE: &str = r#"fn decode(s: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(Vec::<u8>::from_hex(s)?)
        }"#;

const ZHEX_DECODE: &str = r#"fn decode(s: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
            let compressed = Vec::<u8>::from_hex(s)?;
            let mut out = Vec::new();
            ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut out)?;
            Ok(out)
        }"#;

impl Strategy for Hex {
    fn encode_bytes(&self, bytes: &[u8]) -> io::Result<String> {
        Ok(literal::raw_byte_string(&hex::encode(bytes)))
    }

    fn decode_source(&self) -> &'static str {
        HEX_DECODE
    }

    fn imports(&self) -> &'static [&'static str] {
        &["hex::FromHex"]
    }

    fn decode_payload(&self, payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
        Ok(hex::decode(payload)?)
    }
}

impl Strategy for ZHex {
    fn encode_bytes(&self, bytes: &[u8]) -> io::Result<String> {
        let compressed = zlib::compress(bytes)?;
        Ok(literal::raw_byte_string(&hex::encode(compressed)))
    }

    fn decode_source(&self) -> &'static str {
        ZHEX_DECODE
    }

    fn imports(&self) -> &'static [&'static str] {
        &["flate2::read::ZlibDecoder", "hex::FromHex", "std::io::Read"]
    }

    fn decode_payload(&self, payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let compressed = hex::decode(payload)?;
        Ok(zlib::decompress(&compressed)?)
    }
}
