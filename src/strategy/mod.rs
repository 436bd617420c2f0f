//! Encoding strategies
//!
//! A strategy pairs an encode transform (raw bytes to a Rust byte-string
//! literal) with the Rust source of the function that reverses it inside the
//! generated file, plus the `use` paths that function needs. Each strategy
//! also decodes its own payloads on the host, which is what `verify` reads
//! generated files back with.
//!
//! | encoding  | literal          | generated decode needs   |
//! |-----------|------------------|--------------------------|
//! | `quote`   | `b"..."` escaped | nothing                  |
//! | `hex`     | `br"..."`        | `hex`                    |
//! | `base64`  | `br"..."`        | `base64`                 |
//! | `zhex`    | `br"..."`        | `flate2`, `hex`          |
//! | `zbase64` | `br"..."`        | `flate2`, `base64`       |

mod base64_encoding;
mod hex_encoding;
mod quote;
mod zlib;

use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EmbedError};
use crate::literal;

pub use self::base64_encoding::{Base64, ZBase64};
pub use self::hex_encoding::{Hex, ZHex};
pub use self::quote::Quote;

/// An encode/decode pair for embedding bytes in generated Rust source.
///
/// Implementations are stateless and shared across worker threads.
pub trait Strategy: Send + Sync {
    /// Transform raw bytes into a complete, delimiter-enclosed literal.
    fn encode_bytes(&self, bytes: &[u8]) -> io::Result<String>;

    /// Source of `fn decode(s: &[u8]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>>`,
    /// embedded verbatim in the generated loader.
    fn decode_source(&self) -> &'static str;

    /// `use` paths the decode source relies on, in emission order.
    fn imports(&self) -> &'static [&'static str];

    /// Host-side equivalent of [`Strategy::decode_source`]: `payload` is
    /// the value of the byte-string literal, as the generated `decode`
    /// receives it.
    fn decode_payload(&self, payload: &[u8]) -> Result<Vec<u8>, DecodeError>;

    /// Decode a literal as it appears in source, delimiters included.
    fn decode_literal(&self, literal: &str) -> Result<Vec<u8>, DecodeError> {
        self.decode_payload(&literal::byte_string_value(literal)?)
    }

    /// Read `content` to the end and encode it.
    fn encode(&self, key: &str, content: &mut dyn Read) -> Result<String, EmbedError> {
        let mut bytes = Vec::new();
        content
            .read_to_end(&mut bytes)
            .map_err(|source| EmbedError::Read {
                key: key.to_string(),
                source,
            })?;
        self.encode_bytes(&bytes).map_err(|source| EmbedError::Encode {
            key: key.to_string(),
            source,
        })
    }
}

/// Selector for the built-in strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Escaped byte string
    #[default]
    Quote,
    /// Lowercase hexadecimal
    Hex,
    /// Standard base64
    Base64,
    /// Zlib-compressed, then hexadecimal
    Zhex,
    /// Zlib-compressed, then base64
    Zbase64,
}

impl Encoding {
    pub const ALL: [Encoding; 5] = [
        Encoding::Quote,
        Encoding::Hex,
        Encoding::Base64,
        Encoding::Zhex,
        Encoding::Zbase64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Quote => "quote",
            Encoding::Hex => "hex",
            Encoding::Base64 => "base64",
            Encoding::Zhex => "zhex",
            Encoding::Zbase64 => "zbase64",
        }
    }

    /// The strategy implementing this encoding
    pub fn strategy(self) -> &'static dyn Strategy {
        match self {
            Encoding::Quote => &Quote,
            Encoding::Hex => &Hex,
            Encoding::Base64 => &Base64,
            Encoding::Zhex => &ZHex,
            Encoding::Zbase64 => &ZBase64,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|encoding| encoding.name() == s)
            .ok_or_else(|| format!("unknown embedding algorithm {s:?}"))
    }
}

/// Mismatch found by [`check_round_trip`]
#[derive(Debug, thiserror::Error)]
pub enum RoundTripError {
    #[error("encode failed: {0}")]
    Encode(#[source] io::Error),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("decoded {actual} bytes, expected {expected} bytes")]
    Mismatch { expected: usize, actual: usize },
}

/// Verify `decode(encode(bytes)) == bytes` for one strategy.
pub fn check_round_trip(strategy: &dyn Strategy, bytes: &[u8]) -> Result<(), RoundTripError> {
    let literal = strategy.encode_bytes(bytes).map_err(RoundTripError::Encode)?;
    let decoded = strategy.decode_literal(&literal)?;
    if decoded != bytes {
        return Err(RoundTripError::Mismatch {
            expected: bytes.len(),
            actual: decoded.len(),
        });
    }
    Ok(())
}
