//! Error types for the embedding pipeline
//!
//! `EmbedError` covers everything that can stop a batch: unreadable content,
//! a failing encode transform, invalid configuration, and output failures.
//! `DecodeError` is the host-side mirror of what the generated decode
//! function can report at the consumer's runtime.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while turning a batch of assets into a generated file
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The asset's content stream could not be fully consumed
    #[error("failed to read asset {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The strategy's transform failed on otherwise readable bytes
    #[error("failed to encode asset {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Two assets in one batch share a key
    #[error("duplicate asset key {0}")]
    DuplicateKey(String),

    /// Package or function name cannot appear in generated Rust source
    #[error("invalid {role} name {name:?}: not a Rust identifier")]
    InvalidIdentifier { role: &'static str, name: String },

    #[error("invalid loader template: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// Template failure while rendering the generated file
    #[error("failed to render generated file: {0}")]
    Render(#[from] handlebars::RenderError),

    /// The destination sink rejected a write
    #[error("failed to write generated file: {0}")]
    Write(#[source] io::Error),

    #[error("failed to spawn encoder worker: {0}")]
    WorkerSpawn(#[source] io::Error),

    /// Directory traversal failed
    #[error("failed to walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A file name cannot be turned into a key
    #[error("file name is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure while decoding an embedded literal back into bytes
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The literal is not a byte-string expression
    #[error("malformed literal: {0}")]
    Literal(#[from] syn::Error),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Compressed payload could not be inflated
    #[error("failed to inflate: {0}")]
    Inflate(#[from] io::Error),
}
