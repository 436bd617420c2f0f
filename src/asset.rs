//! Assets to embed and their encoded form
//!
//! An [`Asset`] is a key plus a content stream that is read exactly once,
//! when the asset is encoded. Keys start with `/` and use `/` as separator on
//! every platform, e.g. `/img/logo.png`.

use std::collections::HashSet;
use std::fmt;
use std::io::{Cursor, Read};
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::error::EmbedError;
use crate::strategy::Strategy;

/// A named piece of data to embed
pub struct Asset {
    pub key: String,
    pub content: Box<dyn Read + Send>,
}

impl Asset {
    pub fn new(key: impl Into<String>, content: impl Read + Send + 'static) -> Self {
        Self {
            key: key.into(),
            content: Box::new(content),
        }
    }

    /// Asset backed by an in-memory buffer
    pub fn from_bytes(key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(key, Cursor::new(bytes.into()))
    }

    /// Consume the content stream and encode it with `strategy`.
    pub fn encode(mut self, strategy: &dyn Strategy) -> EncodedAsset {
        let literal = strategy.encode(&self.key, &mut self.content);
        EncodedAsset {
            key: self.key,
            literal,
        }
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset").field("key", &self.key).finish_non_exhaustive()
    }
}

/// An asset after encoding: either a delimiter-enclosed literal or the
/// failure that prevented one.
#[derive(Debug)]
pub struct EncodedAsset {
    pub key: String,
    pub literal: Result<String, EmbedError>,
}

/// Reject batches where two assets share a key.
pub(crate) fn check_unique_keys(assets: &[Asset]) -> Result<(), EmbedError> {
    let mut seen = HashSet::with_capacity(assets.len());
    for asset in assets {
        if !seen.insert(asset.key.as_str()) {
            return Err(EmbedError::DuplicateKey(asset.key.clone()));
        }
    }
    Ok(())
}

/// Build the `/`-rooted key for `path` relative to `root`.
///
/// Keys must be valid UTF-8; a file name that is not fails instead of being
/// replaced lossily.
fn asset_key(root: &Path, path: &Path) -> Result<String, EmbedError> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut key = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| EmbedError::NonUtf8Path {
                path: path.to_path_buf(),
            })?;
            key.push('/');
            key.push_str(part);
        }
    }
    Ok(key)
}

/// Walk `root` recursively and load every regular file as an asset.
///
/// Entries are visited in file-name order so repeated runs over the same
/// tree produce the same asset list. File contents are read up front; any
/// filesystem failure aborts the walk.
pub fn find_assets(root: impl AsRef<Path>) -> Result<Vec<Asset>, EmbedError> {
    let root = root.as_ref();
    let mut assets = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let key = asset_key(root, path)?;
        let bytes = std::fs::read(path).map_err(|source| EmbedError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        log::trace!("found asset {key} ({} bytes)", bytes.len());
        assets.push(Asset::from_bytes(key, bytes));
    }

    log::debug!("found {} assets under {}", assets.len(), root.display());
    Ok(assets)
}
