//! Execution engines
//!
//! Both engines take an ordered batch of assets, encode every one with a
//! strategy, and render the generated file only when the whole batch
//! succeeded. Nothing is written to the destination when encoding or
//! rendering fails; the finished file is handed over with one `write_all`.
//!
//! - [`SequentialEmbedder`] encodes in input order on the calling thread and
//!   stops at the first failure.
//! - [`ConcurrentEmbedder`] spreads encoding over a fixed pool of worker
//!   threads, drains every result, then restores input order before
//!   rendering. For the same input both produce byte-identical output.

mod concurrent;
mod sequential;

use std::io::Write;
use std::num::NonZeroUsize;

pub use concurrent::ConcurrentEmbedder;
pub use sequential::SequentialEmbedder;

use crate::asset::{Asset, check_unique_keys};
use crate::error::EmbedError;
use crate::render::{self, GeneratedFile};
use crate::strategy::{Encoding, Strategy};

/// Produces a generated Rust source file embedding a batch of assets.
///
/// The rendered file declares `pub mod <package_name>` containing
///
/// ```text
/// pub fn <function_name>() -> Result<HashMap<&'static str, Vec<u8>>, Box<dyn Error + Send + Sync>>
/// ```
///
/// which returns every asset keyed by its path, decoded back to the
/// original bytes.
pub trait AssetEmbedder {
    /// Encode `assets` and write the generated file to `dst`, returning the
    /// number of bytes written.
    fn embed(
        &self,
        dst: &mut dyn Write,
        assets: Vec<Asset>,
        package_name: &str,
        function_name: &str,
    ) -> Result<usize, EmbedError>;
}

/// Engine selection and sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedOptions {
    pub encoding: Encoding,
    /// Use the worker pool instead of encoding on the calling thread
    pub concurrent: bool,
    /// Worker pool size; ignored by the sequential engine
    pub workers: NonZeroUsize,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            concurrent: false,
            workers: default_workers(),
        }
    }
}

impl EmbedOptions {
    /// Build the engine these options describe.
    pub fn embedder(&self) -> Box<dyn AssetEmbedder> {
        let strategy = self.encoding.strategy();
        if self.concurrent {
            Box::new(ConcurrentEmbedder::new(strategy, self.workers))
        } else {
            Box::new(SequentialEmbedder::new(strategy))
        }
    }
}

/// Worker count matching the host's available parallelism.
pub fn default_workers() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

/// Checks shared by both engines, run before any content is read.
fn validate_batch(
    assets: &[Asset],
    package_name: &str,
    function_name: &str,
) -> Result<(), EmbedError> {
    render::validate_identifier("package", package_name)?;
    render::validate_identifier("function", function_name)?;
    check_unique_keys(assets)
}

/// Render an ordered, fully encoded batch.
fn emit(
    dst: &mut dyn Write,
    strategy: &dyn Strategy,
    package_name: &str,
    function_name: &str,
    encoded: Vec<(String, String)>,
) -> Result<usize, EmbedError> {
    let file = GeneratedFile::new(package_name, function_name, strategy, encoded);
    render::render(dst, &file)
}
