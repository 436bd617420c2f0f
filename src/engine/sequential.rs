use std::io::Write;

use super::{AssetEmbedder, emit, validate_batch};
use crate::asset::Asset;
use crate::error::EmbedError;
use crate::strategy::Strategy;

/// Encodes assets one by one, in input order.
pub struct SequentialEmbedder<'s> {
    strategy: &'s dyn Strategy,
}

impl<'s> SequentialEmbedder<'s> {
    pub fn new(strategy: &'s dyn Strategy) -> Self {
        Self { strategy }
    }
}

impl AssetEmbedder for SequentialEmbedder<'_> {
    fn embed(
        &self,
        dst: &mut dyn Write,
        assets: Vec<Asset>,
        package_name: &str,
        function_name: &str,
    ) -> Result<usize, EmbedError> {
        validate_batch(&assets, package_name, function_name)?;
        log::debug!("sequential embed: {} assets", assets.len());

        let mut encoded = Vec::with_capacity(assets.len());
        for asset in assets {
            let result = asset.encode(self.strategy);
            let literal = result.literal?;
            log::trace!("encoded {} ({} chars)", result.key, literal.len());
            encoded.push((result.key, literal));
        }

        let n = emit(dst, self.strategy, package_name, function_name, encoded)?;
        log::debug!("sequential embed: wrote {n} bytes");
        Ok(n)
    }
}
