use std::collections::HashMap;
use std::io::Write;
use std::num::NonZeroUsize;
use std::thread;

use crossbeam_channel::bounded;

use super::{AssetEmbedder, emit, validate_batch};
use crate::asset::{Asset, EncodedAsset};
use crate::error::EmbedError;
use crate::strategy::Strategy;

/// Encodes assets on a fixed pool of worker threads.
///
/// Work is fed through a queue bounded to the pool size; results come back
/// on a completion queue sized to the batch, so workers never block on
/// submission. Every dispatched asset is drained before any result is
/// inspected. When several assets fail, the error returned is whichever
/// arrived first, which depends on scheduling.
pub struct ConcurrentEmbedder<'s> {
    strategy: &'s dyn Strategy,
    workers: NonZeroUsize,
}

impl<'s> ConcurrentEmbedder<'s> {
    pub fn new(strategy: &'s dyn Strategy, workers: NonZeroUsize) -> Self {
        Self { strategy, workers }
    }

    /// Encode every asset and return the literals keyed by asset key.
    fn encode_all(&self, assets: Vec<Asset>) -> Result<HashMap<String, String>, EmbedError> {
        let total = assets.len();
        if total == 0 {
            return Ok(HashMap::new());
        }

        let workers = self.workers.get().min(total);
        let strategy = self.strategy;
        let (work_tx, work_rx) = bounded::<Asset>(workers);
        let (done_tx, done_rx) = bounded::<EncodedAsset>(total);

        log::debug!("concurrent embed: {total} assets on {workers} workers");

        let completed = thread::scope(|scope| -> Result<Vec<EncodedAsset>, EmbedError> {
            for id in 0..workers {
                let work_rx = work_rx.clone();
                let done_tx = done_tx.clone();
                thread::Builder::new()
                    .name(format!("assetembed-worker-{id}"))
                    .spawn_scoped(scope, move || {
                        for asset in work_rx {
                            if done_tx.send(asset.encode(strategy)).is_err() {
                                break;
                            }
                        }
                    })
                    .map_err(EmbedError::WorkerSpawn)?;
            }
            drop(work_rx);
            drop(done_tx);

            for asset in assets {
                // Only fails once every worker is gone; the scope re-raises
                // the worker panic on exit.
                if work_tx.send(asset).is_err() {
                    break;
                }
            }
            drop(work_tx);

            Ok(done_rx.iter().take(total).collect())
        })?;

        let mut literals = HashMap::with_capacity(total);
        let mut first_failure = None;
        for encoded in completed {
            match encoded.literal {
                Ok(literal) => {
                    log::trace!("encoded {} ({} chars)", encoded.key, literal.len());
                    literals.insert(encoded.key, literal);
                }
                Err(err) => {
                    log::debug!("encoding {} failed: {err}", encoded.key);
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(literals),
        }
    }
}

impl AssetEmbedder for ConcurrentEmbedder<'_> {
    fn embed(
        &self,
        dst: &mut dyn Write,
        assets: Vec<Asset>,
        package_name: &str,
        function_name: &str,
    ) -> Result<usize, EmbedError> {
        validate_batch(&assets, package_name, function_name)?;

        let order: Vec<String> = assets.iter().map(|asset| asset.key.clone()).collect();
        let mut literals = self.encode_all(assets)?;

        // Keys are unique and each was encoded exactly once, so every lookup
        // hits.
        let encoded: Vec<(String, String)> = order
            .into_iter()
            .filter_map(|key| literals.remove(&key).map(|literal| (key, literal)))
            .collect();
        debug_assert!(literals.is_empty());

        let n = emit(dst, self.strategy, package_name, function_name, encoded)?;
        log::debug!("concurrent embed: wrote {n} bytes");
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SequentialEmbedder;
    use crate::strategy::Encoding;
    use std::io::{self, Cursor, Read};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn workers(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    /// Sleeps before its first read so later assets finish earlier.
    struct SlowReader {
        inner: Cursor<Vec<u8>>,
        delay: Option<Duration>,
    }

    impl Read for SlowReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if let Some(delay) = self.delay.take() {
                thread::sleep(delay);
            }
            self.inner.read(buf)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("unreadable"))
        }
    }

    /// Counts how many streams were read to completion.
    struct CountingReader {
        inner: Cursor<Vec<u8>>,
        finished: Arc<AtomicUsize>,
    }

    impl Read for CountingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.inner.read(buf)?;
            if n == 0 {
                self.finished.fetch_add(1, Ordering::SeqCst);
            }
            Ok(n)
        }
    }

    fn sample_assets(slow_first: bool) -> Vec<Asset> {
        let mut assets = Vec::new();
        for i in 0..16 {
            let key = format!("/dir{}/file{i}.txt", i % 3);
            let content = format!("content of asset {i}").repeat(i + 1).into_bytes();
            let delay = (slow_first && i == 0).then(|| Duration::from_millis(100));
            assets.push(Asset::new(
                key,
                SlowReader {
                    inner: Cursor::new(content),
                    delay,
                },
            ));
        }
        assets
    }

    fn embed_to_vec(embedder: &dyn AssetEmbedder, assets: Vec<Asset>) -> Vec<u8> {
        let mut out = Vec::new();
        let n = embedder
            .embed(&mut out, assets, "assets", "load_assets")
            .unwrap();
        assert_eq!(n, out.len());
        out
    }

    #[test]
    fn test_concurrent_preserves_input_order() {
        for encoding in Encoding::ALL {
            let strategy = encoding.strategy();
            let sequential = embed_to_vec(&SequentialEmbedder::new(strategy), sample_assets(false));
            let concurrent = embed_to_vec(
                &ConcurrentEmbedder::new(strategy, workers(4)),
                sample_assets(true),
            );

            assert_eq!(sequential, concurrent, "{encoding}: outputs differ");
        }
    }

    #[test]
    fn test_concurrent_single_worker_matches_sequential() {
        let strategy = Encoding::Zbase64.strategy();
        let sequential = embed_to_vec(&SequentialEmbedder::new(strategy), sample_assets(false));
        let concurrent = embed_to_vec(
            &ConcurrentEmbedder::new(strategy, workers(1)),
            sample_assets(false),
        );
        assert_eq!(sequential, concurrent);
    }

    #[test]
    fn test_concurrent_more_workers_than_assets() {
        let strategy = Encoding::Hex.strategy();
        let out = embed_to_vec(
            &ConcurrentEmbedder::new(strategy, workers(64)),
            vec![Asset::from_bytes("/only", "one")],
        );
        assert!(String::from_utf8(out).unwrap().contains(r#"assets.insert("/only", decode(br"6f6e65")?);"#));
    }

    #[test]
    fn test_concurrent_empty_batch() {
        let strategy = Encoding::Base64.strategy();
        let sequential = embed_to_vec(&SequentialEmbedder::new(strategy), vec![]);
        let concurrent = embed_to_vec(&ConcurrentEmbedder::new(strategy, workers(4)), vec![]);
        assert_eq!(sequential, concurrent);
    }

    #[test]
    fn test_concurrent_failure_writes_nothing_and_drains_all() {
        let finished = Arc::new(AtomicUsize::new(0));
        let mut assets = vec![Asset::new("/bad", FailingReader)];
        for i in 0..10 {
            assets.push(Asset::new(
                format!("/good{i}"),
                CountingReader {
                    inner: Cursor::new(vec![i as u8; 1024]),
                    finished: Arc::clone(&finished),
                },
            ));
        }

        let embedder = ConcurrentEmbedder::new(Encoding::Zhex.strategy(), workers(3));
        let mut out = Vec::new();
        let err = embedder
            .embed(&mut out, assets, "assets", "load_assets")
            .unwrap_err();

        assert!(matches!(err, EmbedError::Read { ref key, .. } if key == "/bad"));
        assert!(out.is_empty());
        // Every other asset was still encoded before the error surfaced
        assert_eq!(finished.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_concurrent_multiple_failures_reports_one_of_them() {
        let assets = vec![
            Asset::new("/bad1", FailingReader),
            Asset::from_bytes("/good", "ok"),
            Asset::new("/bad2", FailingReader),
        ];
        let embedder = ConcurrentEmbedder::new(Encoding::Quote.strategy(), workers(2));
        let mut out = Vec::new();

        match embedder.embed(&mut out, assets, "assets", "load_assets") {
            Err(EmbedError::Read { key, .. }) => assert!(key == "/bad1" || key == "/bad2"),
            other => panic!("expected read failure, got {other:?}"),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn test_concurrent_rejects_duplicate_keys() {
        let assets = vec![Asset::from_bytes("/same", "1"), Asset::from_bytes("/same", "2")];
        let embedder = ConcurrentEmbedder::new(Encoding::Hex.strategy(), workers(2));
        let mut out = Vec::new();

        assert!(matches!(
            embedder.embed(&mut out, assets, "assets", "load_assets"),
            Err(EmbedError::DuplicateKey(key)) if key == "/same"
        ));
        assert!(out.is_empty());
    }
}
