//! Single-slot cache for prediction runs.
//!
//! A prediction run decodes two rasters and scores every grid cell, so
//! it must not run once per caller. The cache holds at most one record
//! set and computes it at most once per generation: the slot lock is
//! held across the compute, so concurrent misses serialize and every
//! caller after the first observes the populated slot instead of
//! recomputing.
//!
//! Callers receive a shared immutable view (`Arc<[PredictionRecord]>`)
//! of the cached records; the cache never hands out anything mutable.
//! A failed compute leaves the slot empty, so the next caller retries
//! rather than serving a poisoned entry.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::pipeline::{PredictError, PredictionOutcome, PredictionRecord};

#[derive(Debug)]
struct CacheEntry {
    records: Arc<[PredictionRecord]>,
    generation: String,
}

/// At-most-once prediction cache.
#[derive(Debug, Default)]
pub struct PredictionCache {
    slot: Mutex<Option<CacheEntry>>,
}

impl PredictionCache {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the cached records, computing them first if the slot is
    /// empty.
    ///
    /// The slot lock is held for the duration of `compute`, so at most
    /// one compute runs no matter how many callers arrive at once.
    ///
    /// # Errors
    ///
    /// Propagates the compute's error. The slot stays empty in that
    /// case; a later call will run `compute` again.
    pub async fn get_or_compute<F, Fut>(
        &self,
        compute: F,
    ) -> Result<Arc<[PredictionRecord]>, PredictError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PredictionOutcome, PredictError>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            debug!(
                generation = %entry.generation,
                records = entry.records.len(),
                "serving cached predictions"
            );
            return Ok(Arc::clone(&entry.records));
        }

        debug!("prediction cache empty, computing");
        let outcome = compute().await?;

        let entry = CacheEntry {
            records: outcome.records.into(),
            generation: outcome.generation,
        };
        let records = Arc::clone(&entry.records);
        info!(
            generation = %entry.generation,
            records = records.len(),
            "prediction cache populated"
        );
        *slot = Some(entry);

        Ok(records)
    }

    /// Drop the cached entry, if any. The next call recomputes.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        match slot.take() {
            Some(entry) => info!(generation = %entry.generation, "prediction cache invalidated"),
            None => debug!("prediction cache invalidated while empty"),
        }
    }

    pub async fn is_populated(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Generation token of the cached entry, if populated.
    pub async fn generation(&self) -> Option<String> {
        self.slot
            .lock()
            .await
            .as_ref()
            .map(|entry| entry.generation.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RunStats;
    use futures::future::join_all;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    fn outcome(generation: &str, value: f64) -> PredictionOutcome {
        PredictionOutcome {
            records: vec![PredictionRecord {
                latitude: -13.0,
                longitude: 46.23,
                prediction_value: value,
            }],
            generation: generation.to_string(),
            stats: RunStats {
                total_points: 1,
                valid: 1,
                skipped_missing: 0,
                skipped_model: 0,
                elapsed: Duration::from_millis(1),
            },
        }
    }

    #[tokio::test]
    async fn test_miss_computes_then_hit_serves_cached() {
        let cache = PredictionCache::new();
        let computes = AtomicUsize::new(0);

        let first = cache
            .get_or_compute(|| async {
                computes.fetch_add(1, Ordering::SeqCst);
                Ok(outcome("gen-1", 0.5))
            })
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(computes.load(Ordering::SeqCst), 1);

        let second = cache
            .get_or_compute(|| async {
                computes.fetch_add(1, Ordering::SeqCst);
                Ok(outcome("gen-1", 0.5))
            })
            .await
            .unwrap();
        assert_eq!(computes.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_concurrent_misses_compute_exactly_once() {
        let cache = Arc::new(PredictionCache::new());
        let computes = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let cache = Arc::clone(&cache);
            let computes = Arc::clone(&computes);
            tasks.push(tokio::spawn(async move {
                cache
                    .get_or_compute(|| async move {
                        computes.fetch_add(1, Ordering::SeqCst);
                        // Hold the slot long enough for every task to pile up.
                        sleep(Duration::from_millis(20)).await;
                        Ok(outcome("gen-1", 0.5))
                    })
                    .await
            }));
        }

        let results = join_all(tasks).await;
        let mut views = Vec::new();
        for result in results {
            views.push(result.unwrap().unwrap());
        }

        assert_eq!(computes.load(Ordering::SeqCst), 1);
        for view in &views[1..] {
            assert!(Arc::ptr_eq(&views[0], view));
        }
    }

    #[tokio::test]
    async fn test_hit_never_runs_the_compute() {
        let cache = PredictionCache::new();

        let first = cache
            .get_or_compute(|| async { Ok(outcome("gen-1", 0.5)) })
            .await
            .unwrap();

        // If this compute ran, the call would fail.
        let second = cache
            .get_or_compute(|| async { Err(PredictError::Task("must not run".into())) })
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_invalidate_forces_a_fresh_compute() {
        let cache = PredictionCache::new();

        let first = cache
            .get_or_compute(|| async { Ok(outcome("gen-1", 0.5)) })
            .await
            .unwrap();
        assert_eq!(cache.generation().await.as_deref(), Some("gen-1"));

        cache.invalidate().await;
        assert!(!cache.is_populated().await);

        let second = cache
            .get_or_compute(|| async { Ok(outcome("gen-2", 0.5)) })
            .await
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.generation().await.as_deref(), Some("gen-2"));
    }

    #[tokio::test]
    async fn test_failed_compute_leaves_the_slot_empty() {
        let cache = PredictionCache::new();

        let result = cache
            .get_or_compute(|| async { Err(PredictError::Task("raster unreadable".into())) })
            .await;
        assert!(result.is_err());
        assert!(!cache.is_populated().await);
        assert_eq!(cache.generation().await, None);

        // The next caller retries and succeeds.
        let records = cache
            .get_or_compute(|| async { Ok(outcome("gen-1", 0.25)) })
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(cache.is_populated().await);
    }

    #[tokio::test]
    async fn test_invalidate_on_empty_cache_is_harmless() {
        let cache = PredictionCache::new();
        cache.invalidate().await;
        cache.invalidate().await;
        assert!(!cache.is_populated().await);
    }
}
