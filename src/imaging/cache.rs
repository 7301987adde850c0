//! Request-scoped compressed image cache.
//!
//! One cache is built per generation call and dropped with it; nothing here is
//! shared between calls.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::core::error::{EngineError, Result};
use crate::core::model::InspectionRecord;
use crate::imaging::batch::{collect_batch, ImageKey};
use crate::imaging::compress::{compress_image, CompressedImage, CompressionProfile};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessReport {
    pub requested: usize,
    pub compressed: usize,
    pub failed: usize,
    pub bytes_in: usize,
    pub bytes_out: usize,
}

#[derive(Debug, Default)]
pub struct ImageCache {
    entries: BTreeMap<ImageKey, CompressedImage>,
    failures: BTreeMap<ImageKey, String>,
    report: PreprocessReport,
}

impl ImageCache {
    /// Compresses every image of the record, concurrently, and blocks until
    /// each slot has either an entry or a recorded failure.
    ///
    /// With `workers` set, compression runs on a dedicated pool of that size;
    /// otherwise it uses the global rayon pool.
    pub fn build(
        record: &InspectionRecord,
        profile: CompressionProfile,
        workers: Option<usize>,
    ) -> Result<Self> {
        let batch = collect_batch(record);
        let bytes_in = batch.iter().map(|(_, payload)| payload.len()).sum();

        let run = || {
            batch
                .par_iter()
                .map(|(key, payload)| (*key, compress_image(payload.bytes(), profile)))
                .collect::<Vec<_>>()
        };
        let results = match workers {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(run),
            None => run(),
        };

        let mut cache = ImageCache {
            report: PreprocessReport {
                requested: batch.len(),
                bytes_in,
                ..Default::default()
            },
            ..Default::default()
        };
        for (key, result) in results {
            match result {
                Ok(image) => cache.insert(key, image),
                Err(err) => cache.record_failure(key, err.to_string()),
            }
        }

        log::info!(
            "preprocessed {} images for {}: {} compressed, {} failed, {} -> {} bytes",
            cache.report.requested,
            record.job_reference,
            cache.report.compressed,
            cache.report.failed,
            cache.report.bytes_in,
            cache.report.bytes_out
        );
        Ok(cache)
    }

    /// Inserting an already cached key keeps the first entry.
    pub fn insert(&mut self, key: ImageKey, image: CompressedImage) {
        if self.entries.contains_key(&key) {
            return;
        }
        self.report.compressed += 1;
        self.report.bytes_out += image.data.len();
        self.entries.insert(key, image);
    }

    pub fn record_failure(&mut self, key: ImageKey, reason: String) {
        let err = EngineError::ImageDecode {
            id: key.id(),
            reason: reason.clone(),
        };
        log::warn!("{err}; slot will render as unavailable");
        if self.failures.insert(key, reason).is_none() {
            self.report.failed += 1;
        }
    }

    pub fn get(&self, key: &ImageKey) -> Option<&CompressedImage> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &ImageKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn failure(&self, key: &ImageKey) -> Option<&str> {
        self.failures.get(key).map(String::as_str)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ImageKey, &str)> {
        self.failures.iter().map(|(key, reason)| (key, reason.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn report(&self) -> &PreprocessReport {
        &self.report
    }
}
