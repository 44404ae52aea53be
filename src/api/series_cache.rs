use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::{ChartConfig, NormalizeOptions, NormalizedData, normalize};
use crate::error::{ChartError, ChartResult};

/// Runtime metrics of the normalization memo cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeriesCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Bounded FIFO memo of normalized datasets keyed by a content hash.
///
/// Two configs with identical content share one entry no matter which
/// object they came from; any content change produces a new key.
#[derive(Debug)]
pub struct SeriesCache {
    capacity: usize,
    entries: IndexMap<blake3::Hash, Arc<NormalizedData>>,
    hits: u64,
    misses: u64,
}

impl SeriesCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: IndexMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Deterministic hash of the chart content and normalization options.
    pub fn content_hash(
        config: &ChartConfig,
        options: NormalizeOptions,
    ) -> ChartResult<blake3::Hash> {
        let mut hasher = blake3::Hasher::new();
        let config_json = serde_json::to_vec(config).map_err(|e| {
            ChartError::Serialization(format!("failed to hash chart config: {e}"))
        })?;
        let options_json = serde_json::to_vec(&options).map_err(|e| {
            ChartError::Serialization(format!("failed to hash normalize options: {e}"))
        })?;
        hasher.update(&config_json);
        hasher.update(&options_json);
        Ok(hasher.finalize())
    }

    /// Returns the cached normalization of `config`, computing it on a miss.
    pub fn get_or_normalize(
        &mut self,
        config: &ChartConfig,
        options: NormalizeOptions,
    ) -> Arc<NormalizedData> {
        let key = match Self::content_hash(config, options) {
            Ok(key) => key,
            Err(err) => {
                warn!(error = %err, "normalizing without cache");
                self.misses += 1;
                return Arc::new(normalize(config, options));
            }
        };

        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            trace!(key = %key.to_hex(), "series cache hit");
            return Arc::clone(hit);
        }

        self.misses += 1;
        let data = Arc::new(normalize(config, options));
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, Arc::clone(&data));
        data
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> SeriesCacheStats {
        SeriesCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SeriesCache;
    use crate::core::{ChartConfig, NormalizeOptions, RawPoint, Series};

    fn chart(title: &str, value: f64) -> ChartConfig {
        ChartConfig::bar(
            title,
            vec![Series::new("s", "S", vec![RawPoint::new("A", value)])],
        )
    }

    #[test]
    fn identical_content_hits_and_capacity_evicts_oldest() {
        let mut cache = SeriesCache::new(2);
        let first = chart("first", 1.0);
        let options = NormalizeOptions::from_config(&first);

        let a = cache.get_or_normalize(&first, options);
        let b = cache.get_or_normalize(&first.clone(), options);
        assert!(std::sync::Arc::ptr_eq(&a, &b));

        cache.get_or_normalize(&chart("second", 2.0), options);
        cache.get_or_normalize(&chart("third", 3.0), options);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 3);
        assert_eq!(stats.size, 2);

        cache.get_or_normalize(&first, options);
        assert_eq!(cache.stats().misses, 4);
    }
}
