use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::Period;
use crate::model::PriceSeries;

struct CacheEntry {
    inserted_at: Instant,
    series: PriceSeries,
}

/// Read-through TTL cache for fetched price series, keyed by
/// (ticker, period). A hit and a miss produce identical downstream output;
/// the cache only saves the HTTP round trip between refresh ticks.
pub struct QuoteCache {
    ttl: Duration,
    entries: Mutex<HashMap<(String, Period), CacheEntry>>,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, ticker: &str, period: Period) -> Option<PriceSeries> {
        let key = (ticker.to_ascii_uppercase(), period);
        let mut entries = self.entries.lock().await;
        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.series.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub async fn put(&self, period: Period, series: &PriceSeries) {
        let key = (series.ticker().to_ascii_uppercase(), period);
        self.entries.lock().await.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                series: series.clone(),
            },
        );
    }
}
