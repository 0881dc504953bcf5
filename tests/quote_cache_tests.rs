use std::time::Duration;

use stockdeck::feed::{Period, QuoteCache};
use stockdeck::model::{PriceBar, PriceSeries};

fn series(ticker: &str, close: f64) -> PriceSeries {
    PriceSeries::new(
        ticker,
        vec![PriceBar {
            timestamp_ms: 60_000,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10.0,
        }],
    )
}

#[tokio::test]
async fn hit_within_ttl_returns_cached_series() {
    let cache = QuoteCache::new(Duration::from_secs(300));
    let s = series("AAPL", 190.0);
    cache.put(Period::OneMonth, &s).await;

    let hit = cache.get("AAPL", Period::OneMonth).await.unwrap();
    assert_eq!(hit, s);
}

#[tokio::test]
async fn key_includes_the_period() {
    let cache = QuoteCache::new(Duration::from_secs(300));
    cache.put(Period::OneMonth, &series("AAPL", 190.0)).await;

    assert!(cache.get("AAPL", Period::OneYear).await.is_none());
    assert!(cache.get("AAPL", Period::OneMonth).await.is_some());
}

#[tokio::test]
async fn lookup_is_case_insensitive_on_ticker() {
    let cache = QuoteCache::new(Duration::from_secs(300));
    cache.put(Period::OneDay, &series("MSFT", 410.0)).await;
    assert!(cache.get("msft", Period::OneDay).await.is_some());
}

#[tokio::test]
async fn expired_entry_misses_and_is_evicted() {
    let cache = QuoteCache::new(Duration::from_millis(0));
    cache.put(Period::OneDay, &series("TSLA", 250.0)).await;
    assert!(cache.get("TSLA", Period::OneDay).await.is_none());
    // Second lookup still misses after the eviction.
    assert!(cache.get("TSLA", Period::OneDay).await.is_none());
}

#[tokio::test]
async fn put_replaces_the_existing_entry() {
    let cache = QuoteCache::new(Duration::from_secs(300));
    cache.put(Period::OneDay, &series("AAPL", 190.0)).await;
    cache.put(Period::OneDay, &series("AAPL", 191.0)).await;

    let hit = cache.get("AAPL", Period::OneDay).await.unwrap();
    assert!((hit.bars()[0].close - 191.0).abs() < f64::EPSILON);
}
