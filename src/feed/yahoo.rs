use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use super::{FetchBatch, Period, QuoteCache};
use crate::error::AppError;
use crate::model::{PriceBar, PriceSeries};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// REST client for the Yahoo Finance v8 chart endpoint.
///
/// Fetches go through an internal read-through TTL cache keyed by
/// (ticker, period); callers see the same series whether it was a hit or a
/// fresh fetch.
pub struct QuoteClient {
    http: reqwest::Client,
    base_url: String,
    cache: QuoteCache,
}

impl QuoteClient {
    pub fn new(base_url: &str, cache_ttl: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        // The chart endpoint rejects requests without a browser-ish UA.
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (compatible; stockdeck)"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build quote HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: QuoteCache::new(cache_ttl),
        })
    }

    fn compact_error_body(body: &str) -> String {
        let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.len() > 180 {
            // Back off to a char boundary; byte 180 can fall inside a
            // multi-byte char.
            let mut cut = 180;
            while !normalized.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}...", &normalized[..cut])
        } else {
            normalized
        }
    }

    /// Fetch one ticker's OHLC history, serving from cache when fresh.
    pub async fn fetch(&self, ticker: &str, period: Period) -> Result<PriceSeries, AppError> {
        let ticker = ticker.trim().to_ascii_uppercase();
        if let Some(series) = self.cache.get(&ticker, period).await {
            tracing::debug!(ticker = %ticker, period = %period, "quote cache hit");
            return Ok(series);
        }

        let series = self.fetch_remote(&ticker, period).await?;
        self.cache.put(period, &series).await;
        Ok(series)
    }

    /// Fetch a set of tickers, collecting per-ticker failures instead of
    /// aborting the batch.
    pub async fn fetch_batch(&self, tickers: &[String], period: Period) -> FetchBatch {
        let mut batch = FetchBatch::default();
        for ticker in tickers {
            match self.fetch(ticker, period).await {
                Ok(series) => {
                    batch.series.insert(series.ticker().to_string(), series);
                }
                Err(e) => {
                    tracing::warn!(ticker = %ticker, error = %e, "quote fetch failed");
                    batch.errors.insert(ticker.clone(), e.to_string());
                }
            }
        }
        batch
    }

    async fn fetch_remote(&self, ticker: &str, period: Period) -> Result<PriceSeries, AppError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("range", period.as_str()),
                ("interval", period.bar_interval()),
                ("includePrePost", "false"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Quote {
                ticker: ticker.to_string(),
                detail: format!("status {}: {}", status, Self::compact_error_body(&body)),
            });
        }

        let root: Value = response.json().await?;
        Self::parse_chart_payload(ticker, &root)
    }

    /// Pull the OHLCV arrays out of a v8 chart payload. Intervals where the
    /// exchange reported no trade come back as nulls and are skipped.
    fn parse_chart_payload(ticker: &str, root: &Value) -> Result<PriceSeries, AppError> {
        if let Some(desc) = root
            .pointer("/chart/error/description")
            .and_then(Value::as_str)
        {
            return Err(AppError::Quote {
                ticker: ticker.to_string(),
                detail: desc.to_string(),
            });
        }

        let result = root
            .pointer("/chart/result/0")
            .ok_or_else(|| AppError::NoData {
                ticker: ticker.to_string(),
            })?;

        let timestamps = result
            .get("timestamp")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let quote = result
            .pointer("/indicators/quote/0")
            .cloned()
            .unwrap_or(Value::Null);

        let field = |name: &str| -> Vec<Value> {
            quote
                .get(name)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };
        let opens = field("open");
        let highs = field("high");
        let lows = field("low");
        let closes = field("close");
        let volumes = field("volume");

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            let Some(ts_secs) = ts.as_u64() else { continue };
            let Some(close) = closes.get(i).and_then(Value::as_f64) else {
                continue;
            };
            let open = opens.get(i).and_then(Value::as_f64).unwrap_or(close);
            let high = highs.get(i).and_then(Value::as_f64).unwrap_or(close);
            let low = lows.get(i).and_then(Value::as_f64).unwrap_or(close);
            let volume = volumes.get(i).and_then(Value::as_f64).unwrap_or(0.0);
            bars.push(PriceBar {
                timestamp_ms: ts_secs * 1_000,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        if bars.is_empty() {
            return Err(AppError::NoData {
                ticker: ticker.to_string(),
            });
        }
        Ok(PriceSeries::new(ticker, bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(timestamps: &str, closes: &str) -> Value {
        serde_json::from_str(&format!(
            r#"{{
                "chart": {{
                    "result": [{{
                        "timestamp": {timestamps},
                        "indicators": {{
                            "quote": [{{
                                "open": {closes},
                                "high": {closes},
                                "low": {closes},
                                "close": {closes},
                                "volume": [100, 200, 300]
                            }}]
                        }}
                    }}],
                    "error": null
                }}
            }}"#
        ))
        .unwrap()
    }

    #[test]
    fn parses_bars_in_order() {
        let root = payload("[1000, 2000, 3000]", "[10.0, 11.0, 12.0]");
        let series = QuoteClient::parse_chart_payload("aapl", &root).unwrap();
        assert_eq!(series.ticker(), "aapl");
        assert_eq!(series.len(), 3);
        assert_eq!(series.bars()[0].timestamp_ms, 1_000_000);
        assert!((series.bars()[2].close - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn skips_null_close_intervals() {
        let root = payload("[1000, 2000, 3000]", "[10.0, null, 12.0]");
        let series = QuoteClient::parse_chart_payload("MSFT", &root).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn empty_result_is_no_data() {
        let root = payload("[]", "[]");
        let err = QuoteClient::parse_chart_payload("TSLA", &root).unwrap_err();
        assert!(matches!(err, AppError::NoData { ref ticker } if ticker == "TSLA"));
    }

    #[test]
    fn long_error_bodies_are_compacted() {
        let body = "x".repeat(300);
        let compact = QuoteClient::compact_error_body(&body);
        assert_eq!(compact.len(), 183);
        assert!(compact.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // One ASCII byte then two-byte chars puts byte 180 mid-char.
        let body = format!("a{}", "é".repeat(200));
        let compact = QuoteClient::compact_error_body(&body);
        assert!(compact.ends_with("..."));
        assert!(compact.chars().all(|c| c == 'a' || c == 'é' || c == '.'));
    }

    #[test]
    fn api_error_description_is_surfaced() {
        let root: Value = serde_json::from_str(
            r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();
        let err = QuoteClient::parse_chart_payload("NOPE", &root).unwrap_err();
        assert!(matches!(err, AppError::Quote { .. }));
        assert!(err.to_string().contains("delisted"));
    }
}
