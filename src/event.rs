use std::collections::HashMap;

use crate::model::PriceSeries;

/// Events flowing from background tasks into the main loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Result of one refresh tick's batched fetch.
    QuoteBatch {
        series: HashMap<String, PriceSeries>,
        errors: HashMap<String, String>,
        fetched_at_ms: i64,
    },
    LogMessage(String),
    Error(String),
}
