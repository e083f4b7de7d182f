// Core structs: Job, ShoppingItem, AnalysisRecord, RankingEntry
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A keyword-search job as it arrives on the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub keyword: String,
}

/// One listing returned by the shopping search API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub title: String,
    /// Raw price text as sent by the API; parsed during analysis.
    pub price: String,
    pub category: Option<String>,
}

#[cfg(test)]
impl ShoppingItem {
    pub(crate) fn new(title: impl Into<String>, price: i64, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: price.to_string(),
            category: Some(category.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingResult {
    pub items: Vec<ShoppingItem>,
    pub total: i64,
}

impl ShoppingResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Recent average search interest, 0..=100.
pub type TrendScore = i32;

/// Outcome of a market API call. Failures carry the default value so the
/// caller handles both arms the same way while still seeing which one it got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Live(T),
    Fallback(T),
}

impl<T> Fetched<T> {
    pub fn into_inner(self) -> T {
        match self {
            Fetched::Live(v) | Fetched::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Fetched::Fallback(_))
    }
}

/// Market analysis delivered to the backend for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub search_keyword: String,
    pub category: String,
    pub average_price: i64,
    pub lowest_price: i64,
    pub sample_count: usize,
    pub top_item_name: String,
    pub total_listings: i64,
    pub competition_level: String,
    pub search_volume_ratio: TrendScore,
    pub market_attractiveness: String,
    pub sourcing_score: TrendScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: u32,
    pub keyword: String,
    pub search_ratio: i64,
}

/// A message pulled off the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub id: String,
    pub body: String,
    pub receipt_handle: Option<String>,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("malformed job payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("job payload has no usable keyword")]
    MissingKeyword,
}

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream responded [{status}]: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend responded [{status}]: {body}")]
    Status { status: u16, body: String },
    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("receive failed: {0}")]
    Receive(String),
    #[error("delete failed: {0}")]
    Delete(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_record_uses_camel_case_keys() {
        let record = AnalysisRecord {
            search_keyword: "winter coat".into(),
            category: "Fashion".into(),
            average_price: 200,
            lowest_price: 100,
            sample_count: 3,
            top_item_name: "Down coat".into(),
            total_listings: 1200,
            competition_level: "Medium".into(),
            search_volume_ratio: 42,
            market_attractiveness: "Normal".into(),
            sourcing_score: 42,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["searchKeyword"], "winter coat");
        assert_eq!(json["averagePrice"], 200);
        assert_eq!(json["sampleCount"], 3);
        assert_eq!(json["topItemName"], "Down coat");
        assert_eq!(json["searchVolumeRatio"], 42);
        assert_eq!(json["sourcingScore"], 42);
    }

    #[test]
    fn ranking_entry_uses_camel_case_keys() {
        let entry = RankingEntry { rank: 1, keyword: "[Fashion] coat".into(), search_ratio: 0 };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"rank": 1, "keyword": "[Fashion] coat", "searchRatio": 0}));
    }

    #[test]
    fn fetched_unwraps_both_arms() {
        assert_eq!(Fetched::Live(3).into_inner(), 3);
        let fallback = Fetched::Fallback(0);
        assert!(fallback.is_fallback());
        assert_eq!(fallback.into_inner(), 0);
    }
}
