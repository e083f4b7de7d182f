use crate::analyzer::{build_ranking, Analyzer, AnalyzerImpl};
use crate::config::CategoryKeyword;
use crate::delivery::{Delivery, ANALYSIS_PATH, RANKING_PATH};
use crate::market::MarketData;
use crate::model::{DeliveryError, JobError};
use crate::parser::{JobParser, Parser};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Why a message is removed from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckReason {
    Delivered,
    Malformed,
    MissingKeyword,
    NoData,
}

/// Why a message is left for redelivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetainReason {
    DeliveryFailed,
    EncodeFailed,
    Panicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Acknowledge(AckReason),
    Retain(RetainReason),
}

/// Longest payload prefix written to the log.
const PAYLOAD_PREVIEW_CHARS: usize = 120;

fn payload_preview(payload: &str) -> String {
    match payload.char_indices().nth(PAYLOAD_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", &payload[..cut]),
        None => payload.to_string(),
    }
}

/// Turns one queue payload into a delivered analysis record.
pub struct JobProcessor {
    parser: JobParser,
    analyzer: Box<dyn Analyzer>,
    market: Arc<dyn MarketData>,
    delivery: Arc<dyn Delivery>,
    ranking_categories: Vec<CategoryKeyword>,
}

impl JobProcessor {
    pub fn new(
        market: Arc<dyn MarketData>,
        delivery: Arc<dyn Delivery>,
        ranking_categories: Vec<CategoryKeyword>,
    ) -> Self {
        Self {
            parser: JobParser::new(),
            analyzer: Box::new(AnalyzerImpl::new()),
            market,
            delivery,
            ranking_categories,
        }
    }

    pub async fn process(&self, payload: &str) -> Disposition {
        let job = match self.parser.parse(payload) {
            Ok(job) => job,
            Err(JobError::Malformed(e)) => {
                warn!("Discarding malformed payload: {}", e);
                return Disposition::Acknowledge(AckReason::Malformed);
            }
            Err(JobError::MissingKeyword) => {
                warn!(
                    payload_bytes = payload.len(),
                    "Discarding job without keyword: {}",
                    payload_preview(payload)
                );
                return Disposition::Acknowledge(AckReason::MissingKeyword);
            }
        };
        let keyword = job.keyword.as_str();
        info!(keyword, "Processing job");

        let shopping = self.market.fetch_shopping_results(keyword).await;
        let trend = self.market.fetch_trend_score(keyword).await;
        if shopping.is_fallback() || trend.is_fallback() {
            warn!(keyword, "Continuing with default market data");
        }
        let shopping = shopping.into_inner();
        let trend = trend.into_inner();

        let Some(record) = self
            .analyzer
            .analyze(&shopping.items, keyword, shopping.total, trend)
        else {
            warn!(keyword, "No market data, nothing to deliver");
            return Disposition::Acknowledge(AckReason::NoData);
        };
        info!(
            keyword,
            "Analysis: avg = {}, lowest = {}, samples = {}, trend = {}",
            record.average_price, record.lowest_price, record.sample_count, record.search_volume_ratio
        );

        let body = match serde_json::to_value(&record) {
            Ok(body) => body,
            Err(e) => {
                error!(keyword, "Could not encode analysis record: {}", e);
                return Disposition::Retain(RetainReason::EncodeFailed);
            }
        };

        match self.delivery.deliver(ANALYSIS_PATH, &body).await {
            Ok(()) => {
                info!(keyword, "Analysis delivered");
                Disposition::Acknowledge(AckReason::Delivered)
            }
            Err(e) => {
                warn!(keyword, "Delivery failed, leaving job for redelivery: {}", e);
                Disposition::Retain(RetainReason::DeliveryFailed)
            }
        }
    }

    /// Builds the category ranking and posts it. Returns the number of entries sent.
    pub async fn publish_ranking(&self) -> Result<usize, DeliveryError> {
        let ranking = build_ranking(self.market.as_ref(), &self.ranking_categories).await;
        let body = serde_json::to_value(&ranking)?;
        self.delivery.deliver(RANKING_PATH, &body).await?;
        Ok(ranking.len())
    }
}
