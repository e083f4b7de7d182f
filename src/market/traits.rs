use crate::model::{Fetched, ShoppingResult, TrendScore};

/// Source of shopping listings and search-trend scores.
///
/// Implementations never fail outward: an unavailable upstream yields
/// [`Fetched::Fallback`] carrying the empty/zero default.
#[async_trait::async_trait]
pub trait MarketData: Send + Sync {
    async fn fetch_shopping_results(&self, keyword: &str) -> Fetched<ShoppingResult>;
    async fn fetch_trend_score(&self, keyword: &str) -> Fetched<TrendScore>;
}
