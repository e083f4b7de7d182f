use crate::config::CategoryKeyword;
use crate::market::MarketData;
use crate::model::RankingEntry;
use crate::normalizer::clean_title;
use tracing::{info, warn};

pub const ITEMS_PER_CATEGORY: usize = 10;

/// Builds one ranking batch: up to ten representative listings per category,
/// ranked consecutively across the whole batch in category order.
pub async fn build_ranking(market: &dyn MarketData, categories: &[CategoryKeyword]) -> Vec<RankingEntry> {
    let mut ranking = Vec::new();
    let mut rank: u32 = 1;

    for entry in categories {
        let fetched = market.fetch_shopping_results(&entry.keyword).await;
        if fetched.is_fallback() {
            warn!(category = %entry.category, "Shopping search unavailable for ranking");
        }
        let result = fetched.into_inner();

        if result.is_empty() {
            ranking.push(RankingEntry {
                rank,
                keyword: format!("[{}] no data", entry.category),
                search_ratio: 0,
            });
            rank += 1;
            continue;
        }

        for item in result.items.iter().take(ITEMS_PER_CATEGORY) {
            ranking.push(RankingEntry {
                rank,
                keyword: format!("[{}] {}", entry.category, clean_title(&item.title)),
                search_ratio: 0,
            });
            rank += 1;
        }
    }

    info!("Built ranking with {} entries across {} categories", ranking.len(), categories.len());
    ranking
}
