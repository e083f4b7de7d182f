use crate::analyzer::market_indicators::{lowest, truncated_mean};
use crate::model::{AnalysisRecord, ShoppingItem, TrendScore};
use crate::normalizer::clean_title;
use tracing::warn;

// Fixed labels until a real scoring model exists; the backend stores them as-is.
pub const COMPETITION_LEVEL: &str = "Medium";
pub const MARKET_ATTRACTIVENESS: &str = "Normal";
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Trait defining the interface for a market analyzer.
pub trait Analyzer: Send + Sync {
    /// Builds the analysis record for one keyword. `None` means there is
    /// nothing to report: no items, or prices that could not be evaluated.
    fn analyze(
        &self,
        items: &[ShoppingItem],
        keyword: &str,
        total_listings: i64,
        search_volume_ratio: TrendScore,
    ) -> Option<AnalysisRecord>;
}

/// Implementation of the market analyzer.
pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnalyzerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze(
        &self,
        items: &[ShoppingItem],
        keyword: &str,
        total_listings: i64,
        search_volume_ratio: TrendScore,
    ) -> Option<AnalysisRecord> {
        let first = items.first()?;

        let prices = match parse_prices(items) {
            Ok(p) => p,
            Err(raw) => {
                warn!(keyword, "Non-numeric price '{}', skipping analysis", raw);
                return None;
            }
        };
        let (Some(average_price), Some(lowest_price)) = (truncated_mean(&prices), lowest(&prices)) else {
            warn!(keyword, "Price statistics could not be computed");
            return None;
        };

        let category = first
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_CATEGORY)
            .to_string();

        Some(AnalysisRecord {
            search_keyword: keyword.to_string(),
            category,
            average_price,
            lowest_price,
            sample_count: items.len(),
            top_item_name: clean_title(&first.title),
            total_listings,
            competition_level: COMPETITION_LEVEL.to_string(),
            search_volume_ratio,
            market_attractiveness: MARKET_ATTRACTIVENESS.to_string(),
            sourcing_score: search_volume_ratio,
        })
    }
}

/// Parses every raw price, returning the first offending text on failure.
fn parse_prices(items: &[ShoppingItem]) -> Result<Vec<i64>, String> {
    items
        .iter()
        .map(|item| item.price.trim().parse::<i64>().map_err(|_| item.price.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coat_items() -> Vec<ShoppingItem> {
        vec![
            ShoppingItem::new("<b>Winter</b> down coat", 100, "Fashion"),
            ShoppingItem::new("Wool coat", 200, "Fashion"),
            ShoppingItem::new("Long padded coat", 300, "Fashion"),
        ]
    }

    #[test]
    fn winter_coat_scenario() {
        let record = AnalyzerImpl::new()
            .analyze(&coat_items(), "winter coat", 5400, 37)
            .unwrap();

        assert_eq!(record.search_keyword, "winter coat");
        assert_eq!(record.average_price, 200);
        assert_eq!(record.lowest_price, 100);
        assert_eq!(record.sample_count, 3);
        assert_eq!(record.category, "Fashion");
        assert_eq!(record.top_item_name, "Winter down coat");
        assert_eq!(record.total_listings, 5400);
        assert_eq!(record.search_volume_ratio, 37);
        assert_eq!(record.sourcing_score, 37);
        assert_eq!(record.competition_level, COMPETITION_LEVEL);
        assert_eq!(record.market_attractiveness, MARKET_ATTRACTIVENESS);
    }

    #[test]
    fn empty_items_produce_no_record() {
        assert!(AnalyzerImpl::new().analyze(&[], "nothing", 0, 0).is_none());
    }

    #[test]
    fn stats_do_not_depend_on_item_order() {
        let analyzer = AnalyzerImpl::new();
        let mut items = vec![
            ShoppingItem::new("a", 7, "X"),
            ShoppingItem::new("b", 3, "X"),
            ShoppingItem::new("c", 12, "X"),
            ShoppingItem::new("d", 5, "X"),
        ];
        let base = analyzer.analyze(&items, "k", 0, 0).unwrap();
        items.reverse();
        let reversed = analyzer.analyze(&items, "k", 0, 0).unwrap();
        items.rotate_left(1);
        let rotated = analyzer.analyze(&items, "k", 0, 0).unwrap();

        for other in [&reversed, &rotated] {
            assert_eq!(other.average_price, base.average_price);
            assert_eq!(other.lowest_price, base.lowest_price);
            assert_eq!(other.sample_count, 4);
        }
        assert_eq!(base.average_price, 6); // 27 / 4 truncated
        assert_eq!(base.lowest_price, 3);
    }

    #[test]
    fn missing_category_defaults_to_unknown() {
        let items = vec![ShoppingItem { title: "x".into(), price: "10".into(), category: None }];
        let record = AnalyzerImpl::new().analyze(&items, "x", 1, 0).unwrap();
        assert_eq!(record.category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn non_numeric_price_yields_no_record() {
        let mut items = coat_items();
        items[1].price = "call for price".into();
        assert!(AnalyzerImpl::new().analyze(&items, "winter coat", 3, 0).is_none());
    }

    #[test]
    fn sample_count_matches_item_count() {
        let analyzer = AnalyzerImpl::new();
        for n in 1..=100 {
            let items: Vec<_> = (0..n).map(|i| ShoppingItem::new(format!("item {i}"), 1000 + i, "C")).collect();
            assert_eq!(analyzer.analyze(&items, "k", n, 0).unwrap().sample_count, n as usize);
        }
    }
}
