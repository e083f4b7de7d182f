// Analyzer module: price statistics, trend indicators and the category ranking.

pub mod market_indicators;
pub mod price_analysis;
pub mod ranking;

pub use price_analysis::{Analyzer, AnalyzerImpl};
pub use ranking::build_ranking;
