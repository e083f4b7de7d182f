pub mod fetcher;
pub mod traits;

pub use fetcher::NaverClient;
pub use traits::MarketData;
