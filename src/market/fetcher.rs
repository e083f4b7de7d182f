use crate::analyzer::market_indicators::recent_trend_score;
use crate::config::MarketApiConfig;
use crate::market::traits::MarketData;
use crate::model::{Fetched, MarketDataError, ShoppingItem, ShoppingResult, TrendScore};
use crate::normalizer::normalize_all;
use crate::utils::trend_window;

use chrono::{Local, NaiveDate};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const PAGE_SIZE: &str = "100";
const SORT_BY_RELEVANCE: &str = "sim";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: i64,
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    lprice: serde_json::Value,
    #[serde(default)]
    category1: Option<String>,
}

impl From<SearchItem> for ShoppingItem {
    fn from(item: SearchItem) -> Self {
        let price = match item.lprice {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        ShoppingItem {
            title: item.title,
            price,
            category: item.category1,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrendRequest<'a> {
    start_date: String,
    end_date: String,
    time_unit: &'static str,
    keyword_groups: [KeywordGroup<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeywordGroup<'a> {
    group_name: &'a str,
    keywords: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct TrendResponse {
    #[serde(default)]
    results: Vec<TrendGroup>,
}

#[derive(Debug, Deserialize)]
struct TrendGroup {
    #[serde(default)]
    data: Vec<TrendPoint>,
}

#[derive(Debug, Deserialize)]
struct TrendPoint {
    ratio: f64,
}

/// Client for the Naver shopping search and DataLab trend APIs.
pub struct NaverClient {
    client: Client,
    client_id: String,
    client_secret: String,
    shopping_url: String,
    trend_url: String,
}

impl NaverClient {
    pub fn new(cfg: &MarketApiConfig) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .user_agent("sourcing-worker/0.1")
            .build()?;

        Ok(Self {
            client,
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            shopping_url: cfg.shopping_url.clone(),
            trend_url: cfg.trend_url.clone(),
        })
    }

    async fn try_fetch_shopping(&self, keyword: &str) -> Result<ShoppingResult, MarketDataError> {
        let response = self
            .client
            .get(&self.shopping_url)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .query(&[("query", keyword), ("display", PAGE_SIZE), ("sort", SORT_BY_RELEVANCE)])
            .send()
            .await?;
        let body: SearchResponse = ensure_success(response).await?.json().await?;

        let mut items: Vec<ShoppingItem> = body.items.into_iter().map(ShoppingItem::from).collect();
        normalize_all(&mut items);

        Ok(ShoppingResult { items, total: body.total })
    }

    async fn try_fetch_trend(&self, keyword: &str, today: NaiveDate) -> Result<Vec<f64>, MarketDataError> {
        let (start_date, end_date) = trend_window(today);
        let request = TrendRequest {
            start_date,
            end_date,
            time_unit: "date",
            keyword_groups: [KeywordGroup { group_name: keyword, keywords: [keyword] }],
        };

        let response = self
            .client
            .post(&self.trend_url)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .json(&request)
            .send()
            .await?;
        let body: TrendResponse = ensure_success(response).await?.json().await?;

        Ok(body
            .results
            .into_iter()
            .next()
            .map(|group| group.data.into_iter().map(|p| p.ratio).collect())
            .unwrap_or_default())
    }
}

async fn ensure_success(response: Response) -> Result<Response, MarketDataError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_else(|_| "unknown".into());
    Err(MarketDataError::Status { status: status.as_u16(), body })
}

#[async_trait::async_trait]
impl MarketData for NaverClient {
    async fn fetch_shopping_results(&self, keyword: &str) -> Fetched<ShoppingResult> {
        match self.try_fetch_shopping(keyword).await {
            Ok(result) => {
                debug!(keyword, items = result.items.len(), total = result.total, "shopping search ok");
                Fetched::Live(result)
            }
            Err(e) => {
                warn!(keyword, "shopping search failed, using empty result: {}", e);
                Fetched::Fallback(ShoppingResult::empty())
            }
        }
    }

    async fn fetch_trend_score(&self, keyword: &str) -> Fetched<TrendScore> {
        let today = Local::now().date_naive();
        match self.try_fetch_trend(keyword, today).await {
            Ok(ratios) => Fetched::Live(recent_trend_score(&ratios)),
            Err(e) => {
                warn!(keyword, "trend lookup failed, using 0: {}", e);
                Fetched::Fallback(0)
            }
        }
    }
}
