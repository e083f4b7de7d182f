pub mod sender;

use crate::config::BackendConfig;
use crate::model::DeliveryError;
use reqwest::Client;
use tracing::warn;

pub const ANALYSIS_PATH: &str = "/market/analysis";
pub const RANKING_PATH: &str = "/market/ranking/receive";

/// Posts JSON bodies to the backend.
#[async_trait::async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, path: &str, body: &serde_json::Value) -> Result<(), DeliveryError>;
}

pub struct BackendClient {
    pub base_url: String,
    pub client: Client,
}

impl BackendClient {
    pub fn new(cfg: &BackendConfig) -> Result<Self, DeliveryError> {
        if !cfg.verify_tls {
            warn!(
                "TLS certificate verification is DISABLED for backend delivery to {}",
                cfg.base_url
            );
        }
        let client = Client::builder()
            .timeout(cfg.timeout)
            .danger_accept_invalid_certs(!cfg.verify_tls)
            .build()?;

        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl Delivery for BackendClient {
    async fn deliver(&self, path: &str, body: &serde_json::Value) -> Result<(), DeliveryError> {
        sender::post_json(self, path, body).await
    }
}
