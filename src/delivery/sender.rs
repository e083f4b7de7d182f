// delivery/sender.rs

use crate::delivery::BackendClient;
use crate::model::DeliveryError;
use tracing::{info, warn};

/// Posts `body` to `path` on the backend. Any non-2xx status is a failure; no retry.
pub async fn post_json(
    backend: &BackendClient,
    path: &str,
    body: &serde_json::Value,
) -> Result<(), DeliveryError> {
    let url = backend.endpoint(path);
    let response = match backend.client.post(&url).json(body).send().await {
        Ok(resp) => resp,
        Err(e) if e.is_timeout() => {
            warn!("⏳ Backend POST {} timed out", url);
            return Err(DeliveryError::Http(e));
        }
        Err(e) => {
            warn!("❌ Backend POST {} failed: {}", url, e);
            return Err(DeliveryError::Http(e));
        }
    };
    let status = response.status();
    let text = response.text().await.unwrap_or_else(|_| "unknown".into());
    if !status.is_success() {
        warn!("❌ Backend responded [{}] for {}: {}", status, url, text);
        return Err(DeliveryError::Status { status: status.as_u16(), body: text });
    }
    info!("✅ Delivered to {} [{}]", url, status);
    Ok(())
}
