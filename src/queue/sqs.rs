use crate::config::QueueConfig;
use crate::model::{QueueError, QueueMessage};
use crate::queue::JobQueue;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_sqs::Client;
use aws_sdk_sqs::error::DisplayErrorContext;
use tracing::{debug, info};

pub struct SqsQueue {
    client: Client,
    queue_url: String,
}

impl SqsQueue {
    pub fn new(client: Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }

    /// Resolves credentials from the default provider chain and builds the client.
    pub async fn connect(cfg: &QueueConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(cfg.region.clone()));
        if let Some(endpoint) = &cfg.endpoint_url {
            info!("Using SQS endpoint override {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }
        let conf = loader.load().await;
        Self::new(Client::new(&conf), cfg.queue_url.clone())
    }
}

#[async_trait::async_trait]
impl JobQueue for SqsQueue {
    async fn receive(&self, max_messages: i32, wait_seconds: i32) -> Result<Vec<QueueMessage>, QueueError> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_seconds)
            .send()
            .await
            .map_err(|e| QueueError::Receive(DisplayErrorContext(e).to_string()))?;

        let messages: Vec<QueueMessage> = output
            .messages()
            .iter()
            .map(|m| QueueMessage {
                id: m.message_id().unwrap_or("unknown").to_string(),
                body: m.body().unwrap_or_default().to_string(),
                receipt_handle: m.receipt_handle().map(str::to_string),
            })
            .collect();
        debug!("Received {} message(s)", messages.len());
        Ok(messages)
    }

    async fn delete(&self, receipt_handle: &str) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| QueueError::Delete(DisplayErrorContext(e).to_string()))?;
        Ok(())
    }
}
