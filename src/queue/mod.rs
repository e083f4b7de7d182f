pub mod sqs;

use crate::model::{QueueError, QueueMessage};

pub use sqs::SqsQueue;

/// The managed queue the worker consumes from.
#[async_trait::async_trait]
pub trait JobQueue: Send + Sync {
    /// Long-polls for up to `max_messages`, waiting at most `wait_seconds`.
    async fn receive(&self, max_messages: i32, wait_seconds: i32) -> Result<Vec<QueueMessage>, QueueError>;

    /// Removes a message for good. Until this is called the queue redelivers it.
    async fn delete(&self, receipt_handle: &str) -> Result<(), QueueError>;
}
