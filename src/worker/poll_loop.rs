use crate::config::AppConfig;
use crate::model::QueueMessage;
use crate::queue::JobQueue;
use crate::worker::clock::Clock;
use crate::worker::processor::{Disposition, JobProcessor, RetainReason};

use chrono::{DateTime, TimeDelta, Utc};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Messages requested per receive; jobs are handled strictly one at a time.
const MAX_MESSAGES: i32 = 1;

#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub wait_seconds: i32,
    pub error_backoff: Duration,
    pub ranking_interval: Option<Duration>,
}

impl From<&AppConfig> for LoopSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            wait_seconds: cfg.queue.wait_seconds,
            error_backoff: cfg.queue.error_backoff,
            ranking_interval: cfg.ranking_interval,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Idle,
    Processed { acknowledged: usize, retained: usize },
    QueueUnavailable,
}

pub struct PollLoop {
    queue: Arc<dyn JobQueue>,
    processor: JobProcessor,
    clock: Arc<dyn Clock>,
    settings: LoopSettings,
    next_ranking_at: Option<DateTime<Utc>>,
}

impl PollLoop {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        processor: JobProcessor,
        clock: Arc<dyn Clock>,
        settings: LoopSettings,
    ) -> Self {
        // First ranking goes out on the first cycle.
        let next_ranking_at = settings.ranking_interval.map(|_| clock.now());
        Self {
            queue,
            processor,
            clock,
            settings,
            next_ranking_at,
        }
    }

    /// Runs cycles until `shutdown` resolves. Shutdown interrupts the wait for
    /// messages (and the backoff after a queue error); a job already received
    /// runs to completion so a delivered record is not left undeleted.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!("🚀 Worker started, polling queue...");
        tokio::pin!(shutdown);
        loop {
            let polled = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping poll loop.");
                    break;
                }
                polled = self.poll() => polled,
            };
            let outcome = match polled {
                Some(messages) => self.handle_batch(messages).await,
                None => CycleOutcome::QueueUnavailable,
            };
            debug!(?outcome, "Cycle finished");
        }
    }

    pub async fn run_once(&mut self) -> CycleOutcome {
        match self.poll().await {
            Some(messages) => self.handle_batch(messages).await,
            None => CycleOutcome::QueueUnavailable,
        }
    }

    /// Publishes the ranking when due, then long-polls the queue. `None` means
    /// the queue was unavailable and the backoff has already been slept.
    async fn poll(&mut self) -> Option<Vec<QueueMessage>> {
        self.publish_ranking_if_due().await;

        match self.queue.receive(MAX_MESSAGES, self.settings.wait_seconds).await {
            Ok(messages) => Some(messages),
            Err(e) => {
                error!(
                    "Queue unavailable: {}. Retrying in {}s",
                    e,
                    self.settings.error_backoff.as_secs()
                );
                self.clock.sleep(self.settings.error_backoff).await;
                None
            }
        }
    }

    async fn handle_batch(&self, messages: Vec<QueueMessage>) -> CycleOutcome {
        if messages.is_empty() {
            return CycleOutcome::Idle;
        }

        let mut acknowledged = 0;
        let mut retained = 0;
        for message in messages {
            if self.handle_message(&message).await {
                acknowledged += 1;
            } else {
                retained += 1;
            }
        }
        CycleOutcome::Processed { acknowledged, retained }
    }

    /// Processes one message and deletes it when the processor says so.
    /// Returns whether the message was acknowledged.
    async fn handle_message(&self, message: &QueueMessage) -> bool {
        let started = self.clock.now();
        info!(message_id = %message.id, "Received message");

        let disposition = match AssertUnwindSafe(self.processor.process(&message.body))
            .catch_unwind()
            .await
        {
            Ok(disposition) => disposition,
            Err(_) => {
                error!(message_id = %message.id, "Job processing panicked, leaving message for redelivery");
                Disposition::Retain(RetainReason::Panicked)
            }
        };

        let elapsed_ms = (self.clock.now() - started).num_milliseconds();
        match disposition {
            Disposition::Acknowledge(reason) => {
                info!(message_id = %message.id, ?reason, elapsed_ms, "Acknowledging message");
                self.acknowledge(message).await;
                true
            }
            Disposition::Retain(reason) => {
                warn!(message_id = %message.id, ?reason, elapsed_ms, "Message retained for redelivery");
                false
            }
        }
    }

    async fn acknowledge(&self, message: &QueueMessage) {
        let Some(receipt) = message.receipt_handle.as_deref() else {
            warn!(message_id = %message.id, "Message has no receipt handle, cannot delete");
            return;
        };
        if let Err(e) = self.queue.delete(receipt).await {
            warn!(message_id = %message.id, "Delete failed, message will be redelivered: {}", e);
        }
    }

    async fn publish_ranking_if_due(&mut self) {
        let (Some(interval), Some(due_at)) = (self.settings.ranking_interval, self.next_ranking_at) else {
            return;
        };
        let now = self.clock.now();
        if now < due_at {
            return;
        }

        info!("Publishing category ranking...");
        match AssertUnwindSafe(self.processor.publish_ranking())
            .catch_unwind()
            .await
        {
            Ok(Ok(count)) => info!("Ranking published ({} entries)", count),
            Ok(Err(e)) => warn!("Ranking publication failed: {}", e),
            Err(_) => error!("Ranking publication panicked, retrying next interval"),
        }
        self.next_ranking_at = TimeDelta::from_std(interval)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta));
    }
}
