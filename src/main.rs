use sourcing_worker::config::{AppConfig, load_config};
use sourcing_worker::delivery::BackendClient;
use sourcing_worker::market::NaverClient;
use sourcing_worker::queue::SqsQueue;
use sourcing_worker::worker::{JobProcessor, LoopSettings, PollLoop, SystemClock};

use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Log details about any panic before the default hook prints it
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!("😱 Panic occurred: {}", panic_info);
        default_hook(panic_info);
    }));

    let config: AppConfig = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return Err(e).context("loading configuration");
        }
    };
    info!(
        "Queue: {} | Backend: {} | Ranking categories: {}",
        config.queue.queue_url,
        config.backend.base_url,
        config.ranking_categories.len()
    );

    let market = NaverClient::new(&config.market_api).context("building market data client")?;
    let backend = BackendClient::new(&config.backend).context("building backend client")?;
    let queue = SqsQueue::connect(&config.queue).await;

    let processor = JobProcessor::new(
        Arc::new(market),
        Arc::new(backend),
        config.ranking_categories.clone(),
    );
    let mut poll_loop = PollLoop::new(
        Arc::new(queue),
        processor,
        Arc::new(SystemClock),
        LoopSettings::from(&config),
    );

    poll_loop
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("Worker stopped.");
    Ok(())
}
