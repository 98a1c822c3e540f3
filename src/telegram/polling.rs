use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};

use super::client::TelegramClient;
use crate::bot::Dispatcher;
use crate::config::TelegramConfig;
use crate::constants::telegram::SHUTDOWN_GRACE;
use crate::error::TelegramError;

/// Long-polls getUpdates until `shutdown` resolves.
///
/// Each update is handled on its own task; nothing is shared between them
/// except the dispatcher's immutable clients. On shutdown, replies still in
/// progress get up to `SHUTDOWN_GRACE` to finish before they are aborted.
pub async fn run_polling<F>(
    client: TelegramClient,
    dispatcher: Arc<Dispatcher>,
    config: &TelegramConfig,
    shutdown: F,
) -> Result<(), TelegramError>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    // getUpdates refuses to work while a webhook is set
    client.delete_webhook(config.drop_pending_updates).await?;
    if config.drop_pending_updates {
        info!("🧹 [POLL] Pending updates dropped");
    }

    let poll_timeout = config.poll_timeout();
    let mut offset: Option<i64> = None;
    let mut in_flight: JoinSet<()> = JoinSet::new();

    info!("📡 [POLL] Listening for messages (long poll: {}s)", poll_timeout.as_secs());

    loop {
        let result = tokio::select! {
            _ = &mut shutdown => break,
            result = client.get_updates(offset, poll_timeout) => result,
        };

        while let Some(done) = in_flight.try_join_next() {
            log_finished(done);
        }

        match result {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);

                    let dispatcher = dispatcher.clone();
                    let transport = client.clone();
                    in_flight.spawn(async move {
                        dispatcher.handle_update(update, &transport).await;
                    });
                }
            }
            Err(e) => {
                let wait = e
                    .retry_after()
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| config.error_backoff());
                warn!("⚠️ [POLL] getUpdates failed: {} (retrying in {:?})", e, wait);

                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(wait) => {}
                }
            }
        }
    }

    drain(in_flight, SHUTDOWN_GRACE).await;
    info!("🛑 [POLL] Polling stopped");
    Ok(())
}

async fn drain(mut in_flight: JoinSet<()>, grace: Duration) {
    if in_flight.is_empty() {
        return;
    }

    info!("⏳ [POLL] Waiting for {} in-flight replies", in_flight.len());

    let finished = tokio::time::timeout(grace, async {
        while let Some(done) = in_flight.join_next().await {
            log_finished(done);
        }
    })
    .await;

    if finished.is_err() {
        warn!(
            "⚠️ [POLL] {} replies still running after {:?}; aborting",
            in_flight.len(),
            grace
        );
        in_flight.shutdown().await;
    }
}

fn log_finished(done: Result<(), JoinError>) {
    if let Err(e) = done {
        error!("❌ [POLL] Message handler task failed: {}", e);
    }
}
