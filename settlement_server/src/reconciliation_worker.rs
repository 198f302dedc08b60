use chrono::{Duration, Utc};
use log::*;
use settlement_engine::{ReconciliationApi, SqliteDatabase};
use tokio::task::JoinHandle;

use crate::integrations::MarketplaceFeed;

/// Starts the reconciliation poller. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Each cycle asks the marketplace feed for transaction events since the cursor and applies the completed
/// ones to the commission ledger. The cursor only advances after a successful cycle, so a flaky feed means
/// redelivered events rather than dropped ones; the ledger's duplicate guard absorbs the redeliveries.
pub fn start_reconciliation_worker(
    feed: MarketplaceFeed,
    db: SqliteDatabase,
    poll_interval_secs: u64,
    lookback: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(std::time::Duration::from_secs(poll_interval_secs));
        let api = ReconciliationApi::new(feed, db);
        let mut cursor = Utc::now() - lookback;
        info!("🪞️ Reconciliation worker started. The first cycle covers events since {cursor}");
        loop {
            timer.tick().await;
            let cycle_start = Utc::now();
            trace!("🪞️ Running reconciliation cycle from {cursor}");
            match api.run_cycle(cursor).await {
                Ok(summary) => {
                    if summary.events > 0 {
                        info!(
                            "🪞️ Reconciliation cycle done. {} events, {} completed, {} applied, {} duplicates, {} \
                             failures",
                            summary.events, summary.completed, summary.applied, summary.duplicates, summary.failures
                        );
                    }
                    cursor = cycle_start;
                },
                Err(e) => {
                    error!("🪞️ Reconciliation cycle failed. The cursor stays at {cursor}. {e}");
                },
            }
        }
    })
}
