use chrono::{DateTime, Utc};
use log::*;
use thiserror::Error;

use crate::{
    commission::calculate_split,
    db_types::NewLedgerEntry,
    traits::{CycleSummary, EventFeed, EventFeedError, FeedEvent, LedgerDatabase},
};

/// `ReconciliationApi` drains the marketplace core's transaction-event feed into the commission ledger.
///
/// The feed delivers at least once and the ledger insert is insert-or-ignore on the transaction id, so a
/// cycle can be re-run over the same window without double-recording anything. Per-event failures are
/// logged and counted; only a feed failure aborts the cycle.
pub struct ReconciliationApi<F, B> {
    feed: F,
    db: B,
}

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error("Could not fetch events. {0}")]
    FeedError(#[from] EventFeedError),
}

impl<F, B> ReconciliationApi<F, B> {
    pub fn new(feed: F, db: B) -> Self {
        Self { feed, db }
    }
}

impl<F, B> ReconciliationApi<F, B>
where
    F: EventFeed,
    B: LedgerDatabase,
{
    /// Runs one reconciliation cycle over all events with a timestamp at or after `cursor`.
    ///
    /// Events whose transaction is not in the fully-completed state are skipped. Completed events are
    /// applied to the ledger one at a time; an event that fails to apply is logged and skipped so that one
    /// bad event cannot wedge the feed.
    pub async fn run_cycle(&self, cursor: DateTime<Utc>) -> Result<CycleSummary, ReconciliationError> {
        let events = self.feed.events_since(cursor).await?;
        let mut summary = CycleSummary { events: events.len(), ..CycleSummary::default() };
        trace!("🪞️ Reconciliation cycle fetched {} event(s) since {cursor}", events.len());
        for event in events {
            if !event.completed {
                trace!("🪞️ Skipping event [{}]: transaction {} is not completed", event.event_id, event.tx_id);
                continue;
            }
            summary.completed += 1;
            match self.apply_event(&event).await {
                Ok(true) => summary.applied += 1,
                Ok(false) => {
                    debug!("🪞️ Transaction {} is already in the ledger. Skipping.", event.tx_id);
                    summary.duplicates += 1;
                },
                Err(e) => {
                    error!("🪞️ Could not apply event [{}] for transaction {}. {e}", event.event_id, event.tx_id);
                    summary.failures += 1;
                },
            }
        }
        debug!(
            "🪞️ Reconciliation cycle complete. {} event(s), {} completed, {} applied, {} duplicate(s), {} failure(s)",
            summary.events, summary.completed, summary.applied, summary.duplicates, summary.failures
        );
        Ok(summary)
    }

    /// Applies a single completed transaction to the ledger. Returns `Ok(false)` when the transaction was
    /// already recorded.
    async fn apply_event(&self, event: &FeedEvent) -> Result<bool, ReconciliationFailure> {
        // The host share applies only to promo-code referrals. QR scans are tracked as conversions but do
        // not carry a commission.
        let split = calculate_split(event.gross, event.promo_code.is_some())?;
        let mut entry = NewLedgerEntry::new(&event.tx_id, &event.provider_id, &split, &event.currency);
        if let Some(code) = &event.promo_code {
            entry = entry.with_promo_code(code);
        }
        if let Some(code) = &event.qr_code {
            entry = entry.with_qr_code(code);
        }
        let applied = self.db.apply_completed_transaction(entry).await?;
        Ok(applied)
    }
}

#[derive(Debug, Error)]
enum ReconciliationFailure {
    #[error("{0}")]
    Commission(#[from] crate::commission::CommissionError),
    #[error("{0}")]
    Ledger(#[from] crate::traits::LedgerError),
}
