//! Auto-refresh timer

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::app::Completion;

/// A running poll timer. Dropping it stops the timer.
pub struct Poller {
    generation: u64,
    token: CancellationToken,
}

impl Poller {
    /// Emit `Completion::PollTick { generation }` every `interval`, first after one full
    /// interval. Ticks missed while the engine was busy are skipped, not bunched up.
    pub fn spawn(generation: u64, interval: Duration, tx: mpsc::Sender<Completion>) -> Self {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::debug!("Poller {} started ({:?})", generation, interval);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        if tx.send(Completion::PollTick { generation }).await.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("Poller {} stopped", generation);
        });

        Self { generation, token }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
