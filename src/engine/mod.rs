//! Inbox engine actor
//!
//! Owns the `InboxState` on a single task. The front end sends intents and reads view
//! snapshots back; listing, mark-read and send requests run as spawned tasks whose
//! results are fed back into the state in arrival order.

mod actor;
pub mod fetch;
pub mod poller;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};

use crate::app::Intent;
use crate::app::state::InboxView;
use crate::constants::{
    DEDUP_WINDOW_MS, DEFAULT_PAGE_SIZE, ENGINE_COMMAND_CAPACITY, ENGINE_EVENT_CAPACITY,
    POLL_INTERVAL_MS,
};
use crate::error::SyncError;
use crate::mail::MailService;
use crate::mail::types::MailboxId;

/// Commands accepted by the engine
#[derive(Debug)]
pub enum InboxCommand {
    Intent(Intent),
    /// Reply with the current view without changing anything.
    Snapshot(oneshot::Sender<InboxView>),
    Shutdown,
}

/// Events emitted by the engine
#[derive(Debug, Clone)]
pub enum InboxEvent {
    /// The view after an intent or completion was applied.
    Updated(Box<InboxView>),
    /// One-off confirmation, e.g. a sent message.
    Notice(String),
    Failed(SyncError),
}

/// Handle for communicating with the engine
pub struct InboxHandle {
    pub cmd_tx: mpsc::Sender<InboxCommand>,
    pub event_rx: mpsc::Receiver<InboxEvent>,
}

impl InboxHandle {
    pub async fn dispatch(&self, intent: Intent) -> Result<()> {
        self.cmd_tx
            .send(InboxCommand::Intent(intent))
            .await
            .context("Inbox engine stopped")
    }

    pub async fn snapshot(&self) -> Result<InboxView> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(InboxCommand::Snapshot(reply))
            .await
            .context("Inbox engine stopped")?;
        rx.await.context("Inbox engine dropped snapshot request")
    }
}

/// Startup parameters for the engine
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Mailbox to open right away.
    pub mailbox: Option<MailboxId>,
    pub page_size: u32,
    pub auto_refresh: bool,
    pub poll_interval: Duration,
    pub dedup_window: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            mailbox: None,
            page_size: DEFAULT_PAGE_SIZE,
            auto_refresh: false,
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            dedup_window: Duration::from_millis(DEDUP_WINDOW_MS),
        }
    }
}

/// Spawn the engine task and return a handle to drive it.
pub fn spawn_inbox_engine<S: MailService>(
    service: Arc<S>,
    settings: EngineSettings,
) -> InboxHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(ENGINE_COMMAND_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(ENGINE_EVENT_CAPACITY);

    tokio::spawn(actor::run_engine(service, settings, cmd_rx, event_tx));

    InboxHandle { cmd_tx, event_rx }
}
