//! Engine loop: applies intents and completions, runs the resulting effects.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::{Completion, Effect, InboxState, Intent};
use crate::constants::ENGINE_EVENT_CAPACITY;
use crate::error::SyncError;
use crate::mail::MailService;

use super::fetch::FetchCoordinator;
use super::poller::Poller;
use super::{EngineSettings, InboxCommand, InboxEvent};

struct Engine<S> {
    state: InboxState,
    service: Arc<S>,
    fetcher: FetchCoordinator<S>,
    done_tx: mpsc::Sender<Completion>,
    event_tx: mpsc::Sender<InboxEvent>,
    poller: Option<Poller>,
}

pub(super) async fn run_engine<S: MailService>(
    service: Arc<S>,
    settings: EngineSettings,
    mut cmd_rx: mpsc::Receiver<InboxCommand>,
    event_tx: mpsc::Sender<InboxEvent>,
) {
    let (done_tx, mut done_rx) = mpsc::channel(ENGINE_EVENT_CAPACITY);
    let mut engine = Engine {
        state: InboxState::new(settings.page_size, settings.poll_interval),
        fetcher: FetchCoordinator::new(Arc::clone(&service), settings.dedup_window),
        service,
        done_tx,
        event_tx,
        poller: None,
    };

    let startup = [
        Intent::SetAutoRefresh(settings.auto_refresh),
        Intent::SelectMailbox(settings.mailbox),
    ];
    for intent in startup {
        let outcome = engine.state.handle_intent(intent);
        if !engine.apply(outcome).await {
            return;
        }
    }

    loop {
        let alive = tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(InboxCommand::Intent(intent)) => {
                    tracing::debug!("Intent: {:?}", intent);
                    let outcome = engine.state.handle_intent(intent);
                    engine.apply(outcome).await
                }
                Some(InboxCommand::Snapshot(reply)) => {
                    reply.send(engine.state.view()).ok();
                    true
                }
                Some(InboxCommand::Shutdown) | None => {
                    tracing::info!("Inbox engine shutting down");
                    false
                }
            },
            Some(done) = done_rx.recv() => {
                let outcome = engine.state.handle_completion(done);
                engine.apply(outcome).await
            }
        };
        if !alive {
            break;
        }
    }
}

impl<S: MailService> Engine<S> {
    /// Run the effects of a transition and publish the resulting view.
    /// Returns false once nobody is listening anymore.
    async fn apply(&mut self, outcome: Result<Vec<Effect>, SyncError>) -> bool {
        match outcome {
            Ok(effects) => {
                for effect in effects {
                    self.run(effect);
                }
            }
            Err(e) => {
                self.state.status_mut().set_error(&e);
                if !self.emit(InboxEvent::Failed(e)).await {
                    return false;
                }
            }
        }

        for notice in self.state.status_mut().take_notices() {
            if !self.emit(InboxEvent::Notice(notice)).await {
                return false;
            }
        }
        self.emit(InboxEvent::Updated(Box::new(self.state.view())))
            .await
    }

    async fn emit(&self, event: InboxEvent) -> bool {
        if self.event_tx.send(event).await.is_err() {
            tracing::warn!("Inbox engine: event receiver dropped");
            return false;
        }
        true
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch(ticket) => {
                let fetcher = self.fetcher.clone();
                let done_tx = self.done_tx.clone();
                tokio::spawn(async move {
                    let result = fetcher.fetch(&ticket).await;
                    done_tx
                        .send(Completion::PageLoaded { ticket, result })
                        .await
                        .ok();
                });
            }
            Effect::MarkRead(id) => {
                let service = Arc::clone(&self.service);
                let done_tx = self.done_tx.clone();
                tokio::spawn(async move {
                    let result = service.mark_read(&id).await;
                    done_tx.send(Completion::MarkRead { id, result }).await.ok();
                });
            }
            Effect::MarkReadBulk(ids) => {
                let service = Arc::clone(&self.service);
                let done_tx = self.done_tx.clone();
                tokio::spawn(async move {
                    let result = service.mark_read_bulk(&ids).await;
                    done_tx
                        .send(Completion::BulkMarkRead { ids, result })
                        .await
                        .ok();
                });
            }
            Effect::Send(envelope) => {
                let service = Arc::clone(&self.service);
                let done_tx = self.done_tx.clone();
                tokio::spawn(async move {
                    let result = service.send_message(&envelope).await;
                    done_tx.send(Completion::Sent { result }).await.ok();
                });
            }
            Effect::StartPolling {
                generation,
                interval,
            } => {
                if let Some(old) = self.poller.take() {
                    tracing::debug!("Replacing poller {}", old.generation());
                }
                self.poller = Some(Poller::spawn(generation, interval, self.done_tx.clone()));
            }
            Effect::StopPolling => {
                self.poller = None;
            }
        }
    }
}
