//! Interactive prompt: reads commands from stdin, forwards them to the engine and
//! redraws when the view changes.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::command::{ParsedCommand, Target, parse_command};
use crate::engine::{InboxCommand, InboxEvent, InboxHandle};
use crate::mail::types::{DraftPatch, MailboxId, MessageId};
use crate::ui;

use super::Intent;
use super::state::InboxView;

/// What a command line asks the prompt to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Dispatch(Intent),
    Redraw,
    Help,
    Quit,
    Reject(String),
}

fn listed_ids(view: Option<&InboxView>) -> Vec<MessageId> {
    view.map(|v| v.messages.iter().map(|m| m.id.clone()).collect())
        .unwrap_or_default()
}

fn resolve(target: &Target, view: Option<&InboxView>) -> Result<MessageId, String> {
    target
        .resolve(&listed_ids(view))
        .ok_or_else(|| "No such row on this page".to_string())
}

/// Translate a parsed command into an engine intent, resolving row numbers against the
/// last view shown.
pub(crate) fn step_for(command: ParsedCommand, view: Option<&InboxView>) -> Step {
    let intent = match command {
        ParsedCommand::Mailbox(address) => Intent::SelectMailbox(address.map(MailboxId::new)),
        ParsedCommand::Open(target) => match resolve(&target, view) {
            Ok(id) => Intent::SelectMessage(Some(id)),
            Err(e) => return Step::Reject(e),
        },
        ParsedCommand::Close => Intent::SelectMessage(None),
        ParsedCommand::Read(target) => match resolve(&target, view) {
            Ok(id) => Intent::MarkRead(id),
            Err(e) => return Step::Reject(e),
        },
        ParsedCommand::Page(page) => Intent::SetPage(page),
        ParsedCommand::Size(size) => Intent::SetPageSize(size),
        ParsedCommand::Auto(enabled) => Intent::SetAutoRefresh(enabled),
        ParsedCommand::Refresh => Intent::Refresh,
        ParsedCommand::Check(target) => match resolve(&target, view) {
            Ok(id) => Intent::ToggleBulk(id),
            Err(e) => return Step::Reject(e),
        },
        ParsedCommand::UncheckAll => Intent::ClearBulk,
        ParsedCommand::MarkRead => Intent::MarkSelectedRead,
        ParsedCommand::Compose => Intent::OpenDraft,
        ParsedCommand::To(to) => Intent::UpdateDraft(DraftPatch::to(to)),
        ParsedCommand::Subject(subject) => Intent::UpdateDraft(DraftPatch::subject(subject)),
        ParsedCommand::Body(body) => Intent::UpdateDraft(DraftPatch::html(body)),
        ParsedCommand::Send => Intent::SendDraft,
        ParsedCommand::Cancel => Intent::CancelDraft,
        ParsedCommand::List => return Step::Redraw,
        ParsedCommand::Help => return Step::Help,
        ParsedCommand::Quit => return Step::Quit,
    };
    Step::Dispatch(intent)
}

/// Loading flips on every poll; only redraw when something visible changed.
fn visibly_changed(old: Option<&InboxView>, new: &InboxView) -> bool {
    match old {
        None => true,
        Some(old) => {
            let settled = |v: &InboxView| InboxView {
                loading: false,
                error: None,
                ..v.clone()
            };
            settled(old) != settled(new)
        }
    }
}

pub struct Session {
    handle: InboxHandle,
    view: Option<InboxView>,
    dirty: bool,
}

impl Session {
    pub fn new(handle: InboxHandle) -> Self {
        Self {
            handle,
            view: None,
            dirty: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("Type `help` for commands.");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if !self.handle_line(&line).await? {
                        break;
                    }
                }
                event = self.handle.event_rx.recv() => {
                    let Some(event) = event else {
                        tracing::warn!("Inbox engine stopped");
                        break;
                    };
                    self.handle_event(event);
                }
                _ = tokio::signal::ctrl_c() => break,
            }

            if self.dirty {
                if let Some(view) = &self.view {
                    print!("{}", ui::render(view));
                }
                self.dirty = false;
            }
        }

        self.send(InboxCommand::Shutdown).await.ok();
        Ok(())
    }

    /// Returns false when the user asked to quit.
    async fn handle_line(&mut self, line: &str) -> Result<bool> {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(e) => {
                println!("{}", e);
                return Ok(true);
            }
        };

        match step_for(command, self.view.as_ref()) {
            Step::Dispatch(intent) => self.dispatch(intent).await?,
            Step::Redraw => self.dirty = true,
            Step::Help => print!("{}", ui::render_help()),
            Step::Quit => return Ok(false),
            Step::Reject(msg) => println!("{}", msg),
        }
        Ok(true)
    }

    async fn dispatch(&mut self, intent: Intent) -> Result<()> {
        self.send(InboxCommand::Intent(intent)).await
    }

    /// Queue a command, draining engine events while the command channel is full so a
    /// burst of input cannot stall both sides.
    async fn send(&mut self, command: InboxCommand) -> Result<()> {
        let cmd_tx = self.handle.cmd_tx.clone();
        loop {
            tokio::select! {
                permit = cmd_tx.reserve() => {
                    permit.context("Inbox engine stopped")?.send(command);
                    return Ok(());
                }
                Some(event) = self.handle.event_rx.recv() => self.handle_event(event),
            }
        }
    }

    fn handle_event(&mut self, event: InboxEvent) {
        match event {
            InboxEvent::Updated(view) => {
                if visibly_changed(self.view.as_ref(), &view) {
                    self.dirty = true;
                }
                self.view = Some(*view);
            }
            InboxEvent::Notice(msg) => println!("{}", msg),
            InboxEvent::Failed(err) => println!("Error: {}", err),
        }
    }
}
