//! Completion handlers
//!
//! Results of the effects the engine ran come back here as `Completion`s:
//! - `listing`: page results, stale-result guard, optimistic overlay, poll ticks
//! - `mutation`: mark-read, bulk mark-read and send acknowledgements

mod listing;
mod mutation;

use std::sync::Arc;

use crate::error::SyncError;
use crate::mail::types::MessageId;

use super::{Effect, FetchTicket, FetchedPage, InboxState};

/// Outcome of an effect, fed back into the state machine.
#[derive(Debug, Clone)]
pub enum Completion {
    PageLoaded {
        ticket: FetchTicket,
        result: Result<Arc<FetchedPage>, SyncError>,
    },
    MarkRead {
        id: MessageId,
        result: Result<(), SyncError>,
    },
    BulkMarkRead {
        ids: Vec<MessageId>,
        result: Result<(), SyncError>,
    },
    Sent {
        result: Result<(), SyncError>,
    },
    PollTick {
        generation: u64,
    },
}

impl InboxState {
    /// Fold a completed effect into the state.
    ///
    /// An `Err` carries a failure the user should see; the state has already been updated.
    pub fn handle_completion(&mut self, completion: Completion) -> Result<Vec<Effect>, SyncError> {
        match completion {
            Completion::PageLoaded { ticket, result } => self.handle_page_loaded(ticket, result),
            Completion::MarkRead { id, result } => self.handle_mark_read_done(id, result),
            Completion::BulkMarkRead { ids, result } => self.handle_bulk_done(ids, result),
            Completion::Sent { result } => self.handle_sent(result),
            Completion::PollTick { generation } => Ok(self.handle_poll_tick(generation)),
        }
    }
}
