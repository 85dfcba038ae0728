//! Acknowledgements for mark-read, bulk mark-read and send

use crate::error::SyncError;
use crate::mail::types::MessageId;

use super::super::{Effect, InboxState};

impl InboxState {
    pub(crate) fn handle_mark_read_done(
        &mut self,
        id: MessageId,
        result: Result<(), SyncError>,
    ) -> Result<Vec<Effect>, SyncError> {
        match result {
            Ok(()) => {
                let from = self.peek_seq();
                if let Some(entry) = self.optimistic.get_mut(&id) {
                    entry.confirmed_from_seq = Some(from);
                }
                Ok(self.fetch_active(true))
            }
            Err(e) => {
                tracing::warn!("Marking {} as read failed: {}", id, e);
                self.optimistic.remove(&id);
                Err(e)
            }
        }
    }

    pub(crate) fn handle_bulk_done(
        &mut self,
        ids: Vec<MessageId>,
        result: Result<(), SyncError>,
    ) -> Result<Vec<Effect>, SyncError> {
        self.bulk_pending = false;
        match result {
            Ok(()) => {
                tracing::info!("Marked {} messages as read", ids.len());
                for id in &ids {
                    self.selection.bulk.remove(id);
                }
                Ok(self.fetch_active(true))
            }
            Err(e) => {
                tracing::warn!("Bulk mark-read failed: {}", e);
                Err(e.or_fallback("Failed to mark emails as read"))
            }
        }
    }

    pub(crate) fn handle_sent(
        &mut self,
        result: Result<(), SyncError>,
    ) -> Result<Vec<Effect>, SyncError> {
        self.compose.sending = false;
        match result {
            Ok(()) => {
                self.compose.draft = None;
                self.status.push_notice("Email sent successfully");
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!("Send failed: {}", e);
                Err(SyncError::Server(format!(
                    "Failed to send email: {}",
                    e.display_or("unknown error")
                )))
            }
        }
    }
}
