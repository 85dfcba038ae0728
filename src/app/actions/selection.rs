//! Opening messages and optimistic read marking

use chrono::Utc;

use crate::app::state::OptimisticRead;
use crate::error::SyncError;
use crate::mail::types::MessageId;

use super::super::{Effect, InboxState};

impl InboxState {
    pub(crate) fn select_message(&mut self, id: Option<MessageId>) -> Vec<Effect> {
        let Some(id) = id else {
            self.selection.selected = None;
            return Vec::new();
        };

        let listed = self.page.as_ref().is_some_and(|p| p.contains(&id));
        if !listed {
            tracing::debug!("Ignoring selection of {}: not on the current page", id);
            return Vec::new();
        }

        let effects = self.mark_read_optimistically(&id);
        self.selection.selected = Some(id);
        effects
    }

    pub(crate) fn mark_read(&mut self, id: MessageId) -> Result<Vec<Effect>, SyncError> {
        let listed = self.page.as_ref().is_some_and(|p| p.contains(&id));
        if !listed {
            return Err(SyncError::validation(format!(
                "Message {} is not on the current page",
                id
            )));
        }
        Ok(self.mark_read_optimistically(&id))
    }

    /// Flip the local read flag right away and ask the server to do the same.
    /// Already-read messages need no request.
    fn mark_read_optimistically(&mut self, id: &MessageId) -> Vec<Effect> {
        let Some(message) = self.page.as_mut().and_then(|p| p.get_mut(id)) else {
            return Vec::new();
        };
        if message.is_read() {
            return Vec::new();
        }

        let now = Utc::now();
        message.read_at = Some(now);
        self.optimistic.insert(
            id.clone(),
            OptimisticRead {
                read_at: now,
                confirmed_from_seq: None,
            },
        );
        vec![Effect::MarkRead(id.clone())]
    }
}
