//! Draft staging and sending

use crate::error::SyncError;
use crate::mail::types::{Draft, DraftPatch};

use super::super::{Effect, InboxState};

impl InboxState {
    /// Start a blank draft sent from the active mailbox, replacing any open one.
    pub(crate) fn open_draft(&mut self) -> Result<Vec<Effect>, SyncError> {
        let Some(mailbox) = self.mailbox.clone() else {
            return Err(SyncError::validation("No email address selected"));
        };
        self.compose.draft = Some(Draft::new(mailbox));
        Ok(Vec::new())
    }

    pub(crate) fn update_draft(&mut self, patch: DraftPatch) -> Result<Vec<Effect>, SyncError> {
        let draft = self
            .compose
            .draft
            .as_mut()
            .ok_or_else(|| SyncError::validation("No draft is open"))?;
        draft.apply(patch);
        Ok(Vec::new())
    }

    pub(crate) fn send_draft(&mut self) -> Result<Vec<Effect>, SyncError> {
        if self.compose.sending {
            return Err(SyncError::validation("A message is already being sent"));
        }
        let draft = self
            .compose
            .draft
            .as_ref()
            .ok_or_else(|| SyncError::validation("No draft is open"))?;

        let envelope = draft.to_envelope()?;
        tracing::debug!("Submitting message from {} to {}", envelope.from, envelope.to);
        self.compose.sending = true;
        Ok(vec![Effect::Send(envelope)])
    }
}
