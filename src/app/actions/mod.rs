//! Intent handlers
//!
//! This module is split into focused submodules:
//! - `navigation`: mailbox switching, pagination, refresh mode
//! - `selection`: open message, optimistic read marking, checkbox set
//! - `bulk`: bulk mark-as-read
//! - `compose`: draft staging and sending

mod bulk;
mod compose;
mod navigation;
mod selection;

use crate::error::SyncError;

use super::{Effect, InboxState, Intent};

impl InboxState {
    /// Apply one user intent.
    ///
    /// A `Validation` error means the intent was rejected locally and the state is unchanged.
    pub fn handle_intent(&mut self, intent: Intent) -> Result<Vec<Effect>, SyncError> {
        match intent {
            Intent::SelectMailbox(mailbox) => Ok(self.select_mailbox(mailbox)),
            Intent::SelectMessage(id) => Ok(self.select_message(id)),
            Intent::MarkRead(id) => self.mark_read(id),
            Intent::SetPage(page) => self.set_page(page),
            Intent::SetPageSize(size) => self.set_page_size(size),
            Intent::SetAutoRefresh(enabled) => Ok(self.set_auto_refresh(enabled)),
            Intent::Refresh => Ok(self.refresh()),
            Intent::ToggleBulk(id) => {
                self.selection.toggle_bulk(id);
                Ok(Vec::new())
            }
            Intent::ClearBulk => {
                self.selection.clear_bulk();
                Ok(Vec::new())
            }
            Intent::MarkSelectedRead => self.mark_selected_read(),
            Intent::OpenDraft => self.open_draft(),
            Intent::UpdateDraft(patch) => self.update_draft(patch),
            Intent::CancelDraft => {
                self.compose.draft = None;
                Ok(Vec::new())
            }
            Intent::SendDraft => self.send_draft(),
        }
    }
}
