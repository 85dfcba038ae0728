//! Mailbox switching, pagination and refresh mode

use crate::error::SyncError;
use crate::mail::types::MailboxId;

use super::super::{Effect, InboxState};

impl InboxState {
    pub(crate) fn select_mailbox(&mut self, mailbox: Option<MailboxId>) -> Vec<Effect> {
        if self.mailbox == mailbox {
            return Vec::new();
        }
        tracing::info!(
            "Switching mailbox to {}",
            mailbox.as_ref().map(|m| m.as_str()).unwrap_or("<none>")
        );

        self.mailbox = mailbox;
        self.pagination.page = 1;
        self.selection.selected = None;
        self.selection.clear_bulk();
        self.optimistic.clear();
        self.status.clear_error();

        // The old timer must be gone before a new one starts.
        let mut effects = self.stop_polling();
        effects.extend(self.switch_key());
        if self.refresh.auto_refresh && self.mailbox.is_some() {
            effects.extend(self.start_polling());
        }
        effects
    }

    pub(crate) fn set_page(&mut self, page: u32) -> Result<Vec<Effect>, SyncError> {
        if page == 0 {
            return Err(SyncError::validation("Page numbers start at 1"));
        }
        if page == self.pagination.page {
            return Ok(Vec::new());
        }
        self.pagination.page = page;
        Ok(self.switch_key())
    }

    pub(crate) fn set_page_size(&mut self, page_size: u32) -> Result<Vec<Effect>, SyncError> {
        if page_size == 0 {
            return Err(SyncError::validation("Page size must be positive"));
        }
        if page_size == self.pagination.page_size {
            return Ok(Vec::new());
        }
        self.pagination.page_size = page_size;
        Ok(self.switch_key())
    }

    pub(crate) fn set_auto_refresh(&mut self, enabled: bool) -> Vec<Effect> {
        if self.refresh.auto_refresh == enabled {
            return Vec::new();
        }
        self.refresh.auto_refresh = enabled;
        if enabled {
            self.start_polling()
        } else {
            self.stop_polling()
        }
    }

    /// Manual refresh. Suppressed while polling, which already bounds staleness.
    pub(crate) fn refresh(&mut self) -> Vec<Effect> {
        if self.refresh.auto_refresh {
            tracing::debug!("Manual refresh ignored: auto-refresh is active");
            return Vec::new();
        }
        self.fetch_active(false)
    }
}
