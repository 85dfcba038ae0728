//! Remote mailbox service contract consumed by the inbox engine.

use std::future::Future;

use crate::error::SyncError;

use super::types::{Envelope, MailboxId, MessageId, PageResult};

/// Source of truth for mailbox contents.
///
/// Mark-read calls are expected to be idempotent per message id; the engine relies on
/// that when a user repeats a bulk action but never checks it.
pub trait MailService: Send + Sync + 'static {
    fn list_messages(
        &self,
        mailbox: &MailboxId,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<PageResult, SyncError>> + Send;

    fn mark_read(&self, id: &MessageId) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn mark_read_bulk(
        &self,
        ids: &[MessageId],
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn send_message(
        &self,
        envelope: &Envelope,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;
}
