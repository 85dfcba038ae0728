//! In-memory mail service for engine tests.
//!
//! Serves pages out of per-mailbox message lists, records every call, and lets a test
//! inject failures or hold a listing until released to stage races.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;

use crate::error::SyncError;

use super::service::MailService;
use super::types::{Envelope, MailboxId, Message, MessageId, PageKey, PageResult};

#[derive(Default)]
struct Inner {
    mailboxes: HashMap<MailboxId, Vec<Message>>,
    list_calls: Vec<PageKey>,
    mark_read_calls: Vec<MessageId>,
    bulk_calls: Vec<Vec<MessageId>>,
    sent: Vec<Envelope>,
    fail_list: Option<SyncError>,
    fail_mark_read: Option<SyncError>,
    fail_bulk: Option<SyncError>,
    fail_send: Option<SyncError>,
    held: HashMap<MailboxId, Arc<Notify>>,
    hold_next: Option<Arc<Notify>>,
    list_delay: Duration,
}

#[derive(Clone, Default)]
pub struct MockMailService {
    inner: Arc<Mutex<Inner>>,
}

impl MockMailService {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_mailbox(self, mailbox: &str, messages: Vec<Message>) -> Self {
        self.set_mailbox(mailbox, messages);
        self
    }

    pub fn set_mailbox(&self, mailbox: &str, messages: Vec<Message>) {
        self.lock()
            .mailboxes
            .insert(MailboxId::new(mailbox), messages);
    }

    /// Remove a message server-side, as if it was deleted elsewhere.
    pub fn delete_message(&self, mailbox: &str, id: &str) {
        if let Some(list) = self.lock().mailboxes.get_mut(&MailboxId::new(mailbox)) {
            list.retain(|m| m.id.as_str() != id);
        }
    }

    pub fn set_list_delay(&self, delay: Duration) {
        self.lock().list_delay = delay;
    }

    /// Listings for `mailbox` snapshot their data immediately but only return once the
    /// returned handle is notified.
    pub fn hold_lists(&self, mailbox: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.lock()
            .held
            .insert(MailboxId::new(mailbox), Arc::clone(&notify));
        notify
    }

    /// Only the next listing waits for the returned handle.
    pub fn hold_next_list(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.lock().hold_next = Some(Arc::clone(&notify));
        notify
    }

    pub fn release_lists(&self, mailbox: &str) {
        if let Some(notify) = self.lock().held.remove(&MailboxId::new(mailbox)) {
            notify.notify_waiters();
            notify.notify_one();
        }
    }

    pub fn fail_next_list(&self, err: SyncError) {
        self.lock().fail_list = Some(err);
    }

    pub fn fail_next_mark_read(&self, err: SyncError) {
        self.lock().fail_mark_read = Some(err);
    }

    pub fn fail_next_bulk(&self, err: SyncError) {
        self.lock().fail_bulk = Some(err);
    }

    pub fn fail_next_send(&self, err: SyncError) {
        self.lock().fail_send = Some(err);
    }

    pub fn list_calls(&self) -> Vec<PageKey> {
        self.lock().list_calls.clone()
    }

    pub fn list_call_count(&self) -> usize {
        self.lock().list_calls.len()
    }

    pub fn mark_read_calls(&self) -> Vec<MessageId> {
        self.lock().mark_read_calls.clone()
    }

    pub fn bulk_calls(&self) -> Vec<Vec<MessageId>> {
        self.lock().bulk_calls.clone()
    }

    pub fn sent(&self) -> Vec<Envelope> {
        self.lock().sent.clone()
    }

    fn mark_in_store(&self, ids: &[MessageId]) {
        let now = Utc::now();
        for list in self.lock().mailboxes.values_mut() {
            for message in list.iter_mut().filter(|m| ids.contains(&m.id)) {
                message.read_at.get_or_insert(now);
            }
        }
    }
}

impl MailService for MockMailService {
    async fn list_messages(
        &self,
        mailbox: &MailboxId,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult, SyncError> {
        let (result, hold, delay) = {
            let mut inner = self.lock();
            inner.list_calls.push(PageKey {
                mailbox: mailbox.clone(),
                page,
                page_size,
            });
            let result = match inner.fail_list.take() {
                Some(err) => Err(err),
                None => match inner.mailboxes.get(mailbox) {
                    Some(list) => {
                        let start = (page.saturating_sub(1) as usize) * page_size as usize;
                        Ok(PageResult {
                            total: list.len() as u64,
                            list: list
                                .iter()
                                .skip(start)
                                .take(page_size as usize)
                                .cloned()
                                .collect(),
                        })
                    }
                    None => Err(SyncError::NotFound(mailbox.to_string())),
                },
            };
            let hold = inner
                .hold_next
                .take()
                .or_else(|| inner.held.get(mailbox).cloned());
            (result, hold, inner.list_delay)
        };

        if let Some(notify) = hold {
            notify.notified().await;
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn mark_read(&self, id: &MessageId) -> Result<(), SyncError> {
        let failure = {
            let mut inner = self.lock();
            inner.mark_read_calls.push(id.clone());
            inner.fail_mark_read.take()
        };
        if let Some(err) = failure {
            return Err(err);
        }
        self.mark_in_store(std::slice::from_ref(id));
        Ok(())
    }

    async fn mark_read_bulk(&self, ids: &[MessageId]) -> Result<(), SyncError> {
        let failure = {
            let mut inner = self.lock();
            inner.bulk_calls.push(ids.to_vec());
            inner.fail_bulk.take()
        };
        if let Some(err) = failure {
            return Err(err);
        }
        self.mark_in_store(ids);
        Ok(())
    }

    async fn send_message(&self, envelope: &Envelope) -> Result<(), SyncError> {
        let mut inner = self.lock();
        if let Some(err) = inner.fail_send.take() {
            return Err(err);
        }
        inner.sent.push(envelope.clone());
        Ok(())
    }
}
