//! Listing requests with a deduplication window.
//!
//! Identical (mailbox, page, size) requests made while one is in flight share its result,
//! and a completed result is reused until the window elapses. Mutation follow-ups bypass
//! the window and refresh the cached entry. Every page is tagged with the sequence number
//! of the request that loaded it, so the state machine can tell how fresh a shared page is.

use std::sync::Arc;
use std::time::Duration;

use crate::app::{FetchTicket, FetchedPage};
use crate::constants::DEDUP_CACHE_CAPACITY;
use crate::error::SyncError;
use crate::mail::MailService;
use crate::mail::types::{PageKey, PageResult};

pub type PageCache = moka::future::Cache<PageKey, Arc<FetchedPage>>;

pub struct FetchCoordinator<S> {
    service: Arc<S>,
    cache: PageCache,
}

impl<S> Clone for FetchCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            cache: self.cache.clone(),
        }
    }
}

impl<S: MailService> FetchCoordinator<S> {
    pub fn new(service: Arc<S>, window: Duration) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(DEDUP_CACHE_CAPACITY)
            .time_to_live(window)
            .build();
        Self { service, cache }
    }

    pub async fn fetch(&self, ticket: &FetchTicket) -> Result<Arc<FetchedPage>, SyncError> {
        let key = &ticket.key;

        if ticket.revalidate {
            let fetched = self.load(ticket).await?;
            self.cache.insert(key.clone(), Arc::clone(&fetched)).await;
            return Ok(fetched);
        }

        // Failures are not cached: the next request tries again.
        self.cache
            .try_get_with(key.clone(), self.load(ticket))
            .await
            .map_err(|e| SyncError::clone(&e))
    }

    async fn load(&self, ticket: &FetchTicket) -> Result<Arc<FetchedPage>, SyncError> {
        let key = &ticket.key;
        tracing::debug!("Requesting {} (seq {})", key, ticket.seq);
        let page: PageResult = self
            .service
            .list_messages(&key.mailbox, key.page, key.page_size)
            .await?;
        Ok(Arc::new(FetchedPage {
            origin_seq: ticket.seq,
            page,
        }))
    }
}
