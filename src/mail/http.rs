//! HTTP binding of the mailbox service (JSON API of the forwarding web app).

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

use super::service::MailService;
use super::types::{Envelope, MailboxId, MessageId, PageResult};

const INBOX_PATH: &str = "/api/email/inbox";
const READ_PATH: &str = "/api/email/read";
const SEND_PATH: &str = "/api/email/send";

#[derive(Clone)]
pub struct HttpMailService {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadRequest<'a> {
    email_id: &'a MessageId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadBulkRequest<'a> {
    email_ids: &'a [MessageId],
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpMailService {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Map a non-success response to a `SyncError`, preferring the server's `error` field.
async fn check_status(
    response: Response,
    not_found: impl FnOnce() -> String,
) -> Result<Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(SyncError::NotFound(not_found()));
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .filter(|e| !e.trim().is_empty())
        .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| status.to_string());

    tracing::warn!("Mail service returned {}: {}", status, message);
    Err(SyncError::Server(message))
}

impl MailService for HttpMailService {
    async fn list_messages(
        &self,
        mailbox: &MailboxId,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult, SyncError> {
        let response = self
            .client
            .get(self.url(INBOX_PATH))
            .query(&[
                ("emailAddress", mailbox.to_string()),
                ("page", page.to_string()),
                ("size", page_size.to_string()),
            ])
            .send()
            .await?;

        let response = check_status(response, || mailbox.to_string()).await?;
        response
            .json::<PageResult>()
            .await
            .map_err(|e| SyncError::Server(format!("Malformed inbox response: {}", e)))
    }

    async fn mark_read(&self, id: &MessageId) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.url(READ_PATH))
            .json(&MarkReadRequest { email_id: id })
            .send()
            .await?;

        check_status(response, || format!("message {}", id)).await?;
        Ok(())
    }

    async fn mark_read_bulk(&self, ids: &[MessageId]) -> Result<(), SyncError> {
        let response = self
            .client
            .put(self.url(READ_PATH))
            .json(&MarkReadBulkRequest { email_ids: ids })
            .send()
            .await?;

        check_status(response, || format!("{} messages", ids.len())).await?;
        Ok(())
    }

    async fn send_message(&self, envelope: &Envelope) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.url(SEND_PATH))
            .json(envelope)
            .send()
            .await?;

        check_status(response, || envelope.from.clone()).await?;
        tracing::info!("Email sent from {} to {}", envelope.from, envelope.to);
        Ok(())
    }
}
