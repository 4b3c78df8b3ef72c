//! Client for the conversation-archival service
//!
//! One multipart POST per saved conversation. The trait seam exists so the
//! tool layer can be exercised without a running archive instance.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;

/// Model label reported to the archive alongside every upload.
pub const ARCHIVE_MODEL_LABEL: &str = "Claude (MCP)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReceipt {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    url: String,
}

#[async_trait]
pub trait ConversationArchive: Send + Sync {
    async fn save(&self, conversation: &str) -> Result<ArchiveReceipt, AppError>;
}

#[derive(Debug, Clone)]
pub struct HttpArchiveClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpArchiveClient {
    pub fn new(endpoint: reqwest::Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl ConversationArchive for HttpArchiveClient {
    async fn save(&self, conversation: &str) -> Result<ArchiveReceipt, AppError> {
        // The archive expects the conversation as a text/plain file part
        // named htmlDoc; skipScraping marks the upload as pre-rendered.
        let document = reqwest::multipart::Part::text(conversation.to_owned())
            .mime_str("text/plain")
            .map_err(|err| AppError::internal(format!("failed to build archive form: {err}")))?;
        let form = reqwest::multipart::Form::new()
            .part("htmlDoc", document)
            .text("model", ARCHIVE_MODEL_LABEL)
            .text("skipScraping", "true");

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| AppError::internal(format!("archive request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(status.as_u16(), body));
        }

        let parsed: ArchiveResponse = response.json().await.map_err(|err| {
            AppError::internal(format!("archive response was not valid JSON: {err}"))
        })?;

        Ok(ArchiveReceipt { url: parsed.url })
    }
}
