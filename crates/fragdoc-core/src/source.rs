//! Initial content sources

use crate::error::SessionError;
use async_trait::async_trait;

/// Read-only source of the initial document text
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the document as plain text
    ///
    /// # Errors
    ///
    /// Implementations return [`SessionError::NetworkFetchFailed`].
    async fn fetch(&self) -> Result<String, SessionError>;

    /// Where the content comes from, for logs
    fn describe(&self) -> String;
}

/// Fetches content with an HTTP GET
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: reqwest::Client,
    url: String,
}

impl HttpContentSource {
    /// Create source for URL
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Create source using an existing client
    #[must_use]
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Target URL
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(&self) -> Result<String, SessionError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SessionError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::network(format!("{} returned {status}", self.url)));
        }

        response
            .text()
            .await
            .map_err(|e| SessionError::network(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Fixed content, or a fixed failure
#[derive(Debug, Clone)]
pub struct StaticContentSource {
    result: Result<String, String>,
}

impl StaticContentSource {
    /// Source that always yields `text`
    #[must_use]
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            result: Ok(text.into()),
        }
    }

    /// Source that always fails with `message`
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: Err(message.into()),
        }
    }
}

#[async_trait]
impl ContentSource for StaticContentSource {
    async fn fetch(&self) -> Result<String, SessionError> {
        self.result.clone().map_err(SessionError::NetworkFetchFailed)
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}
