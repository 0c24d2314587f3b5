//! HTTP access to the EDGAR archive

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::HttpConfig;
use crate::errors::EdgarError;

/// Source of documents by URL. The pipeline only ever needs the body text.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String, EdgarError>;
}

/// reqwest-backed fetcher that sends the identifying User-Agent on every request
pub struct EdgarClient {
    client: Client,
}

impl EdgarClient {
    pub fn new(http: &HttpConfig) -> Result<Self, EdgarError> {
        let mut builder = Client::builder().user_agent(http.user_agent.as_str());
        if let Some(timeout) = http.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

/// 4xx and 5xx fail a fetch; redirects reqwest did not follow are passed through.
fn is_failure(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

#[async_trait]
impl Fetch for EdgarClient {
    async fn get_text(&self, url: &str) -> Result<String, EdgarError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xml,text/xml,*/*")
            .send()
            .await?;

        let status = response.status();
        if is_failure(status) {
            return Err(EdgarError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_client_and_server_errors_fail() {
        assert!(!is_failure(StatusCode::OK));
        assert!(!is_failure(StatusCode::MULTIPLE_CHOICES));
        assert!(!is_failure(StatusCode::NOT_MODIFIED));
        assert!(is_failure(StatusCode::NOT_FOUND));
        assert!(is_failure(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_failure(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn test_client_builds_with_and_without_timeout() {
        assert!(EdgarClient::new(&HttpConfig::default()).is_ok());

        let http = HttpConfig {
            timeout_seconds: Some(5),
            ..HttpConfig::default()
        };
        assert!(EdgarClient::new(&http).is_ok());
    }
}
