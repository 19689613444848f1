//! HTTP client for roster crawling with retry and error handling
//!
//! One client is built per run and shared by reference with every extractor.
//! Requests are sequential; the retry policy is injected from configuration.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::config::HttpConfig;
use super::fetcher::{FetchError, FetchResult, Fetcher, decode_json};
use super::retry_policy::RetryPolicy;

/// HTTP client with bounded retries and fixed backoff
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn with_config(config: &HttpConfig) -> FetchResult<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            client,
            retry: config.retry.clone(),
        })
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Single attempt: send, check status, read body
    async fn attempt(&self, url: &str, params: &[(&str, &str)]) -> FetchResult<String> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }

    /// Runs `operation` under the retry policy; every failure is retried alike
    async fn with_retry<T, F, Fut>(&self, url: &str, mut operation: F) -> FetchResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FetchResult<T>>,
    {
        let mut attempt_index = 0;
        loop {
            debug!("Fetching URL: {} (attempt {})", url, attempt_index + 1);
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if self.retry.has_attempt_after(attempt_index) => {
                    let delay = self.retry.delay_for(attempt_index);
                    warn!(
                        "🔄 Attempt {}/{} failed for {}: {} - retrying in {:?}",
                        attempt_index + 1,
                        self.retry.max_attempts,
                        url,
                        error,
                        delay
                    );
                    sleep(delay).await;
                    attempt_index += 1;
                }
                Err(error) => {
                    return Err(FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt_index + 1,
                        last: Box::new(error),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch_text(&self, url: &str, params: &[(&str, &str)]) -> FetchResult<String> {
        let body = self.with_retry(url, || self.attempt(url, params)).await?;
        debug!("Successfully fetched: {} ({} chars)", url, body.len());
        Ok(body)
    }

    /// Decodes inside each attempt
    async fn fetch_json(&self, url: &str, params: &[(&str, &str)]) -> FetchResult<Value> {
        self.with_retry(url, || async {
            let body = self.attempt(url, params).await?;
            decode_json(url, &body)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_config(max_attempts: u32) -> HttpConfig {
        HttpConfig {
            retry: RetryPolicy::immediate(max_attempts),
            ..HttpConfig::default()
        }
    }

    #[tokio::test]
    async fn test_http_client_creation() {
        let client = HttpClient::with_config(&HttpConfig::default());
        assert!(client.is_ok());
        assert_eq!(client.unwrap().retry_policy().max_attempts, 3);
    }

    #[tokio::test]
    async fn failing_server_is_hit_max_attempts_times() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/talents")
            .with_status(500)
            .expect(3)
            .create_async()
            .await;

        let client = HttpClient::with_config(&test_config(3)).unwrap();
        let url = format!("{}/talents", server.url());
        let error = client.fetch_text(&url, &[]).await.unwrap_err();

        match error {
            FetchError::RetriesExhausted { attempts, last, .. } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, FetchError::Status { status: 500, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_errors_are_retried_like_any_other_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/gone")
            .with_status(404)
            .expect(2)
            .create_async()
            .await;

        let client = HttpClient::with_config(&test_config(2)).unwrap();
        let result = client.fetch_text(&format!("{}/gone", server.url()), &[]).await;
        assert!(result.is_err());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn query_parameters_are_sent_and_json_decoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("action".into(), "parse".into()),
                Matcher::UrlEncoded("page".into(), "VSPO!".into()),
                Matcher::UrlEncoded("prop".into(), "text".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"parse":{"text":{"*":"<p>hi</p>"}}}"#)
            .create_async()
            .await;

        let client = HttpClient::with_config(&test_config(1)).unwrap();
        let value = client
            .fetch_json(
                &format!("{}/api.php", server.url()),
                &[("action", "parse"), ("page", "VSPO!"), ("prop", "text")],
            )
            .await
            .unwrap();

        assert_eq!(value["parse"]["text"]["*"], "<p>hi</p>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_json_body_is_retried_then_reported_as_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api.php")
            .with_status(200)
            .with_body("<html>challenge</html>")
            .expect(3)
            .create_async()
            .await;

        let client = HttpClient::with_config(&test_config(3)).unwrap();
        let error = client
            .fetch_json(&format!("{}/api.php", server.url()), &[])
            .await
            .unwrap_err();

        match error {
            FetchError::RetriesExhausted { attempts, last, .. } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, FetchError::Decode { .. }));
                assert!(last.url().unwrap().ends_with("/api.php"));
            }
            other => panic!("unexpected error: {other}"),
        }
        mock.assert_async().await;
    }
}
