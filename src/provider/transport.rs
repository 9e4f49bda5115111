// src/provider/transport.rs — Outbound HTTP for provider calls

use std::time::Duration;

use async_trait::async_trait;

use super::ProviderRequest;
use crate::infra::errors::ProviderError;

/// Posts a provider request and returns the decoded JSON body of a 2xx
/// response. Everything else maps onto a `ProviderError`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(
        &self,
        endpoint: &str,
        request: &ProviderRequest,
        timeout: Duration,
    ) -> Result<serde_json::Value, ProviderError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        request: &ProviderRequest,
        timeout: Duration,
    ) -> Result<serde_json::Value, ProviderError> {
        let mut builder = self
            .client
            .post(endpoint)
            .timeout(timeout)
            .header("content-type", "application/json")
            .json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| map_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate(&body, 512),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(timeout)
                } else {
                    ProviderError::malformed(format!("Failed to parse response: {e}"))
                }
            })
    }
}

fn map_reqwest(e: reqwest::Error, timeout: Duration) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::Transport(e.to_string())
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_untouched() {
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_long() {
        let long = "é".repeat(20);
        let out = truncate(&long, 5);
        assert_eq!(out.chars().count(), 6);
        assert!(out.ends_with('…'));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) on localhost is essentially never listening.
        let transport = ReqwestTransport::new();
        let request = ProviderRequest::new(serde_json::json!({ "scenario": "x" }));
        let err = transport
            .post_json("http://127.0.0.1:9/analyze", &request, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Transport(_) | ProviderError::Timeout(_)
        ));
    }
}
