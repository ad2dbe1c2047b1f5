//! [`reqwest`]-backed implementation of [`HttpTransport`].

use reqwest::Client;

use crate::error::{Result, TransportError};
use crate::traits::{HttpResponse, HttpTransport, PollRequest};

/// Long-poll transport on top of a shared [`reqwest::Client`].
///
/// The per-request timeout comes from [`PollRequest::timeout`], so one
/// client can serve sessions with different poll windows.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing client (custom TLS roots, proxies, pooling).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Borrow the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: PollRequest) -> Result<HttpResponse> {
        let mut builder = self.client.get(&request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|err| request_error(&request, err))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout(request.timeout)
            } else {
                TransportError::Body(err.to_string())
            }
        })?;

        tracing::trace!(url = %request.url, status, size = body.len(), "poll response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn request_error(request: &PollRequest, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(request.timeout);
    }
    TransportError::Request {
        url: request.url.clone(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn unreachable_host_maps_to_request_error() {
        let transport = ReqwestTransport::new();
        // Port 9 (discard) on localhost is almost never listening.
        let request = PollRequest::new("http://127.0.0.1:9/lp/0_chat_0", Duration::from_secs(2));

        let err = transport
            .get(request)
            .await
            .expect_err("nothing should be listening");
        assert!(matches!(
            err,
            TransportError::Request { .. } | TransportError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn malformed_url_is_a_request_error() {
        let transport = ReqwestTransport::new();
        let request = PollRequest::new("not a url", Duration::from_secs(1));

        let err = transport.get(request).await.expect_err("url should not parse");
        match err {
            TransportError::Request { url, .. } => assert_eq!(url, "not a url"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
