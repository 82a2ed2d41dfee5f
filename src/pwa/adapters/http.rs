//! HTTP adapter for the push subscription API.

use crate::pwa::{
    domain::PushSubscription,
    ports::{PushApiError, PushApiResult, PushSubscriptionApi},
};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const SUBSCRIBE_PATH: &str = "/api/push/subscribe";
const UNSUBSCRIBE_PATH: &str = "/api/push/unsubscribe";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize)]
struct UnsubscribeRequest<'a> {
    endpoint: &'a str,
}

/// Posts push subscriptions to the LETZ backend as JSON.
#[derive(Debug, Clone)]
pub struct HttpPushSubscriptionApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPushSubscriptionApi {
    /// Creates an adapter for the API at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(client, base_url)
    }

    /// Creates an adapter reusing an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        Self {
            client,
            base_url: base.trim_end_matches('/').to_owned(),
        }
    }

    /// Returns the absolute URL for an API path.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json(&self, path: &str, body: &(impl Serialize + Sync)) -> PushApiResult<()> {
        let url = self.endpoint_url(path);
        let response = self
            .client
            .post(url.as_str())
            .json(body)
            .send()
            .await
            .map_err(PushApiError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PushApiError::Status {
                status: status.as_u16(),
            });
        }
        debug!(%url, status = status.as_u16(), "push API request accepted");
        Ok(())
    }
}

#[async_trait]
impl PushSubscriptionApi for HttpPushSubscriptionApi {
    async fn register(&self, subscription: &PushSubscription) -> PushApiResult<()> {
        self.post_json(SUBSCRIBE_PATH, subscription).await
    }

    async fn unregister(&self, endpoint: &str) -> PushApiResult<()> {
        self.post_json(UNSUBSCRIBE_PATH, &UnsubscribeRequest { endpoint })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080/api/push/subscribe")]
    #[case("https://api.letz.example/", "https://api.letz.example/api/push/subscribe")]
    fn endpoint_urls_join_base_and_path(#[case] base: &str, #[case] expected: &str) {
        let api = HttpPushSubscriptionApi::new(base);

        assert_eq!(api.endpoint_url(SUBSCRIBE_PATH), expected);
    }

    #[test]
    fn unsubscribe_body_carries_endpoint() {
        let body = serde_json::to_value(UnsubscribeRequest {
            endpoint: "https://push.letz.test/abc",
        })
        .expect("serialises");

        assert_eq!(body, serde_json::json!({"endpoint": "https://push.letz.test/abc"}));
    }
}
