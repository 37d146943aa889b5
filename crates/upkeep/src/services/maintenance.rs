use std::{ops::Deref, pin::Pin, sync::Arc};

type DynMaintenanceClient = Arc<dyn traits::MaintenanceClient + Send + Sync + 'static>;

/// Handle to the maintenance API of the target service.
pub struct MaintenanceClient(DynMaintenanceClient);

impl MaintenanceClient {
    pub fn new(config: &Config) -> Self {
        Self(Arc::new(DefaultMaintenanceClient::new(config)))
    }

    #[cfg(test)]
    pub fn from_inner(inner: DynMaintenanceClient) -> Self {
        Self(inner)
    }
}

impl Deref for MaintenanceClient {
    type Target = DynMaintenanceClient;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct DefaultMaintenanceClient {
    base_url: String,
    token: String,
}

impl DefaultMaintenanceClient {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token: config.secret_token.clone(),
        }
    }

    async fn call_endpoint(&self, endpoint: &str) -> anyhow::Result<serde_json::Value> {
        let client = reqwest::Client::new();

        let url = format!("{}/api/cron/{}", self.base_url, endpoint);

        tracing::trace!("calling url: {}", &url);

        let response = client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("X-Cron-Token", &self.token)
            .send()
            .await?;

        if let Err(e) = response.error_for_status_ref() {
            if let Ok(body) = response.text().await {
                anyhow::bail!("{} request failed: {}, body: {}", endpoint, e, body);
            }

            anyhow::bail!("{} request failed: {}", endpoint, e)
        }

        let data = response.json::<serde_json::Value>().await?;

        Ok(data)
    }
}

impl traits::MaintenanceClient for DefaultMaintenanceClient {
    fn trigger<'a>(
        &'a self,
        endpoint: &'a str,
    ) -> Pin<Box<dyn futures::prelude::Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            match self.call_endpoint(endpoint).await {
                Ok(data) => tracing::info!("{} response: {}", endpoint, data),
                Err(e) => tracing::error!("error calling {}: {}", endpoint, e),
            }
        })
    }
}

mod extensions;
pub mod traits;

pub use extensions::*;

use crate::config::Config;

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::traits::MaintenanceClient as _;
    use super::*;

    fn test_config(base_url: &str) -> Config {
        Config {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_token: "abc123".to_string(),
        }
    }

    #[tokio::test]
    async fn posts_with_token_and_parses_the_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/cron/cleanup-files"))
            .and(header("X-Cron-Token", "abc123"))
            .and(header("Content-Type", "application/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "deleted": 4 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = DefaultMaintenanceClient::new(&test_config(&server.uri()));

        let data = client
            .call_endpoint("cleanup-files")
            .await
            .expect("call should succeed");
        assert_eq!(data, serde_json::json!({ "deleted": 4 }));
    }

    #[tokio::test]
    async fn non_2xx_is_an_error_naming_the_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/cron/check-subscriptions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let client = DefaultMaintenanceClient::new(&test_config(&server.uri()));

        let err = client
            .call_endpoint("check-subscriptions")
            .await
            .expect_err("call should fail");
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/cron/cleanup-files"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = DefaultMaintenanceClient::new(&test_config(&server.uri()));

        assert!(client.call_endpoint("cleanup-files").await.is_err());
    }

    #[tokio::test]
    async fn a_failed_call_does_not_stop_later_ones() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/cron/cleanup-files"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/cron/check-subscriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .mount(&server)
            .await;

        let client = MaintenanceClient::new(&test_config(&server.uri()));

        client.trigger("cleanup-files").await;
        client.trigger("check-subscriptions").await;

        let requests = server
            .received_requests()
            .await
            .expect("requests should be recorded");
        assert_eq!(requests.len(), 2);
    }
}
