use crate::core::error::DispatchError;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Minimal JSON-over-POST client shared by the providers.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    endpoint: String,
    auth_header: Option<(String, String)>,
    query_params: Vec<(String, String)>,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        endpoint: String,
        auth_header: Option<(String, String)>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            auth_header,
            query_params: Vec::new(),
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    pub fn add_query_param(&mut self, key: &str, value: String) {
        self.query_params.push((key.to_string(), value));
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POSTs `payload` and returns the raw body whatever the status code.
    ///
    /// Providers report failures inside the body, so status is only logged.
    pub async fn post<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, DispatchError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json");

        if !self.query_params.is_empty() {
            request = request.query(&self.query_params);
        }

        if let Some((name, value)) = &self.auth_header {
            request = request.header(name, value);
        }

        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request
            .json(payload)
            .send()
            .await
            .map_err(DispatchError::transport)?;

        debug!(endpoint = %self.endpoint, status = %response.status(), "Received response");

        response.text().await.map_err(DispatchError::transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn sends_headers_query_and_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/generate")
                    .query_param("key", "secret")
                    .header("content-type", "application/json")
                    .header("x-extra", "1")
                    .json_body(json!({"hello": "world"}));
                then.status(200).body("ok");
            })
            .await;

        let mut extra = HashMap::new();
        extra.insert("x-extra".to_string(), "1".to_string());
        let mut client = HttpClient::new(server.url("/generate"), None, Some(extra));
        client.add_query_param("key", "secret".to_string());

        let body = client.post(&json!({"hello": "world"})).await.unwrap();
        assert_eq!(body, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_still_returns_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1");
                then.status(429).body(r#"{"error":{"message":"slow down"}}"#);
            })
            .await;

        let client = HttpClient::new(server.url("/v1"), None, None);
        let body = client.post(&json!({})).await.unwrap();
        assert!(body.contains("slow down"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = HttpClient::new("http://127.0.0.1:1/nothing".to_string(), None, None);
        let err = client.post(&json!({})).await.unwrap_err();
        assert!(matches!(err, DispatchError::Transport(_)));
        assert!(err.to_string().starts_with("Network Error:"));
    }
}
