use crate::config::Provider;
use crate::core::error::DispatchError;
use crate::providers::base_client::HttpClient;
use crate::providers::gemini::types::*;
use crate::providers::{MAX_OUTPUT_TOKENS, Reply, TEMPERATURE, parse_body};
use serde::Deserialize;
use tracing::debug;

/// Decodes a generateContent body into the first candidate's first part.
///
/// Other candidates and parts may carry non-text payloads and are skipped.
pub fn normalize(body: &str) -> Reply {
    let provider = Provider::Gemini;
    let value = parse_body(provider, body)?;

    value
        .pointer("/candidates/0/content/parts/0")
        .and_then(|node| GeminiPart::deserialize(node).ok())
        .map(|part| part.text.trim().to_string())
        .ok_or(DispatchError::InvalidFormat { provider })
}

#[derive(Clone)]
pub struct GeminiClient {
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        let mut client = HttpClient::new(endpoint, None, None);

        // Gemini authenticates through the query string
        client.add_query_param("key", api_key);

        Self { client }
    }

    pub async fn generate_content(&self, prompt: &str) -> Reply {
        debug!(endpoint = %self.client.endpoint(), "Sending Gemini request");
        let body = self.client.post(&build_payload(prompt)).await?;
        normalize(&body)
    }
}

pub(super) fn build_payload(prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContentPart {
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        },
    }
}
