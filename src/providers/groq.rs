use crate::config::{Provider, ProviderCredentials};
use crate::core::error::DispatchError;
use crate::providers::base_client::HttpClient;
use crate::providers::{LLMProvider, MAX_OUTPUT_TOKENS, Reply, TEMPERATURE, parse_body};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

/// Decodes a chat-completions body into the first choice's content.
///
/// Only `choices[0].message` is decoded; later choices are never looked at.
pub fn normalize(body: &str) -> Reply {
    let provider = Provider::Groq;
    let value = parse_body(provider, body)?;

    value
        .pointer("/choices/0/message")
        .and_then(|node| MessageContent::deserialize(node).ok())
        .map(|message| message.content.trim().to_string())
        .ok_or(DispatchError::InvalidFormat { provider })
}

/// Llama served from Groq's OpenAI-compatible endpoint
#[derive(Clone)]
pub struct GroqProvider {
    client: HttpClient,
    api_key: Option<String>,
    model: String,
}

impl GroqProvider {
    pub fn new(credentials: &ProviderCredentials) -> Self {
        let api_key = credentials.api_key().map(str::to_string);
        let auth_header = api_key
            .as_ref()
            .map(|key| ("Authorization".to_string(), format!("Bearer {}", key)));

        Self {
            client: HttpClient::new(
                credentials.endpoint_for(Provider::Groq),
                auth_header,
                None,
            ),
            api_key,
            model: credentials.model_for(Provider::Groq),
        }
    }

    fn build_payload<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatCompletionMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
impl LLMProvider for GroqProvider {
    fn provider(&self) -> Provider {
        Provider::Groq
    }

    async fn get_response(&self, prompt: &str) -> Reply {
        if self.api_key.is_none() {
            return Err(DispatchError::MissingCredential {
                provider: Provider::Groq,
            });
        }

        debug!(model = %self.model, endpoint = %self.client.endpoint(), "Sending Groq request");
        let body = self.client.post(&self.build_payload(prompt)).await?;
        normalize(&body)
    }
}
