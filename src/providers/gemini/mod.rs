use crate::config::{Provider, ProviderCredentials};
use crate::core::error::DispatchError;
use crate::providers::{LLMProvider, Reply};
use async_trait::async_trait;

mod client;
mod types;

pub use client::normalize;
use client::GeminiClient;

#[derive(Clone)]
pub struct GeminiProvider {
    client: Option<GeminiClient>,
}

impl GeminiProvider {
    /// Without a usable key no client is built and every request short-circuits.
    pub fn new(credentials: &ProviderCredentials) -> Self {
        let client = credentials.api_key().map(|key| {
            GeminiClient::new(credentials.endpoint_for(Provider::Gemini), key.to_string())
        });
        Self { client }
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn get_response(&self, prompt: &str) -> Reply {
        match &self.client {
            Some(client) => client.generate_content(prompt).await,
            None => Err(DispatchError::MissingCredential {
                provider: Provider::Gemini,
            }),
        }
    }
}
