use crate::config::{Config, Provider, ProviderCredentials};
use crate::core::error::ChatError;
use crate::providers::{LLMProvider, gemini::GeminiProvider, groq::GroqProvider};
use std::collections::HashMap;
use std::sync::Arc;

type ProviderCreator = Box<dyn Fn(&ProviderCredentials) -> Arc<dyn LLMProvider> + Send + Sync>;

pub struct ProviderFactory {
    creators: HashMap<Provider, ProviderCreator>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut creators = HashMap::new();

        creators.insert(
            Provider::Groq,
            Box::new(|credentials: &ProviderCredentials| {
                Arc::new(GroqProvider::new(credentials)) as Arc<dyn LLMProvider>
            }) as ProviderCreator,
        );

        creators.insert(
            Provider::Gemini,
            Box::new(|credentials: &ProviderCredentials| {
                Arc::new(GeminiProvider::new(credentials)) as Arc<dyn LLMProvider>
            }) as ProviderCreator,
        );

        Self { creators }
    }

    pub fn create(
        &self,
        provider: Provider,
        credentials: &ProviderCredentials,
    ) -> Result<Arc<dyn LLMProvider>, ChatError> {
        self.creators
            .get(&provider)
            .map(|creator| creator(credentials))
            .ok_or_else(|| ChatError::Config(format!("Provider not found: {:?}", provider)))
    }

    /// One backend per known provider, configured or not.
    pub fn create_all(
        &self,
        config: &Config,
    ) -> Result<HashMap<Provider, Arc<dyn LLMProvider>>, ChatError> {
        Provider::ALL
            .iter()
            .map(|provider| {
                self.create(*provider, &config.credentials(*provider))
                    .map(|backend| (*provider, backend))
            })
            .collect()
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_backend_for_every_provider() {
        let backends = ProviderFactory::new()
            .create_all(&Config::template())
            .unwrap();

        assert_eq!(backends.len(), Provider::ALL.len());
        for provider in Provider::ALL {
            assert_eq!(backends[&provider].provider(), provider);
        }
    }
}
