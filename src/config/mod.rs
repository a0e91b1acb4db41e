use crate::core::error::ChatError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1/models";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Groq,
    Gemini,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Groq, Provider::Gemini];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Some(Provider::Groq),
            "gemini" => Some(Provider::Gemini),
            _ => None,
        }
    }

    /// Identifier used in the config file and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Groq => "Groq",
            Provider::Gemini => "Google Gemini",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Groq => "meta-llama/llama-4-scout-17b-16e-instruct",
            Provider::Gemini => "gemini-1.5-flash",
        }
    }

    /// Gemini puts the model in the URL path; Groq takes it in the body.
    pub fn default_endpoint(&self, model: &str) -> String {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1/chat/completions".to_string(),
            Provider::Gemini => format!("{}/{}:generateContent", GEMINI_BASE_URL, model),
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn placeholder_key(&self) -> &'static str {
        match self {
            Provider::Groq => "YOUR_GROQ_API_KEY_HERE",
            Provider::Gemini => "YOUR_GEMINI_API_KEY_HERE",
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Groq
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn is_placeholder(key: &str) -> bool {
    key.starts_with("YOUR_") && key.ends_with("_HERE")
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredentials {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

impl ProviderCredentials {
    /// The key, unless it is absent, blank, or still the template placeholder.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !is_placeholder(key))
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn model_for(&self, provider: Provider) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string())
    }

    pub fn endpoint_for(&self, provider: Provider) -> String {
        self.endpoint
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| provider.default_endpoint(&self.model_for(provider)))
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    pub active_provider: Option<Provider>,
    #[serde(default)]
    pub providers: BTreeMap<Provider, ProviderCredentials>,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".duochat")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    /// Config with placeholder keys for every provider, written on first run.
    pub fn template() -> Config {
        let providers = Provider::ALL
            .iter()
            .map(|p| {
                (
                    *p,
                    ProviderCredentials {
                        api_key: Some(p.placeholder_key().to_string()),
                        endpoint: None,
                        model: None,
                    },
                )
            })
            .collect();

        Config {
            active_provider: Some(Provider::default()),
            providers,
        }
    }

    pub fn load() -> Result<Config, ChatError> {
        let config = Self::load_from(&Self::config_path())?;
        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Config, ChatError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| ChatError::Config(format!("Parse {}: {}", path.display(), e)))?;
            debug!(path = %path.display(), "Loaded config");
            return Ok(config);
        }

        let config = Self::template();
        config.save_to(path)?;
        info!(path = %path.display(), "Wrote config template");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ChatError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// Non-empty values from `lookup` replace the file's API keys.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        for provider in Provider::ALL {
            if let Some(key) = lookup(provider.env_var()).filter(|k| !k.trim().is_empty()) {
                debug!(provider = provider.id(), "API key taken from environment");
                self.providers.entry(provider).or_default().api_key = Some(key);
            }
        }
        self
    }

    pub fn credentials(&self, provider: Provider) -> ProviderCredentials {
        self.providers.get(&provider).cloned().unwrap_or_default()
    }

    pub fn active_provider(&self) -> Provider {
        self.active_provider.unwrap_or_default()
    }
}
