//! Issues provider requests off the caller's task and hands back the reply
//! through a one-shot channel.

use crate::config::{Config, Provider};
use crate::core::error::{ChatError, DispatchError};
use crate::providers::factory::ProviderFactory;
use crate::providers::{LLMProvider, Reply};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct Dispatcher {
    backends: HashMap<Provider, Arc<dyn LLMProvider>>,
    shutdown: CancellationToken,
}

impl Dispatcher {
    pub fn new(backends: HashMap<Provider, Arc<dyn LLMProvider>>) -> Self {
        Self {
            backends,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ChatError> {
        let backends = ProviderFactory::new().create_all(config)?;
        Ok(Self::new(backends))
    }

    /// Starts one request to `provider`. Must be called inside a tokio runtime.
    ///
    /// The caller is responsible for keeping at most one request outstanding.
    pub fn send(&self, text: String, provider: Provider) -> PendingReply {
        let (tx, rx) = oneshot::channel();
        let cancel = self.shutdown.child_token();
        let backend = self.backends.get(&provider).cloned();

        debug!(provider = provider.id(), chars = text.chars().count(), "Dispatching request");

        let token = cancel.clone();
        tokio::spawn(async move {
            let reply = match backend {
                Some(backend) => tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(DispatchError::Cancelled),
                    reply = backend.get_response(&text) => reply,
                },
                None => Err(DispatchError::MissingCredential { provider }),
            };

            if let Err(err) = &reply {
                debug!(provider = provider.id(), error = %err, "Request failed");
            }

            if tx.send(reply).is_err() {
                debug!(provider = provider.id(), "Reply receiver dropped");
            }
        });

        PendingReply {
            provider,
            rx,
            cancel,
        }
    }

    /// Cancels every outstanding request, and any sent afterwards.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Handle to a request in flight. Resolves exactly once.
pub struct PendingReply {
    provider: Provider,
    rx: oneshot::Receiver<Reply>,
    cancel: CancellationToken,
}

impl PendingReply {
    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub async fn wait(self) -> Reply {
        self.rx.await.unwrap_or_else(|_| {
            Err(DispatchError::Transport(
                "request task ended without a reply".to_string(),
            ))
        })
    }
}
