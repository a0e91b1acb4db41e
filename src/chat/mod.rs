pub mod conversation;
pub mod dispatcher;

pub use conversation::{Conversation, Message, Origin};
pub use dispatcher::{Dispatcher, PendingReply};

use crate::config::Provider;
use crate::core::error::ChatError;
use crate::providers::Reply;

/// One conversation bound to the dispatcher that answers it.
///
/// The session is owned by a single task; replies come back through
/// [`PendingReply`] and are applied by that same task.
pub struct ChatSession {
    pub conversation: Conversation,
    dispatcher: Dispatcher,
}

impl ChatSession {
    pub fn new(dispatcher: Dispatcher, provider: Provider) -> Self {
        Self {
            conversation: Conversation::new(provider),
            dispatcher,
        }
    }

    pub fn submit(&mut self, text: &str) -> Result<PendingReply, ChatError> {
        if self.conversation.is_awaiting_response() {
            return Err(ChatError::Busy);
        }
        self.conversation.set_draft(text);
        let outgoing = self.conversation.submit()?;
        Ok(self.dispatcher.send(outgoing.text, outgoing.provider))
    }

    pub fn complete(&mut self, reply: Reply) -> Option<&Message> {
        self.conversation.complete(reply)
    }

    /// Submits `text` and waits for the reply, applying both to the log.
    pub async fn exchange(&mut self, text: &str) -> Result<&Message, ChatError> {
        let pending = self.submit(text)?;
        let reply = pending.wait().await;
        self.complete(reply).ok_or_else(|| {
            ChatError::Unknown("reply arrived with no request outstanding".to_string())
        })
    }

    pub fn shutdown(&self) {
        self.dispatcher.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ProviderCredentials};
    use httpmock::prelude::*;

    fn session(provider: Provider, key: &str, endpoint: String) -> ChatSession {
        let mut config = Config::default();
        config.providers.insert(
            provider,
            ProviderCredentials {
                api_key: Some(key.to_string()),
                endpoint: Some(endpoint),
                model: None,
            },
        );
        ChatSession::new(Dispatcher::from_config(&config).unwrap(), provider)
    }

    #[tokio::test]
    async fn groq_success_is_trimmed_into_the_transcript() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/openai/v1/chat/completions")
                    .header("authorization", "Bearer valid-key");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"choices":[{"message":{"content":" Hi there! "}}]}"#);
            })
            .await;

        let mut session = session(
            Provider::Groq,
            "valid-key",
            server.url("/openai/v1/chat/completions"),
        );

        let pending = session.submit("Hello").unwrap();
        assert!(session.conversation.is_awaiting_response());
        assert_eq!(session.conversation.messages().len(), 1);
        assert_eq!(session.conversation.messages()[0].origin(), Origin::User);

        let reply = pending.wait().await;
        let message = session.complete(reply).unwrap();
        assert_eq!(message.text(), "Hi there!");
        assert_eq!(message.origin(), Origin::Assistant);
        assert!(!session.conversation.is_awaiting_response());
    }

    #[tokio::test]
    async fn empty_groq_key_never_calls_out() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let mut session = session(Provider::Groq, "", server.url("/chat"));
        let text = session.exchange("Hello").await.unwrap().text().to_string();

        assert_eq!(text, "⚠️ Error: Groq API key not configured");
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn gemini_error_mentions_provider_and_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).query_param("key", "AIza");
                then.status(429)
                    .body(r#"{"error":{"message":"quota exceeded"}}"#);
            })
            .await;

        let mut session = session(Provider::Gemini, "AIza", server.url("/generate"));
        let text = session.exchange("Hello").await.unwrap().text().to_string();

        assert!(text.contains("Google Gemini"));
        assert!(text.contains("quota exceeded"));
        assert!(!session.conversation.is_awaiting_response());
    }

    #[tokio::test]
    async fn busy_session_rejects_second_submit() {
        let mut session = session(Provider::Groq, "", "http://127.0.0.1:1".to_string());

        let pending = session.submit("one").unwrap();
        assert!(matches!(session.submit("two"), Err(ChatError::Busy)));
        assert_eq!(session.conversation.messages().len(), 1);

        let reply = pending.wait().await;
        session.complete(reply);
        assert!(session.submit("three").is_ok());
    }

    #[tokio::test]
    async fn conversation_survives_errors() {
        let mut session = session(
            Provider::Groq,
            "key",
            "http://127.0.0.1:1/chat".to_string(),
        );

        let first = session.exchange("Hello").await.unwrap().text().to_string();
        assert!(first.starts_with("⚠️ Network Error:"));

        session.exchange("Hello again").await.unwrap();
        let origins: Vec<Origin> = session
            .conversation
            .messages()
            .iter()
            .map(Message::origin)
            .collect();
        assert_eq!(
            origins,
            vec![Origin::User, Origin::Assistant, Origin::User, Origin::Assistant]
        );
    }
}
