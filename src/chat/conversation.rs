use crate::config::Provider;
use crate::core::error::ChatError;
use crate::providers::{Reply, reply_text};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: Uuid,
    text: String,
    origin: Origin,
}

impl Message {
    fn new(text: String, origin: Origin) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            origin,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

/// A request the conversation has committed to sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub text: String,
    pub provider: Provider,
}

/// Message log of one chat plus the flag that gates sending.
///
/// `awaiting_response` is true exactly while one request is outstanding.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    awaiting_response: bool,
    draft: String,
    provider: Provider,
}

impl Conversation {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Takes effect on the next submit; a request already in flight keeps its provider.
    pub fn set_provider(&mut self, provider: Provider) {
        self.provider = provider;
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.awaiting_response && !self.draft.trim().is_empty()
    }

    /// Moves the draft into the log as a user message and marks the
    /// conversation busy. The draft is left alone when rejected.
    pub fn submit(&mut self) -> Result<Outgoing, ChatError> {
        if self.awaiting_response {
            return Err(ChatError::Busy);
        }

        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let message = Message::new(text.clone(), Origin::User);
        debug!(id = %message.id, provider = self.provider.id(), "User message appended");
        self.messages.push(message);
        self.draft.clear();
        self.awaiting_response = true;

        Ok(Outgoing {
            text,
            provider: self.provider,
        })
    }

    /// Appends the reply as an assistant message and clears the busy flag.
    ///
    /// A reply with no request outstanding is dropped and `None` returned.
    pub fn complete(&mut self, reply: Reply) -> Option<&Message> {
        if !self.awaiting_response {
            warn!("Ignoring reply with no request outstanding");
            return None;
        }

        let message = Message::new(reply_text(&reply), Origin::Assistant);
        debug!(id = %message.id, ok = reply.is_ok(), "Assistant message appended");
        self.messages.push(message);
        self.awaiting_response = false;

        self.messages.last()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DispatchError;

    #[test]
    fn submit_appends_user_message_and_goes_busy() {
        let mut conversation = Conversation::new(Provider::Groq);
        conversation.set_draft("  Hello \n");

        let outgoing = conversation.submit().unwrap();

        assert_eq!(
            outgoing,
            Outgoing {
                text: "Hello".to_string(),
                provider: Provider::Groq
            }
        );
        assert!(conversation.is_awaiting_response());
        assert_eq!(conversation.draft(), "");
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].origin(), Origin::User);
        assert_eq!(conversation.messages()[0].text(), "Hello");
    }

    #[test]
    fn second_submit_is_rejected_while_busy() {
        let mut conversation = Conversation::new(Provider::Groq);
        conversation.set_draft("one");
        conversation.submit().unwrap();

        conversation.set_draft("two");
        assert!(!conversation.can_submit());
        assert!(matches!(conversation.submit(), Err(ChatError::Busy)));
        assert_eq!(conversation.draft(), "two");
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn blank_draft_is_rejected() {
        let mut conversation = Conversation::new(Provider::Gemini);
        conversation.set_draft(" \t\n");
        assert!(matches!(conversation.submit(), Err(ChatError::EmptyInput)));
        assert!(!conversation.is_awaiting_response());
        assert!(conversation.messages().is_empty());
    }

    #[test]
    fn completion_appends_assistant_message_and_clears_busy() {
        let mut conversation = Conversation::new(Provider::Groq);
        conversation.set_draft("Hello");
        conversation.submit().unwrap();

        let reply = conversation.complete(Ok("Hi there!".to_string())).unwrap().clone();

        assert_eq!(reply.origin(), Origin::Assistant);
        assert_eq!(reply.text(), "Hi there!");
        assert!(!conversation.is_awaiting_response());

        conversation.set_draft("again");
        assert!(conversation.submit().is_ok());
    }

    #[test]
    fn error_replies_are_assistant_messages_too() {
        let mut conversation = Conversation::new(Provider::Groq);
        conversation.set_draft("Hello");
        conversation.submit().unwrap();

        let message = conversation
            .complete(Err(DispatchError::Transport("Connection failed: refused".to_string())))
            .unwrap()
            .clone();

        assert_eq!(message.origin(), Origin::Assistant);
        assert_eq!(message.text(), "⚠️ Network Error: Connection failed: refused");
        assert!(!conversation.is_awaiting_response());
    }

    #[test]
    fn clear_keeps_busy_flag() {
        let mut conversation = Conversation::new(Provider::Groq);
        conversation.set_draft("Hello");
        conversation.submit().unwrap();

        conversation.clear();
        assert!(conversation.messages().is_empty());
        assert!(conversation.is_awaiting_response());

        conversation.complete(Ok("late".to_string()));
        conversation.clear();
        assert!(conversation.messages().is_empty());
        assert!(!conversation.is_awaiting_response());
    }

    #[test]
    fn provider_switch_only_affects_next_submit() {
        let mut conversation = Conversation::new(Provider::Groq);
        conversation.set_draft("first");
        let first = conversation.submit().unwrap();

        conversation.set_provider(Provider::Gemini);
        conversation.complete(Ok("reply".to_string()));
        let before: Vec<Message> = conversation.messages().to_vec();

        conversation.set_draft("second");
        let second = conversation.submit().unwrap();

        assert_eq!(first.provider, Provider::Groq);
        assert_eq!(second.provider, Provider::Gemini);
        assert_eq!(&conversation.messages()[..2], before.as_slice());
    }

    #[test]
    fn stray_reply_is_ignored() {
        let mut conversation = Conversation::new(Provider::Groq);
        assert!(conversation.complete(Ok("unsolicited".to_string())).is_none());
        assert!(conversation.messages().is_empty());

        conversation.set_draft("Hello");
        conversation.submit().unwrap();
        assert!(conversation.complete(Ok("Hi".to_string())).is_some());
        assert!(conversation.complete(Ok("duplicate".to_string())).is_none());
        assert_eq!(conversation.messages().len(), 2);
        assert!(!conversation.is_awaiting_response());
    }

    #[test]
    fn message_ids_are_unique() {
        let mut conversation = Conversation::new(Provider::Groq);
        for text in ["a", "b"] {
            conversation.set_draft(text);
            conversation.submit().unwrap();
            conversation.complete(Ok(text.to_string()));
        }

        let mut ids: Vec<Uuid> = conversation.messages().iter().map(Message::id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
