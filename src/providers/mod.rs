use crate::config::Provider;
use crate::core::error::DispatchError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

pub mod base_client;
pub mod factory;
pub mod gemini;
pub mod groq;

/// Upper bound on generated tokens, sent to every provider
pub const MAX_OUTPUT_TOKENS: u32 = 1000;
pub const TEMPERATURE: f32 = 0.7;

/// Outcome of one request: trimmed reply text or the reason there is none.
pub type Reply = Result<String, DispatchError>;

/// Text shown in the transcript for a reply. Errors carry a warning glyph.
pub fn reply_text(reply: &Reply) -> String {
    match reply {
        Ok(text) => text.clone(),
        Err(err) => format!("⚠️ {}", err),
    }
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Parses `body` as JSON and surfaces a top-level `error.message` if present.
///
/// Both providers share this error shape, and it takes precedence over the
/// success path.
pub(crate) fn parse_body(provider: Provider, body: &str) -> Result<Value, DispatchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|_| DispatchError::MalformedBody { provider })?;

    if let Ok(envelope) = ApiErrorEnvelope::deserialize(&value) {
        return Err(DispatchError::Api {
            provider,
            message: envelope.error.message,
        });
    }

    Ok(value)
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    fn provider(&self) -> Provider;

    /// Sends `prompt` as a single user turn and normalizes the reply.
    async fn get_response(&self, prompt: &str) -> Reply;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_replies_get_a_warning_prefix() {
        let reply: Reply = Err(DispatchError::InvalidFormat {
            provider: Provider::Groq,
        });
        assert_eq!(reply_text(&reply), "⚠️ Error: Invalid Groq response format");
        assert_eq!(reply_text(&Ok("hi".to_string())), "hi");
    }

    #[test]
    fn error_object_wins_over_success_fields() {
        let body = r#"{"error":{"message":"bad key","code":401},"choices":[]}"#;
        let err = parse_body(Provider::Groq, body).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Api {
                provider: Provider::Groq,
                message: "bad key".to_string()
            }
        );
    }

    #[test]
    fn error_without_message_is_not_an_api_error() {
        let value = parse_body(Provider::Gemini, r#"{"error":{"code":500}}"#).unwrap();
        assert!(value.get("error").is_some());
    }

    #[test]
    fn non_json_is_malformed() {
        assert_eq!(
            parse_body(Provider::Gemini, "<html>502</html>").unwrap_err(),
            DispatchError::MalformedBody {
                provider: Provider::Gemini
            }
        );
        assert!(parse_body(Provider::Groq, "").is_err());
    }
}
