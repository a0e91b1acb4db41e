use super::ChatState;
use crate::config::Provider;
use crate::core::error::ChatError;
use crate::display;

use console::style;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ClearCommand;
pub struct ProviderCommand;
pub struct ProvidersCommand;
pub struct HistoryCommand;

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = [
            title.to_string(),
            QuitCommand.help().to_string(),
            HelpCommand.help().to_string(),
            ClearCommand.help().to_string(),
            ProviderCommand.help().to_string(),
            ProvidersCommand.help().to_string(),
            HistoryCommand.help().to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.session.conversation.clear();
        Ok(Some("Conversation cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear - Remove every message from the conversation"
    }
}

impl CommandHandler for ProviderCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let Some(name) = args.first() else {
            return Ok(Some(format!(
                "Current provider: {}",
                state.session.conversation.provider()
            )));
        };

        let Some(provider) = Provider::from_str(name) else {
            return Ok(Some(format!(
                "Unknown provider '{}'. Use: {}",
                name,
                provider_ids()
            )));
        };

        state.session.conversation.set_provider(provider);

        if state.config.credentials(provider).is_configured() {
            Ok(Some(format!("Provider changed to: {}", provider)))
        } else {
            Ok(Some(format!(
                "Provider changed to: {} (no API key configured, set {} or edit {})",
                provider,
                provider.env_var(),
                crate::config::Config::config_path().display()
            )))
        }
    }

    fn help(&self) -> &'static str {
        "/provider <name> - Show or change the active provider (groq/gemini)"
    }
}

impl CommandHandler for ProvidersCommand {
    fn execute(
        &self,
        state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let active = state.session.conversation.provider();
        let lines: Vec<String> = Provider::ALL
            .iter()
            .map(|provider| {
                let marker = if *provider == active { "*" } else { " " };
                let status = if state.config.credentials(*provider).is_configured() {
                    style("configured").green()
                } else {
                    style("no API key").yellow()
                };
                format!(
                    "{} {:<8} {:<14} {}",
                    marker,
                    provider.id(),
                    provider.display_name(),
                    status
                )
            })
            .collect();

        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/providers - List providers and whether they have an API key"
    }
}

impl CommandHandler for HistoryCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        let messages = state.session.conversation.messages();
        if messages.is_empty() {
            return Ok(Some("No messages yet.".to_string()));
        }

        for message in messages {
            display::display_message(message);
        }
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/history - Show the conversation so far"
    }
}

fn provider_ids() -> String {
    Provider::ALL
        .iter()
        .map(|p| p.id())
        .collect::<Vec<_>>()
        .join(", ")
}
