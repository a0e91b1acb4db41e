use crate::chat::{ChatSession, Dispatcher};
use crate::cli::Args;
use crate::commands::{ChatState, dispatcher::CommandDispatcher};
use crate::config::{Config, Provider};
use crate::core::error::ChatError;
use crate::display;
use crate::input;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use tracing::debug;

pub struct Application {
    pub args: Args,
    pub config: Config,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(args: Args, config: Config, command_dispatcher: CommandDispatcher) -> Self {
        Self {
            args,
            config,
            command_dispatcher,
        }
    }

    /// `--provider` wins over the config file's `active_provider`.
    pub fn initial_provider(&self) -> Result<Provider, ChatError> {
        match self.args.provider.as_deref() {
            Some(name) => Provider::from_str(name).ok_or_else(|| {
                ChatError::Input(format!("Unsupported provider: {} (use groq or gemini)", name))
            }),
            None => Ok(self.config.active_provider()),
        }
    }

    pub async fn run(self) -> Result<(), ChatError> {
        let provider = self.initial_provider()?;
        let session = ChatSession::new(Dispatcher::from_config(&self.config)?, provider);

        let context = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ChatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        let one_shot = !self.args.chat && (self.args.query.is_some() || context.is_some());
        debug!(provider = provider.id(), one_shot, "Starting");

        if one_shot {
            let query = build_query(self.args.query.as_deref(), context)?;
            handle_chat_mode(session, &query).await
        } else {
            let state = ChatState::new(session, self.config);
            handle_continuous_chat_mode(state, &self.command_dispatcher).await
        }
    }
}

/// Folds piped stdin into the query as `<pipe>` context.
pub fn build_query(query: Option<&str>, context: Option<String>) -> Result<String, ChatError> {
    match (query, context) {
        (Some(arg_q), Some(stdin_ctx)) => Ok(format!("<pipe>{}</pipe>\n\n{}", stdin_ctx, arg_q)),
        (None, Some(stdin_ctx)) => Ok(format!("<pipe>{}</pipe>", stdin_ctx)),
        (Some(arg_q), None) => Ok(arg_q.to_string()),
        (None, None) => Err(ChatError::Input("No query provided".to_string())),
    }
}

async fn handle_chat_mode(mut session: ChatSession, query: &str) -> Result<(), ChatError> {
    let message = session.exchange(query).await?;
    display::display_message(message);
    Ok(())
}

async fn handle_continuous_chat_mode(
    mut state: ChatState,
    commands: &CommandDispatcher,
) -> Result<(), ChatError> {
    display::display_welcome(state.session.conversation.provider());

    let mut editor = input::create_editor(commands.clone())?;

    while state.should_continue {
        let Some(line) = input::read_input(&mut editor)? else {
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(result) = commands.execute_line(line, &mut state) {
            match result {
                Ok(Some(output)) => display::display_info(&output),
                Ok(None) => {}
                Err(e) => display::display_error(&format!("Error executing command: {}", e)),
            }
            continue;
        }

        let pending = match state.session.submit(line) {
            Ok(pending) => pending,
            Err(e) => {
                display::display_error(&e.to_string());
                continue;
            }
        };

        display::display_thinking(pending.provider());
        let reply = pending.wait().await;
        if let Some(message) = state.session.complete(reply) {
            display::display_message(message);
        }
    }

    state.session.shutdown();
    input::save_history(&mut editor)?;

    Ok(())
}
