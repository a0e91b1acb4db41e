pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::chat::ChatSession;
use crate::config::Config;
pub use dispatcher::create_command_registry;

pub struct ChatState {
    pub session: ChatSession,
    pub config: Config,
    pub should_continue: bool,
}

impl ChatState {
    pub fn new(session: ChatSession, config: Config) -> Self {
        Self {
            session,
            config,
            should_continue: true,
        }
    }
}
