use crate::commands::dispatcher::CommandDispatcher;
use crate::config::Config;
use crate::core::error::ChatError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config as EditorConfig, Context, EditMode, Editor, Helper};
use std::borrow::Cow;

/// Completes `/command` names; plain chat text gets history hints only.
pub struct ChatHelper {
    commands: CommandDispatcher,
    history_hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(commands: CommandDispatcher) -> Self {
        Self {
            commands,
            history_hinter: HistoryHinter {},
        }
    }

    fn command_candidates(&self, typed: &str) -> Vec<Pair> {
        self.commands
            .get_command_names()
            .into_iter()
            .filter(|cmd| cmd.starts_with(typed))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd,
            })
            .collect()
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        match line.get(..pos).and_then(|head| head.strip_prefix('/')) {
            Some(typed) if !typed.contains(' ') => Ok((1, self.command_candidates(typed))),
            _ => Ok((pos, Vec::new())),
        }
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        if line.starts_with('/') {
            return self.history_hinter.hint(line, pos, ctx);
        }
        None
    }
}

impl Highlighter for ChatHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }
}

impl Validator for ChatHelper {}

/// Creates a configured rustyline editor
pub fn create_editor(
    commands: CommandDispatcher,
) -> Result<Editor<ChatHelper, FileHistory>, ChatError> {
    let config = EditorConfig::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| ChatError::Input(format!("Failed to create line editor: {}", e)))?;

    editor.set_helper(Some(ChatHelper::new(commands)));
    let _ = editor.load_history(&Config::history_path());

    Ok(editor)
}

/// Reads a line of input. `None` means the user asked to leave.
pub fn read_input(
    editor: &mut Editor<ChatHelper, FileHistory>,
) -> Result<Option<String>, ChatError> {
    let prompt = if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        "> ".to_string()
    } else {
        style("> ").bold().cyan().to_string()
    };
    match editor.readline(&prompt) {
        Ok(line) => {
            // Only commands are remembered; chat text is never written to disk
            if line.starts_with('/') && line.trim().len() > 1 {
                editor
                    .add_history_entry(line.trim())
                    .map_err(|e| ChatError::Input(format!("Failed to add history entry: {}", e)))?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(ChatError::Input(format!("Input error: {}", err))),
    }
}

/// Saves the editor history
pub fn save_history(editor: &mut Editor<ChatHelper, FileHistory>) -> Result<(), ChatError> {
    let history_path = Config::history_path();

    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChatError::Input(format!("Failed to create history directory: {}", e))
            })?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| ChatError::Input(format!("Failed to save history: {}", e)))
}
