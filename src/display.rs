use crate::chat::{Message, Origin};
use crate::config::Provider;
use crate::utils::text::{display_width, wrap_text};
use console::{Style, style};

fn box_width_limit() -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(4), 100).max(40)
}

/// Lay out `text` inside a bordered box no wider than `max_width`.
pub fn render_box(text: &str, max_width: usize) -> Vec<String> {
    let inner = max_width.saturating_sub(4).max(1);

    let mut lines = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(wrap_text(line, inner));
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    let content_width = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
    let box_width = content_width + 4;

    let mut rendered = Vec::with_capacity(lines.len() + 2);
    rendered.push(format!("┌{}┐", "─".repeat(box_width - 2)));
    for line in lines {
        let padding = content_width - display_width(&line);
        rendered.push(format!("│ {}{} │", line, " ".repeat(padding)));
    }
    rendered.push(format!("└{}┘", "─".repeat(box_width - 2)));
    rendered
}

/// Print one transcript entry
pub fn display_message(message: &Message) {
    let (label, border): (_, Style) = match message.origin() {
        Origin::User => (style("🧑 YOU").bold().cyan(), Style::new().dim().cyan()),
        Origin::Assistant => (style("🤖 ASSISTANT").bold().blue(), Style::new().dim().blue()),
    };

    println!("\n{}", label);
    for line in render_box(message.text(), box_width_limit()) {
        println!("{}", border.apply_to(line));
    }
}

pub fn display_thinking(provider: Provider) {
    println!(
        "{} {}",
        style("⏳").dim(),
        style(format!("Waiting for {}...", provider)).dim().italic()
    );
}

pub fn display_info(text: &str) {
    println!("{}", text);
}

pub fn display_error(text: &str) {
    eprintln!("{} {}", style("⚠️").bold().red(), style(text).red());
}

pub fn display_welcome(provider: Provider) {
    println!(
        "{} {}",
        style("💬 duochat").bold().magenta(),
        style(format!("talking to {}", provider)).dim()
    );
    println!("Type '/help' for available commands. Press Ctrl+D or type /quit to exit.");
}
