use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat with Groq or Google Gemini from the terminal", long_about = None)]
pub struct Args {
    /// Message to send. Starts an interactive session when omitted.
    pub query: Option<String>,

    /// Provider to talk to [possible values: groq, gemini]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Start an interactive session even when a query is given
    #[arg(short, long)]
    pub chat: bool,
}
