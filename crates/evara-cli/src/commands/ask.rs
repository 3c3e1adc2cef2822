use std::io::{self, Write};

use evara_core::assistant::Role;
use evara_core::AssistantSession;

use crate::commands::common::{join_words, AppContext};
use crate::error::CliError;

/// Ask one question, or show the opening greeting and suggestions when none is given.
pub async fn run_ask(question: &[String], ctx: &AppContext) -> Result<(), CliError> {
    let session = AssistantSession::new(ctx.config.reply_delay());

    let Some(question) = join_words(question) else {
        print_greeting(&session);
        return Ok(());
    };

    session.send(&question);
    if session.is_typing() {
        eprint!("Evara is typing...");
        io::stderr().flush()?;
    }
    session.wait_idle().await;
    eprintln!();

    if let Some(reply) = latest_reply(&session) {
        println!("{reply}");
    }
    Ok(())
}

fn print_greeting(session: &AssistantSession) {
    for message in session.messages() {
        println!("{}", message.content);
    }
    let suggestions = session.suggested_questions();
    if !suggestions.is_empty() {
        println!();
        println!("Try asking:");
        for suggestion in suggestions {
            println!("  evara ask \"{suggestion}\"");
        }
    }
}

pub fn latest_reply(session: &AssistantSession) -> Option<String> {
    session
        .messages()
        .into_iter()
        .rev()
        .find(|message| message.role == Role::Assistant)
        .map(|message| message.content)
}
