use super::{reply_runtime, run_deferred};
use crate::output::print_json;
use anyhow::Context;
use intake_core::catalog::Conversation;
use intake_core::config::EngineConfig;
use intake_core::thread::{ThreadFlow, SUGGESTION_LABEL};
use intake_core::transcript::{Message, Sender};
use std::io::BufRead;
use std::time::Duration;

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Message(String),
    Suggest,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "/suggest" => Input::Suggest,
        "/help" => Input::Help,
        "/quit" | "/exit" => Input::Quit,
        _ if line.starts_with('/') => Input::Unknown(line.to_string()),
        _ => Input::Message(line.to_string()),
    }
}

const HELP: &str = "\
Type a message and press Enter. Commands:
  /suggest   ask the assistant for a reply suggestion
  /quit      leave";

/// Open conversation `conversation` and read messages from stdin.
pub fn run(
    conversation: Conversation,
    config: EngineConfig,
    no_delay: bool,
    json: bool,
) -> anyhow::Result<()> {
    let runtime = reply_runtime()?;
    let mut flow = ThreadFlow::new(conversation, config);

    if !json {
        let c = flow.conversation();
        println!("Conversation with {} about \"{}\"", c.provider.name, c.request.title);
        println!("(type /help for commands)\n");
        for msg in flow.transcript().messages() {
            println!("{}", render(&flow, msg));
        }
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        match parse_input(&line) {
            Input::Quit => break,
            Input::Help => println!("{HELP}"),
            Input::Unknown(text) => println!("Unknown command: {text} (try /help)"),
            Input::Suggest => suggest(&runtime, &mut flow, no_delay, json)?,
            Input::Message(text) => {
                if flow.send(&text).is_some() {
                    counterpart_reply(&runtime, &mut flow, no_delay, json)?;
                }
            }
        }
    }
    Ok(())
}

fn counterpart_reply(
    runtime: &tokio::runtime::Runtime,
    flow: &mut ThreadFlow,
    no_delay: bool,
    json: bool,
) -> anyhow::Result<()> {
    let delay = if no_delay {
        Duration::ZERO
    } else {
        flow.config().replies.counterpart_delay()
    };
    let placeholder = flow.begin_counterpart_reply();
    if !json && !delay.is_zero() {
        println!("{}", flow.typing_label());
    }

    let reply = flow.counterpart_reply();
    let outcome = run_deferred(runtime, delay, move || reply);
    flow.resolve_counterpart(placeholder, outcome);
    show_last(flow, json)
}

fn suggest(
    runtime: &tokio::runtime::Runtime,
    flow: &mut ThreadFlow,
    no_delay: bool,
    json: bool,
) -> anyhow::Result<()> {
    let delay = if no_delay {
        Duration::ZERO
    } else {
        flow.config().replies.suggestion_delay()
    };
    let placeholder = flow.begin_suggestion();
    if !json && !delay.is_zero() {
        println!("{SUGGESTION_LABEL}");
    }

    let request = flow.suggestion_request();
    let outcome = run_deferred(runtime, delay, move || request.suggest()).and_then(|r| r);
    flow.resolve_suggestion(placeholder, outcome);
    show_last(flow, json)
}

fn show_last(flow: &ThreadFlow, json: bool) -> anyhow::Result<()> {
    let Some(msg) = flow.transcript().last() else {
        return Ok(());
    };
    if json {
        print_json(msg)?;
    } else {
        println!("{}", render(flow, msg));
    }
    Ok(())
}

fn render(flow: &ThreadFlow, msg: &Message) -> String {
    let who = match msg.sender {
        Sender::User => "You",
        Sender::Bot => "Assistant",
        Sender::Counterpart => flow.conversation().provider.name.as_str(),
    };
    format!("{who}: {}", msg.content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thread_commands() {
        assert_eq!(parse_input(" /suggest "), Input::Suggest);
        assert_eq!(parse_input("/exit"), Input::Quit);
        assert_eq!(
            parse_input("2 PM works"),
            Input::Message("2 PM works".to_string())
        );
        assert!(matches!(parse_input("/attach x"), Input::Unknown(_)));
    }
}
