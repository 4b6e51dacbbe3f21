use super::{reply_runtime, run_deferred};
use crate::output::print_json;
use anyhow::Context;
use intake_core::attachment::AttachmentDescriptor;
use intake_core::chat::ChatFlow;
use intake_core::config::EngineConfig;
use intake_core::session::SessionContext;
use intake_core::sink::{JsonSink, ProfileSink, YamlFileSink};
use intake_core::types::AccountType;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Message(String),
    Attach(PathBuf),
    Files,
    Clear,
    Score,
    New,
    Submit(Option<PathBuf>),
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Input::Message(line.to_string());
    };
    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (rest, ""),
    };
    match cmd {
        "attach" if !arg.is_empty() => Input::Attach(PathBuf::from(arg)),
        "files" => Input::Files,
        "clear" => Input::Clear,
        "score" => Input::Score,
        "new" => Input::New,
        "submit" if arg.is_empty() => Input::Submit(None),
        "submit" => Input::Submit(Some(PathBuf::from(arg))),
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

const HELP: &str = "\
Type a message and press Enter. Commands:
  /attach <path>   queue a file for the next message
  /files           list queued files
  /clear           drop queued files
  /score           show requirement completeness
  /new             start a new request
  /submit [path]   submit the request (YAML to path, else JSON to stdout)
  /quit            leave";

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    config: EngineConfig,
    session: SessionContext,
    no_delay: bool,
    json: bool,
) -> anyhow::Result<()> {
    let runtime = reply_runtime()?;
    let mut flow = ChatFlow::new(session, config);
    let mut queued: Vec<AttachmentDescriptor> = Vec::new();

    if flow.session().account_type == AccountType::Provider {
        tracing::info!("provider account: requests created here are for testing only");
    }

    if !json {
        let session = flow.session();
        if !session.display_name.trim().is_empty() {
            println!("Signed in as {} ({})\n", session.greeting_name(), session.account_type);
        }
        if let Some(welcome) = flow.transcript().last() {
            println!("{}\n", welcome.content);
        }
        println!("(type /help for commands)");
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        match parse_input(&line) {
            Input::Quit => break,
            Input::Help => println!("{HELP}"),
            Input::Unknown(text) => println!("Unknown command: {text} (try /help)"),
            Input::Files => {
                if queued.is_empty() {
                    println!("No files queued.");
                }
                for (i, f) in queued.iter().enumerate() {
                    println!("  {i}: {} ({}, {} bytes)", f.name, f.media_kind, f.size_bytes);
                }
            }
            Input::Clear => {
                queued.clear();
                println!("Cleared queued files.");
            }
            Input::Attach(path) => match AttachmentDescriptor::from_path(&path) {
                Ok(d) => {
                    println!("Queued {} ({})", d.name, d.media_kind);
                    queued.push(d);
                }
                Err(e) => println!("Cannot attach {}: {e}", path.display()),
            },
            Input::Score => println!("Requirement completeness: {}%", flow.score()),
            Input::New => {
                flow.start_new();
                queued.clear();
                println!("Started a new request.");
            }
            Input::Submit(path) => {
                submit(&flow, path)?;
                flow.start_new();
                queued.clear();
            }
            Input::Message(text) => {
                let files = std::mem::take(&mut queued);
                send(&runtime, &mut flow, &text, files, no_delay, json)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// send
// ---------------------------------------------------------------------------

fn send(
    runtime: &tokio::runtime::Runtime,
    flow: &mut ChatFlow,
    text: &str,
    files: Vec<AttachmentDescriptor>,
    no_delay: bool,
    json: bool,
) -> anyhow::Result<()> {
    let has_files = !files.is_empty();
    let Some(turn) = flow.submit_message(text, files) else {
        return Ok(());
    };

    let delay = if no_delay {
        Duration::ZERO
    } else {
        flow.reply_delay(has_files)
    };
    let label = ChatFlow::pending_label(has_files);
    let placeholder = flow.begin_pending(label);
    if !json && !delay.is_zero() {
        println!("{label}");
    }

    let reply = turn.reply.display_text.clone();
    let outcome = run_deferred(runtime, delay, move || reply);
    flow.resolve_pending(placeholder, outcome);

    let Some(delivered) = flow.transcript().last() else {
        return Ok(());
    };
    if json {
        print_json(&serde_json::json!({
            "intent": turn.intent,
            "reply": delivered.content,
            "score_delta": turn.reply.score_delta,
            "score": flow.score(),
        }))?;
    } else {
        println!("{}\n", delivered.content);
        println!("[requirement completeness: {}%]", flow.score());
    }
    Ok(())
}

fn submit(flow: &ChatFlow, path: Option<PathBuf>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            flow.submit(&mut YamlFileSink::new(&path))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Request written to {}", path.display());
        }
        None => {
            let mut sink = JsonSink::new(std::io::stdout());
            sink.accept(flow.profile())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_message() {
        assert_eq!(
            parse_input("  my pipe is leaking "),
            Input::Message("my pipe is leaking".to_string())
        );
        assert_eq!(parse_input(""), Input::Message(String::new()));
    }

    #[test]
    fn slash_commands() {
        assert_eq!(
            parse_input("/attach photos/sink.jpg"),
            Input::Attach(PathBuf::from("photos/sink.jpg"))
        );
        assert_eq!(parse_input("/submit"), Input::Submit(None));
        assert_eq!(
            parse_input("/submit out.yaml"),
            Input::Submit(Some(PathBuf::from("out.yaml")))
        );
        assert_eq!(parse_input("/exit"), Input::Quit);
        assert_eq!(parse_input("/score"), Input::Score);
    }

    #[test]
    fn attach_without_path_is_unknown() {
        assert!(matches!(parse_input("/attach"), Input::Unknown(_)));
        assert!(matches!(parse_input("/dance"), Input::Unknown(_)));
    }
}
