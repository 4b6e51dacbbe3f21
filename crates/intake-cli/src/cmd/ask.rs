use super::load_attachments;
use crate::output::print_json;
use intake_core::chat::ChatFlow;
use intake_core::config::EngineConfig;
use intake_core::session::SessionContext;
use std::path::PathBuf;

pub fn run(
    config: EngineConfig,
    session: SessionContext,
    text: &str,
    score: u8,
    attach: &[PathBuf],
    json: bool,
) -> anyhow::Result<()> {
    let files = load_attachments(attach)?;
    let mut flow = ChatFlow::new(session, config).with_score(score);

    let Some(turn) = flow.submit_message(text, files) else {
        if json {
            print_json(&serde_json::json!({ "turn": null, "score": flow.score() }))?;
        } else {
            println!("Nothing to send: write a message or attach a file.");
        }
        return Ok(());
    };

    flow.deliver(&turn);

    if json {
        print_json(&turn)?;
        return Ok(());
    }

    if let Some(reply) = flow.transcript().last() {
        println!("{}", reply.content);
    }
    println!();
    println!(
        "[{}] completeness {}% -> {}% (+{})",
        turn.intent, score, turn.score, turn.reply.score_delta
    );
    Ok(())
}
