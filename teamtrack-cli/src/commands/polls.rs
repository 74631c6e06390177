use anyhow::{bail, Result};
use colored::Colorize;

use crate::api::ApiClient;
use crate::config::Config;
use crate::storage::{EntityKind, MutationOp, Storage};
use crate::sync::SyncEngine;

pub async fn list_polls(all: bool) -> Result<()> {
    let storage = Storage::init()?;

    let polls: Vec<_> = storage
        .list_polls()?
        .into_iter()
        .filter(|p| all || p.is_open())
        .collect();

    if polls.is_empty() {
        println!("No polls in the local cache. Run {} first.", "sync".bold());
        return Ok(());
    }

    for poll in polls {
        let status = if poll.is_open() {
            poll.status.green()
        } else {
            poll.status.dimmed()
        };
        let deadline = poll
            .closes_at
            .map(|at| format!("  closes {}", at.format("%Y-%m-%d %H:%M")))
            .unwrap_or_default();
        println!(
            "{}  [{}] {}{}",
            &poll.id[..poll.id.len().min(8)],
            status,
            poll.question,
            deadline
        );
    }

    Ok(())
}

/// Live tally when the server is reachable, cached copy otherwise
pub async fn show_poll(id: &str) -> Result<()> {
    let storage = Storage::init()?;
    let poll = find_poll(&storage, id)?;

    let config = Config::load()?;
    let client = ApiClient::new(config)?;

    if client.is_online().await {
        let results = client.get_poll(&poll.id).await?;

        println!("{}", results.poll.question.bold());
        println!();
        for tally in &results.tally {
            let marker = if results.my_vote.as_deref() == Some(tally.option.as_str()) {
                " (your vote)".green().to_string()
            } else {
                String::new()
            };
            println!("  {:<12} {}{}", tally.option, tally.votes, marker);
        }
        println!();
        println!("{} votes total", results.total_votes);
    } else {
        println!("{}", poll.question.bold());
        println!("Options: {}", poll.options.join(", "));
        println!("{}", "Offline: live tally unavailable.".yellow());
    }

    Ok(())
}

/// Queue a vote and push it right away when the server is reachable.
/// Re-voting overwrites server-side, so replaying an old vote is harmless.
pub async fn vote(id: &str, choice: &str) -> Result<()> {
    let storage = Storage::init()?;
    let poll = find_poll(&storage, id)?;

    if !poll.is_open() {
        bail!("Poll '{}' is closed", poll.question);
    }

    // Send the canonical option spelling, not whatever casing was typed.
    let choice = poll
        .options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(choice))
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "'{choice}' is not an option, expected one of: {}",
                poll.options.join(", ")
            )
        })?;

    storage.enqueue(
        EntityKind::PollVote,
        MutationOp::Create,
        &poll.id,
        serde_json::json!({ "choice": choice }),
    )?;

    let config = Config::load()?;
    let client = ApiClient::new(config)?;
    let engine = SyncEngine::new(&storage, &client);
    let report = engine.sync_pass().await?;

    if report.offline {
        println!(
            "{} Vote queued; it will reach the server on the next sync.",
            "✓".yellow()
        );
    } else if report.failed > 0 {
        println!(
            "{} Vote queued but not accepted yet; run {} for details.",
            "!".yellow(),
            "status".bold()
        );
    } else {
        println!("{} Voted '{choice}' on: {}", "✓".green(), poll.question);
    }

    Ok(())
}

fn find_poll(storage: &Storage, id: &str) -> Result<crate::models::Poll> {
    let matches: Vec<_> = storage
        .list_polls()?
        .into_iter()
        .filter(|p| p.id == id || p.id.starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No poll matches '{id}'; run sync to refresh the cache"),
        1 => Ok(matches.into_iter().next().unwrap()),
        n => bail!("'{id}' is ambiguous ({n} matches), use more characters"),
    }
}
