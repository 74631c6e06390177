use anyhow::Result;
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::api::ApiClient;
use crate::config::Config;
use crate::storage::Storage;
use crate::sync::SyncEngine;

#[derive(Args)]
pub struct SyncCommand {
    /// Show what would be replayed without syncing
    #[arg(long)]
    dry_run: bool,

    /// Keep syncing on an interval (seconds; default from config)
    #[arg(long, value_name = "SECONDS")]
    watch: Option<Option<u64>>,
}

impl SyncCommand {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load()?;
        let storage = Storage::init()?;
        let client = ApiClient::new(config.clone())?;
        let engine = SyncEngine::new(&storage, &client);

        if self.dry_run {
            return dry_run(&engine);
        }

        match self.watch {
            None => {
                run_pass(&engine).await?;
            }
            Some(interval) => {
                let secs = interval.unwrap_or(config.sync.watch_interval_seconds).max(1);
                println!("Syncing every {secs}s, Ctrl-C to stop.");
                let mut ticker = tokio::time::interval(Duration::from_secs(secs));
                loop {
                    ticker.tick().await;
                    if let Err(e) = run_pass(&engine).await {
                        tracing::warn!("Sync pass failed: {e}");
                    }
                }
            }
        }

        Ok(())
    }
}

fn dry_run(engine: &SyncEngine<'_>) -> Result<()> {
    let pending = engine.pending()?;

    println!("DRY RUN - no changes will be made");
    println!();

    if pending.is_empty() {
        println!("Outbox is empty, nothing to replay.");
        return Ok(());
    }

    println!("{} pending mutations:", pending.len());
    for entry in pending {
        let attempts = if entry.attempts > 0 {
            format!("  ({} failed attempts)", entry.attempts).yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  #{} {} {}{}",
            entry.seq,
            entry.describe(),
            &entry.local_id[..entry.local_id.len().min(8)],
            attempts
        );
    }

    Ok(())
}

async fn run_pass(engine: &SyncEngine<'_>) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Syncing with server...");

    let report = engine.sync_pass().await?;
    spinner.finish_and_clear();

    if report.offline {
        println!("{} Server unreachable, sync skipped.", "!".yellow());
        return Ok(());
    }

    println!(
        "{} Sync complete: {} pushed, {} failed, {} collections refreshed.",
        if report.is_clean() {
            "✓".green()
        } else {
            "!".yellow()
        },
        report.pushed,
        report.failed,
        report.pulled
    );

    if report.failed > 0 {
        println!("Failed mutations stay queued; run {} for details.", "status".bold());
    }

    Ok(())
}
