use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::api::ApiClient;
use crate::config::Config;
use crate::storage::Storage;

#[derive(Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load()?;
        let storage = Storage::init()?;

        if let Some(branding) = storage.get_branding()? {
            println!("{}", branding.name.bold());
            if let Some(motto) = &branding.motto {
                println!("{}", motto.italic());
            }
            println!();
        }

        let client = ApiClient::new(config.clone())?;
        let online = client.is_online().await;
        println!(
            "Server: {}",
            if online { "online".green() } else { "offline".red() }
        );
        println!(
            "Logged in: {}",
            if config.is_authenticated() { "yes" } else { "no" }
        );

        match storage.last_sync()? {
            Some(at) => println!("Last sync: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("Last sync: never"),
        }

        let pending = storage.outbox_entries()?;
        println!("Pending mutations: {}", pending.len());
        for entry in pending {
            let error = entry
                .last_error
                .as_deref()
                .map(|e| format!("  last error: {e}").red().to_string())
                .unwrap_or_default();
            println!(
                "  #{} {} queued {}{}",
                entry.seq,
                entry.describe(),
                entry.queued_at.format("%Y-%m-%d %H:%M"),
                error
            );
        }

        Ok(())
    }
}
