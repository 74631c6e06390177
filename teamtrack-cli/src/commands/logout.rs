use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::api::ApiClient;
use crate::config::Config;

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self) -> Result<()> {
        let mut config = Config::load()?;

        if !config.is_authenticated() {
            println!("Not logged in.");
            return Ok(());
        }

        // Best effort server-side revocation; local tokens are cleared
        // regardless.
        let client = ApiClient::new(config.clone())?;
        if let Err(e) = client.logout().await {
            tracing::debug!("Server logout failed, clearing local tokens anyway: {e}");
        }

        config.clear_tokens();
        config.save()?;

        println!("{} Logged out.", "✓".green());
        Ok(())
    }
}
