use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::api::ApiClient;
use crate::config::Config;

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load()?;

        if !config.is_authenticated() {
            println!("Not logged in. Run {} first.", "teamtrack-cli login".bold());
            return Ok(());
        }

        let client = ApiClient::new(config)?;
        let user = client.whoami().await?;

        println!("{} ({})", user.display_name.bold(), user.email);
        println!("Role: {}", user.role);
        if let Some(position) = &user.position {
            println!("Position: {position}");
        }

        Ok(())
    }
}
