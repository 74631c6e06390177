use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password};

use crate::api::ApiClient;
use crate::config::Config;

#[derive(Args)]
pub struct LoginCommand {
    /// Email to log in with (prompted when omitted)
    #[arg(long)]
    email: Option<String>,
}

impl LoginCommand {
    pub async fn execute(self) -> Result<()> {
        println!("TeamTrack - Login");
        println!();

        let email = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };
        let password = Password::new().with_prompt("Password").interact()?;

        println!();
        println!("Logging in as {}...", email);

        let config = Config::load()?;
        let client = ApiClient::new(config)?;

        match client.login(&email, &password).await {
            Ok(response) => {
                println!("{} Login successful!", "✓".green());
                println!();
                println!("Welcome, {}!", response.user.display_name);
                if let Some(position) = &response.user.position {
                    println!("Position: {position}");
                }
                println!("Role: {}", response.user.role);

                Ok(())
            }
            Err(e) => {
                println!("{} Login failed: {e}", "✗".red());
                Err(e)
            }
        }
    }
}
